use std::fmt;

use serde::{Deserialize, Serialize};

/// Output channel a piece of completion content belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Visible answer text.
    Text,
    /// Reasoning extracted from between the markers.
    Reasoning,
}

/// A run of streamed content classified onto one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Channel this content belongs to.
    pub channel: Channel,

    /// The content itself, byte for byte as it appeared outside or between
    /// the markers.
    pub text: String,

    /// Whether a separator belongs in front of this content. Set when the
    /// channel resumes after a switch and has emitted before; a channel's
    /// first emission never carries it.
    pub separated: bool,
}

impl Segment {
    /// Create a segment on the text channel.
    pub fn text(content: &str) -> Self {
        Self {
            channel: Channel::Text,
            text: content.to_string(),
            separated: false,
        }
    }

    /// Create a segment on the reasoning channel.
    pub fn reasoning(content: &str) -> Self {
        Self {
            channel: Channel::Reasoning,
            text: content.to_string(),
            separated: false,
        }
    }

    /// Mark the segment as separator-prefixed.
    pub fn separated(mut self) -> Self {
        self.separated = true;
        self
    }

    /// Render the content with the separator applied when the flag is set.
    pub fn materialize(&self, separator: &str) -> String {
        if self.separated {
            format!("{}{}", separator, self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Result of one-shot extraction over a complete completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// The completion with every reasoning block removed.
    pub text: String,

    /// Contents of the reasoning blocks joined with the separator, `None`
    /// when no block was found.
    pub reasoning: Option<String>,
}

impl Extraction {
    /// Create an extraction with both channels filled in.
    pub fn new(text: String, reasoning: Option<String>) -> Self {
        Self { text, reasoning }
    }

    /// Create a result for text that contained no reasoning block.
    pub fn untouched(text: String) -> Self {
        Self {
            text,
            reasoning: None,
        }
    }

    /// Check whether any reasoning block was found.
    pub fn has_reasoning(&self) -> bool {
        self.reasoning.is_some()
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extraction {{ text: {} bytes, reasoning: {} bytes }}",
            self.text.len(),
            self.reasoning.as_deref().map_or(0, str::len)
        )
    }
}
