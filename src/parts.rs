// Part-level interface over the splitter: completion streams arrive as typed
// parts, and only the text deltas are subject to reasoning extraction.

use serde::{Deserialize, Serialize};

use crate::{
    splitter::TagSplitter,
    types::{Channel, Segment},
};

/// One item of a completion stream.
///
/// Only `TextDelta` is classified by the splitter; every other part passes
/// through untouched and in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamPart {
    /// Visible text delta.
    TextDelta { text: String },

    /// Reasoning delta, either produced by the splitter or forwarded from a
    /// provider that emits reasoning natively.
    Reasoning { text: String },

    /// Incremental tool call arguments.
    ToolCallDelta {
        id: String,
        name: String,
        arguments_delta: String,
    },

    /// Completed tool call with arguments as a JSON string.
    ToolCall {
        id: String,
        name: String,
        arguments: String,
    },

    /// End of the completion.
    Finish { reason: String },

    /// Upstream failure surfaced as a part.
    Error { message: String },
}

/// Applies a [`TagSplitter`] to a live sequence of stream parts.
///
/// Text deltas are routed through the splitter and come back out labelled
/// per channel, with separators materialized as text prefixes. Non-text
/// parts are forwarded unchanged and do not disturb the splitter state, so
/// a marker split around an interleaved tool call still resolves.
#[derive(Debug)]
pub struct StreamTransform {
    splitter: TagSplitter,
}

impl StreamTransform {
    /// Wrap a splitter for part-level processing.
    pub fn new(splitter: TagSplitter) -> Self {
        Self { splitter }
    }

    /// Process one incoming part, returning the parts to forward downstream.
    pub fn process(&mut self, part: StreamPart) -> Vec<StreamPart> {
        match part {
            StreamPart::TextDelta { text } => {
                let segments = self.splitter.feed(&text);
                segments.into_iter().map(|s| self.render(s)).collect()
            }
            other => vec![other],
        }
    }

    /// Release the splitter's residual buffer once the upstream ends.
    pub fn finish(&mut self) -> Vec<StreamPart> {
        let segments = self.splitter.flush();
        segments.into_iter().map(|s| self.render(s)).collect()
    }

    /// The wrapped splitter.
    pub fn splitter(&self) -> &TagSplitter {
        &self.splitter
    }

    fn render(&self, segment: Segment) -> StreamPart {
        let text = segment.materialize(&self.splitter.config().separator);
        match segment.channel {
            Channel::Text => StreamPart::TextDelta { text },
            Channel::Reasoning => StreamPart::Reasoning { text },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplitterConfig;

    fn transform() -> StreamTransform {
        StreamTransform::new(TagSplitter::new(SplitterConfig::default()))
    }

    fn text_delta(text: &str) -> StreamPart {
        StreamPart::TextDelta {
            text: text.to_string(),
        }
    }

    fn reasoning(text: &str) -> StreamPart {
        StreamPart::Reasoning {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_text_deltas_are_classified() {
        let mut transform = transform();
        let out = transform.process(text_delta("<think>deep</think>shallow"));
        assert_eq!(out, vec![reasoning("deep"), text_delta("shallow")]);
        assert!(transform.finish().is_empty());
    }

    #[test]
    fn test_separator_materialized_on_resumed_channel() {
        let mut transform = transform();
        let out = transform.process(text_delta("<think>a</think><think>b</think>c"));
        assert_eq!(
            out,
            vec![reasoning("a"), reasoning("\nb"), text_delta("c")]
        );
    }

    #[test]
    fn test_non_text_parts_forwarded_unchanged() {
        let mut transform = transform();
        let call = StreamPart::ToolCall {
            id: "call_1".to_string(),
            name: "search".to_string(),
            arguments: r#"{"query":"weather"}"#.to_string(),
        };

        // A partial marker stays held while unrelated parts flow through.
        assert!(transform.process(text_delta("<thi")).is_empty());
        assert_eq!(transform.process(call.clone()), vec![call]);
        let out = transform.process(text_delta("nk>deep</think>done"));
        assert_eq!(out, vec![reasoning("deep"), text_delta("done")]);
    }

    #[test]
    fn test_finish_flushes_residual_buffer() {
        let mut transform = transform();
        assert!(transform.process(text_delta("<thin")).is_empty());
        assert_eq!(transform.finish(), vec![text_delta("<thin")]);
    }

    #[test]
    fn test_wire_format() {
        let part = text_delta("hi");
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(value, serde_json::json!({"type": "text-delta", "text": "hi"}));

        let part = reasoning("hm");
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(value, serde_json::json!({"type": "reasoning", "text": "hm"}));
    }
}
