// Marker configuration shared by the batch and streaming splitter paths.

/// Configuration for one splitting operation.
///
/// A config is fixed for the lifetime of the splitter that holds it: one
/// delimiter pair, one separator, one starting mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitterConfig {
    /// Marker that opens a reasoning block.
    pub open_marker: String,

    /// Marker that closes a reasoning block.
    pub close_marker: String,

    /// Separator joining extracted pieces and bridging removal seams.
    pub separator: String,

    /// Whether a completion opens inside a reasoning block with no opening
    /// marker, as DeepSeek-R1 style models produce.
    pub start_in_reasoning: bool,
}

impl SplitterConfig {
    /// Create a config from explicit markers.
    pub fn new(open_marker: &str, close_marker: &str) -> Self {
        Self {
            open_marker: open_marker.to_string(),
            close_marker: close_marker.to_string(),
            separator: "\n".to_string(),
            start_in_reasoning: false,
        }
    }

    /// Derive `<name>` and `</name>` markers from a tag name.
    pub fn for_tag(name: &str) -> Self {
        Self::new(&format!("<{}>", name), &format!("</{}>", name))
    }

    /// Config whose markers never match; every fragment flows through as
    /// visible text.
    pub fn passthrough() -> Self {
        Self::new("", "")
    }

    /// Set the separator used between extracted pieces.
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Set whether the splitter starts inside a reasoning block.
    pub fn with_start_in_reasoning(mut self, value: bool) -> Self {
        self.start_in_reasoning = value;
        self
    }

    /// Whether the markers can never match.
    pub fn is_passthrough(&self) -> bool {
        self.open_marker.is_empty() || self.close_marker.is_empty()
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self::for_tag("think")
    }
}
