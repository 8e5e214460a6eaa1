// Core splitter that separates completion output into reasoning and visible
// text around a configured marker pair, both for complete strings and for
// fragment sequences whose boundaries may fall inside a marker.

use regex::Regex;

use crate::{
    boundary::potential_marker_start,
    config::SplitterConfig,
    types::{Channel, Extraction, Segment},
};

/// Splits completion output into reasoning and visible text channels.
///
/// One instance serves one completion request: `extract` for a complete
/// string, `feed` and `flush` for a live fragment sequence. Streamed content
/// is withheld only while it could still be part of a marker, so a marker
/// split across fragments never leaks and at most a marker's worth of
/// characters is ever pending.
#[derive(Debug, Clone)]
pub struct TagSplitter {
    config: SplitterConfig,
    pattern: Option<Regex>,
    mode: Channel,
    buffer: String,
    emitted_text: bool,
    emitted_reasoning: bool,
    after_switch: bool,
    awaiting_open_marker: bool,
}

impl TagSplitter {
    /// Create a splitter for the given configuration.
    pub fn new(config: SplitterConfig) -> Self {
        let pattern = if config.is_passthrough() {
            None
        } else {
            let source = format!(
                "(?s){}(.*?){}",
                regex::escape(&config.open_marker),
                regex::escape(&config.close_marker)
            );
            // Escaped literals always form a valid pattern.
            Some(Regex::new(&source).expect("valid marker pattern"))
        };
        let mode = if config.start_in_reasoning {
            Channel::Reasoning
        } else {
            Channel::Text
        };
        let awaiting_open_marker = config.start_in_reasoning;
        Self {
            config,
            pattern,
            mode,
            buffer: String::new(),
            emitted_text: false,
            emitted_reasoning: false,
            after_switch: false,
            awaiting_open_marker,
        }
    }

    /// Configuration in effect for this splitter.
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Check whether the splitter is currently inside a reasoning block.
    pub fn is_in_reasoning(&self) -> bool {
        self.mode == Channel::Reasoning
    }

    /// Restore the initial state for a new request.
    pub fn reset(&mut self) {
        self.mode = if self.config.start_in_reasoning {
            Channel::Reasoning
        } else {
            Channel::Text
        };
        self.buffer.clear();
        self.emitted_text = false;
        self.emitted_reasoning = false;
        self.after_switch = false;
        self.awaiting_open_marker = self.config.start_in_reasoning;
    }

    /// Extract every reasoning block from a complete completion.
    ///
    /// Blocks are matched lazily in source order; their contents are joined
    /// with the configured separator. The visible text is the input with each
    /// block, markers included, removed; one separator bridges a removal seam
    /// when both sides of it are non-empty. Pure over the input and the
    /// configuration, independent of any streaming state.
    pub fn extract(&self, text: &str) -> Extraction {
        let Some(pattern) = &self.pattern else {
            return Extraction::untouched(text.to_string());
        };

        if self.config.start_in_reasoning {
            return self.extract_resumed(pattern, text);
        }
        self.extract_spans(pattern, text)
    }

    /// Classify one streamed fragment, returning segments in arrival order.
    pub fn feed(&mut self, delta: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        self.buffer.push_str(delta);

        loop {
            if self.awaiting_open_marker {
                // A resumed block may still open with an explicit marker;
                // consume it silently when it does.
                let open_len = self.config.open_marker.len();
                match potential_marker_start(&self.buffer, &self.config.open_marker) {
                    Some(0) if self.buffer.len() >= open_len => {
                        self.buffer.drain(..open_len);
                        self.awaiting_open_marker = false;
                        continue;
                    }
                    Some(0) => break,
                    _ => self.awaiting_open_marker = false,
                }
            }

            let (candidate, marker_len) = {
                let marker = match self.mode {
                    Channel::Text => self.config.open_marker.as_str(),
                    Channel::Reasoning => self.config.close_marker.as_str(),
                };
                let found = potential_marker_start(&self.buffer, marker);
                // An opening marker only counts at the very start of the
                // buffer; a mid-buffer occurrence is ordinary text.
                let accepted = match self.mode {
                    Channel::Text => found.filter(|idx| *idx == 0),
                    Channel::Reasoning => found,
                };
                (accepted, marker.len())
            };

            let Some(idx) = candidate else {
                let content = std::mem::take(&mut self.buffer);
                self.push_segment(&mut segments, content);
                break;
            };

            if idx + marker_len > self.buffer.len() {
                // Partial marker at the tail; emit what precedes it and keep
                // the tail until more text arrives.
                let content: String = self.buffer.drain(..idx).collect();
                self.push_segment(&mut segments, content);
                break;
            }

            let content: String = self.buffer.drain(..idx).collect();
            self.push_segment(&mut segments, content);
            self.buffer.drain(..marker_len);
            self.mode = match self.mode {
                Channel::Text => Channel::Reasoning,
                Channel::Reasoning => Channel::Text,
            };
            self.after_switch = true;
        }

        segments
    }

    /// Release whatever the splitter still holds once the stream has ended.
    ///
    /// A marker that never completed is ordinary content and comes out on
    /// the current channel.
    pub fn flush(&mut self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let content = std::mem::take(&mut self.buffer);
        self.push_segment(&mut segments, content);
        segments
    }

    fn push_segment(&mut self, segments: &mut Vec<Segment>, text: String) {
        // Empty emissions are no-ops and leave the separator state alone.
        if text.is_empty() {
            return;
        }
        let emitted = match self.mode {
            Channel::Text => &mut self.emitted_text,
            Channel::Reasoning => &mut self.emitted_reasoning,
        };
        let separated = self.after_switch && *emitted;
        *emitted = true;
        self.after_switch = false;
        segments.push(Segment {
            channel: self.mode,
            text,
            separated,
        });
    }

    fn extract_spans(&self, pattern: &Regex, text: &str) -> Extraction {
        let mut spans = Vec::new();
        let mut pieces = Vec::new();
        for caps in pattern.captures_iter(text) {
            if let (Some(full), Some(body)) = (caps.get(0), caps.get(1)) {
                spans.push((full.start(), full.end()));
                pieces.push(body.as_str());
            }
        }

        if spans.is_empty() {
            return Extraction::untouched(text.to_string());
        }

        // Walk the spans back to front so the recorded offsets stay valid
        // while later spans are cut out of the working string.
        let mut visible = text.to_string();
        for &(start, end) in spans.iter().rev() {
            let before = &visible[..start];
            let after = &visible[end..];
            let seam = if !before.is_empty() && !after.is_empty() {
                self.config.separator.as_str()
            } else {
                ""
            };
            visible = format!("{}{}{}", before, seam, after);
        }

        Extraction::new(visible, Some(pieces.join(&self.config.separator)))
    }

    // R1 style completions open inside a reasoning block with no opening
    // marker; assume one at position zero before matching. With no closing
    // marker in sight the whole completion is reasoning.
    fn extract_resumed(&self, pattern: &Regex, text: &str) -> Extraction {
        if text.starts_with(&self.config.open_marker) {
            if text.contains(&self.config.close_marker) {
                return self.extract_spans(pattern, text);
            }
            let body = &text[self.config.open_marker.len()..];
            return Extraction::new(String::new(), Some(body.to_string()));
        }
        if !text.contains(&self.config.close_marker) {
            return Extraction::new(String::new(), Some(text.to_string()));
        }
        let prefixed = format!("{}{}", self.config.open_marker, text);
        self.extract_spans(pattern, &prefixed)
    }
}

impl Default for TagSplitter {
    fn default() -> Self {
        Self::new(SplitterConfig::default())
    }
}
