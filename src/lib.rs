//! Splits language model completion output into reasoning and visible text
//! channels around a configurable marker pair such as `<think>` and
//! `</think>`, both for complete strings and for live fragment streams whose
//! chunk boundaries may fall inside a marker.
//!
//! ```
//! use reasoning_splitter::{SplitterConfig, TagSplitter};
//!
//! let splitter = TagSplitter::new(SplitterConfig::for_tag("think"));
//! let out = splitter.extract("<think>ponder this</think>answer");
//! assert_eq!(out.text, "answer");
//! assert_eq!(out.reasoning.as_deref(), Some("ponder this"));
//! ```

pub mod boundary;
pub mod config;
pub mod factory;
pub mod parts;
pub mod splitter;
pub mod stream;
pub mod types;

pub use boundary::potential_marker_start;
pub use config::SplitterConfig;
pub use factory::{SplitterFactory, SplitterRegistry};
pub use parts::{StreamPart, StreamTransform};
pub use splitter::TagSplitter;
pub use stream::split_stream;
pub use types::{Channel, Extraction, Segment};
