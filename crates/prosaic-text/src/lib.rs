//! Byte buffer, grapheme/width primitives, and the word-wrap engine.
//!
//! Everything in this crate operates on byte offsets into UTF-8 text. The
//! [`GapBuffer`] owns the document; [`grapheme`] and [`width`] give callers
//! grapheme-cluster navigation and terminal display width; [`wrap`] turns a
//! byte range into wrapped display lines.

pub mod buffer;
pub mod grapheme;
pub mod width;
pub mod wrap;

pub use buffer::GapBuffer;
pub use grapheme::{Segment, display_width, grapheme_next, grapheme_prev, grapheme_width, segment_str};
pub use width::egc_width;
pub use wrap::{WrapConfig, WrapLine, wrap_range};
