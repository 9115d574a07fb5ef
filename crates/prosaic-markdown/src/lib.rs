//! Markdown block/inline parsing and the block cache that sits between the
//! document buffer and the renderer.

pub mod block;
pub mod cache;
mod emoji;
mod entities;
pub mod inline;

pub use block::{
    Align, Block, BlockType, BlockquotePayload, CodePayload, FootnoteDefPayload, HeaderPayload, ImagePayload,
    ListPayload, MathPayload, Payload, Span, TablePayload, TaskState, parse_blocks,
};
pub use cache::BlockCache;
pub use inline::{DelimMarker, InlineKind, InlineRun, StyleBit, parse_inline};
