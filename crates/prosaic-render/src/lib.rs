//! Consumes the block cache plus cursor/scroll/selection/layout and emits a
//! styled cell grid and the on-screen cursor coordinate.

pub mod cell;
pub mod layout;
pub mod render;
pub mod scroll;
pub mod sketch;

pub use cell::{Cell, CellFlags, Frame};
pub use layout::Layout;
pub use render::{RenderInput, RenderOutput, render};
pub use scroll::compute_scroll_intent;
pub use sketch::{Sketch, SketchCache};
