//! The editor state machine (C9): the modal PDA, undo/redo ring, structural
//! smart-edit rules, and the `Editor` that ties them to a document buffer.

mod editor;
mod mode;
mod smart;
mod status;
mod undo;

pub use editor::{Action, Editor};
pub use mode::{Mode, ModeStack};
pub use smart::{Continuation, auto_close_followup, compute_continuation, smart_backspace_range};
pub use status::{StatusLevel, StatusMessage};
pub use undo::UndoEngine;
