//! The abstract contract a driver implements, plus a crossterm-backed
//! concrete terminal host. Capability negotiation lets the renderer
//! degrade features the host cannot provide instead of failing.

pub mod capabilities;
pub mod error;
pub mod images;
pub mod native;
pub mod terminal;
pub mod traits;

pub use error::{HostError, HostResult};
pub use images::NoImages;
pub use native::{NativeClipboard, NativeFilesystem, NativeTime};
pub use prosaic_events::Capabilities;
pub use terminal::{TerminalGuard, TerminalHost};
pub use traits::{Clipboard, Display, Filesystem, ImageDisplayResult, Images, Input, StyleSpec, Time};
