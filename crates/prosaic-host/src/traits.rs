//! Abstract contract the driver must implement, grouped per spec §4.8.

use crate::error::HostResult;
use prosaic_events::InputEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpec {
    pub bold: bool,
    pub italic: bool,
    pub dim: bool,
    pub strike: bool,
    pub underline: bool,
    pub fg: Option<(u8, u8, u8)>,
    pub bg: Option<(u8, u8, u8)>,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self { bold: false, italic: false, dim: false, strike: false, underline: false, fg: None, bg: None }
    }
}

pub trait Display {
    fn size(&self) -> HostResult<(u16, u16)>;
    fn move_to(&mut self, row: u16, col: u16) -> HostResult<()>;
    fn set_style(&mut self, style: StyleSpec) -> HostResult<()>;
    fn reset_style(&mut self) -> HostResult<()>;
    fn clear_screen(&mut self) -> HostResult<()>;
    fn clear_line(&mut self) -> HostResult<()>;
    fn clear_to_end(&mut self, n: u16) -> HostResult<()>;
    fn write_str(&mut self, s: &str) -> HostResult<()>;
    fn repeat_char(&mut self, c: char, n: u16) -> HostResult<()>;
    fn write_scaled(&mut self, s: &str, scale_num: u16, scale_den: u16) -> HostResult<()>;
    fn hyperlink_begin(&mut self, url: &str) -> HostResult<()>;
    fn hyperlink_end(&mut self) -> HostResult<()>;
    fn flush(&mut self) -> HostResult<()>;
    fn sync_begin(&mut self) -> HostResult<()>;
    fn sync_end(&mut self) -> HostResult<()>;
    fn set_title(&mut self, title: &str) -> HostResult<()>;
}

pub trait Input {
    fn next_key(&mut self) -> HostResult<Option<InputEvent>>;
    fn last_mouse(&self) -> Option<(u16, u16)>;
    fn resize_pending(&mut self) -> Option<(u16, u16)>;
    fn quit_pending(&self) -> bool;
    fn input_ready_within(&mut self, ms: u64) -> HostResult<bool>;
    fn poll_background_jobs(&mut self);
}

pub trait Clipboard {
    fn copy(&mut self, bytes: &[u8]) -> HostResult<()>;
    fn paste(&mut self) -> HostResult<Vec<u8>>;
}

pub trait Filesystem {
    fn home_dir(&self) -> Option<std::path::PathBuf>;
    fn mkdir_p(&self, path: &std::path::Path) -> HostResult<()>;
    fn read_file(&self, path: &std::path::Path) -> HostResult<Vec<u8>>;
    fn write_file(&self, path: &std::path::Path, bytes: &[u8]) -> HostResult<()>;
    fn list_dir(&self, path: &std::path::Path) -> HostResult<Vec<std::path::PathBuf>>;
    fn mtime(&self, path: &std::path::Path) -> HostResult<std::time::SystemTime>;
    fn delete(&self, path: &std::path::Path) -> HostResult<()>;
    fn reveal(&self, path: &std::path::Path) -> HostResult<()>;
}

pub trait Time {
    fn monotonic_ms(&self) -> u64;
    fn sleep_ms(&self, ms: u64);
    fn local_time_now(&self) -> String;
    fn username(&self) -> String;
}

pub struct ImageDisplayResult {
    pub rows_used: u16,
    pub cropped: bool,
}

pub trait Images {
    fn supported(&self, path: &std::path::Path) -> bool;
    fn pixel_size(&self, path: &std::path::Path) -> HostResult<(u32, u32)>;
    fn calc_rows(&self, path: &std::path::Path, max_cols: u16) -> HostResult<u16>;
    fn display(&mut self, path: &std::path::Path, row: u16, col: u16, max_cols: u16, max_rows: u16) -> HostResult<ImageDisplayResult>;
    fn resolve_path(&self, path: &str) -> std::path::PathBuf;
    fn mask_region(&mut self, row: u16, col: u16, cols: u16, rows: u16) -> HostResult<()>;
    fn clear_all(&mut self) -> HostResult<()>;
    fn invalidate(&mut self, path: &std::path::Path);
    fn frame_start(&mut self) -> HostResult<()>;
    fn frame_end(&mut self) -> HostResult<()>;
}
