//! Degraded `Images` implementation for drivers without a graphics
//! protocol: every query reports "unsupported", which the renderer reads
//! as "draw the raw markup" per the capability-absence error path.

use crate::error::{HostError, HostResult};
use crate::traits::{ImageDisplayResult, Images};
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct NoImages;

impl Images for NoImages {
    fn supported(&self, _path: &Path) -> bool {
        false
    }

    fn pixel_size(&self, path: &Path) -> HostResult<(u32, u32)> {
        Err(HostError::ImageUnresolved(path.display().to_string()))
    }

    fn calc_rows(&self, path: &Path, _max_cols: u16) -> HostResult<u16> {
        Err(HostError::ImageUnresolved(path.display().to_string()))
    }

    fn display(&mut self, path: &Path, _row: u16, _col: u16, _max_cols: u16, _max_rows: u16) -> HostResult<ImageDisplayResult> {
        Err(HostError::ImageUnresolved(path.display().to_string()))
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        PathBuf::from(path)
    }

    fn mask_region(&mut self, _row: u16, _col: u16, _cols: u16, _rows: u16) -> HostResult<()> {
        Ok(())
    }

    fn clear_all(&mut self) -> HostResult<()> {
        Ok(())
    }

    fn invalidate(&mut self, _path: &Path) {}

    fn frame_start(&mut self) -> HostResult<()> {
        Ok(())
    }

    fn frame_end(&mut self) -> HostResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_images_reports_unsupported() {
        let images = NoImages;
        assert!(!images.supported(Path::new("a.png")));
        assert!(images.pixel_size(Path::new("a.png")).is_err());
    }
}
