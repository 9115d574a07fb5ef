//! Logical cell grid the renderer paints into before a host turns it into
//! draw calls.

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        const SELECTED  = 0b0000_0001;
        const BOLD      = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const DIM       = 0b0000_1000;
        const STRIKE    = 0b0001_0000;
        const UNDERLINE = 0b0010_0000;
        const CURSOR    = 0b0100_0000;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Full grapheme cluster for leader cells; empty for continuation cells.
    pub cluster: String,
    /// Visual width in columns; 0 marks a continuation cell.
    pub width: u8,
    pub flags: CellFlags,
    pub fg: Option<(u8, u8, u8)>,
    pub bg: Option<(u8, u8, u8)>,
}

impl Cell {
    pub fn leader(cluster: &str, width: u16, flags: CellFlags) -> Self {
        Self { cluster: cluster.to_string(), width: width.max(1) as u8, flags, fg: None, bg: None }
    }

    pub fn continuation(flags: CellFlags) -> Self {
        Self { cluster: String::new(), width: 0, flags, fg: None, bg: None }
    }

    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self { cluster: " ".to_string(), width: 1, flags: CellFlags::empty(), fg: None, bg: None }
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height, cells: vec![Cell::default(); width as usize * height as usize] }
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn set_cluster(&mut self, x: u16, y: u16, cluster: &str, width: u16, flags: CellFlags) {
        if x >= self.width || y >= self.height {
            return;
        }
        let w = width.max(1).min(self.width - x);
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::leader(cluster, w, flags);
        }
        for dx in 1..w {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx] = Cell::continuation(flags);
            }
        }
    }

    pub fn set_colors(&mut self, x: u16, y: u16, fg: Option<(u8, u8, u8)>, bg: Option<(u8, u8, u8)>) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx].fg = fg;
            self.cells[idx].bg = bg;
        }
    }

    pub fn apply_flags_span(&mut self, x: u16, y: u16, span_width: u16, flags: CellFlags) {
        let span = span_width.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx].flags |= flags;
            }
        }
    }

    pub fn fill_row(&mut self, y: u16, bg: Option<(u8, u8, u8)>) {
        for x in 0..self.width {
            if let Some(idx) = self.index(x, y) {
                self.cells[idx] = Cell::default();
                self.cells[idx].bg = bg;
            }
        }
    }

    pub fn row_leaders(&self, y: u16) -> impl Iterator<Item = (&str, u16, CellFlags, u16)> + '_ {
        let width = self.width;
        let start = y as usize * width as usize;
        let mut x = 0u16;
        std::iter::from_fn(move || {
            while x < width {
                let idx = start + x as usize;
                let cell = &self.cells[idx];
                if cell.is_leader() {
                    let w = cell.width as u16;
                    let out = (cell.cluster.as_str(), w, cell.flags, x);
                    x = x.saturating_add(w.max(1));
                    return Some(out);
                }
                x += 1;
            }
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_cluster_fills_continuation_for_wide_glyph() {
        let mut f = Frame::new(5, 1);
        f.set_cluster(0, 0, "界", 2, CellFlags::empty());
        assert!(f.cells[0].is_leader());
        assert!(!f.cells[1].is_leader());
        assert_eq!(f.cells[1].width, 0);
    }

    #[test]
    fn out_of_bounds_set_is_noop() {
        let mut f = Frame::new(2, 2);
        f.set_cluster(5, 5, "x", 1, CellFlags::empty());
    }

    #[test]
    fn row_leaders_skip_continuations() {
        let mut f = Frame::new(4, 1);
        f.set_cluster(0, 0, "界", 2, CellFlags::empty());
        f.set_cluster(2, 0, "a", 1, CellFlags::empty());
        let leaders: Vec<_> = f.row_leaders(0).collect();
        assert_eq!(leaders.len(), 2);
        assert_eq!(leaders[1].0, "a");
    }
}
