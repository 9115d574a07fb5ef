//! Rasterized "sketch" cache for math runs/blocks: a 2-D grid of styled
//! cells produced once per source text and reused until the owning block
//! cache entry is dropped.

use crate::cell::CellFlags;

#[derive(Debug, Clone)]
pub struct Sketch {
    pub rows: Vec<Vec<(String, u16, CellFlags)>>,
}

impl Sketch {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> u16 {
        self.rows.iter().map(|r| r.iter().map(|(_, w, _)| *w).sum::<u16>()).max().unwrap_or(0)
    }
}

/// Placeholder rasterizer: without a real typesetting backend, a math span
/// renders as its literal source on a single row. Multi-line `$$...$$`
/// content produces one sketch row per source line.
pub fn rasterize(content: &str) -> Sketch {
    let rows = content
        .lines()
        .map(|line| vec![(line.to_string(), prosaic_text::display_width(line, 0, line.len()), CellFlags::empty())])
        .collect::<Vec<_>>();
    if rows.is_empty() {
        Sketch { rows: vec![vec![(String::new(), 0, CellFlags::empty())]] }
    } else {
        Sketch { rows }
    }
}

#[derive(Default)]
pub struct SketchCache {
    entries: std::collections::HashMap<(usize, usize), Sketch>,
}

impl SketchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_insert(&mut self, key: (usize, usize), content: &str) -> &Sketch {
        self.entries.entry(key).or_insert_with(|| rasterize(content))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_math_is_one_row() {
        let s = rasterize("x+1");
        assert_eq!(s.row_count(), 1);
    }

    #[test]
    fn multi_line_math_is_multiple_rows() {
        let s = rasterize("x+1\ny=2");
        assert_eq!(s.row_count(), 2);
    }

    #[test]
    fn cache_reuses_sketch_for_same_key() {
        let mut cache = SketchCache::new();
        cache.get_or_insert((0, 3), "x+1");
        assert_eq!(cache.entries.len(), 1);
        cache.get_or_insert((0, 3), "x+1");
        assert_eq!(cache.entries.len(), 1);
    }
}
