//! Block cache: wholesale-invalidated parse results keyed by the inputs that
//! affect layout, with O(log n) lookup by byte position or virtual row.

use crate::block::{Block, parse_blocks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ValidityKey {
    text_len: usize,
    wrap_width: u16,
}

#[derive(Debug, Default)]
pub struct BlockCache {
    blocks: Vec<Block>,
    key: Option<ValidityKey>,
}

impl BlockCache {
    pub fn new() -> Self {
        Self { blocks: Vec::new(), key: None }
    }

    /// Re-parses `text` if the cache is invalid for `(text.len(), wrap_width)`.
    pub fn ensure(&mut self, text: &str, wrap_width: u16) {
        let key = ValidityKey { text_len: text.len(), wrap_width };
        if self.key != Some(key) {
            self.blocks = parse_blocks(text, wrap_width);
            self.key = Some(key);
        }
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }

    pub fn is_valid(&self) -> bool {
        self.key.is_some()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn total_vrows(&self) -> usize {
        self.blocks.last().map(|b| b.vrow_start + b.vrow_count).unwrap_or(0)
    }

    /// Index of the block whose `[start, end)` range contains `pos`, or the
    /// nearest preceding block if `pos` falls in a blank-line gap.
    pub fn block_at_pos(&self, pos: usize) -> Option<usize> {
        if self.blocks.is_empty() {
            return None;
        }
        let idx = self.blocks.partition_point(|b| b.start <= pos);
        if idx == 0 { Some(0) } else { Some(idx - 1) }
    }

    /// Index of the block covering virtual row `vrow`.
    pub fn block_at_vrow(&self, vrow: usize) -> Option<usize> {
        if self.blocks.is_empty() {
            return None;
        }
        let idx = self.blocks.partition_point(|b| b.vrow_start <= vrow);
        if idx == 0 { Some(0) } else { Some(idx - 1) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_parses_once_for_same_key() {
        let mut cache = BlockCache::new();
        cache.ensure("# a\n\nbody text\n", 40);
        let first_len = cache.blocks().len();
        cache.ensure("# a\n\nbody text\n", 40);
        assert_eq!(cache.blocks().len(), first_len);
    }

    #[test]
    fn ensure_reparses_on_text_change() {
        let mut cache = BlockCache::new();
        cache.ensure("# a\n", 40);
        cache.ensure("# a\n\n# b\n", 40);
        assert_eq!(cache.blocks().len(), 2);
    }

    #[test]
    fn ensure_reparses_on_width_change() {
        let mut cache = BlockCache::new();
        let text = "a very long paragraph that will wrap differently at different widths for sure\n";
        cache.ensure(text, 10);
        let rows_narrow = cache.total_vrows();
        cache.ensure(text, 80);
        let rows_wide = cache.total_vrows();
        assert!(rows_wide <= rows_narrow);
    }

    #[test]
    fn block_at_pos_finds_containing_block() {
        let mut cache = BlockCache::new();
        cache.ensure("# a\n\nbody\n", 40);
        let idx = cache.block_at_pos(6).unwrap();
        assert_eq!(cache.blocks()[idx].block_type as u8, crate::block::BlockType::Paragraph as u8);
    }

    #[test]
    fn invalidate_forces_reparse_even_with_same_key() {
        let mut cache = BlockCache::new();
        cache.ensure("# a\n", 40);
        cache.invalidate();
        assert!(!cache.is_valid());
        cache.ensure("# a\n", 40);
        assert!(cache.is_valid());
    }
}
