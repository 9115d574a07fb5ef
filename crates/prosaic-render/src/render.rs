//! Walks the block cache and paints a [`Frame`] for the current viewport.

use crate::cell::{CellFlags, Frame};
use crate::layout::Layout;
use crate::scroll::compute_scroll_intent;
use crate::sketch::SketchCache;
use prosaic_markdown::{Align, Block, BlockCache, BlockType, DelimMarker, InlineKind, Payload, StyleBit};
use prosaic_text::{WrapConfig, wrap_range};

pub struct RenderInput<'a> {
    pub cache: &'a BlockCache,
    pub text: &'a str,
    pub cursor: usize,
    pub selection: Option<(usize, usize)>,
    pub scroll_row: usize,
    pub layout: Layout,
    pub supports_scaled_text: bool,
    pub hide_cursor_syntax: bool,
}

pub struct RenderOutput {
    pub frame: Frame,
    pub cursor_screen: Option<(u16, u16)>,
    pub scroll_row: usize,
}

struct Walker<'a> {
    text: &'a str,
    cursor: usize,
    selection: Option<(usize, usize)>,
    layout: Layout,
    scroll_row: usize,
    hide_cursor_syntax: bool,
    frame: Frame,
    cursor_screen: Option<(u16, u16)>,
}

fn style_flags(style: StyleBit) -> CellFlags {
    let mut flags = CellFlags::empty();
    if style.contains(StyleBit::BOLD) {
        flags |= CellFlags::BOLD;
    }
    if style.contains(StyleBit::ITALIC) {
        flags |= CellFlags::ITALIC;
    }
    if style.contains(StyleBit::STRIKE) {
        flags |= CellFlags::STRIKE;
    }
    if style.contains(StyleBit::CODE) {
        flags |= CellFlags::DIM;
    }
    flags
}

/// Consumes `(cache, cursor, scroll, selection, layout)` and produces a
/// styled draw-call surface plus the on-screen cursor coordinate.
pub fn render(input: &RenderInput, sketches: &mut SketchCache) -> RenderOutput {
    let text_height = input.layout.text_height() as usize;
    let margin = input.layout.scroll_margin() as usize;
    let cursor_vrow = input
        .cache
        .block_at_pos(input.cursor)
        .map(|idx| vrow_for_pos(&input.cache.blocks()[idx], input.text, input.cursor, input.layout.text_width))
        .unwrap_or(0);

    let scroll_row = compute_scroll_intent(input.scroll_row, cursor_vrow, text_height, margin).unwrap_or(input.scroll_row);

    let mut walker = Walker {
        text: input.text,
        cursor: input.cursor,
        selection: input.selection,
        layout: input.layout,
        scroll_row,
        hide_cursor_syntax: input.hide_cursor_syntax,
        frame: Frame::new(input.layout.total_cols, input.layout.total_rows),
        cursor_screen: None,
    };

    for block in input.cache.blocks() {
        let block_bottom = block.vrow_start + block.vrow_count;
        if block_bottom <= scroll_row || block.vrow_start >= scroll_row + text_height {
            continue;
        }
        walker.render_block(block, sketches, input.supports_scaled_text);
    }

    // Second reconciliation pass: rendering may have discovered a cursor row
    // that differs from the estimate (raw-view expansion of a header/table).
    let scroll_row = if let Some((row, _)) = walker.cursor_screen {
        compute_scroll_intent(scroll_row, row as usize, text_height, margin).unwrap_or(scroll_row)
    } else {
        scroll_row
    };

    RenderOutput { frame: walker.frame, cursor_screen: walker.cursor_screen, scroll_row }
}

fn vrow_for_pos(block: &Block, text: &str, pos: usize, width: u16) -> usize {
    let lines = wrap_range(text, block.start, block.end, width, &WrapConfig::default());
    let mut row = block.vrow_start;
    for line in &lines {
        if pos <= line.end {
            return row;
        }
        row += 1;
    }
    row.saturating_sub(1).max(block.vrow_start)
}

impl<'a> Walker<'a> {
    fn screen_row(&self, vrow: usize) -> Option<u16> {
        if vrow < self.scroll_row {
            return None;
        }
        let rel = vrow - self.scroll_row;
        let row = self.layout.top_margin as usize + rel;
        if row < self.layout.total_rows as usize { Some(row as u16) } else { None }
    }

    fn record_cursor(&mut self, pos_start: usize, pos_end: usize, vrow: usize, col: u16) {
        if self.cursor >= pos_start && self.cursor < pos_end.max(pos_start + 1) {
            if let Some(row) = self.screen_row(vrow) {
                self.cursor_screen = Some((row, col));
            }
        }
    }

    fn cursor_inside(&self, start: usize, end: usize) -> bool {
        self.cursor >= start && self.cursor <= end
    }

    fn is_selected(&self, pos: usize) -> bool {
        match self.selection {
            Some((a, b)) => {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                pos >= lo && pos < hi
            }
            None => false,
        }
    }

    fn render_block(&mut self, block: &Block, sketches: &mut SketchCache, scaled_text_supported: bool) {
        match block.block_type {
            BlockType::Hr => self.render_hr(block),
            BlockType::Header => self.render_header(block, scaled_text_supported),
            BlockType::Code => self.render_code(block),
            BlockType::Math => self.render_math(block, sketches),
            BlockType::Table => self.render_table(block),
            BlockType::Image => self.render_image(block),
            BlockType::Paragraph | BlockType::Blockquote | BlockType::ListItem | BlockType::FootnoteDef => {
                self.render_prose(block)
            }
        }
    }

    fn render_hr(&mut self, block: &Block) {
        let Some(row) = self.screen_row(block.vrow_start) else { return };
        let col0 = self.layout.margin;
        if self.cursor_inside(block.start, block.end) {
            let raw = &self.text[block.start..block.end.min(self.text.len())];
            self.paint_raw(raw, col0, row, block.start);
        } else {
            for x in 0..self.layout.text_width {
                self.frame.set_cluster(col0 + x, row, "\u{2500}", 1, CellFlags::empty());
            }
        }
    }

    fn render_header(&mut self, block: &Block, scaled_text_supported: bool) {
        let Payload::Header(h) = &block.payload else { return };
        let Some(row) = self.screen_row(block.vrow_start) else { return };
        let cursor_in = self.cursor_inside(block.start, block.end);
        let content = &self.text[h.content_start..block.end];

        if cursor_in || !scaled_text_supported {
            let prefix = "#".repeat(h.level as usize) + " ";
            let col0 = self.layout.margin;
            self.paint_styled_run(&prefix, col0, row, CellFlags::DIM, None);
            let mut col = col0 + prosaic_text::display_width(&prefix, 0, prefix.len());
            self.paint_inline_runs(block, h.content_start, block.end, row, &mut col, CellFlags::BOLD);
            return;
        }

        let width = prosaic_text::display_width(content, 0, content.len());
        let avail = self.layout.text_width;
        let col0 = self.layout.margin + avail.saturating_sub(width) / 2;
        self.paint_styled_run(content, col0, row, CellFlags::BOLD, None);
        self.record_cursor(block.start, block.end, block.vrow_start, col0 + width);
    }

    fn render_code(&mut self, block: &Block) {
        let Payload::Code(c) = &block.payload else { return };
        let body = &self.text[c.content.0..c.content.1];
        let mut row_vrow = block.vrow_start;
        if let Some(row) = self.screen_row(row_vrow) {
            self.frame.fill_row(row, Some((30, 30, 34)));
            if let Some(lang) = c.lang {
                let label = &self.text[lang.0..lang.1];
                if !label.trim().is_empty() {
                    let w = prosaic_text::display_width(label, 0, label.len());
                    let col = self.layout.margin + self.layout.text_width.saturating_sub(w);
                    self.paint_styled_run(label.trim(), col, row, CellFlags::DIM, Some((30, 30, 34)));
                }
            }
        }
        row_vrow += 1;
        for line in body.lines() {
            let Some(row) = self.screen_row(row_vrow) else {
                row_vrow += 1;
                continue;
            };
            self.frame.fill_row(row, Some((30, 30, 34)));
            self.paint_styled_run(line, self.layout.margin, row, CellFlags::empty(), Some((30, 30, 34)));
            row_vrow += 1;
        }
    }

    fn render_math(&mut self, block: &Block, sketches: &mut SketchCache) {
        let Payload::Math(m) = &block.payload else { return };
        if self.cursor_inside(block.start, block.end) {
            let Some(row) = self.screen_row(block.vrow_start) else { return };
            let raw = &self.text[block.start..block.end.min(self.text.len())];
            self.paint_raw(raw, self.layout.margin, row, block.start);
            return;
        }
        let content = &self.text[m.content.0..m.content.1];
        let sketch = sketches.get_or_insert((block.start, block.end), content);
        for (i, row_cells) in sketch.rows.iter().enumerate() {
            let Some(row) = self.screen_row(block.vrow_start + i) else { continue };
            let mut col = self.layout.margin;
            for (cluster, width, flags) in row_cells {
                self.frame.set_cluster(col, row, cluster, *width, *flags);
                col += (*width).max(1);
            }
        }
    }

    fn render_image(&mut self, block: &Block) {
        let Payload::Image(img) = &block.payload else { return };
        let Some(row) = self.screen_row(block.vrow_start) else { return };
        let col0 = self.layout.margin;
        if self.cursor_inside(block.start, block.end) {
            let raw = &self.text[block.start..block.end.min(self.text.len())];
            self.paint_raw(raw, col0, row, block.start);
        } else {
            let alt = &self.text[img.alt.0..img.alt.1];
            let placeholder = format!("[image: {alt}]");
            self.paint_styled_run(&placeholder, col0, row, CellFlags::DIM, None);
        }
    }

    fn render_table(&mut self, block: &Block) {
        let Payload::Table(t) = &block.payload else { return };
        if t.cols == 0 {
            return;
        }
        let overhead = t.cols as u16 + 1;
        let avail = self.layout.text_width.saturating_sub(overhead);
        let equal_share = avail / t.cols as u16;
        let col_width = equal_share.clamp(1, 30).max(8.min(avail.max(1)).min(30));
        let col0 = self.layout.margin;

        let mut vrow = block.vrow_start;
        if let Some(row) = self.screen_row(vrow) {
            self.draw_table_border(col0, row, t.cols, col_width, '\u{250C}', '\u{2500}', '\u{252C}', '\u{2510}');
        }
        vrow += 1;

        for (ri, row_cells) in t.cells.iter().enumerate() {
            if let Some(row) = self.screen_row(vrow) {
                let mut x = col0;
                self.frame.set_cluster(x, row, "\u{2502}", 1, CellFlags::empty());
                x += 1;
                for (ci, span) in row_cells.iter().enumerate() {
                    let align = t.alignments.get(ci).copied().unwrap_or(Align::Default);
                    let content = &self.text[span.0..span.1];
                    let w = prosaic_text::display_width(content, 0, content.len());
                    let pad = col_width.saturating_sub(w);
                    let left_pad = match align {
                        Align::Right => pad,
                        Align::Center => pad / 2,
                        _ => 0,
                    };
                    let flags = if ri == 0 { CellFlags::BOLD } else { CellFlags::empty() };
                    self.paint_styled_run(content, x + left_pad, row, flags, None);
                    for dx in 0..col_width {
                        if self.is_selected(span.0) {
                            self.frame.apply_flags_span(x + dx, row, 1, CellFlags::SELECTED);
                        }
                    }
                    x += col_width;
                    self.frame.set_cluster(x, row, "\u{2502}", 1, CellFlags::empty());
                    x += 1;
                }
            }
            vrow += 1;
            if ri == 0 {
                if let Some(row) = self.screen_row(vrow) {
                    self.draw_table_border(col0, row, t.cols, col_width, '\u{251C}', '\u{2500}', '\u{253C}', '\u{2524}');
                }
                vrow += 1;
            }
        }
        if let Some(row) = self.screen_row(vrow) {
            self.draw_table_border(col0, row, t.cols, col_width, '\u{2514}', '\u{2500}', '\u{2534}', '\u{2518}');
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_table_border(&mut self, col0: u16, row: u16, cols: usize, col_width: u16, left: char, fill: char, mid: char, right: char) {
        let mut x = col0;
        self.frame.set_cluster(x, row, &left.to_string(), 1, CellFlags::empty());
        x += 1;
        for c in 0..cols {
            for _ in 0..col_width {
                self.frame.set_cluster(x, row, &fill.to_string(), 1, CellFlags::empty());
                x += 1;
            }
            let joint = if c + 1 == cols { right } else { mid };
            self.frame.set_cluster(x, row, &joint.to_string(), 1, CellFlags::empty());
            x += 1;
        }
    }

    fn render_prose(&mut self, block: &Block) {
        let prefix = prose_prefix(block, self.text);
        let lines = wrap_range(self.text, block.start, block.end, self.layout.text_width, &WrapConfig::default());
        for (i, line) in lines.iter().enumerate() {
            let vrow = block.vrow_start + i;
            let Some(row) = self.screen_row(vrow) else { continue };
            let mut col = self.layout.margin;
            if i == 0 {
                if let Some(p) = &prefix {
                    self.paint_styled_run(p, col, row, CellFlags::DIM, None);
                    col += prosaic_text::display_width(p, 0, p.len());
                }
            }
            self.paint_inline_runs(block, line.start, line.end, row, &mut col, CellFlags::empty());
        }
    }

    fn paint_inline_runs(&mut self, block: &Block, range_start: usize, range_end: usize, row: u16, col: &mut u16, base: CellFlags) {
        let mut active = base;
        for run in &block.inline_runs {
            if run.end <= range_start || run.start >= range_end {
                continue;
            }
            let start = run.start.max(range_start);
            let end = run.end.min(range_end);
            match &run.kind {
                InlineKind::Delim { style, opening, .. } => {
                    if self.hide_cursor_syntax && !self.cursor_inside(run.start, run.end) {
                        if *opening {
                            active |= style_flags(*style);
                        } else {
                            active &= !style_flags(*style);
                        }
                    } else {
                        let raw = &self.text[start..end];
                        self.paint_dimmed(raw, col, row);
                    }
                }
                InlineKind::Text | InlineKind::Escape => {
                    let raw = &self.text[start..end];
                    self.paint_run_text(raw, col, row, active, start);
                }
                InlineKind::Entity { replacement } | InlineKind::Emoji { replacement } => {
                    if self.hide_cursor_syntax && !self.cursor_inside(run.start, run.end) {
                        self.paint_run_text(replacement, col, row, active, start);
                    } else {
                        let raw = &self.text[start..end];
                        self.paint_dimmed(raw, col, row);
                    }
                }
                InlineKind::InlineMath => {
                    let raw = &self.text[start..end];
                    self.paint_dimmed(raw, col, row);
                }
                InlineKind::Link { text, .. } => {
                    if self.hide_cursor_syntax && !self.cursor_inside(run.start, run.end) {
                        let label = &self.text[text.0.max(start)..text.1.min(end)];
                        self.paint_run_text(label, col, row, active | CellFlags::UNDERLINE, start);
                    } else {
                        let raw = &self.text[start..end];
                        self.paint_dimmed(raw, col, row);
                    }
                }
                InlineKind::Autolink => {
                    let raw = &self.text[start..end];
                    let flags = if self.hide_cursor_syntax && !self.cursor_inside(run.start, run.end) {
                        active | CellFlags::UNDERLINE
                    } else {
                        CellFlags::DIM
                    };
                    self.paint_run_text(raw, col, row, flags, start);
                }
                InlineKind::FootnoteRef { .. } => {
                    let raw = &self.text[start..end];
                    self.paint_run_text(raw, col, row, active, start);
                }
                InlineKind::HeadingId { .. } => {
                    if self.cursor_inside(run.start, run.end) {
                        let raw = &self.text[start..end];
                        self.paint_dimmed(raw, col, row);
                    }
                }
            }
            self.record_cursor(run.start, run.end, (row as usize).saturating_sub(self.layout.top_margin as usize) + self.scroll_row, *col);
        }
    }

    fn paint_run_text(&mut self, s: &str, col: &mut u16, row: u16, flags: CellFlags, base_pos: usize) {
        let mut pos = 0usize;
        for seg in prosaic_text::segment_str(s) {
            let cell_flags = if self.is_selected(base_pos + pos) { flags | CellFlags::SELECTED } else { flags };
            self.frame.set_cluster(*col, row, &seg.cluster, seg.width, cell_flags);
            *col += seg.width.max(1);
            pos = seg.end;
        }
    }

    fn paint_dimmed(&mut self, s: &str, col: &mut u16, row: u16) {
        self.paint_run_text(s, col, row, CellFlags::DIM, 0);
    }

    fn paint_styled_run(&mut self, s: &str, col0: u16, row: u16, flags: CellFlags, bg: Option<(u8, u8, u8)>) {
        let mut col = col0;
        for seg in prosaic_text::segment_str(s) {
            self.frame.set_cluster(col, row, &seg.cluster, seg.width, flags);
            if let Some(bg) = bg {
                self.frame.set_colors(col, row, None, Some(bg));
            }
            col += seg.width.max(1);
        }
    }

    fn paint_raw(&mut self, s: &str, col0: u16, row: u16, base_pos: usize) {
        self.paint_styled_run(s, col0, row, CellFlags::DIM, None);
        let _ = base_pos;
    }
}

fn prose_prefix(block: &Block, text: &str) -> Option<String> {
    match (&block.block_type, &block.payload) {
        (BlockType::ListItem, Payload::List(l)) => {
            let indent = " ".repeat(l.indent);
            let marker = if l.ordered { "1. ".to_string() } else { "- ".to_string() };
            let task = match l.task {
                Some(prosaic_markdown::TaskState::Unchecked) => "[ ] ",
                Some(prosaic_markdown::TaskState::Checked) => "[x] ",
                _ => "",
            };
            Some(format!("{indent}{marker}{task}"))
        }
        (BlockType::Blockquote, Payload::Blockquote(b)) => Some("> ".repeat(b.level)),
        (BlockType::FootnoteDef, Payload::FootnoteDef(f)) => Some(format!("[{}]: ", &text[f.id.0..f.id.1])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prosaic_markdown::BlockCache;

    fn layout() -> Layout {
        Layout::new(40, 10, 0, 0, 40)
    }

    #[test]
    fn hr_row_fills_with_box_char() {
        let mut cache = BlockCache::new();
        cache.ensure("---\n", 40);
        let mut sketches = SketchCache::new();
        let out = render(
            &RenderInput {
                cache: &cache,
                text: "---\n",
                cursor: 100,
                selection: None,
                scroll_row: 0,
                layout: layout(),
                supports_scaled_text: true,
                hide_cursor_syntax: true,
            },
            &mut sketches,
        );
        let leaders: Vec<_> = out.frame.row_leaders(0).collect();
        assert!(leaders[0].0 == "\u{2500}");
    }

    #[test]
    fn cursor_inside_bold_reveals_raw() {
        let text = "**bold**";
        let mut cache = BlockCache::new();
        cache.ensure(text, 40);
        let mut sketches = SketchCache::new();
        let out = render(
            &RenderInput {
                cache: &cache,
                text,
                cursor: 3,
                selection: None,
                scroll_row: 0,
                layout: layout(),
                supports_scaled_text: true,
                hide_cursor_syntax: true,
            },
            &mut sketches,
        );
        let leaders: Vec<_> = out.frame.row_leaders(0).map(|(c, ..)| c.to_string()).collect();
        assert!(leaders.join("").contains('*'));
    }

    #[test]
    fn cursor_outside_bold_hides_delimiters() {
        let text = "**bold**";
        let mut cache = BlockCache::new();
        cache.ensure(text, 40);
        let mut sketches = SketchCache::new();
        let out = render(
            &RenderInput {
                cache: &cache,
                text,
                cursor: 100,
                selection: None,
                scroll_row: 0,
                layout: layout(),
                supports_scaled_text: true,
                hide_cursor_syntax: true,
            },
            &mut sketches,
        );
        let leaders: Vec<_> = out.frame.row_leaders(0).map(|(c, ..)| c.to_string()).collect();
        assert!(!leaders.join("").contains('*'));
    }
}
