//! One-pass classification of a document into typed blocks.

use crate::inline::{InlineRun, parse_inline};
use prosaic_text::{WrapConfig, wrap_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Paragraph,
    Header,
    ListItem,
    Blockquote,
    Code,
    Math,
    Table,
    Image,
    Hr,
    FootnoteDef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    None,
    Unchecked,
    Checked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Default,
    Left,
    Right,
    Center,
}

pub type Span = (usize, usize);

#[derive(Debug, Clone, Default)]
pub struct HeaderPayload {
    pub level: u8,
    pub content_start: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ListPayload {
    pub indent: usize,
    pub content_start: usize,
    pub ordered: bool,
    pub task: Option<TaskState>,
}

#[derive(Debug, Clone, Default)]
pub struct BlockquotePayload {
    pub level: usize,
    pub content_start: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CodePayload {
    pub lang: Option<Span>,
    pub content: Span,
    pub fence_char: char,
    pub fence_len: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MathPayload {
    pub content: Span,
}

#[derive(Debug, Clone, Default)]
pub struct TablePayload {
    pub rows: usize,
    pub cols: usize,
    pub alignments: Vec<Align>,
    /// `cells[row][col]` byte span of the cell content, header row at index 0.
    pub cells: Vec<Vec<Span>>,
}

#[derive(Debug, Clone, Default)]
pub struct ImagePayload {
    pub alt: Span,
    pub path: Span,
    pub title: Option<Span>,
    /// Positive = cells, negative = percent (sign-encoded as in the design doc).
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct FootnoteDefPayload {
    pub id: Span,
    pub content_start: usize,
}

#[derive(Debug, Clone)]
pub enum Payload {
    None,
    Header(HeaderPayload),
    List(ListPayload),
    Blockquote(BlockquotePayload),
    Code(CodePayload),
    Math(MathPayload),
    Table(TablePayload),
    Image(ImagePayload),
    FootnoteDef(FootnoteDefPayload),
}

#[derive(Debug, Clone)]
pub struct Block {
    pub start: usize,
    pub end: usize,
    pub block_type: BlockType,
    pub leading_blank_lines: usize,
    pub blank_start: usize,
    pub vrow_start: usize,
    pub vrow_count: usize,
    pub payload: Payload,
    pub inline_runs: Vec<InlineRun>,
    pub heading_scale: u16,
}

fn trimmed(s: &str) -> &str {
    s.trim_matches(|c: char| c == ' ' || c == '\t')
}

fn is_hr_line(line: &str) -> bool {
    let t = trimmed(line);
    if t.len() < 3 {
        return false;
    }
    let first = t.chars().next().unwrap();
    if first != '-' && first != '*' && first != '_' {
        return false;
    }
    let stripped: String = t.chars().filter(|c| !c.is_whitespace()).collect();
    stripped.len() >= 3 && stripped.chars().all(|c| c == first)
}

fn header_level(line: &str) -> Option<(u8, usize)> {
    let bytes = line.as_bytes();
    let mut n = 0usize;
    while n < bytes.len() && bytes[n] == b'#' && n < 6 {
        n += 1;
    }
    if n == 0 || n > 6 {
        return None;
    }
    if n < bytes.len() && bytes[n] == b' ' {
        Some((n as u8, n + 1))
    } else if n == bytes.len() {
        Some((n as u8, n))
    } else {
        None
    }
}

fn fence_open(line: &str) -> Option<(char, usize, Span)> {
    let t = line.trim_start();
    let indent = line.len() - t.len();
    let fc = t.chars().next()?;
    if fc != '`' && fc != '~' {
        return None;
    }
    let len = t.chars().take_while(|&c| c == fc).count();
    if len < 3 {
        return None;
    }
    let rest_start = indent + len;
    let lang_start = rest_start;
    let lang_end = line.len();
    Some((fc, len, (lang_start, lang_end)))
}

fn is_fence_close(line: &str, fc: char, min_len: usize) -> bool {
    let t = trimmed(line);
    !t.is_empty() && t.chars().all(|c| c == fc) && t.len() >= min_len
}

fn is_table_delimiter_row(line: &str) -> bool {
    let t = trimmed(line);
    if !t.contains('|') && !t.contains('-') {
        return false;
    }
    let cells: Vec<&str> = t.trim_matches('|').split('|').collect();
    if cells.is_empty() {
        return false;
    }
    cells.iter().all(|c| {
        let c = c.trim();
        if c.is_empty() {
            return false;
        }
        let c2 = c.trim_start_matches(':').trim_end_matches(':');
        !c2.is_empty() && c2.chars().all(|ch| ch == '-')
    })
}

fn cell_align(delim_cell: &str) -> Align {
    let c = delim_cell.trim();
    let left = c.starts_with(':');
    let right = c.ends_with(':');
    match (left, right) {
        (true, true) => Align::Center,
        (true, false) => Align::Left,
        (false, true) => Align::Right,
        (false, false) => Align::Default,
    }
}

fn split_table_row(line: &str, line_start: usize) -> Vec<Span> {
    let t = line.trim();
    let inner = t.strip_prefix('|').unwrap_or(t);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    let base = line_start + (line.len() - line.trim_start().len()) + if t.starts_with('|') { 1 } else { 0 };
    let mut spans = Vec::new();
    let mut offset = base;
    for part in inner.split('|') {
        let trimmed_part = part.trim_start();
        let lead = part.len() - trimmed_part.len();
        let content = trimmed_part.trim_end();
        let start = offset + lead;
        let end = start + content.len();
        spans.push((start, end));
        offset += part.len() + 1;
    }
    spans
}

fn parse_image_line(line: &str, base: usize) -> Option<ImagePayload> {
    let t = line.trim();
    if !t.starts_with("![") {
        return None;
    }
    let alt_start = base + (line.len() - line.trim_start().len()) + 2;
    let close_bracket = t[2..].find(']')? + 2;
    let alt_end = base + (line.len() - line.trim_start().len()) + close_bracket;
    let rest = &t[close_bracket + 1..];
    let rest = rest.strip_prefix('(')?;
    let paren_end = rest.find(')')?;
    let inner = &rest[..paren_end];
    let inner_base = alt_end + 2;
    let (path_str, title_span) = if let Some(q) = inner.find('"') {
        let path_part = inner[..q].trim_end();
        let title_start_rel = q + 1;
        let title_end_rel = inner[title_start_rel..].rfind('"').map(|i| title_start_rel + i);
        let title_span = title_end_rel.map(|te| (inner_base + title_start_rel, inner_base + te));
        (path_part, title_span)
    } else {
        (inner, None)
    };
    let path_span = (inner_base, inner_base + path_str.len());
    let after_paren = &rest[paren_end + 1..];
    let mut width = None;
    let mut height = None;
    if let Some(brace_start) = after_paren.find('{') {
        if let Some(brace_end) = after_paren.find('}') {
            let attrs = &after_paren[brace_start + 1..brace_end];
            for token in attrs.split_whitespace() {
                if let Some(v) = token.strip_prefix("width=") {
                    width = parse_dimension(v);
                } else if let Some(v) = token.strip_prefix("height=") {
                    height = parse_dimension(v);
                }
            }
        }
    }
    Some(ImagePayload {
        alt: (alt_start, alt_end),
        path: path_span,
        title: title_span,
        width,
        height,
    })
}

fn parse_dimension(v: &str) -> Option<i32> {
    if let Some(stripped) = v.strip_suffix('%') {
        stripped.parse::<i32>().ok().map(|n| -n)
    } else if let Some(stripped) = v.strip_suffix("px") {
        stripped.parse::<i32>().ok()
    } else {
        v.parse::<i32>().ok()
    }
}

struct LineCursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
    fn peek_line(&self) -> Option<(usize, usize, usize)> {
        if self.pos >= self.text.len() {
            return None;
        }
        match self.text[self.pos..].find('\n') {
            Some(off) => Some((self.pos, self.pos + off, self.pos + off + 1)),
            None => Some((self.pos, self.text.len(), self.text.len())),
        }
    }
    fn advance_to(&mut self, next: usize) {
        self.pos = next;
    }
    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }
}

fn line_str<'a>(text: &'a str, start: usize, end: usize) -> &'a str {
    &text[start..end]
}

/// Parse `text` into an ordered block list, pre-computing wrapped row counts
/// against `wrap_width` columns (headers use `wrap_width / scale` per level).
pub fn parse_blocks(text: &str, wrap_width: u16) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut cur = LineCursor::new(text);
    let mut vrow_cursor = 0usize;

    loop {
        // Skip / count blank lines preceding the next block.
        let blank_start = cur.pos;
        let mut leading_blank_lines = 0usize;
        loop {
            let Some((ls, le, next)) = cur.peek_line() else { break };
            if ls == le {
                leading_blank_lines += 1;
                cur.advance_to(next);
            } else {
                break;
            }
        }
        if cur.at_end() {
            break;
        }
        let Some((ls, le, next)) = cur.peek_line() else { break };
        let line = line_str(text, ls, le);

        vrow_cursor += leading_blank_lines;

        if is_hr_line(line) {
            cur.advance_to(next);
            push_block(&mut blocks, &mut vrow_cursor, text, ls, next, BlockType::Hr, Payload::None, leading_blank_lines, blank_start, 1, wrap_width);
            continue;
        }

        if let Some((level, content_start)) = header_level(line) {
            cur.advance_to(next);
            let scale = header_scale(level);
            let block_start = ls;
            let block_end = next;
            push_block(
                &mut blocks,
                &mut vrow_cursor,
                text,
                block_start,
                block_end,
                BlockType::Header,
                Payload::Header(HeaderPayload { level, content_start: ls + content_start }),
                leading_blank_lines,
                blank_start,
                scale,
                wrap_width,
            );
            continue;
        }

        if let Some((fc, flen, lang_span)) = fence_open(line) {
            let fence_start = ls;
            cur.advance_to(next);
            let content_start = next;
            let mut content_end = next;
            loop {
                let Some((ils, ile, inext)) = cur.peek_line() else {
                    content_end = text.len();
                    break;
                };
                if is_fence_close(line_str(text, ils, ile), fc, flen) {
                    content_end = ils;
                    cur.advance_to(inext);
                    break;
                }
                content_end = ile;
                cur.advance_to(inext);
            }
            let payload = CodePayload {
                lang: Some(lang_span).filter(|(a, b)| a < b),
                content: (content_start, content_end),
                fence_char: fc,
                fence_len: flen,
            };
            push_block(
                &mut blocks,
                &mut vrow_cursor,
                text,
                fence_start,
                cur.pos,
                BlockType::Code,
                Payload::Code(payload),
                leading_blank_lines,
                blank_start,
                1,
                wrap_width,
            );
            continue;
        }

        if trimmed(line) == "$$" {
            let math_start = ls;
            cur.advance_to(next);
            let content_start = next;
            let mut content_end = next;
            loop {
                let Some((ils, ile, inext)) = cur.peek_line() else {
                    content_end = text.len();
                    break;
                };
                if trimmed(line_str(text, ils, ile)) == "$$" {
                    content_end = ils;
                    cur.advance_to(inext);
                    break;
                }
                content_end = ile;
                cur.advance_to(inext);
            }
            push_block(
                &mut blocks,
                &mut vrow_cursor,
                text,
                math_start,
                cur.pos,
                BlockType::Math,
                Payload::Math(MathPayload { content: (content_start, content_end) }),
                leading_blank_lines,
                blank_start,
                1,
                wrap_width,
            );
            continue;
        }

        if line.contains('|') {
            if let Some((_, dle, dnext)) = peek_nth_line(text, next) {
                if is_table_delimiter_row(line_str(text, next, dle)) {
                    let header_spans = split_table_row(line, ls);
                    let delim_line = line_str(text, next, dle);
                    let delim_cells: Vec<&str> = trimmed(delim_line).trim_matches('|').split('|').collect();
                    let alignments: Vec<Align> = delim_cells.iter().map(|c| cell_align(c)).collect();
                    let cols = header_spans.len();
                    let mut cells = vec![header_spans];
                    let mut cursor = dnext;
                    loop {
                        let Some((rls, rle, rnext)) = peek_line_at(text, cursor) else { break };
                        let row_line = line_str(text, rls, rle);
                        if rls == rle || !row_line.contains('|') {
                            break;
                        }
                        cells.push(split_table_row(row_line, rls));
                        cursor = rnext;
                    }
                    let rows = cells.len();
                    let table_end = cursor;
                    push_block(
                        &mut blocks,
                        &mut vrow_cursor,
                        text,
                        ls,
                        table_end,
                        BlockType::Table,
                        Payload::Table(TablePayload { rows, cols, alignments, cells }),
                        leading_blank_lines,
                        blank_start,
                        1,
                        wrap_width,
                    );
                    cur.advance_to(table_end);
                    continue;
                }
            }
        }

        if let Some(img) = parse_image_line(line, ls) {
            cur.advance_to(next);
            push_block(&mut blocks, &mut vrow_cursor, text, ls, next, BlockType::Image, Payload::Image(img), leading_blank_lines, blank_start, 1, wrap_width);
            continue;
        }

        if let Some(level) = blockquote_level(line) {
            let content_start = ls + blockquote_prefix_len(line);
            let block_start = ls;
            let mut block_end = next;
            cur.advance_to(next);
            loop {
                let Some((ils, ile, inext)) = cur.peek_line() else { break };
                let iline = line_str(text, ils, ile);
                if ils == ile {
                    break;
                }
                if blockquote_level(iline).is_none() {
                    break;
                }
                block_end = ile;
                cur.advance_to(inext);
            }
            push_block(
                &mut blocks,
                &mut vrow_cursor,
                text,
                block_start,
                cur.pos.max(block_end),
                BlockType::Blockquote,
                Payload::Blockquote(BlockquotePayload { level, content_start }),
                leading_blank_lines,
                blank_start,
                1,
                wrap_width,
            );
            continue;
        }

        if let Some(fnid) = footnote_def_id(line, ls) {
            let content_start = ls + footnote_prefix_len(line);
            let block_start = ls;
            cur.advance_to(next);
            let mut block_end = next;
            loop {
                let Some((ils, ile, inext)) = cur.peek_line() else { break };
                if ils == ile || starts_new_block_line(line_str(text, ils, ile)) {
                    break;
                }
                block_end = ile;
                cur.advance_to(inext);
            }
            push_block(
                &mut blocks,
                &mut vrow_cursor,
                text,
                block_start,
                block_end,
                BlockType::FootnoteDef,
                Payload::FootnoteDef(FootnoteDefPayload { id: fnid, content_start }),
                leading_blank_lines,
                blank_start,
                1,
                wrap_width,
            );
            continue;
        }

        if let Some((indent, content_start, ordered, task)) = list_marker(line) {
            let block_start = ls;
            cur.advance_to(next);
            let mut block_end = next;
            loop {
                let Some((ils, ile, inext)) = cur.peek_line() else { break };
                let iline = line_str(text, ils, ile);
                if ils == ile || starts_new_block_line(iline) || list_marker(iline).is_some() {
                    break;
                }
                let cont_indent = iline.len() - iline.trim_start().len();
                if cont_indent < indent {
                    break;
                }
                block_end = ile;
                cur.advance_to(inext);
            }
            push_block(
                &mut blocks,
                &mut vrow_cursor,
                text,
                block_start,
                block_end,
                BlockType::ListItem,
                Payload::List(ListPayload { indent, content_start: ls + content_start, ordered, task }),
                leading_blank_lines,
                blank_start,
                1,
                wrap_width,
            );
            continue;
        }

        // Paragraph: continues through soft-wrapped lines until a blank line
        // or a line that would start a new block type.
        let block_start = ls;
        cur.advance_to(next);
        let mut block_end = next;
        loop {
            let Some((ils, ile, inext)) = cur.peek_line() else { break };
            let iline = line_str(text, ils, ile);
            if ils == ile || starts_new_block_line(iline) {
                break;
            }
            block_end = ile;
            cur.advance_to(inext);
        }
        push_block(&mut blocks, &mut vrow_cursor, text, block_start, block_end, BlockType::Paragraph, Payload::None, leading_blank_lines, blank_start, 1, wrap_width);
    }

    blocks
}

fn header_scale(level: u8) -> u16 {
    match level {
        1 => 6,
        2 => 5,
        3 => 4,
        4 => 3,
        5 => 2,
        _ => 1,
    }
}

fn blockquote_prefix_len(line: &str) -> usize {
    let mut i = 0usize;
    let bytes = line.as_bytes();
    while i < bytes.len() && (bytes[i] == b'>' || bytes[i] == b' ') {
        i += 1;
        if bytes[i - 1] == b'>' && i < bytes.len() && bytes[i] != b'>' {
            if bytes[i] == b' ' {
                i += 1;
            }
            break;
        }
    }
    i.min(line.len())
}

fn blockquote_level(line: &str) -> Option<usize> {
    let t = line.trim_start();
    if !t.starts_with('>') {
        return None;
    }
    Some(t.chars().take_while(|&c| c == '>').count())
}

fn footnote_def_id(line: &str, base: usize) -> Option<Span> {
    let t = line.trim_start();
    if !t.starts_with("[^") {
        return None;
    }
    let close = t.find("]:")?;
    let id_start = base + (line.len() - t.len()) + 2;
    let id_end = id_start + (close - 2);
    Some((id_start, id_end))
}

fn footnote_prefix_len(line: &str) -> usize {
    let t = line.trim_start();
    match t.find("]:") {
        Some(i) => (line.len() - t.len()) + i + 2 + usize::from(t[i + 2..].starts_with(' ')),
        None => line.len(),
    }
}

fn list_marker(line: &str) -> Option<(usize, usize, bool, Option<TaskState>)> {
    let indent = line.len() - line.trim_start().len();
    let rest = &line[indent..];
    let mut chars = rest.chars();
    let first = chars.next()?;
    let (ordered, marker_len) = if first == '-' || first == '*' || first == '+' {
        if rest.len() < 2 || !rest.as_bytes().get(1).map(|b| *b == b' ').unwrap_or(false) {
            return None;
        }
        (false, 2)
    } else if first.is_ascii_digit() {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        let after = &rest[digits..];
        if !after.starts_with(". ") && !after.starts_with(".\t") {
            return None;
        }
        (true, digits + 2)
    } else {
        return None;
    };
    let mut content_start = indent + marker_len;
    let task = rest[marker_len..].trim_start();
    let skipped = rest[marker_len..].len() - task.len();
    let task_state = if task.starts_with("[ ] ") || task == "[ ]" {
        content_start += skipped + 4;
        Some(TaskState::Unchecked)
    } else if task.starts_with("[x] ") || task.starts_with("[X] ") || task == "[x]" || task == "[X]" {
        content_start += skipped + 4;
        Some(TaskState::Checked)
    } else {
        None
    };
    Some((indent, content_start.min(line.len()), ordered, task_state))
}

fn starts_new_block_line(line: &str) -> bool {
    is_hr_line(line)
        || header_level(line).is_some()
        || fence_open(line).is_some()
        || trimmed(line) == "$$"
        || blockquote_level(line).is_some()
        || list_marker(line).is_some()
        || parse_image_line(line, 0).is_some()
}

fn peek_nth_line(text: &str, pos: usize) -> Option<(usize, usize, usize)> {
    if pos >= text.len() {
        return None;
    }
    match text[pos..].find('\n') {
        Some(off) => Some((pos, pos + off, pos + off + 1)),
        None => Some((pos, text.len(), text.len())),
    }
}

fn peek_line_at(text: &str, pos: usize) -> Option<(usize, usize, usize)> {
    peek_nth_line(text, pos)
}

#[allow(clippy::too_many_arguments)]
fn push_block(
    blocks: &mut Vec<Block>,
    vrow_cursor: &mut usize,
    text: &str,
    start: usize,
    end: usize,
    block_type: BlockType,
    payload: Payload,
    leading_blank_lines: usize,
    blank_start: usize,
    heading_scale: u16,
    wrap_width: u16,
) {
    let effective_width = (wrap_width / heading_scale.max(1)).max(2);
    let inline_runs = match block_type {
        BlockType::Code | BlockType::Math | BlockType::Hr | BlockType::Image => Vec::new(),
        _ => parse_inline(text, start, end),
    };
    let vrow_count = estimate_row_count(text, start, end, block_type, &payload, effective_width);
    let block = Block {
        start,
        end,
        block_type,
        leading_blank_lines,
        blank_start,
        vrow_start: *vrow_cursor,
        vrow_count,
        payload,
        inline_runs,
        heading_scale,
    };
    *vrow_cursor += vrow_count;
    blocks.push(block);
}

fn estimate_row_count(text: &str, start: usize, end: usize, bt: BlockType, payload: &Payload, width: u16) -> usize {
    match bt {
        BlockType::Code => {
            if let Payload::Code(c) = payload {
                text[c.content.0..c.content.1].lines().count().max(1) + 1
            } else {
                1
            }
        }
        BlockType::Math => {
            if let Payload::Math(m) = payload {
                text[m.content.0..m.content.1].lines().count().max(1)
            } else {
                1
            }
        }
        BlockType::Table => {
            if let Payload::Table(t) = payload {
                t.rows + 2
            } else {
                1
            }
        }
        BlockType::Hr | BlockType::Image => 1,
        _ => wrap_range(text, start, end, width, &WrapConfig::default()).len().max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_detected() {
        let blocks = parse_blocks("# Hello\n", 40);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type, BlockType::Header);
        if let Payload::Header(h) = &blocks[0].payload {
            assert_eq!(h.level, 1);
        } else {
            panic!("expected header payload");
        }
    }

    #[test]
    fn hr_detected() {
        let blocks = parse_blocks("---\n", 40);
        assert_eq!(blocks[0].block_type, BlockType::Hr);
    }

    #[test]
    fn fenced_code_spans_to_close() {
        let blocks = parse_blocks("```rust\nfn a() {}\n```\n", 40);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type, BlockType::Code);
    }

    #[test]
    fn unterminated_fence_extends_to_eof() {
        let blocks = parse_blocks("```rust\nfn a() {}\n", 40);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].end, 19);
    }

    #[test]
    fn table_parses_rows_and_alignment() {
        let blocks = parse_blocks("| a | b |\n|---|---|\n| 1 | 2 |\n", 40);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type, BlockType::Table);
        if let Payload::Table(t) = &blocks[0].payload {
            assert_eq!(t.rows, 2);
            assert_eq!(t.cols, 2);
        } else {
            panic!("expected table payload");
        }
    }

    #[test]
    fn list_item_with_task_state() {
        let blocks = parse_blocks("- [x] done\n", 40);
        if let Payload::List(l) = &blocks[0].payload {
            assert_eq!(l.task, Some(TaskState::Checked));
        } else {
            panic!("expected list payload");
        }
    }

    #[test]
    fn monotonic_vrow_and_block_bounds() {
        let text = "# Title\n\nSome paragraph text that is reasonably long to wrap across lines.\n\n- item one\n- item two\n";
        let blocks = parse_blocks(text, 20);
        for w in blocks.windows(2) {
            assert!(w[0].start <= w[0].end);
            assert!(w[0].end <= w[1].start);
            assert!(w[0].vrow_start < w[1].vrow_start);
        }
    }

    #[test]
    fn blockquote_level_counts_leading_carets() {
        let blocks = parse_blocks("> > nested\n", 40);
        if let Payload::Blockquote(b) = &blocks[0].payload {
            assert_eq!(b.level, 2);
        } else {
            panic!("expected blockquote payload");
        }
    }

    #[test]
    fn footnote_def_captures_id() {
        let text = "[^1]: the note\n";
        let blocks = parse_blocks(text, 40);
        assert_eq!(blocks[0].block_type, BlockType::FootnoteDef);
        if let Payload::FootnoteDef(f) = &blocks[0].payload {
            assert_eq!(&text[f.id.0..f.id.1], "1");
        } else {
            panic!("expected footnote payload");
        }
    }

    #[test]
    fn image_line_parses_dimensions() {
        let text = "![alt](pic.png \"t\"){ width=50% height=10 }\n";
        let blocks = parse_blocks(text, 40);
        assert_eq!(blocks[0].block_type, BlockType::Image);
        if let Payload::Image(img) = &blocks[0].payload {
            assert_eq!(&text[img.alt.0..img.alt.1], "alt");
            assert_eq!(img.width, Some(-50));
            assert_eq!(img.height, Some(10));
        } else {
            panic!("expected image payload");
        }
    }
}
