//! Structural smart-edit rules: list/blockquote continuation on Enter,
//! smart backspace that deletes whole syntax spans, and auto-close of
//! fence/image/math syntax.

use prosaic_text::grapheme::grapheme_prev;

/// What continuing the current line after pressing Enter should insert,
/// and whether the *current* (pre-Enter) line should instead be truncated
/// (the "empty list item terminates the list" rule).
pub enum Continuation {
    /// Insert this text right after the newline.
    Insert(String),
    /// The line the cursor was on should become empty (list/quote ends).
    TerminateStructure,
    None,
}

fn current_line_start(text: &str, cursor: usize) -> usize {
    text[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Inspects the line the cursor sits on (at end-of-line, per spec's S2/S3)
/// and decides what Enter should do.
pub fn compute_continuation(text: &str, cursor: usize) -> Continuation {
    let line_start = current_line_start(text, cursor);
    let line = &text[line_start..cursor];

    if let Some(marker_end) = list_marker_end(line) {
        let content = line[marker_end..].trim();
        if content.is_empty() {
            return Continuation::TerminateStructure;
        }
        return Continuation::Insert(line[..marker_end].to_string());
    }

    if let Some(prefix_end) = blockquote_prefix_end(line) {
        let content = line[prefix_end..].trim();
        if content.is_empty() {
            return Continuation::TerminateStructure;
        }
        return Continuation::Insert(line[..prefix_end].to_string());
    }

    Continuation::None
}

fn list_marker_end(line: &str) -> Option<usize> {
    let indent = line.len() - line.trim_start().len();
    let rest = &line[indent..];
    let mut chars = rest.chars();
    let first = chars.next()?;
    let marker_len = if first == '-' || first == '*' || first == '+' {
        if rest.as_bytes().get(1) != Some(&b' ') {
            return None;
        }
        2
    } else if first.is_ascii_digit() {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        let after = &rest[digits..];
        if !after.starts_with(". ") {
            return None;
        }
        digits + 2
    } else {
        return None;
    };
    Some(indent + marker_len)
}

fn blockquote_prefix_end(line: &str) -> Option<usize> {
    let t = line.trim_start();
    if !t.starts_with('>') {
        return None;
    }
    let indent = line.len() - t.len();
    let carets = t.chars().take_while(|&c| c == '>').count();
    let mut end = indent + carets;
    if line.as_bytes().get(end) == Some(&b' ') {
        end += 1;
    }
    Some(end)
}

/// Byte range to delete for backspace at `cursor`: the innermost structural
/// element whose right edge the cursor sits at, or a single grapheme.
pub fn smart_backspace_range(text: &str, cursor: usize) -> (usize, usize) {
    if cursor == 0 {
        return (0, 0);
    }
    if let Some(range) = closing_syntax_range(text, cursor) {
        return range;
    }
    (grapheme_prev(text, cursor), cursor)
}

/// If `cursor` sits immediately after the closing byte of `**x**`, `*x*`,
/// `` `x` ``, `[x](y)`, `![x](y)`, or `[^id]`, returns the whole span.
fn closing_syntax_range(text: &str, cursor: usize) -> Option<(usize, usize)> {
    let before = &text[..cursor];

    for (delim, min_inner) in [("**", 1usize), ("__", 1), ("~~", 1), ("*", 1), ("_", 1), ("`", 1)] {
        if before.ends_with(delim) {
            let search_end = cursor - delim.len();
            if let Some(open_rel) = before[..search_end].rfind(delim) {
                let inner_len = search_end - (open_rel + delim.len());
                if inner_len >= min_inner {
                    return Some((open_rel, cursor));
                }
            }
        }
    }

    if before.ends_with(')') {
        if let Some(paren_open) = before.rfind('(') {
            if paren_open > 0 && before.as_bytes().get(paren_open - 1) == Some(&b']') {
                if let Some(bracket_open) = before[..paren_open].rfind('[') {
                    let img_start = if bracket_open > 0 && before.as_bytes()[bracket_open - 1] == b'!' { bracket_open - 1 } else { bracket_open };
                    return Some((img_start, cursor));
                }
            }
        }
    }

    if before.ends_with(']') {
        if let Some(bracket_open) = before.rfind('[') {
            if before[bracket_open..].starts_with("[^") {
                return Some((bracket_open, cursor));
            }
        }
    }

    None
}

/// Text typed after certain closing characters auto-appends a trailing
/// newline to close off the structural context (image paren, fence, math
/// fence). Returns the suffix to insert right after the typed char.
pub fn auto_close_followup(text: &str, cursor_after_insert: usize) -> Option<&'static str> {
    let before = &text[..cursor_after_insert];
    if before.ends_with(")") && before.contains("![") {
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line = &before[line_start..];
        if line.starts_with("![") && line.ends_with(')') {
            return Some("\n");
        }
    }
    if before.ends_with("```") {
        return Some("\n");
    }
    if before.ends_with("$$$") {
        return None; // the third `$` would make an invalid fence; handled by caller truncation
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_item_continues_with_same_marker() {
        let text = "- a";
        match compute_continuation(text, text.len()) {
            Continuation::Insert(s) => assert_eq!(s, "- "),
            _ => panic!("expected continuation"),
        }
    }

    #[test]
    fn empty_list_item_terminates() {
        let text = "- ";
        assert!(matches!(compute_continuation(text, text.len()), Continuation::TerminateStructure));
    }

    #[test]
    fn blockquote_continues() {
        let text = "> hello";
        match compute_continuation(text, text.len()) {
            Continuation::Insert(s) => assert_eq!(s, "> "),
            _ => panic!("expected continuation"),
        }
    }

    #[test]
    fn plain_paragraph_has_no_continuation() {
        assert!(matches!(compute_continuation("hello", 5), Continuation::None));
    }

    #[test]
    fn backspace_after_bold_close_deletes_whole_span() {
        let text = "**bold**";
        let (s, e) = smart_backspace_range(text, text.len());
        assert_eq!(&text[s..e], "**bold**");
    }

    #[test]
    fn backspace_after_link_close_deletes_whole_span() {
        let text = "see [link](url)";
        let (s, e) = smart_backspace_range(text, text.len());
        assert_eq!(&text[s..e], "[link](url)");
    }

    #[test]
    fn backspace_elsewhere_deletes_one_grapheme() {
        let text = "hello";
        let (s, e) = smart_backspace_range(text, text.len());
        assert_eq!(&text[s..e], "o");
    }

    #[test]
    fn fence_completion_auto_appends_newline() {
        let text = "```";
        assert_eq!(auto_close_followup(text, text.len()), Some("\n"));
    }
}
