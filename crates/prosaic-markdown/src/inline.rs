//! Second-pass inline run parser: delimiters, links, math, emoji, autolinks,
//! entities, escapes, footnote references, and heading ids.

use crate::emoji::lookup_emoji;
use crate::entities::lookup_entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimMarker {
    Star,
    Underscore,
    Tilde,
    Backtick,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StyleBit: u8 {
        const BOLD      = 0b0000_0001;
        const ITALIC    = 0b0000_0010;
        const STRIKE    = 0b0000_0100;
        const CODE      = 0b0000_1000;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineKind {
    Text,
    Delim { marker: DelimMarker, style: StyleBit, opening: bool },
    Link { text: (usize, usize), dest: (usize, usize) },
    InlineMath,
    FootnoteRef { id: (usize, usize) },
    HeadingId { id: (usize, usize) },
    Emoji { replacement: &'static str },
    Autolink,
    Entity { replacement: &'static str },
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRun {
    pub start: usize,
    pub end: usize,
    pub kind: InlineKind,
}

struct Pending {
    marker: DelimMarker,
    run_len: usize,
    pos_in_runs: usize,
}

/// Parse the inline content of `text[start..end]` into a flat run list with
/// absolute byte offsets. Delimiter runs are paired left-to-right using a
/// stack keyed by marker character; unmatched delimiters degrade to `Text`.
pub fn parse_inline(text: &str, start: usize, end: usize) -> Vec<InlineRun> {
    let mut runs: Vec<InlineRun> = Vec::new();
    let mut stack: Vec<Pending> = Vec::new();
    let bytes = text.as_bytes();
    let mut pos = start;

    while pos < end {
        let ch = text[pos..end].chars().next().unwrap();
        let ch_len = ch.len_utf8();

        if ch == '\\' && pos + ch_len < end {
            let esc_end = pos + ch_len + text[pos + ch_len..end].chars().next().unwrap().len_utf8();
            runs.push(InlineRun { start: pos, end: esc_end, kind: InlineKind::Escape });
            pos = esc_end;
            continue;
        }

        if ch == '&' {
            if let Some((rep, len)) = match_entity(text, pos, end) {
                runs.push(InlineRun { start: pos, end: pos + len, kind: InlineKind::Entity { replacement: rep } });
                pos += len;
                continue;
            }
        }

        if ch == ':' {
            if let Some((rep, len)) = match_emoji(text, pos, end) {
                runs.push(InlineRun { start: pos, end: pos + len, kind: InlineKind::Emoji { replacement: rep } });
                pos += len;
                continue;
            }
        }

        if ch == '$' {
            if let Some(close) = find_inline_math_close(text, pos, end) {
                runs.push(InlineRun { start: pos, end: close, kind: InlineKind::InlineMath });
                pos = close;
                continue;
            }
        }

        if ch == '[' && bytes.get(pos + 1) == Some(&b'^') {
            if let Some(len) = match_footnote_ref(text, pos, end) {
                let id_start = pos + 2;
                let id_end = pos + len - 1;
                runs.push(InlineRun { start: pos, end: pos + len, kind: InlineKind::FootnoteRef { id: (id_start, id_end) } });
                pos += len;
                continue;
            }
        }

        if ch == '{' && bytes.get(pos + 1) == Some(&b'#') {
            if let Some(close_rel) = text[pos..end].find('}') {
                let id_start = pos + 2;
                let id_end = pos + close_rel;
                if id_end > id_start {
                    runs.push(InlineRun { start: pos, end: pos + close_rel + 1, kind: InlineKind::HeadingId { id: (id_start, id_end) } });
                    pos += close_rel + 1;
                    continue;
                }
            }
        }

        if ch == '[' {
            if let Some((text_span, dest_span, total_len)) = match_link(text, pos, end) {
                runs.push(InlineRun { start: pos, end: pos + total_len, kind: InlineKind::Link { text: text_span, dest: dest_span } });
                pos += total_len;
                continue;
            }
        }

        if ch == '<' {
            if let Some(len) = match_autolink(text, pos, end) {
                runs.push(InlineRun { start: pos, end: pos + len, kind: InlineKind::Autolink });
                pos += len;
                continue;
            }
        }

        if ch == '`' {
            let run_len = text[pos..end].chars().take_while(|&c| c == '`').count();
            let open_end = pos + run_len;
            if let Some(close_start) = find_code_close(text, open_end, end, run_len) {
                let close_end = close_start + run_len;
                runs.push(InlineRun {
                    start: pos,
                    end: open_end,
                    kind: InlineKind::Delim { marker: DelimMarker::Backtick, style: StyleBit::CODE, opening: true },
                });
                if close_start > open_end {
                    // verbatim interior: no delimiter/link/entity scanning inside a code span
                    runs.push(InlineRun { start: open_end, end: close_start, kind: InlineKind::Text });
                }
                runs.push(InlineRun {
                    start: close_start,
                    end: close_end,
                    kind: InlineKind::Delim { marker: DelimMarker::Backtick, style: StyleBit::CODE, opening: false },
                });
                pos = close_end;
            } else {
                // no backtick run of matching length closes it: literal text, not emphasis
                extend_or_push_text(&mut runs, pos, open_end);
                pos = open_end;
            }
            continue;
        }

        if matches!(ch, '*' | '_' | '~') {
            let marker = match ch {
                '*' => DelimMarker::Star,
                '_' => DelimMarker::Underscore,
                '~' => DelimMarker::Tilde,
                _ => DelimMarker::Backtick,
            };
            let run_len = text[pos..end].chars().take_while(|&c| c == ch).count();
            let run_end = pos + run_len * ch_len;
            let style = style_for(marker, run_len);

            if let Some(open_idx) = find_matching_open(&stack, marker, run_len) {
                let opening = stack.remove(open_idx);
                if let InlineKind::Delim { style: s, .. } = &mut runs[opening.pos_in_runs].kind {
                    *s = style;
                }
                runs.push(InlineRun { start: pos, end: run_end, kind: InlineKind::Delim { marker, style, opening: false } });
            } else {
                runs.push(InlineRun { start: pos, end: run_end, kind: InlineKind::Delim { marker, style, opening: true } });
                stack.push(Pending { marker, run_len, pos_in_runs: runs.len() - 1 });
            }
            pos = run_end;
            continue;
        }

        let next = next_char_boundary(text, pos, end);
        extend_or_push_text(&mut runs, pos, next);
        pos = next;
    }

    runs
}

fn style_for(marker: DelimMarker, run_len: usize) -> StyleBit {
    match marker {
        DelimMarker::Backtick => StyleBit::CODE,
        DelimMarker::Tilde => StyleBit::STRIKE,
        DelimMarker::Star | DelimMarker::Underscore => {
            if run_len >= 2 {
                StyleBit::BOLD
            } else {
                StyleBit::ITALIC
            }
        }
    }
}

fn find_matching_open(stack: &[Pending], marker: DelimMarker, run_len: usize) -> Option<usize> {
    stack.iter().rposition(|p| p.marker == marker && p.run_len == run_len)
}

fn next_char_boundary(text: &str, pos: usize, end: usize) -> usize {
    let c = text[pos..end].chars().next().unwrap();
    pos + c.len_utf8()
}

fn extend_or_push_text(runs: &mut Vec<InlineRun>, start: usize, end: usize) {
    if let Some(last) = runs.last_mut() {
        if last.kind == InlineKind::Text && last.end == start {
            last.end = end;
            return;
        }
    }
    runs.push(InlineRun { start, end, kind: InlineKind::Text });
}

/// Finds the start of the next backtick run exactly `run_len` long, starting
/// at `pos`. A run of a different length doesn't close the span; per
/// CommonMark, scanning just continues past it.
fn find_code_close(text: &str, mut pos: usize, end: usize, run_len: usize) -> Option<usize> {
    while pos < end {
        let tick_rel = text[pos..end].find('`')?;
        let tick_start = pos + tick_rel;
        let candidate_len = text[tick_start..end].chars().take_while(|&c| c == '`').count();
        if candidate_len == run_len {
            return Some(tick_start);
        }
        pos = tick_start + candidate_len;
    }
    None
}

fn match_entity(text: &str, pos: usize, end: usize) -> Option<(&'static str, usize)> {
    let semi_rel = text[pos..end].find(';')?;
    if semi_rel > 32 {
        return None;
    }
    let name = &text[pos + 1..pos + semi_rel];
    let rep = lookup_entity(name)?;
    Some((rep, semi_rel + 1))
}

fn match_emoji(text: &str, pos: usize, end: usize) -> Option<(&'static str, usize)> {
    let rest = &text[pos + 1..end];
    let close_rel = rest.find(':')?;
    if close_rel == 0 || close_rel > 32 {
        return None;
    }
    let name = &rest[..close_rel];
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '+' || c == '-') {
        return None;
    }
    let rep = lookup_emoji(name)?;
    Some((rep, close_rel + 2))
}

fn find_inline_math_close(text: &str, pos: usize, end: usize) -> Option<usize> {
    if text[pos..end].starts_with("$$") {
        return None;
    }
    let rest = &text[pos + 1..end];
    let close_rel = rest.find('$')?;
    if close_rel == 0 {
        return None;
    }
    Some(pos + 1 + close_rel + 1)
}

fn match_footnote_ref(text: &str, pos: usize, end: usize) -> Option<usize> {
    let close_rel = text[pos..end].find(']')?;
    if close_rel < 3 {
        return None;
    }
    Some(close_rel + 1)
}

fn match_link(text: &str, pos: usize, end: usize) -> Option<((usize, usize), (usize, usize), usize)> {
    let close_bracket_rel = text[pos..end].find(']')?;
    let text_span = (pos + 1, pos + close_bracket_rel);
    let after = pos + close_bracket_rel + 1;
    if text.as_bytes().get(after) != Some(&b'(') {
        return None;
    }
    let close_paren_rel = text[after..end].find(')')?;
    let dest_span = (after + 1, after + close_paren_rel);
    let total_len = after + close_paren_rel + 1 - pos;
    Some((text_span, dest_span, total_len))
}

fn match_autolink(text: &str, pos: usize, end: usize) -> Option<usize> {
    let close_rel = text[pos..end].find('>')?;
    let inner = &text[pos + 1..pos + close_rel];
    if inner.len() > 2000 || inner.contains(' ') || inner.contains('\n') {
        return None;
    }
    let looks_like_url = inner.starts_with("http://") || inner.starts_with("https://") || inner.starts_with("mailto:");
    if !looks_like_url {
        return None;
    }
    Some(close_rel + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_delimiters_pair() {
        let text = "a **bold** b";
        let runs = parse_inline(text, 0, text.len());
        let delims: Vec<_> = runs
            .iter()
            .filter(|r| matches!(r.kind, InlineKind::Delim { .. }))
            .collect();
        assert_eq!(delims.len(), 2);
        if let InlineKind::Delim { opening, style, .. } = &delims[0].kind {
            assert!(*opening);
            assert_eq!(*style, StyleBit::BOLD);
        }
    }

    #[test]
    fn unmatched_delimiter_still_opens() {
        let text = "a *unterminated";
        let runs = parse_inline(text, 0, text.len());
        assert!(runs.iter().any(|r| matches!(r.kind, InlineKind::Delim { opening: true, .. })));
    }

    #[test]
    fn link_spans_text_and_dest() {
        let text = "see [here](https://example.com) now";
        let runs = parse_inline(text, 0, text.len());
        let link = runs.iter().find(|r| matches!(r.kind, InlineKind::Link { .. })).unwrap();
        if let InlineKind::Link { text: t, dest } = &link.kind {
            assert_eq!(&text[t.0..t.1], "here");
            assert_eq!(&text[dest.0..dest.1], "https://example.com");
        }
    }

    #[test]
    fn inline_math_single_dollar() {
        let text = "cost is $x+1$ dollars";
        let runs = parse_inline(text, 0, text.len());
        assert!(runs.iter().any(|r| r.kind == InlineKind::InlineMath));
    }

    #[test]
    fn footnote_ref_captures_id() {
        let text = "note[^1] end";
        let runs = parse_inline(text, 0, text.len());
        let r = runs.iter().find(|r| matches!(r.kind, InlineKind::FootnoteRef { .. })).unwrap();
        if let InlineKind::FootnoteRef { id } = &r.kind {
            assert_eq!(&text[id.0..id.1], "1");
        }
    }

    #[test]
    fn escape_consumes_following_char() {
        let text = "\\*not bold\\*";
        let runs = parse_inline(text, 0, text.len());
        assert!(runs.iter().filter(|r| r.kind == InlineKind::Escape).count() >= 1);
    }

    #[test]
    fn entity_replacement_found() {
        let text = "a &amp; b";
        let runs = parse_inline(text, 0, text.len());
        assert!(runs.iter().any(|r| matches!(r.kind, InlineKind::Entity { replacement: "&" })));
    }

    #[test]
    fn adjacent_text_segments_merge() {
        let text = "hello world";
        let runs = parse_inline(text, 0, text.len());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].kind, InlineKind::Text);
    }

    #[test]
    fn code_span_suppresses_inner_emphasis() {
        let text = "`a*b*c`";
        let runs = parse_inline(text, 0, text.len());
        assert!(!runs.iter().any(|r| matches!(r.kind, InlineKind::Delim { marker: DelimMarker::Star, .. })));
        let delims: Vec<_> = runs.iter().filter(|r| matches!(r.kind, InlineKind::Delim { marker: DelimMarker::Backtick, .. })).collect();
        assert_eq!(delims.len(), 2);
        let interior = runs.iter().find(|r| r.kind == InlineKind::Text).unwrap();
        assert_eq!(&text[interior.start..interior.end], "a*b*c");
    }

    #[test]
    fn unmatched_backtick_is_literal_text() {
        let text = "a ` b";
        let runs = parse_inline(text, 0, text.len());
        assert!(!runs.iter().any(|r| matches!(r.kind, InlineKind::Delim { marker: DelimMarker::Backtick, .. })));
    }

    #[test]
    fn autolink_url_detected() {
        let text = "go to <https://example.com> now";
        let runs = parse_inline(text, 0, text.len());
        assert!(runs.iter().any(|r| r.kind == InlineKind::Autolink));
    }
}
