//! Word-boundary wrap engine.
//!
//! Wraps a byte range of materialized text to a column width, honoring tabs,
//! non-breaking spaces, and hyphenated mid-word splits. Operates on a `&str`
//! slice; callers pass absolute byte offsets that are preserved in the
//! returned [`WrapLine`]s so results can be mapped straight back onto the
//! buffer.

use crate::grapheme::grapheme_next;
use crate::width::egc_width;

#[derive(Debug, Clone, Copy)]
pub struct WrapConfig {
    pub tab_size: u16,
    pub trim_trailing_whitespace: bool,
    pub allow_word_split_with_hyphen: bool,
    pub keep_dash_with_preceding_word: bool,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            tab_size: 4,
            trim_trailing_whitespace: true,
            allow_word_split_with_hyphen: true,
            keep_dash_with_preceding_word: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapLine {
    pub start: usize,
    pub end: usize,
    pub display_width: u16,
    pub segment_in_orig: usize,
    pub is_hard_break: bool,
    pub ends_with_split: bool,
}

fn is_wordy(c: char) -> bool {
    c.is_alphanumeric()
}

struct Word {
    start: usize,
    end: usize,
    width: u16,
    unsplittable: bool,
}

/// Wrap `s[range.0..range.1]` to `width` columns per `config`.
pub fn wrap_range(s: &str, start: usize, end: usize, width: u16, config: &WrapConfig) -> Vec<WrapLine> {
    let w = width.max(2);
    let end = end.min(s.len());
    let mut lines = Vec::new();

    let mut line_begin = start;
    let mut cur_width: u16 = 0;
    let mut cur_end = start;
    let mut word: Option<Word> = None;
    let mut seg_in_line: usize = 0;

    let mut emit = |lines: &mut Vec<WrapLine>,
                    line_begin: usize,
                    mut line_end: usize,
                    mut width: u16,
                    seg: usize,
                    hard: bool,
                    split: bool| {
        if config.trim_trailing_whitespace {
            while line_end > line_begin {
                let prev = s[..line_end].char_indices().next_back();
                let Some((pi, pc)) = prev else { break };
                if pc == ' ' || pc == '\t' {
                    let w = egc_width(&pc.to_string());
                    width = width.saturating_sub(w);
                    line_end = pi;
                } else {
                    break;
                }
            }
        }
        lines.push(WrapLine {
            start: line_begin,
            end: line_end,
            display_width: width,
            segment_in_orig: seg,
            is_hard_break: hard,
            ends_with_split: split,
        });
    };

    let commit_word = |cur_width: &mut u16, cur_end: &mut usize, word: &mut Option<Word>| {
        if let Some(wd) = word.take() {
            *cur_width = cur_width.saturating_add(wd.width);
            *cur_end = wd.end;
        }
    };

    let mut pos = start;
    while pos < end {
        let next = grapheme_next(s, pos).min(end);
        let cluster = &s[pos..next];
        let gw = egc_width(cluster);
        let ch = cluster.chars().next().unwrap_or('\0');

        if ch == '\n' || ch == '\r' {
            let mut consumed_end = next;
            if ch == '\r' && s[next..end].starts_with('\n') {
                consumed_end = grapheme_next(s, next).min(end);
            }
            commit_word(&mut cur_width, &mut cur_end, &mut word);
            emit(&mut lines, line_begin, cur_end, cur_width, seg_in_line, true, false);
            seg_in_line = 0;
            line_begin = consumed_end;
            cur_end = consumed_end;
            cur_width = 0;
            pos = consumed_end;
            continue;
        }

        if ch == ' ' {
            commit_word(&mut cur_width, &mut cur_end, &mut word);
            if cur_width + 1 <= w {
                cur_width += 1;
                cur_end = next;
            } else {
                emit(&mut lines, line_begin, cur_end, cur_width, seg_in_line, false, false);
                seg_in_line += 1;
                line_begin = next;
                cur_end = next;
                cur_width = 0;
            }
            pos = next;
            continue;
        }

        if ch == '\t' {
            commit_word(&mut cur_width, &mut cur_end, &mut word);
            let tab = config.tab_size.max(1);
            let mut added = tab - (cur_width % tab);
            if cur_width + added > w {
                emit(&mut lines, line_begin, cur_end, cur_width, seg_in_line, false, false);
                seg_in_line += 1;
                line_begin = next;
                cur_end = next;
                cur_width = 0;
                added = tab;
            } else {
                cur_end = next;
            }
            cur_width += added;
            pos = next;
            continue;
        }

        if ch == '\u{00A0}' {
            let wd = word.get_or_insert(Word { start: pos, end: pos, width: 0, unsplittable: false });
            wd.end = next;
            wd.width += gw;
            wd.unsplittable = true;
            pos = next;
            continue;
        }

        if ch == '-' {
            let wd = word.get_or_insert(Word { start: pos, end: pos, width: 0, unsplittable: false });
            wd.end = next;
            wd.width += gw;
            if !config.keep_dash_with_preceding_word && cur_width + wd.width <= w {
                commit_word(&mut cur_width, &mut cur_end, &mut word);
            }
            pos = next;
            continue;
        }

        // Regular grapheme: append to pending word, splitting if necessary.
        let would_overflow_line = {
            let pending_width = word.as_ref().map(|w| w.width).unwrap_or(0);
            cur_width > 0 && cur_width + pending_width + gw > w
        };
        if would_overflow_line {
            let word_start = word.as_ref().map(|w| w.start).unwrap_or(next);
            emit(&mut lines, line_begin, cur_end, cur_width, seg_in_line, false, false);
            seg_in_line += 1;
            line_begin = word_start;
            cur_end = word_start;
            cur_width = 0;
        }

        let pending_width = word.as_ref().map(|w| w.width).unwrap_or(0);
        let unsplittable = word.as_ref().map(|w| w.unsplittable).unwrap_or(false);
        if cur_width == 0 && pending_width + gw > w && !unsplittable && config.allow_word_split_with_hyphen {
            // Word alone exceeds the column width: split at this boundary.
            let wd = word.take().unwrap_or(Word { start: pos, end: pos, width: 0, unsplittable: false });
            let prev_char_wordy = s[..wd.end].chars().next_back().map(is_wordy).unwrap_or(false);
            let next_char_wordy = is_wordy(ch);
            let split = prev_char_wordy && next_char_wordy;
            emit(&mut lines, line_begin, wd.end, wd.width, seg_in_line, false, split);
            seg_in_line += 1;
            line_begin = wd.end;
            cur_end = wd.end;
            cur_width = 0;
            word = Some(Word { start: pos, end: next, width: gw, unsplittable: false });
            pos = next;
            continue;
        }
        if cur_width == 0 && pending_width + gw > w && unsplittable {
            // Unsplittable (NBSP) word forced past the width bound; accept overflow.
        }

        let wd = word.get_or_insert(Word { start: pos, end: pos, width: 0, unsplittable: false });
        wd.end = next;
        wd.width += gw;
        pos = next;
    }

    commit_word(&mut cur_width, &mut cur_end, &mut word);
    if cur_end > line_begin || lines.is_empty() {
        emit(&mut lines, line_begin, cur_end, cur_width, seg_in_line, false, false);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> WrapConfig {
        WrapConfig::default()
    }

    #[test]
    fn simple_space_wrap() {
        let s = "the quick brown fox";
        let lines = wrap_range(s, 0, s.len(), 10, &cfg());
        assert!(lines.iter().all(|l| l.display_width <= 10));
        let joined: String = lines
            .iter()
            .map(|l| &s[l.start..l.end])
            .collect::<Vec<_>>()
            .join(" ");
        assert!(joined.contains("the"));
    }

    #[test]
    fn hard_break_resets_segment_counter() {
        let s = "ab\ncd";
        let lines = wrap_range(s, 0, s.len(), 10, &cfg());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].is_hard_break);
        assert_eq!(lines[0].segment_in_orig, 0);
        assert_eq!(lines[1].segment_in_orig, 0);
    }

    #[test]
    fn long_word_splits_with_hyphen() {
        let s = "abcdefghij klm";
        let lines = wrap_range(s, 0, s.len(), 6, &cfg());
        assert_eq!(lines[0].start, 0);
        assert_eq!(lines[0].end, 6);
        assert_eq!(lines[0].display_width, 6);
        assert!(lines[0].ends_with_split);
        assert_eq!(lines[0].segment_in_orig, 0);
        assert_eq!(lines[1].segment_in_orig, 1);
        assert_eq!(lines[2].segment_in_orig, 2);
        for l in &lines {
            assert!(l.display_width <= 6);
        }
    }

    #[test]
    fn nbsp_word_not_split() {
        let s = "a\u{00A0}bcdefghij";
        let lines = wrap_range(s, 0, s.len(), 4, &cfg());
        assert_eq!(lines.len(), 1);
        assert!(!lines[0].ends_with_split);
    }

    #[test]
    fn width_below_two_is_clamped() {
        let s = "ab";
        let lines = wrap_range(s, 0, s.len(), 0, &cfg());
        assert!(!lines.is_empty());
    }

    #[test]
    fn tab_expands_to_next_stop() {
        let s = "a\tb";
        let lines = wrap_range(s, 0, s.len(), 20, &cfg());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].display_width, 5); // 'a'(1) + tab to col4(3) + 'b'(1)
    }

    #[test]
    fn empty_range_yields_one_blank_line() {
        let lines = wrap_range("", 0, 0, 10, &cfg());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start, 0);
        assert_eq!(lines[0].end, 0);
    }
}
