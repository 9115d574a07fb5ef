//! Terminal-cell display width for a single grapheme cluster (EGC).
//!
//! Width decisions flow through one function, [`egc_width`], so that every
//! caller (wrap engine, renderer, status line) agrees on how wide a cluster
//! is. The classifier is heuristic but biased toward over-estimating width
//! for unrecognized emoji composites: over-estimation costs a blank cell,
//! under-estimation causes visible cursor drift.

/// Semantic classification of a single grapheme cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EgcKind {
    Ascii,
    Narrow,
    Wide,
    EmojiSimple,
    EmojiModifier,
    EmojiKeycap,
    EmojiFlag,
    EmojiZwj,
    Combining(bool),
    Control,
}

const ZWJ: char = '\u{200D}';
const KEYCAP_COMBINING: char = '\u{20E3}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_skin_tone_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

fn classify(egc: &str) -> EgcKind {
    if egc.is_empty() {
        return EgcKind::Control;
    }
    let mut chars = egc.chars();
    let first = chars.next().unwrap();
    let single = chars.next().is_none();

    if single {
        if (first as u32) < 0x20 || first == '\u{7f}' {
            return EgcKind::Control;
        }
        if first.is_ascii() {
            return EgcKind::Ascii;
        }
        let uwidth = unicode_width::UnicodeWidthChar::width(first).unwrap_or(1);
        if is_extended_pictographic(first) {
            return EgcKind::EmojiSimple;
        }
        if uwidth == 2 {
            return EgcKind::Wide;
        }
        return EgcKind::Narrow;
    }

    let mut count_ep = 0usize;
    let mut count_ri = 0usize;
    let mut has_zwj = false;
    let mut has_skin = false;
    let mut has_combining = false;
    let mut keycap_base: Option<char> = None;
    let mut ends_with_keycap = false;
    let mut any_wide = false;
    let mut base_wide_or_emoji = false;
    let mut saw_non_mark_base = false;
    let total = egc.chars().count();

    for (i, c) in egc.chars().enumerate() {
        if is_extended_pictographic(c) {
            count_ep += 1;
        }
        if is_regional_indicator(c) {
            count_ri += 1;
        }
        if c == ZWJ {
            has_zwj = true;
        }
        if is_skin_tone_modifier(c) {
            has_skin = true;
        }
        if is_combining_mark(c) {
            has_combining = true;
        }
        if c == KEYCAP_COMBINING && i == total - 1 {
            ends_with_keycap = true;
        }
        if keycap_base.is_none() && (c.is_ascii_digit() || c == '#' || c == '*') {
            keycap_base = Some(c);
        }
        if unicode_width::UnicodeWidthChar::width(c).unwrap_or(1) == 2 {
            any_wide = true;
        }
        if !saw_non_mark_base && !is_combining_mark(c) {
            saw_non_mark_base = true;
            if is_extended_pictographic(c) || unicode_width::UnicodeWidthChar::width(c).unwrap_or(1) == 2
            {
                base_wide_or_emoji = true;
            }
        }
    }

    if ends_with_keycap && keycap_base.is_some() {
        return EgcKind::EmojiKeycap;
    }
    if count_ri == 2 && total == 2 {
        return EgcKind::EmojiFlag;
    }
    if has_zwj && count_ep >= 2 {
        return EgcKind::EmojiZwj;
    }
    if count_ep >= 1 && has_skin {
        return EgcKind::EmojiModifier;
    }
    if count_ep == 1 && !has_zwj {
        return EgcKind::EmojiSimple;
    }
    if has_combining {
        return EgcKind::Combining(base_wide_or_emoji);
    }
    if any_wide {
        return EgcKind::Wide;
    }
    if count_ep > 0 {
        return EgcKind::EmojiSimple;
    }
    EgcKind::Narrow
}

#[inline]
fn width_for_kind(kind: EgcKind) -> u16 {
    match kind {
        EgcKind::Control => 0,
        EgcKind::Ascii | EgcKind::Narrow => 1,
        EgcKind::Wide
        | EgcKind::EmojiSimple
        | EgcKind::EmojiModifier
        | EgcKind::EmojiKeycap
        | EgcKind::EmojiFlag
        | EgcKind::EmojiZwj => 2,
        EgcKind::Combining(base_wide) => {
            if base_wide {
                2
            } else {
                1
            }
        }
    }
}

/// Display width, in terminal cells, of a single grapheme cluster.
///
/// Precondition: `egc` is exactly one grapheme cluster (callers segment
/// before calling). Empty input returns 0.
pub fn egc_width(egc: &str) -> u16 {
    if egc.is_empty() {
        return 0;
    }
    let kind = classify(egc);
    let mut width = width_for_kind(kind);
    if width == 1 {
        let mut has_signal = false;
        for c in egc.chars() {
            if is_extended_pictographic(c) || is_regional_indicator(c) {
                has_signal = true;
                break;
            }
        }
        if has_signal {
            width = 2;
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_one() {
        assert_eq!(egc_width("a"), 1);
    }

    #[test]
    fn control_is_zero() {
        assert_eq!(egc_width("\t"), 0);
    }

    #[test]
    fn wide_cjk_is_two() {
        assert_eq!(egc_width("界"), 2);
    }

    #[test]
    fn emoji_basic_is_two() {
        assert_eq!(egc_width("😀"), 2);
    }

    #[test]
    fn combining_mark_stays_narrow() {
        assert_eq!(egc_width("e\u{0301}"), 1);
    }

    #[test]
    fn flag_sequence_is_two() {
        assert_eq!(egc_width("🇺🇸"), 2);
    }

    #[test]
    fn keycap_sequence_is_two() {
        assert_eq!(egc_width("1\u{fe0f}\u{20e3}"), 2);
    }

    #[test]
    fn zwj_family_is_two() {
        assert_eq!(egc_width("👨\u{200D}👩\u{200D}👧"), 2);
    }
}
