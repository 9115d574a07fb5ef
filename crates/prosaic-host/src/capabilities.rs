//! Capability negotiation: what the concrete driver claims to support.
//!
//! Optimistic defaults for a modern terminal; a real driver narrows these
//! after probing `$TERM`/`$COLORTERM`/`$TERM_PROGRAM`, matching the
//! teacher's `TerminalCapabilities::detect` policy of assuming support
//! rather than round-trip probing at startup.

use prosaic_events::Capabilities;

pub fn detect() -> Capabilities {
    let mut caps = Capabilities::SYNCHRONIZED_OUT | Capabilities::BRACKETED_PASTE | Capabilities::MOUSE | Capabilities::CLIPBOARD;

    let colorterm = std::env::var("COLORTERM").unwrap_or_default();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        caps |= Capabilities::TRUE_COLOR;
    }

    let term_program = std::env::var("TERM_PROGRAM").unwrap_or_default();
    let term = std::env::var("TERM").unwrap_or_default();
    if term_program == "kitty" || term.contains("kitty") {
        caps |= Capabilities::IMAGES | Capabilities::TEXT_SIZING | Capabilities::STYLED_UNDERLINE;
    }
    if term.contains("256color") || term.contains("xterm") {
        caps |= Capabilities::STYLED_UNDERLINE;
    }

    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_always_grants_baseline_capabilities() {
        let caps = detect();
        assert!(caps.contains(Capabilities::SYNCHRONIZED_OUT));
        assert!(caps.contains(Capabilities::MOUSE));
    }
}
