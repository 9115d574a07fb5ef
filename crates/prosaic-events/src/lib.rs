//! The logical key/mouse token set the host yields to the core, and the
//! capability bitflags negotiated at startup — shared between
//! `prosaic-host` (producer) and `prosaic-state` (consumer) so neither
//! depends on the other.

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    CtrlHome,
    CtrlEnd,
    BackTab,
    Delete,
    Enter,
    Tab,
    Backspace,
    Esc,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self { code, modifiers: Modifiers::empty() }
    }

    pub fn ctrl(c: char) -> Self {
        Self { code: KeyCode::Char(c), modifiers: Modifiers::CTRL }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEvent {
    ScrollUp,
    ScrollDown,
    Click { col: u16, row: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { cols: u16, rows: u16 },
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u16 {
        const TRUE_COLOR         = 0b0000_0000_0001;
        const SYNCHRONIZED_OUT   = 0b0000_0000_0010;
        const BRACKETED_PASTE    = 0b0000_0000_0100;
        const STYLED_UNDERLINE   = 0b0000_0000_1000;
        const MOUSE              = 0b0000_0001_0000;
        const CLIPBOARD          = 0b0000_0010_0000;
        const IMAGES             = 0b0000_0100_0000;
        const TEXT_SIZING        = 0b0000_1000_0000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_helper_sets_modifier() {
        let k = KeyEvent::ctrl('s');
        assert!(k.modifiers.contains(Modifiers::CTRL));
        assert_eq!(k.code, KeyCode::Char('s'));
    }

    #[test]
    fn capabilities_are_independently_testable() {
        let caps = Capabilities::TRUE_COLOR | Capabilities::MOUSE;
        assert!(caps.contains(Capabilities::TRUE_COLOR));
        assert!(!caps.contains(Capabilities::IMAGES));
    }
}
