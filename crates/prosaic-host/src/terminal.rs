//! Crossterm-backed concrete host: `Display` + `Input`, plus an RAII guard
//! that restores terminal state on drop even if the caller unwinds.

use crate::error::{HostError, HostResult};
use crate::traits::{Display, Input, StyleSpec};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode as CtKeyCode, KeyModifiers as CtMods, MouseEventKind};
use crossterm::style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use prosaic_events::{Capabilities, InputEvent, KeyCode, KeyEvent, Modifiers, MouseEvent};
use std::io::{Write, stdout};
use std::time::Duration;

pub struct TerminalHost {
    entered: bool,
    quit: bool,
    last_mouse: Option<(u16, u16)>,
    capabilities: Capabilities,
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self { entered: false, quit: false, last_mouse: None, capabilities: crate::capabilities::detect() }
    }
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Enters raw mode / the alt screen without borrowing `self` for a
    /// guard's lifetime. Cleanup still happens via `TerminalHost`'s own
    /// `Drop` impl, so this is the right call when the caller needs `&mut
    /// self` again before the session ends (the normal frame-loop case).
    pub fn enter_mut(&mut self) -> HostResult<()> {
        if !self.entered {
            terminal::enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
            if self.capabilities.contains(Capabilities::MOUSE) {
                execute!(stdout(), crossterm::event::EnableMouseCapture)?;
            }
            self.entered = true;
        }
        Ok(())
    }

    /// Same entry, but returns a scoped guard that leaves on drop. Useful
    /// for a short-lived session (e.g. a single print-and-exit pass) where
    /// the caller doesn't need `&mut self` again afterward.
    pub fn enter(&mut self) -> HostResult<TerminalGuard<'_>> {
        self.enter_mut()?;
        Ok(TerminalGuard { host: self, active: true })
    }

    fn leave(&mut self) -> HostResult<()> {
        if self.entered {
            if self.capabilities.contains(Capabilities::MOUSE) {
                let _ = execute!(stdout(), crossterm::event::DisableMouseCapture);
            }
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            terminal::disable_raw_mode()?;
            self.entered = false;
        }
        Ok(())
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

pub struct TerminalGuard<'a> {
    host: &'a mut TerminalHost,
    active: bool,
}

impl<'a> Drop for TerminalGuard<'a> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.host.leave();
        }
    }
}

fn to_crossterm_color((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

impl Display for TerminalHost {
    fn size(&self) -> HostResult<(u16, u16)> {
        let (c, r) = terminal::size()?;
        Ok((c, r))
    }

    fn move_to(&mut self, row: u16, col: u16) -> HostResult<()> {
        queue!(stdout(), MoveTo(col, row))?;
        Ok(())
    }

    fn set_style(&mut self, style: StyleSpec) -> HostResult<()> {
        use crossterm::style::{Attribute, SetAttribute};
        if style.bold {
            queue!(stdout(), SetAttribute(Attribute::Bold))?;
        }
        if style.italic {
            queue!(stdout(), SetAttribute(Attribute::Italic))?;
        }
        if style.dim {
            queue!(stdout(), SetAttribute(Attribute::Dim))?;
        }
        if style.strike {
            queue!(stdout(), SetAttribute(Attribute::CrossedOut))?;
        }
        if style.underline {
            queue!(stdout(), SetAttribute(Attribute::Underlined))?;
        }
        if let Some(fg) = style.fg {
            queue!(stdout(), SetForegroundColor(to_crossterm_color(fg)))?;
        }
        if let Some(bg) = style.bg {
            queue!(stdout(), SetBackgroundColor(to_crossterm_color(bg)))?;
        }
        Ok(())
    }

    fn reset_style(&mut self) -> HostResult<()> {
        queue!(stdout(), ResetColor, crossterm::style::SetAttribute(crossterm::style::Attribute::Reset))?;
        Ok(())
    }

    fn clear_screen(&mut self) -> HostResult<()> {
        queue!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    fn clear_line(&mut self) -> HostResult<()> {
        queue!(stdout(), Clear(ClearType::CurrentLine))?;
        Ok(())
    }

    fn clear_to_end(&mut self, n: u16) -> HostResult<()> {
        self.repeat_char(' ', n)
    }

    fn write_str(&mut self, s: &str) -> HostResult<()> {
        queue!(stdout(), crossterm::style::Print(s))?;
        Ok(())
    }

    fn repeat_char(&mut self, c: char, n: u16) -> HostResult<()> {
        for _ in 0..n {
            queue!(stdout(), crossterm::style::Print(c))?;
        }
        Ok(())
    }

    fn write_scaled(&mut self, s: &str, scale_num: u16, scale_den: u16) -> HostResult<()> {
        if !self.capabilities.contains(Capabilities::TEXT_SIZING) {
            return self.write_str(s);
        }
        // Kitty text-sizing CSI, gated on the TEXT_SIZING capability above.
        let esc = format!("\x1b]66;s={scale_num}/{scale_den};{s}\x1b\\");
        self.write_str(&esc)
    }

    fn hyperlink_begin(&mut self, url: &str) -> HostResult<()> {
        self.write_str(&format!("\x1b]8;;{url}\x1b\\"))
    }

    fn hyperlink_end(&mut self) -> HostResult<()> {
        self.write_str("\x1b]8;;\x1b\\")
    }

    fn flush(&mut self) -> HostResult<()> {
        stdout().flush()?;
        Ok(())
    }

    fn sync_begin(&mut self) -> HostResult<()> {
        if self.capabilities.contains(Capabilities::SYNCHRONIZED_OUT) {
            self.write_str("\x1b[?2026h")?;
        }
        Ok(())
    }

    fn sync_end(&mut self) -> HostResult<()> {
        if self.capabilities.contains(Capabilities::SYNCHRONIZED_OUT) {
            self.write_str("\x1b[?2026l")?;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> HostResult<()> {
        execute!(stdout(), terminal::SetTitle(title))?;
        Ok(())
    }
}

fn translate_modifiers(m: CtMods) -> Modifiers {
    let mut out = Modifiers::empty();
    if m.contains(CtMods::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if m.contains(CtMods::ALT) {
        out |= Modifiers::ALT;
    }
    if m.contains(CtMods::CONTROL) {
        out |= Modifiers::CTRL;
    }
    out
}

fn translate_key(code: CtKeyCode) -> Option<KeyCode> {
    Some(match code {
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,
        CtKeyCode::BackTab => KeyCode::BackTab,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Tab => KeyCode::Tab,
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Esc => KeyCode::Esc,
        CtKeyCode::Char(c) => KeyCode::Char(c),
        _ => return None,
    })
}

impl Input for TerminalHost {
    fn next_key(&mut self) -> HostResult<Option<InputEvent>> {
        if !event::poll(Duration::from_millis(0)).map_err(HostError::Io)? {
            return Ok(None);
        }
        match event::read().map_err(HostError::Io)? {
            Event::Key(k) => {
                let Some(code) = translate_key(k.code) else { return Ok(None) };
                let modifiers = translate_modifiers(k.modifiers);
                let code = if modifiers.contains(Modifiers::CTRL) {
                    match code {
                        KeyCode::Home => KeyCode::CtrlHome,
                        KeyCode::End => KeyCode::CtrlEnd,
                        other => other,
                    }
                } else {
                    code
                };
                if code == KeyCode::Char('c') && modifiers.contains(Modifiers::CTRL) {
                    self.quit = true;
                }
                Ok(Some(InputEvent::Key(KeyEvent::new(code, modifiers))))
            }
            Event::Mouse(m) => {
                self.last_mouse = Some((m.column, m.row));
                let ev = match m.kind {
                    MouseEventKind::ScrollUp => MouseEvent::ScrollUp,
                    MouseEventKind::ScrollDown => MouseEvent::ScrollDown,
                    MouseEventKind::Down(_) => MouseEvent::Click { col: m.column, row: m.row },
                    _ => return Ok(None),
                };
                Ok(Some(InputEvent::Mouse(ev)))
            }
            Event::Resize(cols, rows) => Ok(Some(InputEvent::Resize { cols, rows })),
            _ => Ok(None),
        }
    }

    fn last_mouse(&self) -> Option<(u16, u16)> {
        self.last_mouse
    }

    fn resize_pending(&mut self) -> Option<(u16, u16)> {
        None
    }

    fn quit_pending(&self) -> bool {
        self.quit
    }

    fn input_ready_within(&mut self, ms: u64) -> HostResult<bool> {
        Ok(event::poll(Duration::from_millis(ms)).map_err(HostError::Io)?)
    }

    fn poll_background_jobs(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_key_maps_arrows() {
        assert_eq!(translate_key(CtKeyCode::Up), Some(KeyCode::Up));
        assert_eq!(translate_key(CtKeyCode::Char('q')), Some(KeyCode::Char('q')));
    }

    #[test]
    fn translate_modifiers_combines_flags() {
        let m = translate_modifiers(CtMods::SHIFT | CtMods::CONTROL);
        assert!(m.contains(Modifiers::SHIFT));
        assert!(m.contains(Modifiers::CTRL));
        assert!(!m.contains(Modifiers::ALT));
    }
}
