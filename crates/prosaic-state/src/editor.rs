//! Top-level editor state machine: owns the document, cursor, modal PDA,
//! undo ring and block cache, and turns logical key events into mutations.

use prosaic_config::Config;
use prosaic_events::{KeyCode, KeyEvent, Modifiers};
use prosaic_markdown::BlockCache;
use prosaic_text::{GapBuffer, grapheme_next, grapheme_prev};

use crate::mode::{Mode, ModeStack};
use crate::smart::{self, Continuation};
use crate::status::StatusMessage;
use crate::undo::UndoEngine;

/// Outcome of handling one key: most keys just mutate state in place, but a
/// few request the frame loop do something outside the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
    RequestSave,
}

pub struct Editor {
    buffer: GapBuffer,
    cursor: usize,
    selection_anchor: Option<usize>,
    mode: ModeStack,
    undo: UndoEngine,
    cache: BlockCache,
    config: Config,
    status: Option<StatusMessage>,
    dirty: bool,
    plain_mode: bool,
}

impl Editor {
    pub fn new(initial_text: &str, config: Config) -> Self {
        let undo = UndoEngine::new(config.undo_ring_capacity);
        let mut cache = BlockCache::new();
        cache.ensure(initial_text, config.wrap_width);
        Self {
            buffer: GapBuffer::from_str(initial_text),
            cursor: 0,
            selection_anchor: None,
            mode: ModeStack::default(),
            undo,
            cache,
            config,
            status: None,
            dirty: false,
            plain_mode: false,
        }
    }

    /// Whether ctrl-R "plain mode" (styling suppressed, raw markdown shown)
    /// is currently toggled on.
    pub fn plain_mode(&self) -> bool {
        self.plain_mode
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection_anchor.map(|a| if a <= self.cursor { (a, self.cursor) } else { (self.cursor, a) })
    }

    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, message: StatusMessage) {
        self.status = Some(message);
    }

    pub fn expire_status(&mut self, now_ms: u64) {
        if self.status.as_ref().is_some_and(|s| s.is_expired(now_ms)) {
            self.status = None;
        }
    }

    pub fn cache(&mut self) -> &BlockCache {
        self.cache.ensure(&self.buffer.to_string(), self.config.wrap_width);
        &self.cache
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.buffer.len());
    }

    fn snapshot(&mut self) {
        let text = self.buffer.to_string();
        self.undo.push_snapshot(&text, self.cursor);
    }

    fn after_mutation(&mut self) {
        self.cache.invalidate();
        self.dirty = true;
        self.clamp_cursor();
    }

    fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.snapshot();
        self.buffer.insert_range(self.cursor, s.as_bytes());
        self.cursor += s.len();
        self.after_mutation();
    }

    fn delete_range(&mut self, start: usize, end: usize) {
        if end <= start {
            return;
        }
        self.snapshot();
        self.buffer.delete(start, end - start);
        self.cursor = start;
        self.after_mutation();
    }

    fn delete_selection(&mut self) -> bool {
        if let Some((s, e)) = self.selection() {
            self.selection_anchor = None;
            self.delete_range(s, e);
            true
        } else {
            false
        }
    }

    fn insert_char(&mut self, ch: char) {
        if self.delete_selection() {
            // fall through: still insert the typed character after clearing the selection
        }
        let text = self.buffer.to_string();
        let pos = self.cursor;
        self.insert_str(&ch.to_string());
        if let Some(followup) = smart::auto_close_followup(&{ let mut t = text; t.insert(pos, ch); t }, self.cursor) {
            self.insert_str(followup);
            self.cursor -= followup.len();
        }
    }

    fn handle_enter(&mut self) {
        self.delete_selection();
        let text = self.buffer.to_string();
        match smart::compute_continuation(&text, self.cursor) {
            Continuation::Insert(prefix) => {
                let mut payload = String::with_capacity(prefix.len() + 1);
                payload.push('\n');
                payload.push_str(&prefix);
                self.insert_str(&payload);
            }
            Continuation::TerminateStructure => {
                let line_start = text[..self.cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
                self.delete_range(line_start, self.cursor);
                self.insert_str("\n");
            }
            Continuation::None => {
                self.insert_str("\n");
            }
        }
    }

    fn handle_backspace(&mut self) {
        if self.delete_selection() {
            return;
        }
        let text = self.buffer.to_string();
        let (start, end) = smart::smart_backspace_range(&text, self.cursor);
        self.delete_range(start, end);
    }

    fn handle_delete_forward(&mut self) {
        if self.delete_selection() {
            return;
        }
        let text = self.buffer.to_string();
        let next = grapheme_next(&text, self.cursor);
        self.delete_range(self.cursor, next);
    }

    fn move_cursor_to(&mut self, pos: usize, extend_selection: bool) {
        if extend_selection {
            if self.selection_anchor.is_none() {
                self.selection_anchor = Some(self.cursor);
            }
        } else {
            self.selection_anchor = None;
        }
        self.cursor = pos.min(self.buffer.len());
    }

    fn line_bounds(&self, text: &str, pos: usize) -> (usize, usize) {
        let start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let end = text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len());
        (start, end)
    }

    fn word_left(&self, text: &str, pos: usize) -> usize {
        let mut p = pos;
        while p > 0 && text[..p].chars().next_back().is_some_and(char::is_whitespace) {
            p = grapheme_prev(text, p);
        }
        while p > 0 {
            let prev = grapheme_prev(text, p);
            if text[prev..p].chars().next().is_some_and(char::is_alphanumeric) {
                p = prev;
            } else {
                break;
            }
        }
        p
    }

    fn word_right(&self, text: &str, pos: usize) -> usize {
        let len = text.len();
        let mut p = pos;
        while p < len && text[p..].chars().next().is_some_and(char::is_alphanumeric) {
            p = grapheme_next(text, p);
        }
        while p < len && text[p..].chars().next().is_some_and(char::is_whitespace) {
            p = grapheme_next(text, p);
        }
        p
    }

    fn undo(&mut self) {
        let text = self.buffer.to_string();
        if let Some((restored, cursor)) = self.undo.undo(&text, self.cursor) {
            self.buffer.replace_all(&restored);
            self.cursor = cursor;
            self.after_mutation();
        }
    }

    fn redo(&mut self) {
        let text = self.buffer.to_string();
        if let Some((restored, cursor)) = self.undo.redo(&text, self.cursor) {
            self.buffer.replace_all(&restored);
            self.cursor = cursor;
            self.after_mutation();
        }
    }

    /// Dispatches one logical key event. `now_ms` drives status-message TTL.
    pub fn handle_key(&mut self, key: KeyEvent, now_ms: u64) -> Action {
        self.expire_status(now_ms);

        if key.code == KeyCode::Esc {
            if self.mode.pop() {
                return Action::Continue;
            }
            self.selection_anchor = None;
            return Action::Continue;
        }

        if key.modifiers.contains(Modifiers::CTRL) {
            if let KeyCode::Char(c) = key.code {
                match c.to_ascii_lowercase() {
                    'z' => {
                        self.undo();
                        return Action::Continue;
                    }
                    'y' => {
                        self.redo();
                        return Action::Continue;
                    }
                    's' => return Action::RequestSave,
                    'l' => {
                        self.mode.push(Mode::Toc);
                        return Action::Continue;
                    }
                    'o' => {
                        self.mode.push(Mode::Help);
                        return Action::Continue;
                    }
                    'f' => {
                        self.mode.push(Mode::Search);
                        return Action::Continue;
                    }
                    'e' => {
                        self.mode.push(Mode::BlockEdit);
                        return Action::Continue;
                    }
                    'g' => {
                        self.mode.push(Mode::FrontmatterEdit);
                        return Action::Continue;
                    }
                    'r' => {
                        self.plain_mode = !self.plain_mode;
                        return Action::Continue;
                    }
                    'w' => {
                        let text = self.buffer.to_string();
                        let start = self.word_left(&text, self.cursor);
                        self.delete_range(start, self.cursor);
                        return Action::Continue;
                    }
                    'u' => {
                        let text = self.buffer.to_string();
                        let (line_start, _) = self.line_bounds(&text, self.cursor);
                        self.delete_range(line_start, self.cursor);
                        return Action::Continue;
                    }
                    'k' => {
                        let text = self.buffer.to_string();
                        let (_, line_end) = self.line_bounds(&text, self.cursor);
                        self.delete_range(self.cursor, line_end);
                        return Action::Continue;
                    }
                    'd' => {
                        self.handle_delete_forward();
                        return Action::Continue;
                    }
                    'c' => return Action::Continue,
                    _ => return Action::Continue,
                }
            }
        }

        let extend = key.modifiers.contains(Modifiers::SHIFT);
        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Enter => self.handle_enter(),
            KeyCode::Backspace => self.handle_backspace(),
            KeyCode::Delete => self.handle_delete_forward(),
            KeyCode::Tab => self.insert_str("  "),
            KeyCode::BackTab => {
                let text = self.buffer.to_string();
                let (line_start, _) = self.line_bounds(&text, self.cursor);
                if text[line_start..].starts_with("  ") {
                    self.delete_range(line_start, line_start + 2);
                }
            }
            KeyCode::Left => {
                let text = self.buffer.to_string();
                let pos = grapheme_prev(&text, self.cursor);
                self.move_cursor_to(pos, extend);
            }
            KeyCode::Right => {
                let text = self.buffer.to_string();
                let pos = grapheme_next(&text, self.cursor);
                self.move_cursor_to(pos, extend);
            }
            KeyCode::Home => {
                let text = self.buffer.to_string();
                let (line_start, _) = self.line_bounds(&text, self.cursor);
                self.move_cursor_to(line_start, extend);
            }
            KeyCode::End => {
                let text = self.buffer.to_string();
                let (_, line_end) = self.line_bounds(&text, self.cursor);
                self.move_cursor_to(line_end, extend);
            }
            KeyCode::CtrlHome => self.move_cursor_to(0, extend),
            KeyCode::CtrlEnd => {
                let len = self.buffer.len();
                self.move_cursor_to(len, extend);
            }
            KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown => {
                // vertical motion is resolved against rendered virtual rows by
                // the render layer, which knows wrap geometry; the state
                // machine only tracks byte position so these are no-ops here.
            }
            KeyCode::Esc => unreachable!("handled above"),
        }
        Action::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with(text: &str) -> Editor {
        Editor::new(text, Config::default())
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut e = editor_with("");
        e.handle_key(KeyEvent::plain(KeyCode::Char('h')), 0);
        e.handle_key(KeyEvent::plain(KeyCode::Char('i')), 0);
        assert_eq!(e.text(), "hi");
    }

    #[test]
    fn enter_continues_list_item() {
        let mut e = editor_with("- first");
        e.cursor = e.text().len();
        e.handle_key(KeyEvent::plain(KeyCode::Enter), 0);
        assert_eq!(e.text(), "- first\n- ");
    }

    #[test]
    fn enter_on_empty_list_item_terminates_it() {
        let mut e = editor_with("- first\n- ");
        e.cursor = e.text().len();
        e.handle_key(KeyEvent::plain(KeyCode::Enter), 0);
        assert_eq!(e.text(), "- first\n\n");
    }

    #[test]
    fn backspace_deletes_whole_bold_span() {
        let mut e = editor_with("**bold**");
        e.cursor = e.text().len();
        e.handle_key(KeyEvent::plain(KeyCode::Backspace), 0);
        assert_eq!(e.text(), "");
    }

    #[test]
    fn ctrl_z_undoes_last_edit() {
        let mut e = editor_with("");
        e.handle_key(KeyEvent::plain(KeyCode::Char('x')), 0);
        assert_eq!(e.text(), "x");
        e.handle_key(KeyEvent::ctrl('z'), 0);
        assert_eq!(e.text(), "");
    }

    #[test]
    fn ctrl_l_pushes_toc_mode_and_esc_pops_back() {
        let mut e = editor_with("hello");
        assert_eq!(e.mode(), Mode::Welcome);
        e.handle_key(KeyEvent::ctrl('l'), 0);
        assert_eq!(e.mode(), Mode::Toc);
        e.handle_key(KeyEvent::plain(KeyCode::Esc), 0);
        assert_eq!(e.mode(), Mode::Welcome);
    }

    #[test]
    fn ctrl_u_deletes_to_line_start() {
        let mut e = editor_with("hello world");
        e.cursor = e.text().len();
        e.handle_key(KeyEvent::ctrl('u'), 0);
        assert_eq!(e.text(), "");
    }
}
