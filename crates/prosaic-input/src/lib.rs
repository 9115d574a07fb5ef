//! Async input service: mirrors the frame loop's non-blocking key read by
//! forwarding `crossterm::EventStream` into an mpsc channel on a background
//! task, with a notify-based shutdown handle.

use crossterm::event::{Event as CEvent, EventStream, KeyCode as CtKeyCode, KeyModifiers as CtMods, MouseEventKind};
use prosaic_events::{InputEvent, KeyCode, KeyEvent, Modifiers, MouseEvent};
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

#[derive(Clone)]
pub struct InputShutdown {
    notify: Arc<Notify>,
}

impl InputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
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

fn translate_event(ev: CEvent) -> Option<InputEvent> {
    match ev {
        CEvent::Key(k) => translate_key(k.code).map(|code| {
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
            InputEvent::Key(KeyEvent::new(code, modifiers))
        }),
        CEvent::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp => Some(InputEvent::Mouse(MouseEvent::ScrollUp)),
            MouseEventKind::ScrollDown => Some(InputEvent::Mouse(MouseEvent::ScrollDown)),
            MouseEventKind::Down(_) => Some(InputEvent::Mouse(MouseEvent::Click { col: m.column, row: m.row })),
            _ => None,
        },
        CEvent::Resize(cols, rows) => Some(InputEvent::Resize { cols, rows }),
        _ => None,
    }
}

/// Spawn the background task. The frame loop drains `sender`'s paired
/// receiver at the top of each iteration instead of blocking on stdin.
pub fn spawn_async_input(sender: Sender<InputEvent>) -> (JoinHandle<()>, InputShutdown) {
    let notify = Arc::new(Notify::new());
    let shutdown = InputShutdown { notify: notify.clone() };
    let handle = tokio::task::spawn(async move {
        let mut stream = EventStream::new();
        loop {
            tokio::select! {
                _ = notify.notified() => {
                    tracing::debug!(target: "input", "shutdown signal received");
                    break;
                }
                maybe_event = stream.next() => {
                    match maybe_event {
                        Some(Ok(ev)) => {
                            if let Some(translated) = translate_event(ev) {
                                if sender.send(translated).await.is_err() {
                                    tracing::debug!(target: "input", "receiver dropped, stopping");
                                    break;
                                }
                            }
                        }
                        Some(Err(err)) => {
                            tracing::warn!(target: "input", ?err, "event stream error");
                        }
                        None => {
                            tracing::debug!(target: "input", "event stream ended");
                            break;
                        }
                    }
                }
            }
        }
    });
    (handle, shutdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_key_covers_arrows() {
        assert_eq!(translate_key(CtKeyCode::Left), Some(KeyCode::Left));
        assert_eq!(translate_key(CtKeyCode::F(1)), None);
    }

    #[test]
    fn translate_resize_event() {
        let ev = translate_event(CEvent::Resize(80, 24));
        assert_eq!(ev, Some(InputEvent::Resize { cols: 80, rows: 24 }));
    }
}
