//! Prosaic entrypoint: argument parsing, logging setup, and the cooperative
//! frame loop that ties the host, state machine, and renderer together.

use anyhow::{Context, Result};
use clap::Parser;
use prosaic_config::Theme;
use prosaic_events::{Capabilities, InputEvent, KeyEvent};
use prosaic_host::{Display, Filesystem, NativeFilesystem, NativeTime, StyleSpec, TerminalHost, Time};
use prosaic_render::{CellFlags, Layout, RenderInput, SketchCache};
use prosaic_state::{Action, Editor, StatusMessage};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments. Flag letters follow the out-of-scope collaborator's
/// documented surface; the core only cares about the resolved `Session`.
#[derive(Parser, Debug)]
#[command(name = "prosaic", version, about = "A focused markdown writing surface", disable_version_flag = true)]
struct Args {
    /// Path to open. `-` reads the initial document from stdin.
    path: Option<String>,

    #[arg(short = 'f', long = "open", value_name = "FILE")]
    open: Option<PathBuf>,

    #[arg(short = 'p', long = "preview", value_name = "FILE")]
    preview: Option<PathBuf>,

    /// Render once to stdout and exit; implies non-interactive.
    #[arg(short = 'P', long = "print")]
    print: bool,

    #[arg(short = 'd', long = "demo", value_name = "FILE")]
    demo: Option<PathBuf>,

    #[arg(short = 't', long = "theme", value_name = "light|dark")]
    theme: Option<String>,

    #[arg(short = 'v', long = "version")]
    version: bool,
}

enum Source {
    Path(PathBuf),
    Stdin,
    Blank,
}

struct Session {
    source: Source,
    read_only: bool,
    print_once: bool,
    theme_override: Option<Theme>,
}

fn resolve_session(args: &Args) -> Result<Session> {
    let theme_override = match &args.theme {
        Some(t) => Some(t.parse::<Theme>().context("invalid -t value")?),
        None => None,
    };

    if let Some(path) = &args.demo {
        return Ok(Session { source: Source::Path(path.clone()), read_only: false, print_once: false, theme_override });
    }
    if let Some(path) = &args.preview {
        return Ok(Session { source: Source::Path(path.clone()), read_only: true, print_once: false, theme_override });
    }
    if let Some(path) = &args.open {
        return Ok(Session { source: Source::Path(path.clone()), read_only: false, print_once: args.print, theme_override });
    }
    match args.path.as_deref() {
        Some("-") => Ok(Session { source: Source::Stdin, read_only: false, print_once: args.print, theme_override }),
        Some(p) => Ok(Session { source: Source::Path(PathBuf::from(p)), read_only: false, print_once: args.print, theme_override }),
        None => Ok(Session { source: Source::Blank, read_only: false, print_once: args.print, theme_override }),
    }
}

fn load_initial_text(source: &Source) -> Result<String> {
    match source {
        Source::Path(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display())),
        Source::Stdin => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
        Source::Blank => Ok(String::new()),
    }
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = dirs::state_dir().or_else(dirs::cache_dir).unwrap_or_else(std::env::temp_dir).join("prosaic");
    if std::fs::create_dir_all(&log_dir).is_err() {
        return None;
    }
    let file_appender = tracing_appender::rolling::never(&log_dir, "prosaic.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        Err(_) => None,
    }
}

fn autosave_path(fs: &NativeFilesystem, opened: &Option<PathBuf>) -> PathBuf {
    let base = fs.home_dir().unwrap_or_else(std::env::temp_dir);
    let name = match opened {
        Some(p) => format!(".{}.prosaic-recover", p.file_name().and_then(|s| s.to_str()).unwrap_or("untitled")),
        None => ".untitled.prosaic-recover".to_string(),
    };
    base.join(name)
}

fn blit(frame: &prosaic_render::Frame, host: &mut TerminalHost) -> Result<()> {
    host.sync_begin()?;
    for y in 0..frame.height {
        host.move_to(y, 0)?;
        host.clear_line()?;
        for (cluster, _width, flags, x) in frame.row_leaders(y) {
            host.move_to(y, x)?;
            host.set_style(StyleSpec {
                bold: flags.contains(CellFlags::BOLD),
                italic: flags.contains(CellFlags::ITALIC),
                dim: flags.contains(CellFlags::DIM),
                strike: flags.contains(CellFlags::STRIKE),
                underline: flags.contains(CellFlags::UNDERLINE),
                fg: None,
                bg: None,
            })?;
            host.write_str(cluster)?;
            host.reset_style()?;
        }
    }
    host.sync_end()?;
    host.flush()?;
    Ok(())
}

fn render_once_to_stdout(editor: &mut Editor, layout: Layout, caps: Capabilities) {
    let text = editor.text();
    let cursor = editor.cursor();
    let selection = editor.selection();
    let cache = editor.cache();
    let mut sketches = SketchCache::new();
    let input = RenderInput {
        cache,
        text: &text,
        cursor,
        selection,
        scroll_row: 0,
        layout,
        supports_scaled_text: caps.contains(Capabilities::TEXT_SIZING),
        hide_cursor_syntax: true,
    };
    let output = prosaic_render::render(&input, &mut sketches);
    for y in 0..output.frame.height {
        for (cluster, _w, _flags, _x) in output.frame.row_leaders(y) {
            print!("{cluster}");
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if args.version {
        println!("prosaic {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let _log_guard = configure_logging();
    info!(target: "runtime", "startup");

    let session = match resolve_session(&args) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("prosaic: {err:#}");
            std::process::exit(1);
        }
    };

    let initial_text = match load_initial_text(&session.source) {
        Ok(t) => t,
        Err(err) => {
            error!(target: "io", %err, "failed to load initial document");
            eprintln!("prosaic: {err:#}");
            std::process::exit(1);
        }
    };

    let mut config = prosaic_config::load_from(None);
    if let Some(theme) = session.theme_override {
        config.apply_theme_override(theme);
    }

    let mut host = TerminalHost::new();
    let caps = host.capabilities();

    if session.print_once {
        let mut editor = Editor::new(&initial_text, config);
        let (cols, rows) = host.size().unwrap_or((80, 24));
        let layout = Layout::new(cols, rows, 0, 0, 70);
        render_once_to_stdout(&mut editor, layout, caps);
        return Ok(());
    }

    host.enter_mut().context("entering terminal")?;
    host.set_title("prosaic")?;

    let fs = NativeFilesystem;
    let clock = NativeTime::default();
    let opened_path = if let Source::Path(p) = &session.source { Some(p.clone()) } else { None };
    let recovery_path = autosave_path(&fs, &opened_path);

    let mut editor = Editor::new(&initial_text, config.clone());
    let autosave_interval_ms = config.autosave_interval_secs.saturating_mul(1000).max(1000);

    let (tx, mut rx) = mpsc::channel::<InputEvent>(256);
    let (input_task, input_shutdown) = prosaic_input::spawn_async_input(tx);
    let mut ticker = tokio::time::interval(Duration::from_millis(autosave_interval_ms));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut quit = false;
    let mut last_size = host.size().unwrap_or((80, 24));

    loop {
        if quit {
            break;
        }

        tokio::select! {
            biased;
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(InputEvent::Key(key)) => {
                        if is_quit_chord(&key) {
                            quit = true;
                        } else if session.read_only && is_mutating_key(&key) {
                            // preview mode: navigation passes through, edits are dropped
                        } else {
                            let now_ms = clock.monotonic_ms();
                            match editor.handle_key(key, now_ms) {
                                Action::Quit => quit = true,
                                Action::RequestSave => {
                                    save_document(&fs, &opened_path, &mut editor, now_ms);
                                }
                                Action::Continue => {}
                            }
                        }
                    }
                    Some(InputEvent::Resize { cols, rows }) => {
                        last_size = (cols, rows);
                    }
                    Some(InputEvent::Mouse(_)) => {}
                    None => quit = true,
                }
            }
            _ = ticker.tick() => {
                if editor.is_dirty() {
                    let now_ms = clock.monotonic_ms();
                    if fs.write_file(&recovery_path, editor.text().as_bytes()).is_ok() {
                        editor.mark_saved();
                        editor.set_status(StatusMessage::info("autosaved", now_ms));
                    } else {
                        warn!(target: "io", path = %recovery_path.display(), "autosave failed");
                    }
                }
            }
        }

        let (cols, rows) = last_size;
        let layout = Layout::new(cols, rows, 1, 0, 70);
        let text = editor.text();
        let cursor = editor.cursor();
        let selection = editor.selection();
        let cache = editor.cache();
        let mut sketches = SketchCache::new();
        let input = RenderInput {
            cache,
            text: &text,
            cursor,
            selection,
            scroll_row: 0,
            layout,
            supports_scaled_text: caps.contains(Capabilities::TEXT_SIZING) && !editor.plain_mode(),
            hide_cursor_syntax: true,
        };
        let output = prosaic_render::render(&input, &mut sketches);
        if let Err(err) = blit(&output.frame, &mut host) {
            error!(target: "render", %err, "blit failed");
        }
    }

    input_shutdown.signal();
    let _ = input_task.await;
    if editor.is_dirty() {
        let now_ms = clock.monotonic_ms();
        save_document(&fs, &opened_path, &mut editor, now_ms);
    }
    let _ = fs.delete(&recovery_path);
    info!(target: "runtime", "shutdown");
    Ok(())
}

fn is_quit_chord(key: &KeyEvent) -> bool {
    use prosaic_events::{KeyCode, Modifiers};
    key.code == KeyCode::Char('c') && key.modifiers.contains(Modifiers::CTRL)
}

/// Keys that would mutate the document; gated out in `-p` preview mode.
fn is_mutating_key(key: &KeyEvent) -> bool {
    use prosaic_events::{KeyCode, Modifiers};
    let ctrl = key.modifiers.contains(Modifiers::CTRL);
    match key.code {
        KeyCode::Enter | KeyCode::Backspace | KeyCode::Delete | KeyCode::Tab | KeyCode::BackTab => true,
        KeyCode::Char(_) if !ctrl => true,
        KeyCode::Char(c) => matches!(c.to_ascii_lowercase(), 'z' | 'y' | 'v' | 'w' | 'u' | 'k' | 'd'),
        _ => false,
    }
}

fn save_document(fs: &NativeFilesystem, opened_path: &Option<PathBuf>, editor: &mut Editor, now_ms: u64) {
    let Some(path) = opened_path else {
        editor.set_status(StatusMessage::warn("no file to save to", now_ms));
        return;
    };
    match fs.write_file(path, editor.text().as_bytes()) {
        Ok(()) => {
            editor.mark_saved();
            editor.set_status(StatusMessage::info("saved", now_ms));
        }
        Err(err) => {
            error!(target: "io", %err, path = %path.display(), "save failed");
            editor.set_status(StatusMessage::error(format!("save failed: {err}"), now_ms));
        }
    }
}
