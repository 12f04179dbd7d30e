//! Async event handler for the playground TUI.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc;

use super::{
    app::{App, Focus},
    events::{ChannelPage, TuiEvent},
    ui::render_ui,
};
use crate::{
    config::Config,
    controller::{serve, ExecutionController, RuntimeRequest},
    editor::Editor,
    execution::{load_runtime, python::PythonLoader},
    handlers::Command,
    storage::LocalStorage,
    toolbox::Toolbox,
};

/// Run the playground until the user quits.
pub async fn run(cfg: &Config, initial_code: &str) -> Result<()> {
    if !io::IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!("the playground requires a proper terminal environment"));
    }

    let mut app = App::new(
        Editor::from_text(initial_code, cfg.indent_unit()),
        Toolbox::load(cfg.snippets_path().as_deref()),
        LocalStorage::from_config(cfg),
        cfg.download_dir(),
    );

    let (event_tx, event_rx) = mpsc::unbounded_channel::<TuiEvent>();
    let (request_tx, request_rx) = mpsc::unbounded_channel::<RuntimeRequest>();

    let loader = PythonLoader {
        program: cfg.python_program(),
        timeout: cfg.load_timeout(),
    };
    tracing::info!(program = %loader.program, "starting python runtime");
    let controller = ExecutionController::new(ChannelPage::new(event_tx.clone()));
    let worker = tokio::spawn(serve(controller, load_runtime(loader), request_rx));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, event_tx, event_rx, request_tx).await;

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableBracketedPaste)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // A run may still be blocked inside user code; dropping the worker kills
    // the interpreter process.
    worker.abort();

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_tx: mpsc::UnboundedSender<TuiEvent>,
    mut event_rx: mpsc::UnboundedReceiver<TuiEvent>,
    requests: mpsc::UnboundedSender<RuntimeRequest>,
) -> Result<()> {
    // Spawn input handler
    let input_tx = event_tx;
    tokio::task::spawn_blocking(move || {
        while !input_tx.is_closed() {
            if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                continue;
            }
            let tui_event = match event::read() {
                Ok(Event::Key(key)) => TuiEvent::Key(key),
                Ok(Event::Paste(text)) => TuiEvent::Paste(text),
                _ => continue,
            };
            if input_tx.send(tui_event).is_err() {
                break; // Channel closed
            }
        }
    });

    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        // Drain everything queued since the last frame
        while let Ok(tui_event) = event_rx.try_recv() {
            match tui_event {
                TuiEvent::Key(key) => {
                    if handle_key_event(app, key, &requests) {
                        return Ok(());
                    }
                }
                TuiEvent::Paste(text) => handle_paste(app, &text),
                TuiEvent::Page(update) => app.apply(update),
            }
        }

        // Small delay to prevent busy waiting
        tokio::time::sleep(Duration::from_millis(16)).await; // ~60 FPS
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if let Some(prompt) = app.active_prompt_mut() {
        // Prompts are single-line
        prompt.value.push_str(text.lines().next().unwrap_or(""));
    } else if app.focus == Focus::Editor {
        app.editor.insert_str(text);
    }
}

/// Handle one key press; returns true when the user asked to quit.
fn handle_key_event(
    app: &mut App,
    key: KeyEvent,
    requests: &mpsc::UnboundedSender<RuntimeRequest>,
) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        return true;
    }

    if app.show_help {
        app.toggle_help();
        return false;
    }

    if app.active_prompt().is_some() {
        handle_prompt_key(app, key);
        return false;
    }

    if let Some(command) = global_command(key) {
        if let Some(code) = app.dispatch(command) {
            if requests.send(RuntimeRequest::Run { code }).is_err() {
                tracing::error!("runtime worker is gone; run dropped");
            }
        }
        return false;
    }

    match (key.code, ctrl) {
        (KeyCode::F(1), _) => app.toggle_help(),
        (KeyCode::F(2), _) | (KeyCode::Char('t'), true) => app.toggle_focus(),
        (KeyCode::Up, true) => app.output.scroll_up(),
        (KeyCode::Down, true) => app.output.scroll_down(),
        _ => match app.focus {
            Focus::Editor => handle_editor_key(app, key),
            Focus::Toolbox => handle_toolbox_key(app, key),
        },
    }
    false
}

/// Bindings that map straight onto a [`Command`] whatever has focus.
fn global_command(key: KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::F(5) => Some(Command::Run),
        KeyCode::F(6) => Some(Command::Step),
        KeyCode::F(7) => Some(Command::RunToEnd),
        KeyCode::F(8) => Some(Command::Stop),
        KeyCode::Char('r') if ctrl => Some(Command::Run),
        KeyCode::Char('l') if ctrl => Some(Command::ClearOutput),
        KeyCode::Char('s') if ctrl => Some(Command::Download),
        _ => None,
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.close_prompt(true),
        KeyCode::Esc => app.close_prompt(false),
        KeyCode::Backspace => {
            if let Some(prompt) = app.active_prompt_mut() {
                prompt.value.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(prompt) = app.active_prompt_mut() {
                prompt.value.push(c);
            }
        }
        _ => {}
    }
}

fn handle_editor_key(app: &mut App, key: KeyEvent) {
    let height = app.editor_height;
    let editor = &mut app.editor;
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => editor.insert_char(c),
        KeyCode::Enter => editor.insert_newline(),
        KeyCode::Tab => editor.insert_tab(),
        KeyCode::BackTab => editor.dedent_line(),
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Delete => editor.delete(),
        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Up => editor.move_up(),
        KeyCode::Down => editor.move_down(),
        KeyCode::Home => editor.move_home(),
        KeyCode::End => editor.move_end(),
        KeyCode::PageUp => editor.page_up(height),
        KeyCode::PageDown => editor.page_down(height),
        _ => {}
    }
}

fn handle_toolbox_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.toolbox.select_prev(),
        KeyCode::Down => app.toolbox.select_next(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(command) = app.toolbox_activate() {
                app.dispatch(command);
            }
        }
        KeyCode::Esc => app.focus = Focus::Editor,
        _ => {}
    }
}
