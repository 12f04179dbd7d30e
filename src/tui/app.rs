//! TUI application state management.

use std::path::PathBuf;

use tokio::sync::oneshot;

use crate::editor::Editor;
use crate::handlers::{download, snippet, Command};
use crate::page::{variables, OutputBuffer, RunStatus};
use crate::storage::LocalStorage;
use crate::toolbox::{state::toggle_section, Row, Toolbox, ToolboxState};

use super::events::PageUpdate;

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Toolbox,
}

/// What a submitted prompt is for.
#[derive(Debug)]
pub enum PromptKind {
    /// `input()` called by running code.
    Input(oneshot::Sender<Option<String>>),
    SaveAs,
}

/// Single-line prompt popup.
#[derive(Debug)]
pub struct Prompt {
    pub kind: PromptKind,
    pub title: String,
    pub value: String,
}

/// Application state for the TUI
#[derive(Debug)]
pub struct App {
    pub editor: Editor,
    pub output: OutputBuffer,
    /// Rendered variable snapshot.
    pub variables: String,
    pub status: RunStatus,
    /// Interpreter version once loaded.
    pub runtime_version: Option<String>,
    /// Whether the Run control accepts presses.
    pub run_enabled: bool,
    pub toolbox: Toolbox,
    pub toolbox_state: ToolboxState,
    pub storage: LocalStorage,
    pub focus: Focus,
    /// Prompts waiting to be shown; the first one is on screen.
    pub prompts: Vec<Prompt>,
    pub download_dir: PathBuf,
    /// Transient message shown in the status bar.
    pub message: String,
    pub show_help: bool,
    /// Text rows of the editor pane at the last draw.
    pub editor_height: usize,
}

impl App {
    pub fn new(
        editor: Editor,
        mut toolbox: Toolbox,
        storage: LocalStorage,
        download_dir: PathBuf,
    ) -> Self {
        let toolbox_state = ToolboxState::restore(&mut toolbox, &storage);
        Self {
            editor,
            output: OutputBuffer::new(),
            variables: variables::render(&Vec::new()),
            status: RunStatus::Loading,
            runtime_version: None,
            run_enabled: true,
            toolbox,
            toolbox_state,
            storage,
            focus: Focus::Editor,
            prompts: Vec::new(),
            download_dir,
            message: String::new(),
            show_help: false,
            editor_height: 20,
        }
    }

    /// Apply a change pushed by the runtime worker.
    pub fn apply(&mut self, update: PageUpdate) {
        match update {
            PageUpdate::Output(text) => self.output.append(Some(&text)),
            PageUpdate::Status(status) => self.status = status,
            PageUpdate::RunEnabled(enabled) => self.run_enabled = enabled,
            PageUpdate::Variables(rendered) => self.variables = rendered,
            PageUpdate::RuntimeVersion(version) => self.runtime_version = Some(version),
            PageUpdate::InputRequested { prompt, reply } => self.prompts.push(Prompt {
                kind: PromptKind::Input(reply),
                title: if prompt.is_empty() {
                    "input()".to_string()
                } else {
                    prompt
                },
                value: String::new(),
            }),
        }
    }

    /// Handle a command. Returns the code to run when the command is an
    /// accepted Run.
    pub fn dispatch(&mut self, command: Command) -> Option<String> {
        match command {
            Command::Run => {
                if !self.run_enabled {
                    return None;
                }
                // The worker re-enables it when the run finishes.
                self.run_enabled = false;
                return Some(self.editor.text());
            }
            Command::ClearOutput => self.output.clear(),
            Command::Download => self.prompts.push(Prompt {
                kind: PromptKind::SaveAs,
                title: "Save as".to_string(),
                value: download::DEFAULT_FILE_NAME.to_string(),
            }),
            Command::Step => tracing::info!("step requested; stepping is not available"),
            Command::RunToEnd => tracing::info!("run-to-end requested; stepping is not available"),
            Command::Stop => tracing::info!("stop requested; running code cannot be interrupted"),
            Command::ToggleSection(section) => {
                match toggle_section(
                    &mut self.toolbox,
                    &mut self.toolbox_state,
                    &mut self.storage,
                    section,
                ) {
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %format!("{e:#}"), "could not persist toolbox state");
                        self.message = "Toolbox state not saved (see log)".to_string();
                    }
                }
            }
            Command::InsertSnippet(section, index) => {
                if let Some(s) = self.toolbox.snippet(section, index) {
                    let text = s.text.clone();
                    snippet::insert_snippet(&mut self.editor, &text);
                    self.focus = Focus::Editor;
                }
            }
        }
        None
    }

    /// Command for Enter on the selected toolbox row.
    pub fn toolbox_activate(&self) -> Option<Command> {
        match self.toolbox.selected_row()? {
            Row::Section(i) => Some(Command::ToggleSection(i)),
            Row::Snippet(i, j) => Some(Command::InsertSnippet(i, j)),
        }
    }

    pub fn active_prompt(&self) -> Option<&Prompt> {
        self.prompts.first()
    }

    pub fn active_prompt_mut(&mut self) -> Option<&mut Prompt> {
        self.prompts.first_mut()
    }

    /// Submit or dismiss the prompt on screen.
    pub fn close_prompt(&mut self, submitted: bool) {
        if self.prompts.is_empty() {
            return;
        }
        let prompt = self.prompts.remove(0);
        match prompt.kind {
            PromptKind::Input(reply) => {
                let answer = submitted.then_some(prompt.value);
                // The run may already be gone; nothing to report then.
                let _ = reply.send(answer);
            }
            PromptKind::SaveAs if submitted => {
                match download::save(&self.download_dir, &prompt.value, &self.editor.text()) {
                    Ok(path) => self.message = format!("Saved {}", path.display()),
                    Err(e) => {
                        tracing::error!(error = %format!("{e:#}"), "download failed");
                        self.message = format!("Save failed: {e}");
                    }
                }
            }
            PromptKind::SaveAs => self.message = "Download cancelled".to_string(),
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Editor => Focus::Toolbox,
            Focus::Toolbox => Focus::Editor,
        };
    }

    /// Toggle help display
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}
