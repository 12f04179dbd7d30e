//! UI-facing state shared between the controller and the TUI.

use std::fmt;

use tokio::sync::oneshot;

pub mod output;
pub mod variables;

pub use output::OutputBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Loading,
    Ready,
    Running,
    Done,
    Error,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStatus::Loading => "loading…",
            RunStatus::Ready => "ready",
            RunStatus::Running => "running…",
            RunStatus::Done => "done",
            RunStatus::Error => "error",
        };
        f.write_str(label)
    }
}

/// What the controller and the interpreter may change on screen.
pub trait Page: Send {
    /// Append to the output sink; `None` is ignored.
    fn append_output(&mut self, text: Option<&str>);

    fn set_status(&mut self, status: RunStatus);

    fn set_run_enabled(&mut self, enabled: bool);

    /// Replace the variable pane with an already rendered snapshot.
    fn show_variables(&mut self, rendered: String);

    /// Ask the user for a line of input. The reply is `None` when dismissed.
    fn request_input(&mut self, prompt: &str) -> oneshot::Receiver<Option<String>>;

    /// Show which interpreter version was loaded.
    fn set_runtime_version(&mut self, _version: &str) {}
}
