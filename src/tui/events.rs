//! Custom event types for TUI application.

use crossterm::event::KeyEvent;
use tokio::sync::{mpsc, oneshot};

use crate::page::{Page, RunStatus};

/// Events that can occur in the TUI application
#[derive(Debug)]
pub enum TuiEvent {
    /// User keyboard input
    Key(KeyEvent),
    /// Bracketed paste content
    Paste(String),
    /// Change requested by the runtime worker
    Page(PageUpdate),
}

/// Screen changes produced on the runtime side.
#[derive(Debug)]
pub enum PageUpdate {
    Output(String),
    Status(RunStatus),
    RunEnabled(bool),
    Variables(String),
    RuntimeVersion(String),
    InputRequested {
        prompt: String,
        reply: oneshot::Sender<Option<String>>,
    },
}

/// [`Page`] that forwards every call to the TUI loop.
#[derive(Debug, Clone)]
pub struct ChannelPage {
    tx: mpsc::UnboundedSender<TuiEvent>,
}

impl ChannelPage {
    pub fn new(tx: mpsc::UnboundedSender<TuiEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, update: PageUpdate) {
        if self.tx.send(TuiEvent::Page(update)).is_err() {
            tracing::debug!("tui gone; dropping page update");
        }
    }
}

impl Page for ChannelPage {
    fn append_output(&mut self, text: Option<&str>) {
        if let Some(text) = text {
            self.send(PageUpdate::Output(text.to_string()));
        }
    }

    fn set_status(&mut self, status: RunStatus) {
        self.send(PageUpdate::Status(status));
    }

    fn set_run_enabled(&mut self, enabled: bool) {
        self.send(PageUpdate::RunEnabled(enabled));
    }

    fn show_variables(&mut self, rendered: String) {
        self.send(PageUpdate::Variables(rendered));
    }

    fn set_runtime_version(&mut self, version: &str) {
        self.send(PageUpdate::RuntimeVersion(version.to_string()));
    }

    fn request_input(&mut self, prompt: &str) -> oneshot::Receiver<Option<String>> {
        let (reply, rx) = oneshot::channel();
        // If the TUI is gone the sender drops here and the runtime sees a
        // closed channel, which it treats as a dismissed prompt.
        self.send(PageUpdate::InputRequested {
            prompt: prompt.to_string(),
            reply,
        });
        rx
    }
}
