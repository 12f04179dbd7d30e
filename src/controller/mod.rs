//! Execution controller: readiness check, run, status and variable refresh.

use crate::execution::{Interpreter, RuntimeError, RuntimeSession};
use crate::page::{variables, Page, RunStatus};

pub mod worker;

pub use worker::{serve, RuntimeRequest};

pub const NOT_READY_NOTICE: &str = "Python runtime is not ready yet.";

pub struct ExecutionController<I, P> {
    session: RuntimeSession<I>,
    page: P,
}

impl<I: Interpreter, P: Page> ExecutionController<I, P> {
    pub fn new(page: P) -> Self {
        Self {
            session: RuntimeSession::new(),
            page,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.session.is_ready()
    }

    /// Record the outcome of the startup load. Failure is reported once and
    /// leaves the session not ready for good.
    pub fn finish_load(&mut self, loaded: Result<I, RuntimeError>) {
        match loaded {
            Ok(runtime) => {
                if let Some(version) = runtime.version() {
                    self.page.set_runtime_version(version);
                }
                self.session.attach(runtime);
                self.page.set_status(RunStatus::Ready);
            }
            Err(e) => {
                tracing::error!(error = %e, "python runtime failed to load");
                self.page.append_output(Some(&e.to_string()));
                self.page.set_status(RunStatus::Error);
            }
        }
    }

    /// Run `code`; the run control is disabled for the duration and always
    /// re-enabled afterwards.
    pub async fn run(&mut self, code: &str) {
        let Ok(runtime) = self.session.runtime_mut() else {
            tracing::info!("run requested before the runtime was ready");
            self.page.append_output(Some(NOT_READY_NOTICE));
            return;
        };

        self.page.set_run_enabled(false);
        self.page.set_status(RunStatus::Running);
        tracing::debug!(bytes = code.len(), "executing");

        let outcome = runtime.execute(code, &mut self.page).await;
        match outcome {
            Ok(()) => {
                self.page.set_status(RunStatus::Done);
                self.refresh_variables().await;
            }
            Err(e) => {
                tracing::debug!(error = %e, "execution failed");
                self.page.append_output(Some(&e.to_string()));
                self.page.set_status(RunStatus::Error);
            }
        }

        self.page.set_run_enabled(true);
    }

    /// Re-render the variable pane. Failures only reach the log.
    pub async fn refresh_variables(&mut self) {
        let Ok(runtime) = self.session.runtime_mut() else {
            return;
        };
        match runtime.user_bindings().await {
            Ok(bindings) => self.page.show_variables(variables::render(&bindings)),
            Err(e) => tracing::warn!(error = %e, "variable inspection failed"),
        }
    }
}
