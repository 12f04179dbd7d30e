//! CPython child process speaking the line protocol in [`super::protocol`].

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout};

use super::protocol::{Event, Request};
use super::{Bindings, Interpreter, RuntimeError, RuntimeLoader};
use crate::page::Page;
use crate::process::{python::start_python, ProcessHandle};

const BOOTSTRAP: &str = include_str!("bootstrap.py");

/// Starts a [`PythonRuntime`] from the configured interpreter program.
#[derive(Debug, Clone)]
pub struct PythonLoader {
    pub program: String,
    pub timeout: Duration,
}

#[async_trait]
impl RuntimeLoader for PythonLoader {
    type Runtime = PythonRuntime;

    async fn load(self) -> Result<PythonRuntime, RuntimeError> {
        PythonRuntime::start(&self.program, self.timeout).await
    }
}

pub struct PythonRuntime {
    // Held so the process is killed when the runtime is dropped.
    _child: Child,
    stdin: ChildStdin,
    events: Lines<BufReader<ChildStdout>>,
    version: String,
}

impl PythonRuntime {
    pub async fn start(program: &str, timeout: Duration) -> Result<Self, RuntimeError> {
        let ProcessHandle {
            child,
            stdin,
            stdout,
        } = start_python(program, BOOTSTRAP)
            .map_err(|e| RuntimeError::Load(format!("could not start `{program}`: {e}")))?;

        let mut runtime = Self {
            _child: child,
            stdin,
            events: BufReader::new(stdout).lines(),
            version: String::new(),
        };

        let first = tokio::time::timeout(timeout, runtime.next_event())
            .await
            .map_err(|_| {
                RuntimeError::Load(format!("`{program}` did not start within {}s", timeout.as_secs()))
            })?;
        match first {
            Ok(Event::Ready { version }) => {
                tracing::info!(program, %version, "python runtime ready");
                runtime.version = version;
                Ok(runtime)
            }
            Ok(other) => Err(RuntimeError::Protocol(format!("expected ready, got {other:?}"))),
            Err(RuntimeError::Exited) => Err(RuntimeError::Load(format!(
                "`{program}` exited during startup (is it a Python 3 interpreter?)"
            ))),
            Err(e) => Err(e),
        }
    }

    async fn send(&mut self, request: &Request<'_>) -> Result<(), RuntimeError> {
        let line = request.to_line()?;
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Next protocol event; lines that are not events are skipped.
    async fn next_event(&mut self) -> Result<Event, RuntimeError> {
        loop {
            let Some(line) = self.events.next_line().await? else {
                return Err(RuntimeError::Exited);
            };
            if let Some(event) = Event::decode_line(&line) {
                return Ok(event);
            }
        }
    }

    /// Discard events up to the end of the current run.
    async fn finish_run(&mut self) -> Result<(), RuntimeError> {
        loop {
            match self.next_event().await? {
                Event::Done | Event::Error { .. } => return Ok(()),
                Event::Input { .. } => self.send(&Request::InputReply { value: None }).await?,
                other => tracing::debug!(?other, "discarding event"),
            }
        }
    }
}

#[async_trait]
impl Interpreter for PythonRuntime {
    async fn install_input_hook(&mut self) -> Result<(), RuntimeError> {
        self.send(&Request::PatchInput).await?;
        match self.next_event().await? {
            Event::Patched => Ok(()),
            Event::Error { message } => Err(RuntimeError::Load(message)),
            other => Err(RuntimeError::Protocol(format!("expected patched, got {other:?}"))),
        }
    }

    /// e.g. `3.12.1`
    fn version(&self) -> Option<&str> {
        Some(&self.version)
    }

    async fn execute(&mut self, code: &str, page: &mut dyn Page) -> Result<(), RuntimeError> {
        self.send(&Request::Exec { code }).await?;
        loop {
            match self.next_event().await? {
                Event::Stream { stream, text } => {
                    tracing::trace!(?stream, %text, "output");
                    page.append_output(Some(&format!("{text}\n")));
                }
                Event::Input { prompt } => {
                    let answer = page.request_input(&prompt).await.unwrap_or(None);
                    if answer.is_none() {
                        tracing::debug!("input prompt dismissed");
                    }
                    self.send(&Request::InputReply {
                        value: answer.as_deref(),
                    })
                    .await?;
                }
                Event::Done => return Ok(()),
                Event::Error { message } => return Err(RuntimeError::Python(message)),
                other => {
                    self.finish_run().await?;
                    return Err(RuntimeError::Protocol(format!(
                        "{other:?} while executing"
                    )));
                }
            }
        }
    }

    async fn user_bindings(&mut self) -> Result<Bindings, RuntimeError> {
        self.send(&Request::Bindings).await?;
        loop {
            match self.next_event().await? {
                Event::Bindings { items } => return Ok(items),
                Event::Error { message } => return Err(RuntimeError::Python(message)),
                // Late output from a finished run's background writers.
                Event::Stream { text, .. } => tracing::debug!(%text, "output after run ended"),
                other => {
                    return Err(RuntimeError::Protocol(format!("expected bindings, got {other:?}")))
                }
            }
        }
    }
}
