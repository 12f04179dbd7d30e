//! Execution engine: the interpreter seam, its errors and the bindings snapshot.

use async_trait::async_trait;
use thiserror::Error;

use crate::page::Page;

pub mod protocol;
pub mod python;
pub mod session;

pub use session::{load_runtime, RuntimeSession};

/// User-defined global bindings as `(name, repr)` in namespace iteration order.
pub type Bindings = Vec<(String, String)>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to load Python runtime: {0}")]
    Load(String),
    #[error("Python runtime I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Python runtime exited unexpectedly")]
    Exited,
    #[error("malformed message from Python runtime: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected message from Python runtime: {0}")]
    Protocol(String),
    /// An exception raised by user code; the message is the formatted traceback.
    #[error("{0}")]
    Python(String),
    #[error("Python runtime is not ready yet.")]
    NotReady,
}

/// A loaded interpreter the controller can run code against.
#[async_trait]
pub trait Interpreter: Send {
    /// Replace the language's `input()` with a prompt routed through
    /// [`Page::request_input`]; a dismissed prompt raises an interrupt.
    async fn install_input_hook(&mut self) -> Result<(), RuntimeError>;

    /// Run `code` in the global namespace, forwarding output lines to `page`.
    async fn execute(&mut self, code: &str, page: &mut dyn Page) -> Result<(), RuntimeError>;

    /// Global bindings minus `__dunder__` names and anything also in builtins.
    async fn user_bindings(&mut self) -> Result<Bindings, RuntimeError>;

    /// Language version reported at load, if known.
    fn version(&self) -> Option<&str> {
        None
    }
}

/// Produces an [`Interpreter`]; called once at startup.
#[async_trait]
pub trait RuntimeLoader: Send {
    type Runtime: Interpreter;

    async fn load(self) -> Result<Self::Runtime, RuntimeError>;
}
