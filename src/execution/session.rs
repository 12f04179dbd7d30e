//! Runtime session: the single interpreter handle and its readiness.

use super::{Interpreter, RuntimeError, RuntimeLoader};

/// Owns the interpreter once it is fully loaded.
///
/// The session is ready only after both the load and the input-hook step
/// succeeded; a failed load leaves it permanently not ready.
pub struct RuntimeSession<I> {
    runtime: Option<I>,
}

impl<I: Interpreter> RuntimeSession<I> {
    pub fn new() -> Self {
        Self { runtime: None }
    }

    pub fn is_ready(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn attach(&mut self, runtime: I) {
        self.runtime = Some(runtime);
    }

    pub fn runtime_mut(&mut self) -> Result<&mut I, RuntimeError> {
        self.runtime.as_mut().ok_or(RuntimeError::NotReady)
    }
}

impl<I: Interpreter> Default for RuntimeSession<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a runtime and install its input hook.
pub async fn load_runtime<L: RuntimeLoader>(loader: L) -> Result<L::Runtime, RuntimeError> {
    let mut runtime = loader.load().await?;
    runtime.install_input_hook().await?;
    Ok(runtime)
}
