//! Worker task that owns the controller and serves UI requests in order.

use std::future::Future;

use tokio::sync::mpsc;

use super::ExecutionController;
use crate::execution::{Interpreter, RuntimeError};
use crate::page::Page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeRequest {
    Run { code: String },
    RefreshVariables,
}

/// Drive `load` to completion while already answering requests, so a run
/// issued during startup gets the not-ready notice instead of waiting.
/// Returns when the request channel closes.
pub async fn serve<I, P, F>(
    mut controller: ExecutionController<I, P>,
    load: F,
    mut requests: mpsc::UnboundedReceiver<RuntimeRequest>,
) -> ExecutionController<I, P>
where
    I: Interpreter,
    P: Page,
    F: Future<Output = Result<I, RuntimeError>>,
{
    let mut load = std::pin::pin!(load);
    let mut loading = true;

    loop {
        tokio::select! {
            loaded = &mut load, if loading => {
                loading = false;
                controller.finish_load(loaded);
            }
            request = requests.recv() => match request {
                Some(RuntimeRequest::Run { code }) => controller.run(&code).await,
                Some(RuntimeRequest::RefreshVariables) => controller.refresh_variables().await,
                None => break,
            },
        }
    }

    tracing::debug!("runtime worker stopped");
    controller
}
