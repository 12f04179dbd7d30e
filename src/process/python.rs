//! Python interpreter process bootstrap and I/O glue.

use std::io;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

use super::ProcessHandle;

/// Spawn `program` running `bootstrap` with piped stdio.
///
/// The child's own stderr is drained into the debug log; anything the
/// bootstrap wants the host to see must go through stdout.
pub fn start_python(program: &str, bootstrap: &str) -> io::Result<ProcessHandle> {
    let mut cmd = Command::new(program);
    cmd.arg("-u") // unbuffered
        .arg("-c")
        .arg(bootstrap)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child: Child = cmd.spawn()?;
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "no stdin"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "no stdout"))?;

    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::debug!(target: "glide::python", "{line}");
            }
        });
    }

    tracing::debug!(program, pid = child.id(), "python process started");

    Ok(ProcessHandle {
        child,
        stdin,
        stdout,
    })
}
