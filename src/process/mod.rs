//! Interpreter process management (startup/IO).

use tokio::process::{Child, ChildStdin, ChildStdout};

pub mod python;

pub struct ProcessHandle {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
}
