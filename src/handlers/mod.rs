//! User commands and the handlers that apply them to the app state.

pub mod download;
pub mod snippet;

/// Everything a key binding can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Run,
    ClearOutput,
    Download,
    Step,
    RunToEnd,
    Stop,
    /// Toggle the toolbox section at this index.
    ToggleSection(usize),
    /// Insert snippet `.1` of section `.0`.
    InsertSnippet(usize, usize),
}
