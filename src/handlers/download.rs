//! Save the editor contents as a `.py` file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

pub const DEFAULT_FILE_NAME: &str = "glide_code.py";
pub const ATTRIBUTION: &str = "# Created with Glide";

/// File name from prompt input: blank falls back to the default, only the
/// last path component is kept and `.py` is appended unless present.
pub fn file_name(input: &str) -> String {
    let trimmed = input.trim();
    let base = Path::new(trimmed)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME);

    if base.to_ascii_lowercase().ends_with(".py") {
        base.to_string()
    } else {
        format!("{base}.py")
    }
}

/// Code with exactly one trailing newline, followed by the attribution
/// comment unless the code already carries it.
pub fn file_contents(code: &str) -> String {
    let body = code.trim_end_matches(['\n', '\r']);
    let mut out = String::with_capacity(body.len() + ATTRIBUTION.len() + 1);
    out.push_str(body);
    if !body.is_empty() {
        out.push('\n');
    }
    if !code.contains(ATTRIBUTION) {
        out.push_str(ATTRIBUTION);
    }
    out
}

/// Write `code` into `dir` under the name derived from `input`.
pub fn save(dir: &Path, input: &str, code: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating download directory {}", dir.display()))?;
    let path = dir.join(file_name(input));
    fs::write(&path, file_contents(code))
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "code downloaded");
    Ok(path)
}
