//! Open/closed state of toolbox sections, persisted in local storage.

use std::collections::BTreeMap;

use anyhow::Result;

use super::Toolbox;
use crate::storage::LocalStorage;

/// Local-storage key holding the JSON object of section key → open.
pub const STORAGE_KEY: &str = "glide.toolbox.open";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolboxState {
    open: BTreeMap<String, bool>,
}

impl ToolboxState {
    /// Read the stored object and apply it to every keyed section.
    pub fn restore(toolbox: &mut Toolbox, storage: &LocalStorage) -> Self {
        let open: BTreeMap<String, bool> = match storage.get(STORAGE_KEY) {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring malformed toolbox state");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };

        for section in toolbox.sections_mut() {
            if let Some(stored) = section.key.as_ref().and_then(|k| open.get(k)) {
                section.open = *stored;
            }
        }

        Self { open }
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.open.get(key).copied()
    }

    /// Update one section and rewrite the whole stored object.
    pub fn record(&mut self, key: &str, open: bool, storage: &mut LocalStorage) -> Result<()> {
        self.open.insert(key.to_string(), open);
        storage.set(STORAGE_KEY, serde_json::to_string(&self.open)?)
    }
}

/// Toggle `section` and persist its new state if the section has a key.
pub fn toggle_section(
    toolbox: &mut Toolbox,
    state: &mut ToolboxState,
    storage: &mut LocalStorage,
    section: usize,
) -> Result<Option<bool>> {
    let Some(open) = toolbox.toggle(section) else {
        return Ok(None);
    };
    if let Some(key) = toolbox.sections()[section].key.clone() {
        state.record(&key, open, storage)?;
    }
    Ok(Some(open))
}
