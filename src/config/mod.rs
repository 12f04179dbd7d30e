use std::{
    collections::HashMap,
    env,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::{BaseDirs, UserDirs};

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let config_path = default_config_path();
        let mut cfg = Self::load_from(&config_path);

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                cfg.inner.insert(k, v);
            }
        }

        cfg
    }

    /// Defaults overlaid with the rc file at `path`, without the environment.
    pub fn load_from(path: &Path) -> Self {
        let mut map = default_map();
        if let Ok(text) = fs::read_to_string(path) {
            parse_rc(&text, &mut map);
        }
        Self {
            inner: map,
            config_path: path.to_path_buf(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).filter(|v| !v.is_empty()).map(PathBuf::from)
    }

    pub fn python_program(&self) -> String {
        self.get("GLIDE_PYTHON").unwrap_or_else(|| "python3".into())
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.get_usize("GLIDE_LOAD_TIMEOUT").unwrap_or(30) as u64)
    }

    pub fn indent_unit(&self) -> usize {
        self.get_usize("GLIDE_INDENT_UNIT").filter(|n| *n > 0).unwrap_or(4)
    }

    pub fn storage_path(&self) -> PathBuf {
        self.get_path("GLIDE_STORAGE_PATH")
            .unwrap_or_else(|| data_dir().join("storage.json"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.get_path("GLIDE_LOG_PATH")
            .unwrap_or_else(|| data_dir().join("glide.log"))
    }

    pub fn snippets_path(&self) -> Option<PathBuf> {
        self.get_path("GLIDE_SNIPPETS_PATH")
    }

    pub fn download_dir(&self) -> PathBuf {
        self.get_path("GLIDE_DOWNLOAD_DIR")
            .or_else(|| UserDirs::new().and_then(|u| u.download_dir().map(Path::to_path_buf)))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Parse `KEY=VALUE` lines into `map`; blank lines and `#` comments are skipped.
fn parse_rc(text: &str, map: &mut HashMap<String, String>) {
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
}

fn is_config_key(k: &str) -> bool {
    k.starts_with("GLIDE_") && k != "GLIDE_LOG"
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("glide").join(".gliderc")
}

fn data_dir() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.data_dir().to_path_buf())
        .unwrap_or_else(env::temp_dir)
        .join("glide")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("GLIDE_PYTHON".into(), "python3".into());
    m.insert("GLIDE_LOAD_TIMEOUT".into(), "30".into());
    m.insert("GLIDE_INDENT_UNIT".into(), "4".into());
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rc_lines_override_defaults() {
        let mut map = default_map();
        parse_rc("# comment\n\nGLIDE_PYTHON = /opt/py/bin/python\nGLIDE_INDENT_UNIT=2\n", &mut map);
        assert_eq!(map["GLIDE_PYTHON"], "/opt/py/bin/python");
        assert_eq!(map["GLIDE_INDENT_UNIT"], "2");
        assert_eq!(map["GLIDE_LOAD_TIMEOUT"], "30");
    }

    #[test]
    fn missing_rc_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join(".gliderc"));
        assert_eq!(cfg.python_program(), "python3");
        assert_eq!(cfg.indent_unit(), 4);
        assert_eq!(cfg.load_timeout(), Duration::from_secs(30));
        assert!(cfg.snippets_path().is_none());
    }

    #[test]
    fn zero_indent_unit_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_from(&dir.path().join(".gliderc"));
        cfg.set("GLIDE_INDENT_UNIT", "0");
        assert_eq!(cfg.indent_unit(), 4);
    }

    #[test]
    fn only_glide_keys_are_taken_from_env() {
        assert!(is_config_key("GLIDE_PYTHON"));
        assert!(!is_config_key("GLIDE_LOG"));
        assert!(!is_config_key("PATH"));
    }
}
