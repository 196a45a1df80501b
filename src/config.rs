use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::draft::DRAFT_FILE;
use crate::error::{NotehubError, Result};

pub const NOTEHUB_DIR: &str = ".notehub";
pub const CONFIG_FILE: &str = "config.yaml";

pub const ENV_BASE_URL: &str = "NOTEHUB_BASE_URL";
pub const ENV_TOKEN: &str = "NOTEHUB_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "NOTEHUB_TIMEOUT_SECS";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Notes API root, e.g. "http://localhost:3000/api"
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// HTTP request timeout
    pub timeout_secs: u64,
    /// Where the pending draft is stored (defaults to .notehub/draft.json)
    pub draft_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            token: None,
            timeout_secs: 30,
            draft_path: None,
        }
    }
}

impl Config {
    /// Load `.notehub/config.yaml` under `root` if present, then apply
    /// environment overrides.
    pub fn load(root: &Path) -> Result<Self> {
        let mut config = Self::from_file(&root.join(NOTEHUB_DIR).join(CONFIG_FILE))?;
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Read a YAML config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "loading config");
        let text = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Override fields from `lookup` (the process environment in `load`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                NotehubError::Config(format!(
                    "{} must be a number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
        }
        Ok(())
    }

    /// Draft file location, relative paths resolved against `root`.
    pub fn resolve_draft_path(&self, root: &Path) -> PathBuf {
        match &self.draft_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => root.join(NOTEHUB_DIR).join(DRAFT_FILE),
        }
    }
}

/// Find the project root by looking for .notehub/ or .git/
pub fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(NOTEHUB_DIR).exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:3000/api");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::from_file(&tmp.path().join("nope.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(NOTEHUB_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(CONFIG_FILE),
            "base_url: https://notes.example.com/api\ntoken: abc\n",
        )
        .unwrap();

        let config = Config::from_file(&dir.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.base_url, "https://notes.example.com/api");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://127.0.0.1:9999"),
            (ENV_TOKEN, ""),
            (ENV_TIMEOUT_SECS, "5"),
        ]
        .into_iter()
        .collect();

        let mut config = Config {
            token: Some("from-file".to_string()),
            ..Config::default()
        };
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert!(config.token.is_none());
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_bad_timeout_is_config_error() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(NotehubError::Config(_))));
    }

    #[test]
    fn test_resolve_draft_path() {
        let root = Path::new("/work/project");
        assert_eq!(
            Config::default().resolve_draft_path(root),
            root.join(".notehub/draft.json")
        );

        let config = Config {
            draft_path: Some(PathBuf::from("drafts/note.json")),
            ..Config::default()
        };
        assert_eq!(config.resolve_draft_path(root), root.join("drafts/note.json"));
    }
}
