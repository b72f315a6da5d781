use pinset_schema::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_LOCK_NAME: &str = "pinset.lock";

/// User defaults, read from `~/.config/pinset/config.json` or `--config`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Output format for `resolve` when `--format` is not given.
    #[serde(default)]
    pub format: OutputFormat,
    /// File name of the lock written next to the manifest.
    #[serde(default = "default_lock_name")]
    pub lock_name: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            lock_name: default_lock_name(),
        }
    }
}

fn default_lock_name() -> String {
    DEFAULT_LOCK_NAME.to_owned()
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| format!("invalid config {}: {e}", path.display()))?;
        if config.lock_name.trim().is_empty() || config.lock_name.contains('/') {
            return Err(format!(
                "invalid config {}: lock_name must be a plain file name",
                path.display()
            ));
        }
        Ok(config)
    }

    /// An explicit path must exist; the default path is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, String> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/pinset/config.json"))
}
