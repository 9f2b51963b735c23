use anyhow::{Context, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_FILE: &str = "config.toml";
pub(crate) const DATA_DIR_ENV: &str = "MONTHSPEND_DATA_DIR";

/// User settings from `config.toml`. Every field is optional.
///
/// ```toml
/// currency_symbol = "€"
/// data_dir = "/home/me/sync/monthspend"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) currency_symbol: String,
    pub(crate) data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Where the database and log live. The environment variable wins over
    /// the config file, which wins over the platform default.
    pub(crate) fn resolve_data_dir(&self, env: Option<OsString>, default: &Path) -> PathBuf {
        if let Some(dir) = env.filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }
        self.data_dir
            .clone()
            .unwrap_or_else(|| default.to_path_buf())
    }
}
