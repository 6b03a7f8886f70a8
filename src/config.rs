use crate::filter::Placeholders;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Free-form label for the loaded profile.
    pub profile_name: String,
    /// Directory holding the filter definition files.
    pub filter_dir: PathBuf,
    /// Extra placeholder expansions layered over the built-in `<HOST>`
    /// token. Keys are bare token names, e.g. `USER = '\S+'` makes
    /// `<USER>` available in fragments.
    pub placeholders: BTreeMap<String, String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            profile_name: "base".to_string(),
            filter_dir: PathBuf::from("fail2ban/filter.d"),
            placeholders: BTreeMap::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Build the placeholder table for this profile: the built-in tokens
    /// plus the configured extras.
    pub fn placeholders(&self) -> Placeholders {
        let mut placeholders = Placeholders::default();
        for (name, pattern) in &self.placeholders {
            placeholders.insert(format!("<{name}>"), pattern.clone());
        }
        placeholders
    }
}

pub fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<AnalyzerConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<AnalyzerConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static AnalyzerConfig {
    static DEFAULT_CONFIG: LazyLock<AnalyzerConfig> = LazyLock::new(AnalyzerConfig::default);
    &DEFAULT_CONFIG
}
