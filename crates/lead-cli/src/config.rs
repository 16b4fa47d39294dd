//! Configuration loading: defaults, then the TOML file, then flags.

use std::fs;
use std::path::{Path, PathBuf};

use lead_dedup::DedupConfig;
use thiserror::Error;

use crate::cli::MatchArgs;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load a configuration file. Missing keys take their defaults.
pub fn load_file(path: &Path) -> ConfigResult<DedupConfig> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a configuration as TOML.
pub fn to_toml(config: &DedupConfig) -> ConfigResult<String> {
    Ok(toml::to_string(config)?)
}

impl MatchArgs {
    /// Resolve the effective configuration for these flags.
    pub fn resolve(&self) -> ConfigResult<DedupConfig> {
        let mut config = match &self.config {
            Some(path) => load_file(path)?,
            None => DedupConfig::default(),
        };
        if let Some(id) = &self.id_field {
            config.fields.id = id.clone();
        }
        if let Some(email) = &self.email_field {
            config.fields.email = email.clone();
        }
        if let Some(date) = &self.date_field {
            config.fields.entry_date = date.clone();
        }
        if self.normalize_email {
            config.normalize_email = true;
        }
        if let Some(undated) = self.undated {
            config.undated = undated.into();
        }
        Ok(config)
    }
}
