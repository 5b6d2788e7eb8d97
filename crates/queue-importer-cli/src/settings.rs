//! Importer configuration.
//!
//! Sources, applied in order (later sources override earlier ones):
//!  1. Built-in defaults
//!  2. A TOML file given by `--config` or `QUEUE_IMPORTER_CONFIG`
//!  3. Environment variables prefixed `QI__` (double-underscore separator),
//!     e.g. `QI__IMPORT__PROGRESS_INTERVAL=500`
//!  4. Command-line flags
//!
//! Every field carries a serde default, so an absent file or an unconfigured
//! environment yields a usable configuration.

use queue_importer_core::DEFAULT_LABEL;
use queue_runtime::{Destination, FilesystemConfig, InMemoryConfig, ProviderConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "QI";

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Complete importer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Where messages are delivered
    pub provider: ProviderSettings,

    /// Import behaviour
    pub import: ImportSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ImporterConfig {
    /// Reject values the importer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.import.progress_interval == 0 {
            return Err(ConfigError::Invalid {
                key: "import.progress_interval".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.import.journal_marker.is_empty() {
            return Err(ConfigError::Invalid {
                key: "import.journal_marker".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.provider.kind == ProviderKind::Filesystem && self.provider.spool_dir.is_none() {
            return Err(ConfigError::Invalid {
                key: "provider.spool_dir".to_string(),
                message: "required for the filesystem provider".to_string(),
            });
        }

        Ok(())
    }

    /// Render the resolved configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Supported delivery backends
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Keep messages in memory only (dry run)
    Memory,
    /// Spool messages to a local directory
    Filesystem,
}

/// Provider selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub spool_dir: Option<PathBuf>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Filesystem,
            spool_dir: Some(default_spool_dir()),
        }
    }
}

impl ProviderSettings {
    /// Translate into the runtime's provider configuration
    pub fn to_provider_config(&self) -> Result<ProviderConfig, ConfigError> {
        match self.kind {
            ProviderKind::Memory => Ok(ProviderConfig::InMemory(InMemoryConfig::default())),
            ProviderKind::Filesystem => {
                let root = self.spool_dir.clone().ok_or_else(|| ConfigError::Invalid {
                    key: "provider.spool_dir".to_string(),
                    message: "required for the filesystem provider".to_string(),
                })?;
                Ok(ProviderConfig::Filesystem(FilesystemConfig::new(root)))
            }
        }
    }
}

/// Default spool location under the user's local data directory
pub fn default_spool_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("queue-importer").join("spool"))
        .unwrap_or_else(|| PathBuf::from("spool"))
}

/// Import behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Log progress after this many successful sends
    pub progress_interval: usize,

    /// Label for records with an empty label column
    pub default_label: String,

    /// Destination suffix selecting the journal view
    pub journal_marker: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            progress_interval: 100,
            default_label: DEFAULT_LABEL.to_string(),
            journal_marker: Destination::JOURNAL_MARKER.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Load configuration from an optional file and the environment
pub fn load_configuration(config_path: Option<&Path>) -> Result<ImporterConfig, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = config_path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        builder = builder.add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(true),
        );
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
