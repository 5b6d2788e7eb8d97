//! Provider types and configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Enumeration of supported queue providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    InMemory,
    Filesystem,
}

impl ProviderType {
    /// Check if messages survive the process that sent them
    pub fn persists_messages(&self) -> bool {
        match self {
            Self::InMemory => false,
            Self::Filesystem => true,
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InMemory => write!(f, "in-memory"),
            Self::Filesystem => write!(f, "filesystem"),
        }
    }
}

/// Provider-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProviderConfig {
    InMemory(InMemoryConfig),
    Filesystem(FilesystemConfig),
}

impl ProviderConfig {
    /// Provider type selected by this configuration
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::InMemory(_) => ProviderType::InMemory,
            Self::Filesystem(_) => ProviderType::Filesystem,
        }
    }
}

/// In-memory provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryConfig {
    /// Maximum number of messages a single queue holds before rejecting sends
    pub max_queue_size: usize,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            max_queue_size: 100_000,
        }
    }
}

/// Filesystem spool provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesystemConfig {
    /// Root directory holding one sub-directory per queue
    pub root: PathBuf,
}

impl FilesystemConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
