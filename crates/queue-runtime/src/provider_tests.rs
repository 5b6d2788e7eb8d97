//! Tests for provider types.

use super::*;

#[test]
fn test_provider_persistence() {
    assert!(!ProviderType::InMemory.persists_messages());
    assert!(ProviderType::Filesystem.persists_messages());
}

#[test]
fn test_provider_display() {
    assert_eq!(ProviderType::InMemory.to_string(), "in-memory");
    assert_eq!(ProviderType::Filesystem.to_string(), "filesystem");
}

#[test]
fn test_provider_config_type() {
    let config = ProviderConfig::Filesystem(FilesystemConfig::new("/tmp/spool"));
    assert_eq!(config.provider_type(), ProviderType::Filesystem);

    let config = ProviderConfig::InMemory(InMemoryConfig::default());
    assert_eq!(config.provider_type(), ProviderType::InMemory);
}

#[test]
fn test_in_memory_config_defaults() {
    let config = InMemoryConfig::default();
    assert_eq!(config.max_queue_size, 100_000);
}
