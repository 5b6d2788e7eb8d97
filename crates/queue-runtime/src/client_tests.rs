//! Tests for provider factory and the shared format check.

use super::*;
use crate::message::{MessageBody, PayloadKind};
use crate::provider::{FilesystemConfig, InMemoryConfig};

#[tokio::test]
async fn test_factory_creates_in_memory_provider() {
    let provider = QueueProviderFactory::create_provider(ProviderConfig::InMemory(
        InMemoryConfig::default(),
    ))
    .await
    .expect("in-memory provider should always be created");

    assert_eq!(provider.provider_type(), ProviderType::InMemory);
}

#[tokio::test]
async fn test_factory_creates_filesystem_provider() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let root = temp_dir.path().join("spool");

    let provider = QueueProviderFactory::create_provider(ProviderConfig::Filesystem(
        FilesystemConfig::new(&root),
    ))
    .await
    .expect("filesystem provider should be created");

    assert_eq!(provider.provider_type(), ProviderType::Filesystem);
    assert!(root.exists());
}

#[test]
fn test_format_check_rejects_unaccepted_kind() {
    let format = MessageFormat::new([PayloadKind::Bytes]);
    let message = OutboundMessage::new(MessageBody::Text("text".to_string()), "label");

    let result = ensure_format_accepts(&format, &message);
    assert!(matches!(
        result,
        Err(QueueError::SerializationError(
            crate::error::SerializationError::UnsupportedPayload { .. }
        ))
    ));
}

#[test]
fn test_format_check_accepts_importer_format() {
    let message = OutboundMessage::new(MessageBody::Text(String::new()), "label");
    assert!(ensure_format_accepts(&MessageFormat::importer(), &message).is_ok());
}
