//! Capability traits implemented by queue providers.
//!
//! An importer only needs four things from a transport: check that a queue
//! exists, create it, open it for sending, and send. Everything else about the
//! transport stays behind these traits.

use crate::error::QueueError;
use crate::message::{Destination, MessageFormat, MessageId, OutboundMessage, QueueName};
use crate::provider::{ProviderConfig, ProviderType};
use crate::providers::{FilesystemProvider, InMemoryProvider};
use async_trait::async_trait;

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Administrative and connection operations of a queue provider
#[async_trait]
pub trait QueueProvider: Send + Sync {
    /// Check whether a queue exists
    async fn queue_exists(&self, queue: &QueueName) -> Result<bool, QueueError>;

    /// Create a queue
    async fn create_queue(&self, queue: &QueueName) -> Result<(), QueueError>;

    /// Open a destination for sending messages of the given format
    ///
    /// The base queue of `destination` must already exist.
    async fn open(
        &self,
        destination: &Destination,
        format: &MessageFormat,
    ) -> Result<Box<dyn QueueSender>, QueueError>;

    /// Get provider type
    fn provider_type(&self) -> ProviderType;
}

/// An open sending handle; dropping it releases the destination
#[async_trait]
pub trait QueueSender: Send + Sync {
    /// Send single message
    async fn send(&self, message: &OutboundMessage) -> Result<MessageId, QueueError>;

    /// Destination this handle was opened for
    fn destination(&self) -> &Destination;
}

/// Factory for creating providers from configuration
pub struct QueueProviderFactory;

impl QueueProviderFactory {
    /// Create provider from configuration
    pub async fn create_provider(
        config: ProviderConfig,
    ) -> Result<Box<dyn QueueProvider>, QueueError> {
        let provider: Box<dyn QueueProvider> = match config {
            ProviderConfig::InMemory(in_memory_config) => {
                Box::new(InMemoryProvider::new(in_memory_config))
            }
            ProviderConfig::Filesystem(filesystem_config) => {
                Box::new(FilesystemProvider::new(filesystem_config).await?)
            }
        };

        Ok(provider)
    }
}

/// Reject bodies the open format cannot carry
pub(crate) fn ensure_format_accepts(
    format: &MessageFormat,
    message: &OutboundMessage,
) -> Result<(), QueueError> {
    let kind = message.body.kind();
    if format.accepts(kind) {
        Ok(())
    } else {
        Err(crate::error::SerializationError::UnsupportedPayload {
            kind: kind.to_string(),
        }
        .into())
    }
}
