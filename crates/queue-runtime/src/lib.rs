//! # Queue Runtime
//!
//! Provider-agnostic queue transport used by the queue importer.
//!
//! This library provides:
//! - Validated queue names and journal-aware destinations
//! - The outbound message model (body, label, priority, delivery flags)
//! - Capability traits for provisioning queues and sending messages
//! - In-memory and filesystem spool providers
//!
//! ## Module Organization
//!
//! - [error] - Error types for all queue operations
//! - [message] - Message structures and identifiers
//! - [provider] - Provider types and configuration
//! - [client] - Capability traits and the provider factory
//! - [providers] - Concrete providers

// Module declarations
pub mod client;
pub mod error;
pub mod message;
pub mod provider;
pub mod providers;

// Re-export commonly used types at crate root for convenience
pub use client::{QueueProvider, QueueProviderFactory, QueueSender};
pub use error::{QueueError, SerializationError, ValidationError};
pub use message::{
    Destination, MessageBody, MessageFormat, MessageId, OutboundMessage, PayloadKind, Priority,
    QueueName, Timestamp,
};
pub use provider::{FilesystemConfig, InMemoryConfig, ProviderConfig, ProviderType};
pub use providers::{FilesystemProvider, InMemoryProvider, SpooledMessage};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
