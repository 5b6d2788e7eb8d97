//! In-memory queue provider implementation for testing and dry runs.
//!
//! This provider keeps every queue in process memory:
//! - Queues must be created before they can be opened
//! - Journal destinations append to the queue's journal list
//! - Sent messages can be inspected after the fact
//!
//! Nothing survives the process, which makes it suitable for unit tests and
//! for validating an import file without touching a real queue.

use crate::client::{ensure_format_accepts, QueueProvider, QueueSender};
use crate::error::QueueError;
use crate::message::{Destination, MessageFormat, MessageId, OutboundMessage, QueueName};
use crate::provider::{InMemoryConfig, ProviderType};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

// ============================================================================
// Internal Storage Structures
// ============================================================================

/// Thread-safe storage for all queues
struct QueueStorage {
    queues: HashMap<QueueName, InMemoryQueue>,
    opened: Vec<String>,
    config: InMemoryConfig,
}

impl QueueStorage {
    fn new(config: InMemoryConfig) -> Self {
        Self {
            queues: HashMap::new(),
            opened: Vec::new(),
            config,
        }
    }
}

/// Internal queue state for a single queue
#[derive(Default)]
struct InMemoryQueue {
    /// Primary delivery path (FIFO order)
    messages: Vec<OutboundMessage>,
    /// Journal view of the queue
    journal: Vec<OutboundMessage>,
}

impl InMemoryQueue {
    fn len(&self) -> usize {
        self.messages.len() + self.journal.len()
    }
}

// ============================================================================
// InMemoryProvider
// ============================================================================

/// In-memory queue provider implementation
///
/// Cloning shares the underlying storage.
#[derive(Clone)]
pub struct InMemoryProvider {
    storage: Arc<RwLock<QueueStorage>>,
}

impl InMemoryProvider {
    /// Create new in-memory provider with configuration
    pub fn new(config: InMemoryConfig) -> Self {
        Self {
            storage: Arc::new(RwLock::new(QueueStorage::new(config))),
        }
    }

    /// Messages delivered to the primary path of a queue, in send order
    pub fn messages(&self, queue: &QueueName) -> Vec<OutboundMessage> {
        self.collect(queue, |q| &q.messages)
    }

    /// Messages delivered to the journal view of a queue, in send order
    pub fn journal_messages(&self, queue: &QueueName) -> Vec<OutboundMessage> {
        self.collect(queue, |q| &q.journal)
    }

    /// Full identifiers passed to [`QueueProvider::open`], in call order
    pub fn opened_destinations(&self) -> Vec<String> {
        match self.storage.read() {
            Ok(storage) => storage.opened.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Names of all queues that exist
    pub fn queue_names(&self) -> Vec<QueueName> {
        match self.storage.read() {
            Ok(storage) => {
                let mut names: Vec<QueueName> = storage.queues.keys().cloned().collect();
                names.sort();
                names
            }
            Err(_) => Vec::new(),
        }
    }

    fn collect(
        &self,
        queue: &QueueName,
        select: impl Fn(&InMemoryQueue) -> &Vec<OutboundMessage>,
    ) -> Vec<OutboundMessage> {
        let Ok(storage) = self.storage.read() else {
            return Vec::new();
        };

        storage
            .queues
            .get(queue)
            .map(|q| select(q).clone())
            .unwrap_or_default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, QueueStorage>, QueueError> {
        read_storage(&self.storage)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, QueueStorage>, QueueError> {
        write_storage(&self.storage)
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new(InMemoryConfig::default())
    }
}

fn read_storage(
    storage: &RwLock<QueueStorage>,
) -> Result<RwLockReadGuard<'_, QueueStorage>, QueueError> {
    storage.read().map_err(|_| poisoned())
}

fn write_storage(
    storage: &RwLock<QueueStorage>,
) -> Result<RwLockWriteGuard<'_, QueueStorage>, QueueError> {
    storage.write().map_err(|_| poisoned())
}

fn poisoned() -> QueueError {
    QueueError::ProviderError {
        provider: ProviderType::InMemory.to_string(),
        code: "LockPoisoned".to_string(),
        message: "queue storage lock was poisoned".to_string(),
    }
}

#[async_trait]
impl QueueProvider for InMemoryProvider {
    async fn queue_exists(&self, queue: &QueueName) -> Result<bool, QueueError> {
        Ok(self.read()?.queues.contains_key(queue))
    }

    async fn create_queue(&self, queue: &QueueName) -> Result<(), QueueError> {
        let mut storage = self.write()?;
        if storage.queues.contains_key(queue) {
            return Err(QueueError::QueueAlreadyExists {
                queue_name: queue.to_string(),
            });
        }

        storage.queues.insert(queue.clone(), InMemoryQueue::default());
        Ok(())
    }

    async fn open(
        &self,
        destination: &Destination,
        format: &MessageFormat,
    ) -> Result<Box<dyn QueueSender>, QueueError> {
        let mut storage = self.write()?;
        if !storage.queues.contains_key(destination.queue()) {
            return Err(QueueError::QueueNotFound {
                queue_name: destination.queue().to_string(),
            });
        }

        storage.opened.push(destination.as_str().to_string());

        Ok(Box::new(InMemorySender {
            storage: Arc::clone(&self.storage),
            destination: destination.clone(),
            format: format.clone(),
        }))
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::InMemory
    }
}

// ============================================================================
// InMemorySender
// ============================================================================

/// Sending handle for an in-memory destination
struct InMemorySender {
    storage: Arc<RwLock<QueueStorage>>,
    destination: Destination,
    format: MessageFormat,
}

#[async_trait]
impl QueueSender for InMemorySender {
    async fn send(&self, message: &OutboundMessage) -> Result<MessageId, QueueError> {
        ensure_format_accepts(&self.format, message)?;

        let mut storage = write_storage(&self.storage)?;
        let max_queue_size = storage.config.max_queue_size;
        let queue = storage
            .queues
            .get_mut(self.destination.queue())
            .ok_or_else(|| QueueError::QueueNotFound {
                queue_name: self.destination.queue().to_string(),
            })?;

        if queue.len() >= max_queue_size {
            return Err(QueueError::ProviderError {
                provider: ProviderType::InMemory.to_string(),
                code: "QueueFull".to_string(),
                message: format!(
                    "queue '{}' holds the maximum of {} messages",
                    self.destination.queue(),
                    max_queue_size
                ),
            });
        }

        if self.destination.is_journal() {
            queue.journal.push(message.clone());
        } else {
            queue.messages.push(message.clone());
        }

        Ok(MessageId::new())
    }

    fn destination(&self) -> &Destination {
        &self.destination
    }
}
