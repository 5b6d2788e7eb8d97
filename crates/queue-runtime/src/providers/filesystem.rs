//! # Filesystem Spool Provider
//!
//! Local filesystem implementation of [`QueueProvider`] for single-host use.
//!
//! Layout under the configured root:
//!
//! ```text
//! <root>/<url-encoded queue name>/messages/0000000001-<message id>.json
//! <root>/<url-encoded queue name>/journal/0000000001-<message id>.json
//! ```
//!
//! Each message is written to a temporary file and renamed into place so a
//! reader never observes a partially written message.

use crate::client::{ensure_format_accepts, QueueProvider, QueueSender};
use crate::error::QueueError;
use crate::message::{Destination, MessageFormat, MessageId, OutboundMessage, QueueName, Timestamp};
use crate::provider::{FilesystemConfig, ProviderType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

#[cfg(test)]
#[path = "filesystem_tests.rs"]
mod tests;

const PROVIDER: &str = "filesystem";
const MESSAGES_DIR: &str = "messages";
const JOURNAL_DIR: &str = "journal";

/// A message as persisted in the spool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpooledMessage {
    pub message_id: MessageId,
    pub destination: String,
    pub sent_at: Timestamp,
    pub message: OutboundMessage,
}

/// Filesystem-backed queue provider
#[derive(Debug, Clone)]
pub struct FilesystemProvider {
    root: PathBuf,
}

impl FilesystemProvider {
    /// Create new filesystem provider, creating the root directory if needed
    ///
    /// # Errors
    ///
    /// Returns error if the root cannot be created or accessed.
    pub async fn new(config: FilesystemConfig) -> Result<Self, QueueError> {
        fs::create_dir_all(&config.root)
            .await
            .map_err(|e| QueueError::from_io(PROVIDER, "create spool root", e))?;

        Ok(Self { root: config.root })
    }

    /// Root directory of the spool
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a queue
    pub fn queue_path(&self, queue: &QueueName) -> PathBuf {
        self.root.join(urlencoding::encode(queue.as_str()).as_ref())
    }

    /// Directory a destination delivers into
    pub fn delivery_path(&self, destination: &Destination) -> PathBuf {
        let view = if destination.is_journal() {
            JOURNAL_DIR
        } else {
            MESSAGES_DIR
        };
        self.queue_path(destination.queue()).join(view)
    }

    /// Read back every message delivered to a destination, in send order
    pub async fn read_messages(
        &self,
        destination: &Destination,
    ) -> Result<Vec<SpooledMessage>, QueueError> {
        let mut files = message_files(&self.delivery_path(destination)).await?;
        files.sort();

        let mut messages = Vec::with_capacity(files.len());
        for file in files {
            let content = fs::read_to_string(&file)
                .await
                .map_err(|e| QueueError::from_io(PROVIDER, "read message", e))?;
            let spooled: SpooledMessage = serde_json::from_str(&content)
                .map_err(|e| QueueError::SerializationError(e.into()))?;
            messages.push(spooled);
        }

        Ok(messages)
    }
}

/// List `.json` message files in a delivery directory
async fn message_files(dir: &Path) -> Result<Vec<PathBuf>, QueueError> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| QueueError::from_io(PROVIDER, "list messages", e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| QueueError::from_io(PROVIDER, "list messages", e))?
    {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }

    Ok(files)
}

#[async_trait]
impl QueueProvider for FilesystemProvider {
    async fn queue_exists(&self, queue: &QueueName) -> Result<bool, QueueError> {
        fs::try_exists(self.queue_path(queue))
            .await
            .map_err(|e| QueueError::from_io(PROVIDER, "check queue", e))
    }

    async fn create_queue(&self, queue: &QueueName) -> Result<(), QueueError> {
        let queue_path = self.queue_path(queue);
        if self.queue_exists(queue).await? {
            return Err(QueueError::QueueAlreadyExists {
                queue_name: queue.to_string(),
            });
        }

        for view in [MESSAGES_DIR, JOURNAL_DIR] {
            fs::create_dir_all(queue_path.join(view))
                .await
                .map_err(|e| QueueError::from_io(PROVIDER, "create queue", e))?;
        }

        debug!(queue = %queue, path = %queue_path.display(), "Created spool queue");
        Ok(())
    }

    async fn open(
        &self,
        destination: &Destination,
        format: &MessageFormat,
    ) -> Result<Box<dyn QueueSender>, QueueError> {
        if !self.queue_exists(destination.queue()).await? {
            return Err(QueueError::QueueNotFound {
                queue_name: destination.queue().to_string(),
            });
        }

        let directory = self.delivery_path(destination);
        fs::create_dir_all(&directory)
            .await
            .map_err(|e| QueueError::from_io(PROVIDER, "open queue", e))?;

        // Continue numbering after anything already spooled
        let existing = message_files(&directory).await?.len() as u64;

        Ok(Box::new(FilesystemSender {
            directory,
            destination: destination.clone(),
            format: format.clone(),
            sequence: AtomicU64::new(existing),
        }))
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Filesystem
    }
}

/// Sending handle writing into one delivery directory
struct FilesystemSender {
    directory: PathBuf,
    destination: Destination,
    format: MessageFormat,
    sequence: AtomicU64,
}

#[async_trait]
impl QueueSender for FilesystemSender {
    async fn send(&self, message: &OutboundMessage) -> Result<MessageId, QueueError> {
        ensure_format_accepts(&self.format, message)?;

        let message_id = MessageId::new();
        let spooled = SpooledMessage {
            message_id: message_id.clone(),
            destination: self.destination.as_str().to_string(),
            sent_at: Timestamp::now(),
            message: message.clone(),
        };

        let json = serde_json::to_string_pretty(&spooled)
            .map_err(|e| QueueError::SerializationError(e.into()))?;

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let file_path = self
            .directory
            .join(format!("{:010}-{}.json", sequence, message_id));

        // Write to temporary file first, then rename into place
        let temp_path = file_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| QueueError::from_io(PROVIDER, "send", e))?;

        file.write_all(json.as_bytes())
            .await
            .map_err(|e| QueueError::from_io(PROVIDER, "send", e))?;

        file.flush()
            .await
            .map_err(|e| QueueError::from_io(PROVIDER, "send", e))?;

        if message.durable == Some(true) {
            file.sync_all()
                .await
                .map_err(|e| QueueError::from_io(PROVIDER, "send", e))?;
        }
        drop(file);

        fs::rename(&temp_path, &file_path)
            .await
            .map_err(|e| QueueError::from_io(PROVIDER, "send", e))?;

        Ok(message_id)
    }

    fn destination(&self) -> &Destination {
        &self.destination
    }
}
