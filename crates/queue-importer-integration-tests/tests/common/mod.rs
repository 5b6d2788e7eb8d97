//! Common test utilities for queue importer integration tests
//!
//! This module provides:
//! - A recording provider that captures every transport call in order
//! - Knobs for making existence checks, opens and individual sends fail
//! - Helpers for writing export files

use queue_importer_core::export_header;
use queue_runtime::{
    Destination, MessageFormat, MessageId, OutboundMessage, ProviderType, QueueError, QueueName,
    QueueProvider, QueueSender,
};
use std::collections::HashSet;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

// ============================================================================
// Recording Provider
// ============================================================================

/// A transport call observed by the recording provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    QueueExists(String),
    CreateQueue(String),
    Open(String),
    Send(String),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<ProviderCall>,
    sent: Vec<OutboundMessage>,
    existing: HashSet<String>,
    fail_exists: bool,
    fail_open: bool,
    failing_sends: HashSet<usize>,
    send_attempts: usize,
}

/// Provider double that records every call against it
#[derive(Clone, Default)]
pub struct RecordingProvider {
    recorder: Arc<Mutex<Recorder>>,
}

#[allow(dead_code)]
impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that already hosts `queue`
    pub fn with_queue(queue: &str) -> Self {
        let provider = Self::new();
        provider
            .recorder
            .lock()
            .unwrap()
            .existing
            .insert(queue.to_string());
        provider
    }

    pub fn fail_exists(&self) {
        self.recorder.lock().unwrap().fail_exists = true;
    }

    pub fn fail_open(&self) {
        self.recorder.lock().unwrap().fail_open = true;
    }

    /// Make the send with this zero-based attempt index fail
    pub fn fail_send(&self, attempt: usize) {
        self.recorder.lock().unwrap().failing_sends.insert(attempt);
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.recorder.lock().unwrap().calls.clone()
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.recorder.lock().unwrap().sent.clone()
    }

    pub fn send_attempts(&self) -> usize {
        self.recorder.lock().unwrap().send_attempts
    }

    pub fn created_queues(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::CreateQueue(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn opened(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::Open(name) => Some(name),
                _ => None,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl QueueProvider for RecordingProvider {
    async fn queue_exists(&self, queue: &QueueName) -> Result<bool, QueueError> {
        let mut recorder = self.recorder.lock().unwrap();
        recorder
            .calls
            .push(ProviderCall::QueueExists(queue.to_string()));

        if recorder.fail_exists {
            return Err(QueueError::PermissionDenied {
                operation: "queue_exists".to_string(),
            });
        }

        Ok(recorder.existing.contains(queue.as_str()))
    }

    async fn create_queue(&self, queue: &QueueName) -> Result<(), QueueError> {
        let mut recorder = self.recorder.lock().unwrap();
        recorder
            .calls
            .push(ProviderCall::CreateQueue(queue.to_string()));

        if !recorder.existing.insert(queue.to_string()) {
            return Err(QueueError::QueueAlreadyExists {
                queue_name: queue.to_string(),
            });
        }

        Ok(())
    }

    async fn open(
        &self,
        destination: &Destination,
        _format: &MessageFormat,
    ) -> Result<Box<dyn QueueSender>, QueueError> {
        let mut recorder = self.recorder.lock().unwrap();
        recorder
            .calls
            .push(ProviderCall::Open(destination.to_string()));

        if recorder.fail_open {
            return Err(QueueError::ConnectionFailed {
                message: "destination unreachable".to_string(),
            });
        }

        Ok(Box::new(RecordingSender {
            destination: destination.clone(),
            recorder: Arc::clone(&self.recorder),
        }))
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::InMemory
    }
}

struct RecordingSender {
    destination: Destination,
    recorder: Arc<Mutex<Recorder>>,
}

#[async_trait::async_trait]
impl QueueSender for RecordingSender {
    async fn send(&self, message: &OutboundMessage) -> Result<MessageId, QueueError> {
        let mut recorder = self.recorder.lock().unwrap();
        let attempt = recorder.send_attempts;
        recorder.send_attempts += 1;
        recorder
            .calls
            .push(ProviderCall::Send(self.destination.to_string()));

        if recorder.failing_sends.contains(&attempt) {
            return Err(QueueError::ConnectionFailed {
                message: format!("send {} refused", attempt),
            });
        }

        recorder.sent.push(message.clone());
        Ok(MessageId::new())
    }

    fn destination(&self) -> &Destination {
        &self.destination
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Write an export file: the exporter's header followed by `records`
#[allow(dead_code)]
pub fn export_file(records: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", export_header()).unwrap();
    for record in records {
        writeln!(file, "{}", record).unwrap();
    }
    file.flush().unwrap();
    file
}
