//! Message types for queue operations including core domain identifiers.

use crate::error::ValidationError;
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

// ============================================================================
// Core Domain Identifiers
// ============================================================================

/// Validated queue name
///
/// Queue names are opaque to the runtime: path-like names such as
/// `.\private$\orders` are accepted as-is and case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueueName(String);

impl QueueName {
    /// Create new queue name with validation
    pub fn new(name: String) -> Result<Self, ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::Required {
                field: "queue_name".to_string(),
            });
        }

        if name.chars().count() > 260 {
            return Err(ValidationError::OutOfRange {
                field: "queue_name".to_string(),
                message: "must be 1-260 characters".to_string(),
            });
        }

        if name.chars().any(|c| c.is_control()) {
            return Err(ValidationError::InvalidFormat {
                field: "queue_name".to_string(),
                message: "control characters are not allowed".to_string(),
            });
        }

        if name == "." || name == ".." {
            return Err(ValidationError::InvalidFormat {
                field: "queue_name".to_string(),
                message: "'.' and '..' are reserved".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get queue name as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QueueName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// An operator-supplied delivery target
///
/// The identifier may end with a journal marker (`;journal` by default,
/// matched case-insensitively). The marker selects the journal view of an
/// existing queue: [`Destination::queue`] is the queue that must exist, while
/// [`Destination::as_str`] is what gets opened for sending.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    identifier: String,
    queue: QueueName,
    journal: bool,
}

impl Destination {
    /// Default journal marker suffix
    pub const JOURNAL_MARKER: &'static str = ";journal";

    /// Parse a destination using the default journal marker
    pub fn new(identifier: &str) -> Result<Self, ValidationError> {
        Self::with_journal_marker(identifier, Self::JOURNAL_MARKER)
    }

    /// Parse a destination using a custom journal marker
    pub fn with_journal_marker(identifier: &str, marker: &str) -> Result<Self, ValidationError> {
        if identifier.is_empty() {
            return Err(ValidationError::Required {
                field: "destination".to_string(),
            });
        }

        let (base, journal) = match strip_suffix_ignore_case(identifier, marker) {
            Some(base) => (base, true),
            None => (identifier, false),
        };

        if base.is_empty() {
            return Err(ValidationError::InvalidFormat {
                field: "destination".to_string(),
                message: format!("'{}' names no queue before the journal marker", identifier),
            });
        }

        Ok(Self {
            identifier: identifier.to_string(),
            queue: QueueName::new(base.to_string())?,
            journal,
        })
    }

    /// Full identifier as supplied, journal marker included
    pub fn as_str(&self) -> &str {
        &self.identifier
    }

    /// Base queue with the journal marker stripped
    pub fn queue(&self) -> &QueueName {
        &self.queue
    }

    /// Whether the identifier selects the journal view
    pub fn is_journal(&self) -> bool {
        self.journal
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier)
    }
}

impl FromStr for Destination {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() || value.len() < suffix.len() {
        return None;
    }

    let split = value.len() - suffix.len();
    if !value.is_char_boundary(split) {
        return None;
    }

    value[split..]
        .eq_ignore_ascii_case(suffix)
        .then(|| &value[..split])
}

/// Unique identifier assigned to a message by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Generate new random message ID
    pub fn new() -> Self {
        let id = uuid::Uuid::new_v4();
        Self(id.to_string())
    }

    /// Get message ID as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "message_id".to_string(),
            });
        }

        Ok(Self(s.to_string()))
    }
}

/// Timestamp wrapper for consistent time handling
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create timestamp for current time
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

// ============================================================================
// Message Attributes
// ============================================================================

/// Delivery priority, always within [`Priority::MIN`]..=[`Priority::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 7;

    /// Create a priority, saturating out-of-range values
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Get the numeric priority
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for Priority {
    fn from(value: u8) -> Self {
        Self::clamped(value as i64)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of payload a message body can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    String,
    Bytes,
    Object,
    Integer,
    Timestamp,
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Object => "object",
            Self::Integer => "integer",
            Self::Timestamp => "timestamp",
        };
        write!(f, "{}", name)
    }
}

/// Set of payload kinds an open sender accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFormat {
    kinds: BTreeSet<PayloadKind>,
}

impl MessageFormat {
    /// Create a format accepting exactly the given kinds
    pub fn new(kinds: impl IntoIterator<Item = PayloadKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Format used for bulk imports: every payload kind an export may contain
    pub fn importer() -> Self {
        Self::new([
            PayloadKind::String,
            PayloadKind::Bytes,
            PayloadKind::Object,
            PayloadKind::Integer,
            PayloadKind::Timestamp,
        ])
    }

    /// Check whether a payload kind can be carried
    pub fn accepts(&self, kind: PayloadKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Accepted kinds in stable order
    pub fn kinds(&self) -> impl Iterator<Item = PayloadKind> + '_ {
        self.kinds.iter().copied()
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Message payload
///
/// Serialized as `{"kind": "bytes" | "text", "data": ...}` with bytes
/// base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BodyRepr", try_from = "BodyRepr")]
pub enum MessageBody {
    /// Raw bytes, delivered without content-type interpretation
    Bytes(Bytes),
    /// Textual payload
    Text(String),
}

impl MessageBody {
    /// Payload kind of this body
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Bytes(_) => PayloadKind::Bytes,
            Self::Text(_) => PayloadKind::String,
        }
    }

    /// Body size in bytes
    pub fn len(&self) -> usize {
        match self {
            Self::Bytes(bytes) => bytes.len(),
            Self::Text(text) => text.len(),
        }
    }

    /// Check if body is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wire form of [`MessageBody`]
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
enum BodyRepr {
    Bytes(String),
    Text(String),
}

impl From<MessageBody> for BodyRepr {
    fn from(body: MessageBody) -> Self {
        match body {
            MessageBody::Bytes(bytes) => Self::Bytes(general_purpose::STANDARD.encode(&bytes)),
            MessageBody::Text(text) => Self::Text(text),
        }
    }
}

impl TryFrom<BodyRepr> for MessageBody {
    type Error = base64::DecodeError;

    fn try_from(repr: BodyRepr) -> Result<Self, Self::Error> {
        match repr {
            BodyRepr::Bytes(encoded) => Ok(Self::Bytes(Bytes::from(
                general_purpose::STANDARD.decode(encoded)?,
            ))),
            BodyRepr::Text(text) => Ok(Self::Text(text)),
        }
    }
}

/// A message to be sent to a queue
///
/// Optional attributes left as `None` take the provider's default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub body: MessageBody,
    pub label: String,
    pub priority: Option<Priority>,
    pub durable: Option<bool>,
    pub app_specific: Option<i32>,
    pub use_journal: Option<bool>,
    pub use_dead_letter: Option<bool>,
}

impl OutboundMessage {
    /// Create new message with body and label
    pub fn new(body: MessageBody, label: impl Into<String>) -> Self {
        Self {
            body,
            label: label.into(),
            priority: None,
            durable: None,
            app_specific: None,
            use_journal: None,
            use_dead_letter: None,
        }
    }

    /// Set delivery priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set durable (recoverable) delivery
    pub fn with_durable(mut self, durable: bool) -> Self {
        self.durable = Some(durable);
        self
    }

    /// Set application-specific tag
    pub fn with_app_specific(mut self, tag: i32) -> Self {
        self.app_specific = Some(tag);
        self
    }

    /// Request a journal copy on delivery
    pub fn with_use_journal(mut self, use_journal: bool) -> Self {
        self.use_journal = Some(use_journal);
        self
    }

    /// Request dead-letter routing on delivery failure
    pub fn with_use_dead_letter(mut self, use_dead_letter: bool) -> Self {
        self.use_dead_letter = Some(use_dead_letter);
        self
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
