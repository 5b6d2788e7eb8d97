//! Mapping parsed records onto outbound messages.

use crate::record::RawRecord;
use crate::schema::{Column, MIN_FIELDS};
use bytes::Bytes;
use queue_runtime::{MessageBody, OutboundMessage, Priority};
use std::num::IntErrorKind;

/// Label given to messages whose record carries none
pub const DEFAULT_LABEL: &str = "Imported Message";

/// Converts records into messages, one attribute per consumed column
///
/// Attributes whose column is absent, empty or unparsable are left unset so
/// the provider applies its own default. Priority is saturated into range
/// rather than rejected.
#[derive(Debug, Clone)]
pub struct MessageMapper {
    default_label: String,
}

impl MessageMapper {
    pub fn new(default_label: impl Into<String>) -> Self {
        Self {
            default_label: default_label.into(),
        }
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Build the message a record describes
    ///
    /// Returns `None` when the record is too short to contain a body.
    pub fn map(&self, record: &RawRecord) -> Option<OutboundMessage> {
        if record.len() < MIN_FIELDS {
            return None;
        }

        let body = match record.field(Column::Body).unwrap_or_default() {
            "" => MessageBody::Text(String::new()),
            text => MessageBody::Bytes(Bytes::copy_from_slice(text.as_bytes())),
        };

        let label = match record.field(Column::Label) {
            Some(label) if !label.is_empty() => label,
            _ => self.default_label.as_str(),
        };

        let mut message = OutboundMessage::new(body, label);

        if let Some(priority) = record.field(Column::Priority).and_then(parse_priority) {
            message = message.with_priority(Priority::clamped(priority));
        }
        if let Some(durable) = flag_field(record, Column::Durable) {
            message = message.with_durable(durable);
        }
        if let Some(tag) = integer_field::<i32>(record, Column::AppSpecific) {
            message = message.with_app_specific(tag);
        }
        if let Some(use_journal) = flag_field(record, Column::UseJournal) {
            message = message.with_use_journal(use_journal);
        }
        if let Some(use_dead_letter) = flag_field(record, Column::UseDeadLetter) {
            message = message.with_use_dead_letter(use_dead_letter);
        }

        Some(message)
    }
}

impl Default for MessageMapper {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}

/// Interpret a flag value: only `1` and `true` (any case) are true
pub fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    Some(value == "1" || value.eq_ignore_ascii_case("true"))
}

fn flag_field(record: &RawRecord, column: Column) -> Option<bool> {
    record.field(column).and_then(parse_flag)
}

/// Parse a priority, saturating integers too large for `i64`
fn parse_priority(value: &str) -> Option<i64> {
    match value.trim().parse::<i64>() {
        Ok(priority) => Some(priority),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

fn integer_field<T: std::str::FromStr>(record: &RawRecord, column: Column) -> Option<T> {
    record
        .field(column)
        .and_then(|value| value.trim().parse::<T>().ok())
}

#[cfg(test)]
#[path = "mapper_tests.rs"]
mod tests;
