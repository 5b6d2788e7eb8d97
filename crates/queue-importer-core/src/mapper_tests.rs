//! Tests for the message mapper.

use super::*;
use crate::record::parse_record;
use queue_runtime::PayloadKind;

/// Build a full-width record with the given overrides
fn record_with(overrides: &[(Column, &str)]) -> RawRecord {
    let mut fields: Vec<String> = vec![String::new(); Column::ALL.len()];
    fields[Column::QueueName.index()] = r".\private$\source".to_string();
    fields[Column::Label.index()] = "label".to_string();
    fields[Column::Body.index()] = "body".to_string();
    for (column, value) in overrides {
        fields[column.index()] = value.to_string();
    }
    RawRecord::new(fields)
}

fn map(record: &RawRecord) -> OutboundMessage {
    MessageMapper::default()
        .map(record)
        .expect("record should map")
}

// ============================================================================
// Record Width
// ============================================================================

#[test]
fn test_records_shorter_than_five_fields_are_rejected() {
    let mapper = MessageMapper::default();
    assert!(mapper.map(&parse_record("a,b,c")).is_none());
    assert!(mapper.map(&parse_record("a,b,c,d")).is_none());
    assert!(mapper.map(&parse_record("")).is_none());
}

#[test]
fn test_five_fields_is_enough() {
    let message = map(&parse_record("q,id,corr,label,body"));
    assert_eq!(message.label, "label");
    assert_eq!(message.body, MessageBody::Bytes(Bytes::from_static(b"body")));
    assert!(message.priority.is_none());
    assert!(message.durable.is_none());
    assert!(message.app_specific.is_none());
    assert!(message.use_journal.is_none());
    assert!(message.use_dead_letter.is_none());
}

#[test]
fn test_trailing_unknown_fields_are_ignored() {
    let mut fields = record_with(&[]).into_fields();
    fields.extend(["extra".to_string(), "more".to_string()]);
    let message = map(&RawRecord::new(fields));
    assert_eq!(message.label, "label");
}

// ============================================================================
// Body and Label
// ============================================================================

#[test]
fn test_non_empty_body_is_utf8_bytes() {
    let message = map(&record_with(&[(Column::Body, "héllo")]));
    assert_eq!(message.body.kind(), PayloadKind::Bytes);
    assert_eq!(message.body, MessageBody::Bytes(Bytes::from("héllo".as_bytes().to_vec())));
}

#[test]
fn test_empty_body_is_empty_text() {
    let message = map(&record_with(&[(Column::Body, "")]));
    assert_eq!(message.body, MessageBody::Text(String::new()));
}

#[test]
fn test_empty_label_uses_placeholder() {
    let message = map(&record_with(&[(Column::Label, "")]));
    assert_eq!(message.label, DEFAULT_LABEL);
}

#[test]
fn test_custom_placeholder_label() {
    let mapper = MessageMapper::new("restored");
    let message = mapper.map(&record_with(&[(Column::Label, "")])).unwrap();
    assert_eq!(message.label, "restored");
    assert_eq!(mapper.default_label(), "restored");
}

// ============================================================================
// Priority
// ============================================================================

#[test]
fn test_priority_in_range() {
    let message = map(&record_with(&[(Column::Priority, "3")]));
    assert_eq!(message.priority, Some(Priority::clamped(3)));
}

#[test]
fn test_priority_is_clamped_not_rejected() {
    let high = map(&record_with(&[(Column::Priority, "99")]));
    assert_eq!(high.priority.map(|p| p.value()), Some(7));

    let low = map(&record_with(&[(Column::Priority, "-5")]));
    assert_eq!(low.priority.map(|p| p.value()), Some(0));
}

#[test]
fn test_unparsable_priority_is_left_unset() {
    for value in ["", "high", "3.5"] {
        let message = map(&record_with(&[(Column::Priority, value)]));
        assert!(message.priority.is_none(), "priority {:?} should be unset", value);
    }
}

#[test]
fn test_out_of_range_integer_priority_saturates() {
    let high = map(&record_with(&[(Column::Priority, "99999999999999999999")]));
    assert_eq!(high.priority.map(|p| p.value()), Some(7));

    let low = map(&record_with(&[(Column::Priority, "-99999999999999999999")]));
    assert_eq!(low.priority.map(|p| p.value()), Some(0));
}

// ============================================================================
// Flags
// ============================================================================

#[test]
fn test_flag_truth_table() {
    assert_eq!(parse_flag("1"), Some(true));
    assert_eq!(parse_flag("true"), Some(true));
    assert_eq!(parse_flag("TRUE"), Some(true));
    assert_eq!(parse_flag("True"), Some(true));

    assert_eq!(parse_flag("0"), Some(false));
    assert_eq!(parse_flag("false"), Some(false));
    assert_eq!(parse_flag("yes"), Some(false));
    assert_eq!(parse_flag("no"), Some(false));

    assert_eq!(parse_flag(""), None);
}

#[test]
fn test_flags_map_to_attributes() {
    let message = map(&record_with(&[
        (Column::Durable, "True"),
        (Column::UseJournal, "0"),
        (Column::UseDeadLetter, "1"),
    ]));

    assert_eq!(message.durable, Some(true));
    assert_eq!(message.use_journal, Some(false));
    assert_eq!(message.use_dead_letter, Some(true));
}

#[test]
fn test_absent_flag_columns_leave_defaults() {
    // Eight fields: journal and dead-letter columns are absent
    let message = map(&parse_record("q,id,corr,label,body,1,yes,7"));
    assert_eq!(message.durable, Some(false));
    assert_eq!(message.app_specific, Some(7));
    assert!(message.use_journal.is_none());
    assert!(message.use_dead_letter.is_none());
}

// ============================================================================
// App-specific Tag
// ============================================================================

#[test]
fn test_app_specific_parsed() {
    let message = map(&record_with(&[(Column::AppSpecific, "-12")]));
    assert_eq!(message.app_specific, Some(-12));
}

#[test]
fn test_unparsable_app_specific_is_unset() {
    let message = map(&record_with(&[(Column::AppSpecific, "tag")]));
    assert!(message.app_specific.is_none());

    let overflow = map(&record_with(&[(Column::AppSpecific, "99999999999")]));
    assert!(overflow.app_specific.is_none());
}

// ============================================================================
// Ignored Columns
// ============================================================================

#[test]
fn test_provenance_columns_do_not_affect_message() {
    let a = map(&record_with(&[
        (Column::QueueName, "one"),
        (Column::MessageId, "id-1"),
        (Column::CorrelationId, "c-1"),
        (Column::SentTime, "2020-01-01"),
    ]));
    let b = map(&record_with(&[
        (Column::QueueName, "two"),
        (Column::MessageId, "id-2"),
        (Column::CorrelationId, "c-2"),
        (Column::SentTime, "2021-01-01"),
    ]));

    assert_eq!(a, b);
}
