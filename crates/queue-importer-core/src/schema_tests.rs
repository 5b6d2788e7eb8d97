//! Tests for the export column layout.

use super::*;

#[test]
fn test_consumed_column_positions() {
    assert_eq!(Column::Label.index(), 3);
    assert_eq!(Column::Body.index(), 4);
    assert_eq!(Column::Priority.index(), 5);
    assert_eq!(Column::Durable.index(), 6);
    assert_eq!(Column::AppSpecific.index(), 7);
    assert_eq!(Column::UseJournal.index(), 12);
    assert_eq!(Column::UseDeadLetter.index(), 13);
}

#[test]
fn test_all_is_in_index_order() {
    for (position, column) in Column::ALL.iter().enumerate() {
        assert_eq!(column.index(), position, "{:?} out of order", column);
    }
}

#[test]
fn test_minimum_fields_reaches_body() {
    assert_eq!(MIN_FIELDS, 5);
}

#[test]
fn test_provenance_columns_are_not_consumed() {
    assert!(!Column::QueueName.is_consumed());
    assert!(!Column::MessageId.is_consumed());
    assert!(!Column::CorrelationId.is_consumed());
    assert!(!Column::SentTime.is_consumed());
    assert!(!Column::MessageSize.is_consumed());

    let consumed = Column::ALL.iter().filter(|c| c.is_consumed()).count();
    assert_eq!(consumed, 7);
}

#[test]
fn test_export_header_has_every_column() {
    let header = export_header();
    assert_eq!(header.split(',').count(), Column::ALL.len());
    assert!(header.starts_with("QueueName,MessageId,CorrelationId,Label,Body"));
}
