//! Column layout of the exporter's CSV format.
//!
//! The exporter writes one header line followed by one line per message with
//! the columns below, in this order. The importer consumes only the columns
//! for which [`Column::is_consumed`] is true; the rest must still be present so
//! that later columns keep their positions.

/// Fewest fields a record needs before the body column exists
pub const MIN_FIELDS: usize = Column::Body.index() + 1;

/// A column of the export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    QueueName,
    MessageId,
    CorrelationId,
    Label,
    Body,
    Priority,
    Durable,
    AppSpecific,
    SentTime,
    ArrivedTime,
    TimeToReachQueue,
    TimeToBeReceived,
    UseJournal,
    UseDeadLetter,
    ImportedAt,
    OriginalBodyType,
    MessageSize,
}

impl Column {
    /// Every column in export order
    pub const ALL: [Column; 17] = [
        Column::QueueName,
        Column::MessageId,
        Column::CorrelationId,
        Column::Label,
        Column::Body,
        Column::Priority,
        Column::Durable,
        Column::AppSpecific,
        Column::SentTime,
        Column::ArrivedTime,
        Column::TimeToReachQueue,
        Column::TimeToBeReceived,
        Column::UseJournal,
        Column::UseDeadLetter,
        Column::ImportedAt,
        Column::OriginalBodyType,
        Column::MessageSize,
    ];

    /// Zero-based position of the column in a record
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Header text the exporter writes for this column
    pub const fn header(self) -> &'static str {
        match self {
            Column::QueueName => "QueueName",
            Column::MessageId => "MessageId",
            Column::CorrelationId => "CorrelationId",
            Column::Label => "Label",
            Column::Body => "Body",
            Column::Priority => "Priority",
            Column::Durable => "Recoverable",
            Column::AppSpecific => "AppSpecific",
            Column::SentTime => "SentTime",
            Column::ArrivedTime => "ArrivedTime",
            Column::TimeToReachQueue => "TimeToReachQueue",
            Column::TimeToBeReceived => "TimeToBeReceived",
            Column::UseJournal => "UseJournalQueue",
            Column::UseDeadLetter => "UseDeadLetterQueue",
            Column::ImportedAt => "ImportedAt",
            Column::OriginalBodyType => "OriginalBodyType",
            Column::MessageSize => "MessageSize",
        }
    }

    /// Whether the importer maps this column onto a message attribute
    ///
    /// Queue name, message id and correlation id describe where a message was
    /// captured, not how it should be re-delivered.
    pub const fn is_consumed(self) -> bool {
        matches!(
            self,
            Column::Label
                | Column::Body
                | Column::Priority
                | Column::Durable
                | Column::AppSpecific
                | Column::UseJournal
                | Column::UseDeadLetter
        )
    }
}

/// Header line as written by the exporter
pub fn export_header() -> String {
    Column::ALL
        .iter()
        .map(|column| column.header())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
