//! # Queue Importer Core
//!
//! Bulk-loads messages captured by the queue exporter back into a queue.
//!
//! The pipeline for each data line of an export file is:
//!
//! ```text
//! line -> parse_record -> RawRecord -> MessageMapper -> OutboundMessage -> QueueSender::send
//! ```
//!
//! [`Importer`] drives the pipeline and isolates failures per line, so one bad
//! record never aborts the batch. Transport concerns stay behind the
//! [`queue_runtime::QueueProvider`] trait.
//!
//! ## Usage
//!
//! ```rust
//! use queue_importer_core::{parse_record, MessageMapper};
//!
//! let record = parse_record(r#"q,id,corr,"Order, urgent",payload,9"#);
//! let message = MessageMapper::default().map(&record).unwrap();
//! assert_eq!(message.label, "Order, urgent");
//! assert_eq!(message.priority.unwrap().value(), 7);
//! ```

pub mod error;
pub mod importer;
pub mod mapper;
pub mod provisioner;
pub mod record;
pub mod schema;

pub use error::{ImportError, ImportResult, RecordError};
pub use importer::{
    ImportOptions, ImportOutcome, ImportSummary, Importer, RecordFailure, RecordOutcome,
};
pub use mapper::{parse_flag, MessageMapper, DEFAULT_LABEL};
pub use provisioner::{ProvisionOutcome, QueueProvisioner};
pub use record::{parse_record, RawRecord};
pub use schema::{export_header, Column, MIN_FIELDS};

// Re-export queue-runtime types used in the public API
pub use queue_runtime::{Destination, OutboundMessage, QueueError, QueueProvider};
