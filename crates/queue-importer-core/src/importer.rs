//! # Import Driver
//!
//! Runs one import: checks the source, provisions and opens the destination,
//! then sends each data line in file order.
//!
//! Every line produces a [`RecordOutcome`]. Outcomes are tallied into an
//! [`ImportSummary`]; a line that cannot be mapped or sent is recorded with its
//! line number and the batch moves on. A line that is not valid UTF-8 is one
//! such record. Only pre-flight failures (missing or unreadable source,
//! provisioning, open) end a run early.

use crate::error::{ImportError, ImportResult, RecordError};
use crate::mapper::{MessageMapper, DEFAULT_LABEL};
use crate::provisioner::QueueProvisioner;
use crate::record::parse_record;
use crate::schema::MIN_FIELDS;
use queue_runtime::{Destination, MessageFormat, MessageId, QueueProvider, QueueSender};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

/// Tunables for an import run
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Log progress after this many successful sends
    pub progress_interval: usize,

    /// Label for records with an empty label column
    pub default_label: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            progress_interval: 100,
            default_label: DEFAULT_LABEL.to_string(),
        }
    }
}

/// Result of importing a single line
#[derive(Debug)]
pub enum RecordOutcome {
    /// The message was accepted by the destination
    Sent(MessageId),
    /// The line was empty or whitespace and was ignored
    Blank,
    /// The line could not be turned into a message
    Skipped(RecordError),
    /// The destination refused the message
    Failed(RecordError),
}

/// A line that did not make it into the destination
#[derive(Debug)]
pub struct RecordFailure {
    /// One-based line number in the source file
    pub line: usize,
    pub error: RecordError,
}

/// Tally of a completed import
#[derive(Debug, Default)]
pub struct ImportSummary {
    /// Lines after the header, blank ones included
    pub candidates: usize,
    pub imported: usize,
    pub blank: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<RecordFailure>,
}

impl ImportSummary {
    pub fn new(candidates: usize) -> Self {
        Self {
            candidates,
            ..Default::default()
        }
    }

    /// Lines that were neither sent nor blank
    pub fn errors(&self) -> usize {
        self.skipped + self.failed
    }

    /// Check if every non-blank line was sent
    pub fn is_clean(&self) -> bool {
        self.errors() == 0
    }

    /// Account for the outcome of one line
    pub fn record(&mut self, line: usize, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Sent(_) => self.imported += 1,
            RecordOutcome::Blank => self.blank += 1,
            RecordOutcome::Skipped(error) => {
                self.skipped += 1;
                self.failures.push(RecordFailure { line, error });
            }
            RecordOutcome::Failed(error) => {
                self.failed += 1;
                self.failures.push(RecordFailure { line, error });
            }
        }
    }
}

/// How an import run ended
#[derive(Debug)]
pub enum ImportOutcome {
    /// The source held at most a header line
    NothingToImport,
    Completed(ImportSummary),
}

/// Drives an import against a provider
pub struct Importer<'a> {
    provider: &'a dyn QueueProvider,
    mapper: MessageMapper,
    progress_interval: usize,
}

impl<'a> Importer<'a> {
    pub fn new(provider: &'a dyn QueueProvider, options: ImportOptions) -> Self {
        Self {
            provider,
            mapper: MessageMapper::new(options.default_label),
            progress_interval: options.progress_interval.max(1),
        }
    }

    /// Import every data line of `source` into `destination`
    ///
    /// Running the same file twice sends every record twice.
    pub async fn run(
        &self,
        source: &Path,
        destination: &Destination,
    ) -> ImportResult<ImportOutcome> {
        let source_error = |e| ImportError::SourceUnreadable {
            path: source.to_path_buf(),
            source: e,
        };

        if !fs::try_exists(source).await.map_err(source_error)? {
            return Err(ImportError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        let provisioned = QueueProvisioner::ensure(self.provider, destination).await?;
        debug!(queue = %destination.queue(), outcome = ?provisioned, "Destination provisioned");

        let sender = self
            .provider
            .open(destination, &MessageFormat::importer())
            .await
            .map_err(|source| ImportError::DestinationOpen {
                destination: destination.to_string(),
                source,
            })?;

        info!(
            destination = %destination,
            journal = destination.is_journal(),
            provider = %self.provider.provider_type(),
            "Opened destination"
        );

        let content = fs::read(source).await.map_err(source_error)?;
        let lines = split_lines(&content);

        if lines.len() <= 1 {
            info!(source = %source.display(), "Nothing to import");
            return Ok(ImportOutcome::NothingToImport);
        }

        let mut summary = ImportSummary::new(lines.len() - 1);
        info!(
            source = %source.display(),
            candidates = summary.candidates,
            "Importing records"
        );

        // Line 0 is the header and is never validated
        for (index, line) in lines.iter().enumerate().skip(1) {
            let line_number = index + 1;
            let outcome = match std::str::from_utf8(line) {
                Ok(text) => self.import_line(sender.as_ref(), text).await,
                Err(e) => RecordOutcome::Skipped(RecordError::InvalidEncoding {
                    valid_up_to: e.valid_up_to(),
                }),
            };

            match &outcome {
                RecordOutcome::Sent(message_id) => {
                    debug!(line = line_number, message_id = %message_id, "Record sent");
                    if (summary.imported + 1) % self.progress_interval == 0 {
                        info!(
                            imported = summary.imported + 1,
                            candidates = summary.candidates,
                            "Import progress"
                        );
                    }
                }
                RecordOutcome::Skipped(error) => {
                    warn!(line = line_number, error = %error, "Skipping record");
                }
                RecordOutcome::Failed(error) => {
                    warn!(line = line_number, error = %error, "Failed to import record");
                }
                RecordOutcome::Blank => {}
            }

            summary.record(line_number, outcome);
        }

        info!(
            imported = summary.imported,
            candidates = summary.candidates,
            errors = summary.errors(),
            "Import finished"
        );

        Ok(ImportOutcome::Completed(summary))
    }

    /// Parse, map and send a single data line
    pub async fn import_line(&self, sender: &dyn QueueSender, line: &str) -> RecordOutcome {
        if line.trim().is_empty() {
            return RecordOutcome::Blank;
        }

        let record = parse_record(line);
        let Some(message) = self.mapper.map(&record) else {
            return RecordOutcome::Skipped(RecordError::TooFewFields {
                found: record.len(),
                required: MIN_FIELDS,
            });
        };

        match sender.send(&message).await {
            Ok(message_id) => RecordOutcome::Sent(message_id),
            Err(error) => RecordOutcome::Failed(RecordError::Send(error)),
        }
    }
}

/// Split raw file content into lines, dropping `\n` and a trailing `\r`
///
/// Lines stay undecoded so a bad byte sequence only affects its own record.
fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    let content = content.strip_suffix(b"\n").unwrap_or(content);
    if content.is_empty() {
        return Vec::new();
    }

    content
        .split(|&byte| byte == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect()
}

#[cfg(test)]
#[path = "importer_tests.rs"]
mod tests;
