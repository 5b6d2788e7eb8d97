//! Splitting one line of the export file into fields.
//!
//! Grammar:
//! - fields are separated by commas outside a quoted span
//! - a double quote opens or closes a quoted span
//! - inside a quoted span, `""` is one literal quote
//! - the text after the last separator is always emitted as the final field
//!
//! Parsing never fails. An unterminated quoted span runs to the end of the
//! line. Records cannot span physical lines: a quoted body containing a line
//! break is split by the line reader before it reaches the parser.

use crate::schema::Column;

/// Ordered fields of one data line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord(Vec<String>);

impl RawRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field at a raw position, if present
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Field for an export column, if present
    pub fn field(&self, column: Column) -> Option<&str> {
        self.get(column.index())
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn into_fields(self) -> Vec<String> {
        self.0
    }
}

/// Parse one line into its fields
pub fn parse_record(line: &str) -> RawRecord {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    RawRecord(fields)
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
