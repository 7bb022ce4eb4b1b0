// ⚠️ Error Types - Typed failures callers branch on
// Line processing turns these into notes; ingestion propagates them through anyhow

use thiserror::Error;

/// Number specification could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    #[error("number specification is empty")]
    Empty,

    #[error("unexpected {found:?} at position {position}")]
    UnexpectedText { position: usize, found: String },

    #[error("expected {expected} at position {position}")]
    Expected {
        expected: &'static str,
        position: usize,
    },

    #[error("number {text} is out of range")]
    NumberOutOfRange { text: String },
}

/// Validity line does not follow `<street>( - <clauses>)?`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("street name is empty")]
    EmptyStreet,

    #[error("street name must be followed by \" - \" at position {position}")]
    MisplacedDash { position: usize },

    #[error("invalid number specification: {0}")]
    Numbers(#[from] RuleParseError),
}

/// Address-point export could not be ingested
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV file is in wrong format: expected {expected} header columns, found {found}")]
    HeaderCount { expected: usize, found: usize },

    #[error("wrong header at column {column}: expected {expected:?}, found {found:?}")]
    HeaderName {
        column: usize,
        expected: &'static str,
        found: String,
    },

    #[error("row {row} has {found} columns, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: invalid {field} {value:?}")]
    InvalidCode {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
