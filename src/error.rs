//! Error types for conversation resolution, extraction, and export.
//!
//! Every domain failure is its own variant so callers can match on it; the
//! CLI prints the message and exits non-zero.
//!
//! CHANGELOG:
//! - 10/18/2026 - Split domain errors out of the command layer

use thiserror::Error;

/// Errors produced by the ica library.
#[derive(Debug, Error)]
pub enum IcaError {
    /// One or more requested identifiers (or a from-person token) matched no contact.
    #[error("No contact found for {}", quoted_list(.0))]
    ContactNotFound(Vec<String>),

    /// Several irreconcilable contacts answer to the same name.
    #[error(
        "Multiple contacts found for \"{query}\" ({}); please specify a phone number or email address instead",
        .names.join(", ")
    )]
    AmbiguousContact { query: String, names: Vec<String> },

    /// Contacts resolved, but no thread has exactly that participant set.
    #[error("No conversation found for {}", quoted_list(.0))]
    ConversationNotFound(Vec<String>),

    /// The 'from' date is after the 'to' date.
    #[error("Date range is backwards: {from} is after {to}")]
    DateRangeInvalid { from: String, to: String },

    #[error("The format \"{0}\" is not supported for output")]
    FormatNotSupported(String),

    #[error("Phone number {0} is missing an area code")]
    InvalidPhoneNumber(String),

    #[error("Invalid date \"{0}\"; expected an ISO 8601 date such as YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")]
    InvalidDate(String),

    #[error("Unknown time zone \"{0}\"")]
    InvalidTimezone(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Analyzer-specific failure (bad phrase regex, missing argument).
    #[error("{0}")]
    Analyzer(String),
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, IcaError>;

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(", ")
}
