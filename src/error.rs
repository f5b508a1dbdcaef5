//! Error types for the I/O-facing surface of the codec.
//!
//! Validation problems are never reported through this type; they are
//! returned as [`Violation`](crate::violation::Violation) lists.

use thiserror::Error;

/// Result type alias for codec operations that touch the outside world.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while reading input or driving the CLI.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A field name that the record definition does not declare
    #[error("Unknown field '{field}' for {record} record")]
    UnknownField { record: &'static str, field: String },

    /// An unrecognised format family name
    #[error("Unknown format '{0}'. Expected one of: aba, international")]
    UnknownFormat(String),

    /// Input file is structurally unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The batch failed validation
    #[error("Batch rejected with {count} violation(s)")]
    Rejected { count: usize },

    /// Missing command line arguments
    #[error(
        "Missing arguments. Usage: payment-batch <aba|international> <header.csv> <details.csv>"
    )]
    MissingArgument,
}
