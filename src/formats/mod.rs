//! Supported payment file families.
//!
//! A family binds three record definitions (header, detail, trailer) with the
//! few behaviours that cannot be expressed as field tables: how header values
//! flow into details, batch-wide checks, and how the trailer is derived.

pub mod aba;
pub mod currency;
pub mod international;

use crate::definition::RecordDefinition;
use crate::error::CodecError;
use crate::record::{Record, ValidRecord};
use crate::violation::Violation;
use std::str::FromStr;

pub use aba::Aba;
pub use international::International;

/// `NNN-NNN` bank-state-branch code.
pub(crate) const BSB_PATTERN: &str = r"^[0-9]{3}-[0-9]{3}$";

/// Up to 9 digits, no dashes or spaces (length is checked separately).
pub(crate) const ACCOUNT_PATTERN: &str = r"^[0-9]*$";

/// A fixed-width payment file family.
pub trait PaymentFormat {
    /// Short name used in logs.
    const NAME: &'static str;

    /// Terminator appended to every line, including the last.
    const LINE_ENDING: &'static str = "\r\n";

    fn header_definition() -> &'static RecordDefinition;
    fn detail_definition() -> &'static RecordDefinition;
    fn trailer_definition() -> &'static RecordDefinition;

    /// Copies header-level values onto a detail record before it is validated.
    fn prepare_detail(_header: &Record, _detail: &mut Record) {}

    /// Batch-wide checks over the raw detail records.
    fn batch_rules(_details: &[Record]) -> Vec<Violation> {
        Vec::new()
    }

    /// Derives the trailer from the validated header and details.
    fn build_trailer(header: &ValidRecord, details: &[ValidRecord]) -> Record;

    fn header_record() -> Record {
        Record::new(Self::header_definition())
    }

    fn detail_record() -> Record {
        Record::new(Self::detail_definition())
    }
}

/// Family selector for callers that pick a format at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Aba,
    International,
}

impl FromStr for Family {
    type Err = CodecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aba" | "domestic" => Ok(Family::Aba),
            "international" | "intl" => Ok(Family::International),
            other => Err(CodecError::UnknownFormat(other.to_string())),
        }
    }
}
