//! Violation report.
//!
//! Writes a rejected batch's violations as CSV with the columns
//! `location,field,kind,message`, one row per violation in the order the
//! assembler produced them.

use crate::error::Result;
use crate::violation::{Violation, ViolationKind};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ViolationRow<'a> {
    location: String,
    field: &'a str,
    kind: ViolationKind,
    message: &'a str,
}

impl<'a> From<&'a Violation> for ViolationRow<'a> {
    fn from(v: &'a Violation) -> Self {
        ViolationRow {
            location: v.location.map(|l| l.to_string()).unwrap_or_default(),
            field: v.field.unwrap_or(""),
            kind: v.kind,
            message: &v.message,
        }
    }
}

/// Serializes `violations` to `writer` as CSV with a header row.
pub fn write_violations<W: Write>(writer: W, violations: &[Violation]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if violations.is_empty() {
        csv_writer.write_record(["location", "field", "kind", "message"])?;
    }
    for violation in violations {
        csv_writer.serialize(ViolationRow::from(violation))?;
    }

    csv_writer.flush()?;
    Ok(())
}
