//! Structured validation failures.
//!
//! A [`Violation`] is data, not control flow: every stage of the codec
//! collects them and hands the full list back to the caller.

use serde::Serialize;
use std::fmt;

/// Category of a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required value is absent or blank.
    Blank,
    /// Value is longer (or shorter) than allowed.
    Length,
    /// Value does not match the required pattern or charset.
    Pattern,
    /// Value supplied for a numeric field does not parse as a number.
    NotANumber,
    /// Numeric value lies outside the permitted range.
    OutOfRange,
    /// Value is not a member of the permitted set.
    NotAllowed,
    /// Value supplied for a date field is not a date.
    InvalidDate,
    /// Individually valid fields that disagree with each other.
    CrossField,
    /// Structural problem with the batch as a whole.
    Batch,
}

/// Where in a batch a violation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Batch,
    Header,
    /// 1-based position of a detail record.
    Detail(usize),
    Trailer,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Batch => write!(f, "batch"),
            Location::Header => write!(f, "header"),
            Location::Detail(id) => write!(f, "record {}", id),
            Location::Trailer => write!(f, "trailer"),
        }
    }
}

/// One failed constraint.
///
/// `location` is `None` while a violation is still local to a single record;
/// the batch assembler places it once the record's position is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub location: Option<Location>,
    pub field: Option<&'static str>,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    /// Creates a violation against a single field.
    pub fn field<S: Into<String>>(field: &'static str, kind: ViolationKind, message: S) -> Self {
        Violation {
            location: None,
            field: Some(field),
            kind,
            message: message.into(),
        }
    }

    /// Creates a batch-level violation that belongs to no single record.
    pub fn batch<S: Into<String>>(message: S) -> Self {
        Violation {
            location: Some(Location::Batch),
            field: None,
            kind: ViolationKind::Batch,
            message: message.into(),
        }
    }

    /// Places the violation at `location`, keeping any location already set.
    pub fn at(mut self, location: Location) -> Self {
        self.location.get_or_insert(location);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = self.location {
            write!(f, "{}: ", location)?;
        }
        if let Some(field) = self.field {
            write!(f, "{}: ", field)?;
        }
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location_and_field() {
        let v = Violation::field("bsb", ViolationKind::Pattern, "Bsb is invalid")
            .at(Location::Detail(3));
        assert_eq!(v.to_string(), "record 3: bsb: Bsb is invalid");
    }

    #[test]
    fn test_at_keeps_existing_location() {
        let v = Violation::batch("at least one detail record required").at(Location::Header);
        assert_eq!(v.location, Some(Location::Batch));
        assert_eq!(v.to_string(), "batch: at least one detail record required");
    }
}
