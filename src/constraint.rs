//! Field constraint library.
//!
//! Each [`Constraint`] is a pure check over one field value (and, for
//! conditional constraints, its sibling fields). Checks never fail or panic;
//! they return zero or more [`Violation`]s.
//!
//! Except for [`Constraint::NonBlank`], every constraint ignores a value that
//! was not provided. Presence is a separate concern from shape, so an optional
//! field only has to be well-formed when it is actually set.

use crate::definition::{FieldDef, FieldKind};
use crate::record::{Record, Value};
use crate::violation::{Violation, ViolationKind};
use chrono::Datelike;
use regex::Regex;
use rust_decimal::Decimal;

/// A single declarative check attached to a field.
#[derive(Debug)]
pub enum Constraint {
    /// Value must be provided and not blank.
    NonBlank,
    /// Value must be exactly this many characters.
    ExactLength(usize),
    /// Value must be at most this many characters.
    MaxLength(usize),
    /// Whole value must match `regex` (anchor it yourself).
    Pattern { regex: Regex, message: &'static str },
    /// Value must parse as a number of the field's kind within `min..=max`.
    NumericRange { min: Decimal, max: Decimal },
    /// Date must fall within `min_year..=max_year`.
    DateRange { min_year: i32, max_year: i32 },
    /// Value's text form must be exactly one of `allowed`.
    OneOf {
        allowed: &'static [&'static str],
        message: &'static str,
    },
    /// `then` applies only when `applies` holds for the whole record.
    When {
        applies: fn(&Record) -> bool,
        then: Box<Constraint>,
    },
}

impl Constraint {
    /// Builds a pattern constraint from a literal regular expression.
    ///
    /// Patterns are compile-time literals in the record definitions, so an
    /// invalid one is a programming error.
    pub fn pattern(pattern: &str, message: &'static str) -> Self {
        Constraint::Pattern {
            regex: Regex::new(pattern).expect("record definition pattern must compile"),
            message,
        }
    }

    pub fn range(min: i64, max: i64) -> Self {
        Constraint::NumericRange {
            min: Decimal::from(min),
            max: Decimal::from(max),
        }
    }

    pub fn years(min_year: i32, max_year: i32) -> Self {
        Constraint::DateRange { min_year, max_year }
    }

    pub fn one_of(allowed: &'static [&'static str], message: &'static str) -> Self {
        Constraint::OneOf { allowed, message }
    }

    pub fn when(applies: fn(&Record) -> bool, then: Constraint) -> Self {
        Constraint::When {
            applies,
            then: Box::new(then),
        }
    }

    /// Runs the check for `field`, whose current value is `value`.
    pub fn check(&self, field: &FieldDef, value: Option<&Value>, record: &Record) -> Vec<Violation> {
        let provided = value.filter(|v| !v.is_blank());

        match self {
            Constraint::NonBlank => match provided {
                Some(_) => Vec::new(),
                None => vec![Violation::field(
                    field.name,
                    ViolationKind::Blank,
                    format!("{} is required.", field.label()),
                )],
            },
            Constraint::When { applies, then } => {
                if applies(record) {
                    then.check(field, value, record)
                } else {
                    Vec::new()
                }
            }
            _ => match provided {
                Some(v) => self.check_provided(field, v),
                None => Vec::new(),
            },
        }
    }

    fn check_provided(&self, field: &FieldDef, value: &Value) -> Vec<Violation> {
        let fail = |kind: ViolationKind, message: String| vec![Violation::field(field.name, kind, message)];

        match self {
            Constraint::ExactLength(len) => {
                let actual = value.to_text().chars().count();
                if actual == *len {
                    Vec::new()
                } else {
                    fail(
                        ViolationKind::Length,
                        format!("{} must be exactly {} characters long.", field.label(), len),
                    )
                }
            }
            Constraint::MaxLength(max) => {
                let actual = value.to_text().chars().count();
                if actual <= *max {
                    Vec::new()
                } else {
                    fail(
                        ViolationKind::Length,
                        format!(
                            "{} cannot be longer than {} characters ({} given).",
                            field.label(),
                            max,
                            actual
                        ),
                    )
                }
            }
            Constraint::Pattern { regex, message } => {
                if regex.is_match(&value.to_text()) {
                    Vec::new()
                } else {
                    fail(ViolationKind::Pattern, message.to_string())
                }
            }
            Constraint::NumericRange { min, max } => check_numeric(field, value, *min, *max),
            Constraint::DateRange { min_year, max_year } => {
                // Unparseable dates are reported by coercion, not here.
                match value.to_date() {
                    Some(date) if date.year() < *min_year || date.year() > *max_year => fail(
                        ViolationKind::OutOfRange,
                        format!(
                            "{} is invalid. Year must be between {:04} and {:04}.",
                            field.label(),
                            min_year,
                            max_year
                        ),
                    ),
                    _ => Vec::new(),
                }
            }
            Constraint::OneOf { allowed, message } => {
                let text = value.to_text();
                if allowed.contains(&text.as_str()) {
                    Vec::new()
                } else {
                    fail(ViolationKind::NotAllowed, message.to_string())
                }
            }
            Constraint::NonBlank | Constraint::When { .. } => Vec::new(),
        }
    }
}

/// Parses a numeric value for `field` and checks its range.
///
/// "Not a number" and "out of range" are distinct kinds; absence never gets
/// here and is never treated as zero.
fn check_numeric(field: &FieldDef, value: &Value, min: Decimal, max: Decimal) -> Vec<Violation> {
    let number = match value.to_number() {
        Some(n) => n,
        None => {
            return vec![Violation::field(
                field.name,
                ViolationKind::NotANumber,
                format!("{} '{}' is not a valid number.", field.label(), value.to_text()),
            )]
        }
    };

    let precision_problem = match field.kind {
        FieldKind::Integer if !number.fract().is_zero() => Some("must be a whole number".to_string()),
        FieldKind::Amount { scale } if number.normalize().scale() > scale => {
            Some(format!("cannot have more than {} decimal places", scale))
        }
        _ => None,
    };
    if let Some(problem) = precision_problem {
        return vec![Violation::field(
            field.name,
            ViolationKind::NotANumber,
            format!("{} '{}' {}.", field.label(), value.to_text(), problem),
        )];
    }

    if number < min {
        return vec![Violation::field(
            field.name,
            ViolationKind::OutOfRange,
            format!("{} is invalid. Must be at least {}.", field.label(), min),
        )];
    }
    if number > max {
        return vec![Violation::field(
            field.name,
            ViolationKind::OutOfRange,
            format!("{} is invalid. Cannot be more than {}.", field.label(), max),
        )];
    }
    Vec::new()
}
