//! Record validator.
//!
//! Applies every field constraint of a record's definition, in declaration
//! order, and then every cross-field rule. Nothing short-circuits: a caller
//! sees all problems with a record in one pass.

use crate::definition::FieldKind;
use crate::encoder;
use crate::record::{Record, Typed, ValidRecord};
use crate::violation::{Violation, ViolationKind};

/// Validates one record, returning every violation found.
///
/// The result is empty iff the record is acceptable for encoding.
pub fn validate(record: &Record) -> Vec<Violation> {
    match accept(record) {
        Ok(_) => Vec::new(),
        Err(violations) => violations,
    }
}

/// Validates one record and, when clean, returns its typed form.
pub fn accept(record: &Record) -> Result<ValidRecord, Vec<Violation>> {
    let mut violations = Vec::new();
    let mut typed = Vec::with_capacity(record.definition().fields.len());

    for (field, value) in record.fields() {
        let before = violations.len();
        for constraint in &field.constraints {
            violations.extend(constraint.check(field, value, record));
        }

        let provided = value.filter(|v| !v.is_blank());
        let coerced = provided.and_then(|v| Typed::coerce(v, field.kind));

        // A value of the wrong type that no constraint caught still has to be reported.
        if provided.is_some() && coerced.is_none() && violations.len() == before {
            let (kind, what) = match field.kind {
                FieldKind::Date { .. } => (ViolationKind::InvalidDate, "a valid date (YYYY-MM-DD)"),
                _ => (ViolationKind::NotANumber, "a valid number"),
            };
            violations.push(Violation::field(
                field.name,
                kind,
                format!("{} is not {}.", field.label(), what),
            ));
        }
        // Whatever passes must render into its span without truncation.
        if let (Some(placement), Some(value)) = (field.placement, coerced.as_ref()) {
            let rendered = encoder::render(field.kind, placement, Some(value));
            if violations.len() == before && !encoder::fits(&rendered, placement) {
                violations.push(Violation::field(
                    field.name,
                    ViolationKind::Length,
                    format!(
                        "{} does not fit its {} column field.",
                        field.label(),
                        placement.width
                    ),
                ));
            }
        }
        typed.push(coerced);
    }

    for rule in &record.definition().rules {
        if let Some(violation) = (rule.check)(record) {
            violations.push(violation);
        }
    }

    if violations.is_empty() {
        Ok(ValidRecord::new(record.definition(), typed))
    } else {
        Err(violations)
    }
}
