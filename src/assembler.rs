//! Batch assembler.
//!
//! Brackets the caller's detail records with a validated header and a derived
//! trailer. Every record is validated, batch-wide rules are applied, and the
//! complete violation list is returned if anything is wrong. Only a clean
//! batch becomes an [`EncodableBatch`].
//!
//! # Violation Ordering
//!
//! Violations are reported batch-level first (including problems with the
//! derived trailer), then the header, then each detail record in input
//! order. Within a record they follow field declaration order, with
//! cross-field rules last. Identical input always yields identical output.

use crate::formats::PaymentFormat;
use crate::record::{Record, ValidRecord};
use crate::validator;
use crate::violation::{Location, Violation, ViolationKind};
use log::{debug, info};
use std::marker::PhantomData;

/// Caller-supplied trailer inputs. Derived totals are never supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrailerFields {
    /// Number of detail records the caller intends to send, checked against
    /// the actual count when present.
    pub declared_count: Option<usize>,
}

/// A fully validated batch, ready for encoding.
///
/// Only [`assemble`] creates these, so encoding one cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodableBatch<F: PaymentFormat> {
    header: ValidRecord,
    details: Vec<ValidRecord>,
    trailer: ValidRecord,
    _format: PhantomData<F>,
}

impl<F: PaymentFormat> EncodableBatch<F> {
    pub fn header(&self) -> &ValidRecord {
        &self.header
    }

    /// Detail records in their assigned order.
    pub fn details(&self) -> &[ValidRecord] {
        &self.details
    }

    pub fn trailer(&self) -> &ValidRecord {
        &self.trailer
    }

    /// Number of lines the file will contain.
    pub fn line_count(&self) -> usize {
        self.details.len() + 2
    }
}

/// Validates and assembles one batch of family `F`.
///
/// # Errors
///
/// Returns every violation found across the batch, header and details.
pub fn assemble<F: PaymentFormat>(
    header: Record,
    details: Vec<Record>,
    trailer_fields: TrailerFields,
) -> Result<EncodableBatch<F>, Vec<Violation>> {
    let mut batch_violations = Vec::new();
    let mut record_violations = Vec::new();

    if details.is_empty() {
        batch_violations.push(Violation::batch("at least one detail record required"));
    }
    if let Some(declared) = trailer_fields.declared_count {
        if declared != details.len() {
            batch_violations.push(Violation::batch(format!(
                "Declared detail record count {} does not match the {} record(s) supplied.",
                declared,
                details.len()
            )));
        }
    }

    let header_result = if header.kind() == F::header_definition().kind {
        validator::accept(&header).map_err(|vs| place(vs, Location::Header))
    } else {
        Err(vec![wrong_kind(&header, F::header_definition().kind.name(), Location::Header)])
    };

    let mut prepared = Vec::with_capacity(details.len());
    for mut detail in details {
        F::prepare_detail(&header, &mut detail);
        prepared.push(detail);
    }
    batch_violations.extend(F::batch_rules(&prepared));

    let mut valid_details = Vec::with_capacity(prepared.len());
    for (idx, detail) in prepared.iter().enumerate() {
        let record_id = idx + 1;
        let location = Location::Detail(record_id);

        if detail.kind() != F::detail_definition().kind {
            record_violations.push(wrong_kind(detail, F::detail_definition().kind.name(), location));
            continue;
        }

        match validator::accept(detail) {
            Ok(valid) => valid_details.push(valid.with_record_id(record_id)),
            Err(vs) => {
                debug!("{} record {}: {} violation(s)", F::NAME, record_id, vs.len());
                record_violations.extend(place(vs, location));
            }
        }
    }

    let header = match header_result {
        Ok(valid) => Some(valid),
        Err(vs) => {
            record_violations.splice(0..0, vs);
            None
        }
    };

    // Totals are only meaningful once every record is known to be well-formed.
    let trailer = match header.as_ref() {
        Some(valid_header) if record_violations.is_empty() && !valid_details.is_empty() => {
            let derived = F::build_trailer(valid_header, &valid_details);
            match validator::accept(&derived) {
                Ok(valid) => Some(valid),
                Err(vs) => {
                    batch_violations.extend(place(vs, Location::Trailer));
                    None
                }
            }
        }
        _ => None,
    };

    batch_violations.extend(record_violations);
    match (header, trailer) {
        (Some(header), Some(trailer)) if batch_violations.is_empty() => {
            info!(
                "Assembled {} batch with {} detail record(s)",
                F::NAME,
                valid_details.len()
            );
            Ok(EncodableBatch {
                header,
                details: valid_details,
                trailer,
                _format: PhantomData,
            })
        }
        _ => {
            debug!(
                "Rejected {} batch with {} violation(s)",
                F::NAME,
                batch_violations.len()
            );
            Err(batch_violations)
        }
    }
}

fn place(violations: Vec<Violation>, location: Location) -> Vec<Violation> {
    violations.into_iter().map(|v| v.at(location)).collect()
}

fn wrong_kind(record: &Record, expected: &str, location: Location) -> Violation {
    Violation {
        location: Some(location),
        field: None,
        kind: ViolationKind::Batch,
        message: format!(
            "Expected a {} record but got a {} record.",
            expected,
            record.kind().name()
        ),
    }
}
