//! Line encoder.
//!
//! Renders one validated record into a fixed-width line. The encoder does no
//! validation of its own and cannot fail: every value it sees has already
//! passed its field's constraints, and the validator has rendered it once to
//! confirm it fills its span exactly. Nothing is ever truncated.

use crate::definition::{FieldKind, Justify, Placement};
use crate::record::{Typed, ValidRecord, INPUT_DATE_FORMAT};
use rust_decimal::Decimal;

/// Encodes a record as a line of exactly its definition's width (no terminator).
pub fn encode(record: &ValidRecord) -> String {
    let definition = record.definition();
    let mut line = vec![' '; definition.line_width];

    for (field, value) in record.fields() {
        let Some(placement) = field.placement else {
            continue;
        };
        let rendered = render(field.kind, placement, value);
        // The validator rejects anything that would not fit exactly.
        debug_assert!(fits(&rendered, placement), "{} overflows its span", field.name);

        let span = line.iter_mut().skip(placement.start - 1).take(placement.width);
        for (slot, ch) in span.zip(rendered.chars()) {
            *slot = ch;
        }
    }

    line.into_iter().collect()
}

/// Whether a rendered value occupies exactly its column span.
pub(crate) fn fits(rendered: &str, placement: Placement) -> bool {
    rendered.chars().count() == placement.width
}

/// Renders one field value padded to its span. Over-long values come back
/// longer than the span; [`fits`] tells them apart.
pub(crate) fn render(kind: FieldKind, placement: Placement, value: Option<&Typed>) -> String {
    let width = placement.width;
    let Some(value) = value else {
        return match placement.justify {
            Justify::Zero => "0".repeat(width),
            _ => " ".repeat(width),
        };
    };

    let raw = match (value, kind) {
        (Typed::Number(n), FieldKind::Amount { scale }) => minor_units(*n, scale),
        (Typed::Number(n), _) => minor_units(*n, 0),
        (Typed::Date(d), FieldKind::Date { format }) => d.format(format).to_string(),
        (Typed::Date(d), _) => d.format(INPUT_DATE_FORMAT).to_string(),
        (Typed::Text(s), _) => s.clone(),
    };

    match placement.justify {
        Justify::Left => format!("{:<width$}", raw, width = width),
        Justify::Right => format!("{:>width$}", raw, width = width),
        Justify::Zero | Justify::ZeroOrBlank => format!("{:0>width$}", raw, width = width),
    }
}

/// Unsigned digits of `n` with `scale` implied decimal places.
fn minor_units(n: Decimal, scale: u32) -> String {
    let mut scaled = n.abs();
    scaled.rescale(scale);
    scaled.mantissa().to_string()
}
