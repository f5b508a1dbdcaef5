//! File writer.
//!
//! Concatenates the encoded header, detail and trailer lines of an
//! [`EncodableBatch`] in order, each followed by the family's line ending.
//! The byte stream is returned to the caller; writing it anywhere is the
//! caller's business.

use crate::assembler::EncodableBatch;
use crate::encoder::encode;
use crate::formats::PaymentFormat;

/// Encoded lines without terminators: header, details in order, trailer.
pub fn lines<F: PaymentFormat>(batch: &EncodableBatch<F>) -> Vec<String> {
    let mut lines = Vec::with_capacity(batch.line_count());
    lines.push(encode(batch.header()));
    lines.extend(batch.details().iter().map(encode));
    lines.push(encode(batch.trailer()));
    lines
}

/// Renders the complete file.
pub fn write<F: PaymentFormat>(batch: &EncodableBatch<F>) -> Vec<u8> {
    let mut out = String::new();
    for line in lines(batch) {
        out.push_str(&line);
        out.push_str(F::LINE_ENDING);
    }
    out.into_bytes()
}
