//! CSV input for the command line tool.
//!
//! The first row names the fields; each following row becomes one
//! [`Record`] of the given definition. Cells are trimmed and empty cells are
//! left unset so field defaults still apply. A column the definition does not
//! declare is an error rather than something silently ignored.

use crate::definition::RecordDefinition;
use crate::error::{CodecError, Result};
use crate::record::Record;
use csv::{ReaderBuilder, Trim};
use log::debug;
use std::io::Read;

/// Reads every row of `reader` as a record of `definition`.
pub fn read_records<R: Read>(
    reader: R,
    definition: &'static RecordDefinition,
) -> Result<Vec<Record>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(false)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    if let Some(unknown) = columns.iter().find(|c| definition.index_of(c).is_none()) {
        return Err(CodecError::UnknownField {
            record: definition.kind.name(),
            field: unknown.clone(),
        });
    }

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let mut record = Record::new(definition);
        for (column, cell) in columns.iter().zip(row.iter()) {
            if !cell.is_empty() {
                record.set(column, cell)?;
            }
        }
        records.push(record);
    }

    debug!("Read {} {} record(s)", records.len(), definition.kind.name());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::aba;
    use crate::record::Value;
    use std::io::Cursor;

    #[test]
    fn test_reads_rows_in_order() {
        let csv = "bsb,account_number,amount\n062-000, 12345678 ,100\n083-170,1,\n";
        let records = read_records(Cursor::new(csv), &aba::DETAIL).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("account_number"), Some(&Value::from("12345678")));
        assert_eq!(records[1].get("bsb"), Some(&Value::from("083-170")));
        assert_eq!(records[1].get("amount"), None);
        // Defaults survive rows that do not mention the field.
        assert_eq!(records[0].get("record_type"), Some(&Value::from("1")));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let csv = "bsb,colour\n062-000,red\n";
        let err = read_records(Cursor::new(csv), &aba::DETAIL).unwrap_err();
        assert!(matches!(err, CodecError::UnknownField { ref field, .. } if field == "colour"));
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let csv = "bsb,amount\n062-000\n";
        let err = read_records(Cursor::new(csv), &aba::DETAIL).unwrap_err();
        assert!(matches!(err, CodecError::Csv(_)));
    }
}
