//! Domestic direct-entry (ABA / Cemtex) format.
//!
//! Every line is 120 characters followed by CRLF:
//!
//! - descriptive record (type `0`) carrying the user and processing date,
//! - one detail record (type `1`) per payment instruction,
//! - a file total record (type `7`) with net/credit/debit totals and a count.
//!
//! The trace BSB and account are supplied once on the header and stamped
//! onto every detail line by the assembler.

use crate::constraint::Constraint;
use crate::definition::{CrossFieldRule, FieldDef, FieldKind, Justify, RecordDefinition, RecordKind};
use crate::formats::{PaymentFormat, ACCOUNT_PATTERN, BSB_PATTERN};
use crate::money::Money;
use crate::record::{Record, ValidRecord, Value};
use crate::violation::{Violation, ViolationKind};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

pub const LINE_WIDTH: usize = 120;

/// Characters the clearing system accepts in free text fields.
const ABA_CHARSET: &str = r"^[A-Za-z0-9 _?^\[\],.+\-/;:=#*()\&%!$@]*$";

/// Indicators that declare tax has been withheld from the payment.
pub const WITHHOLDING_INDICATORS: &[&str] = &["W", "X", "Y"];

const INDICATORS: &[&str] = &["N", "T", "W", "X", "Y"];

/// Legal transaction codes for a detail record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionCode {
    ExternallyInitiatedDebit,
    ExternallyInitiatedCredit,
    AustralianGovernmentSecurityInterest,
    FamilyAllowance,
    Payroll,
    Pension,
    Allotment,
    Dividend,
    DebentureOrNoteInterest,
}

impl TransactionCode {
    pub const ALL: [TransactionCode; 9] = [
        TransactionCode::ExternallyInitiatedDebit,
        TransactionCode::ExternallyInitiatedCredit,
        TransactionCode::AustralianGovernmentSecurityInterest,
        TransactionCode::FamilyAllowance,
        TransactionCode::Payroll,
        TransactionCode::Pension,
        TransactionCode::Allotment,
        TransactionCode::Dividend,
        TransactionCode::DebentureOrNoteInterest,
    ];

    /// Two-digit wire codes, in the same order as [`TransactionCode::ALL`].
    pub const CODES: &'static [&'static str] = &["13", "50", "51", "52", "53", "54", "55", "56", "57"];

    pub fn code(&self) -> &'static str {
        match self {
            TransactionCode::ExternallyInitiatedDebit => "13",
            TransactionCode::ExternallyInitiatedCredit => "50",
            TransactionCode::AustralianGovernmentSecurityInterest => "51",
            TransactionCode::FamilyAllowance => "52",
            TransactionCode::Payroll => "53",
            TransactionCode::Pension => "54",
            TransactionCode::Allotment => "55",
            TransactionCode::Dividend => "56",
            TransactionCode::DebentureOrNoteInterest => "57",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.iter().copied().find(|tc| tc.code() == code)
    }

    /// Only code 13 draws funds from the target account.
    pub fn is_debit(&self) -> bool {
        matches!(self, TransactionCode::ExternallyInitiatedDebit)
    }
}

impl From<TransactionCode> for Value {
    fn from(code: TransactionCode) -> Self {
        Value::Text(code.code().to_string())
    }
}

pub static HEADER: Lazy<RecordDefinition> = Lazy::new(|| RecordDefinition {
    kind: RecordKind::AbaHeader,
    line_width: LINE_WIDTH,
    fields: vec![
        FieldDef::text("record_type", 1, 1)
            .default_value("0")
            .check(Constraint::NonBlank)
            .check(Constraint::one_of(&["0"], "Descriptive record type must be 0.")),
        FieldDef::integer("reel_sequence", 19, 2)
            .default_value("1")
            .check(Constraint::NonBlank)
            .check(Constraint::range(1, 99)),
        FieldDef::text("institution", 21, 3)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                r"^[A-Z]{3}$",
                "Financial institution is invalid. Must be a 3 letter upper case abbreviation.",
            )),
        FieldDef::text("user_name", 31, 26)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                ABA_CHARSET,
                "User name is invalid. Contains characters that are not allowed.",
            ))
            .check(Constraint::MaxLength(26)),
        FieldDef::text("user_id", 57, 6)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                r"^[0-9]*$",
                "User id is invalid. Must be the 6 digit APCA user identification number.",
            ))
            .check(Constraint::ExactLength(6)),
        FieldDef::text("description", 63, 12)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                ABA_CHARSET,
                "Description is invalid. Contains characters that are not allowed.",
            ))
            .check(Constraint::MaxLength(12)),
        // Two-digit year on the wire: only one century is representable.
        FieldDef::date("processing_date", 75, 6, "%d%m%y")
            .years(2000, 2099)
            .check(Constraint::NonBlank),
        FieldDef::unplaced("trace_bsb", FieldKind::Text)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                BSB_PATTERN,
                "Trace bsb is invalid. Required format is 000-000.",
            )),
        FieldDef::unplaced("trace_account", FieldKind::Text)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                ACCOUNT_PATTERN,
                "Trace account is invalid. Must be up to 9 digits only. Remove dashes and spaces.",
            ))
            .check(Constraint::MaxLength(9)),
    ],
    rules: Vec::new(),
});

pub static DETAIL: Lazy<RecordDefinition> = Lazy::new(|| RecordDefinition {
    kind: RecordKind::AbaDetail,
    line_width: LINE_WIDTH,
    fields: vec![
        FieldDef::text("record_type", 1, 1)
            .default_value("1")
            .check(Constraint::NonBlank)
            .check(Constraint::one_of(&["1"], "Detail record type must be 1.")),
        FieldDef::text("bsb", 2, 7)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                BSB_PATTERN,
                "Bsb is invalid. Required format is 000-000.",
            )),
        FieldDef::text("account_number", 9, 9)
            .justify(Justify::Right)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                ACCOUNT_PATTERN,
                "Account number is invalid. Must be up to 9 digits only. Remove dashes and spaces.",
            ))
            .check(Constraint::MaxLength(9)),
        FieldDef::text("indicator", 18, 1).check(Constraint::one_of(
            INDICATORS,
            "Transaction indicator is invalid. Must be one of N, T, W, X, Y or empty.",
        )),
        FieldDef::text("transaction_code", 19, 2)
            .check(Constraint::NonBlank)
            .check(Constraint::one_of(
                TransactionCode::CODES,
                "Transaction code is invalid. Must be one of 13, 50, 51, 52, 53, 54, 55, 56 or 57.",
            )),
        FieldDef::integer("amount", 21, 10)
            .check(Constraint::NonBlank)
            .check(Constraint::range(0, 9_999_999_999)),
        FieldDef::text("account_name", 31, 32)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                ABA_CHARSET,
                "Account name is invalid. Contains characters that are not allowed.",
            ))
            .check(Constraint::MaxLength(32)),
        FieldDef::text("reference", 63, 18)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                ABA_CHARSET,
                "Reference is invalid. Contains characters that are not allowed.",
            ))
            .check(Constraint::MaxLength(18)),
        // Stamped from the header; validated there.
        FieldDef::text("trace_bsb", 81, 7),
        FieldDef::text("trace_account", 88, 9).justify(Justify::Right),
        FieldDef::text("remitter", 97, 16)
            .check(Constraint::pattern(
                ABA_CHARSET,
                "Remitter is invalid. Contains characters that are not allowed.",
            ))
            .check(Constraint::MaxLength(16)),
        FieldDef::integer("withholding_tax", 113, 8).check(Constraint::range(0, 99_999_999)),
    ],
    rules: vec![CrossFieldRule {
        name: "withholding_required",
        check: withholding_required,
    }],
});

pub static TRAILER: Lazy<RecordDefinition> = Lazy::new(|| RecordDefinition {
    kind: RecordKind::AbaTrailer,
    line_width: LINE_WIDTH,
    fields: vec![
        FieldDef::text("record_type", 1, 1)
            .default_value("7")
            .check(Constraint::one_of(&["7"], "File total record type must be 7.")),
        FieldDef::text("bsb_filler", 2, 7)
            .default_value("999-999")
            .check(Constraint::one_of(&["999-999"], "File total BSB filler must be 999-999.")),
        FieldDef::integer("net_total", 21, 10).check(Constraint::range(0, 9_999_999_999)),
        FieldDef::integer("credit_total", 31, 10).check(Constraint::range(0, 9_999_999_999)),
        FieldDef::integer("debit_total", 41, 10).check(Constraint::range(0, 9_999_999_999)),
        FieldDef::integer("record_count", 75, 6).check(Constraint::range(0, 999_999)),
    ],
    rules: Vec::new(),
});

/// Indicator W, X or Y requires a present, non-zero withholding amount.
pub fn withholding_required(record: &Record) -> Option<Violation> {
    let indicator = record.present("indicator")?.to_text();
    if !WITHHOLDING_INDICATORS.contains(&indicator.as_str()) {
        return None;
    }

    let missing = match record.present("withholding_tax") {
        None => true,
        Some(value) => value.to_number().map(|n| n.is_zero()).unwrap_or(false),
    };
    if !missing {
        return None;
    }

    Some(Violation::field(
        "indicator",
        ViolationKind::CrossField,
        "If indicator is either W, X or Y then withholding tax must be set to a non-zero amount.",
    ))
}

pub fn header_record() -> Record {
    Record::new(&HEADER)
}

pub fn detail_record() -> Record {
    Record::new(&DETAIL)
}

/// Domestic direct-entry family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aba;

impl PaymentFormat for Aba {
    const NAME: &'static str = "aba";

    fn header_definition() -> &'static RecordDefinition {
        &HEADER
    }

    fn detail_definition() -> &'static RecordDefinition {
        &DETAIL
    }

    fn trailer_definition() -> &'static RecordDefinition {
        &TRAILER
    }

    fn prepare_detail(header: &Record, detail: &mut Record) {
        for name in ["trace_bsb", "trace_account"] {
            if let Some(value) = header.present(name) {
                detail.fill(name, value.clone());
            }
        }
    }

    fn build_trailer(_header: &ValidRecord, details: &[ValidRecord]) -> Record {
        let mut credit_total = Money::ZERO;
        let mut debit_total = Money::ZERO;

        for detail in details {
            let amount = Money::from_minor_units(detail.number("amount").unwrap_or_default());
            let is_debit = detail
                .text("transaction_code")
                .and_then(TransactionCode::from_code)
                .map(|tc| tc.is_debit())
                .unwrap_or(false);
            if is_debit {
                debit_total += amount;
            } else {
                credit_total += amount;
            }
        }

        let mut trailer = Record::new(&TRAILER);
        // Amounts on the wire are whole cents.
        let net_total = (credit_total - debit_total).abs();
        trailer.fill("net_total", Value::Decimal(net_total.minor_units()));
        trailer.fill("credit_total", Value::Decimal(credit_total.minor_units()));
        trailer.fill("debit_total", Value::Decimal(debit_total.minor_units()));
        trailer.fill("record_count", Value::Decimal(Decimal::from(details.len() as u64)));
        trailer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate;

    fn detail_with(indicator: Option<&str>, withholding: Option<i64>) -> Record {
        let mut record = detail_record();
        record
            .set("bsb", "062-000")
            .and_then(|r| r.set("account_number", "12345678"))
            .and_then(|r| r.set("transaction_code", TransactionCode::Payroll))
            .and_then(|r| r.set("amount", 150_000i64))
            .and_then(|r| r.set("account_name", "JOHN SMITH"))
            .and_then(|r| r.set("reference", "PAY0001"))
            .unwrap();
        if let Some(i) = indicator {
            record.set("indicator", i).unwrap();
        }
        if let Some(w) = withholding {
            record.set("withholding_tax", w).unwrap();
        }
        record
    }

    #[test]
    fn test_transaction_codes() {
        assert_eq!(TransactionCode::from_code("53"), Some(TransactionCode::Payroll));
        assert_eq!(TransactionCode::from_code("99"), None);
        assert!(TransactionCode::ExternallyInitiatedDebit.is_debit());
        assert!(!TransactionCode::Dividend.is_debit());
        let codes: Vec<_> = TransactionCode::ALL.iter().map(|tc| tc.code()).collect();
        assert_eq!(codes, TransactionCode::CODES);
    }

    #[test]
    fn test_withholding_indicator_without_amount() {
        for withholding in [None, Some(0)] {
            let violations = validate(&detail_with(Some("W"), withholding));
            assert_eq!(violations.len(), 1, "withholding {:?}", withholding);
            assert_eq!(violations[0].kind, ViolationKind::CrossField);
            assert_eq!(violations[0].field, Some("indicator"));
        }
    }

    #[test]
    fn test_withholding_indicator_with_amount_is_clean() {
        assert!(validate(&detail_with(Some("W"), Some(2_500))).is_empty());
        assert!(validate(&detail_with(Some("Y"), Some(1))).is_empty());
    }

    #[test]
    fn test_other_indicators_do_not_require_withholding() {
        assert!(validate(&detail_with(Some("N"), None)).is_empty());
        assert!(validate(&detail_with(None, Some(0))).is_empty());
    }

    #[test]
    fn test_unparseable_withholding_reported_once() {
        let mut record = detail_with(Some("X"), None);
        record.set("withholding_tax", "ten").unwrap();
        let violations = validate(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::NotANumber);
    }

    #[test]
    fn test_charset_rejects_line_breaks() {
        let mut record = detail_with(None, None);
        record.set("account_name", "JOHN\nSMITH").unwrap();
        let violations = validate(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Pattern);
    }

    #[test]
    fn test_unknown_indicator_and_code() {
        let mut record = detail_with(Some("Q"), None);
        record.set("transaction_code", 99i64).unwrap();
        let kinds: Vec<_> = validate(&record).iter().map(|v| (v.field, v.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (Some("indicator"), ViolationKind::NotAllowed),
                (Some("transaction_code"), ViolationKind::NotAllowed)
            ]
        );
    }

    #[test]
    fn test_processing_date_limited_to_two_digit_year_century() {
        let header = |date: &str| {
            header_record()
                .with("institution", "NAB")
                .and_then(|r| r.with("user_name", "ACME PTY LTD"))
                .and_then(|r| r.with("user_id", "123456"))
                .and_then(|r| r.with("description", "PAYROLL"))
                .and_then(|r| r.with("processing_date", date))
                .and_then(|r| r.with("trace_bsb", "083-170"))
                .and_then(|r| r.with("trace_account", "739827524"))
                .unwrap()
        };
        assert!(validate(&header("2099-12-31")).is_empty());

        let violations = validate(&header("2150-01-15"));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, Some("processing_date"));
        assert_eq!(violations[0].kind, ViolationKind::OutOfRange);
    }

    #[test]
    fn test_header_requires_trace_account() {
        let header = header_record()
            .with("institution", "NAB")
            .and_then(|r| r.with("user_name", "ACME PTY LTD"))
            .and_then(|r| r.with("user_id", "123456"))
            .and_then(|r| r.with("description", "PAYROLL"))
            .and_then(|r| r.with("processing_date", "2024-01-15"))
            .and_then(|r| r.with("trace_bsb", "083-170"))
            .unwrap();
        let violations = validate(&header);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, Some("trace_account"));
    }
}
