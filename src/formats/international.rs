//! International payments format.
//!
//! Lines are 754 characters followed by CRLF: a header (`01`), one payment
//! record (`03`) per beneficiary, and a trailer (`99`) carrying the payment
//! count and the hash total of payment amounts.

use crate::constraint::Constraint;
use crate::definition::{CrossFieldRule, FieldDef, Justify, RecordDefinition, RecordKind};
use crate::formats::{currency, PaymentFormat, ACCOUNT_PATTERN, BSB_PATTERN};
use crate::money::Money;
use crate::record::{Record, ValidRecord, Value};
use crate::violation::{Violation, ViolationKind};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

pub const LINE_WIDTH: usize = 754;

const DATE_FORMAT: &str = "%d%m%Y";

/// SWIFT-style free text: letters, digits, space and `/ - ? : ( ) . , ' + _`.
const SWIFT_CHARSET: &str = r"^[A-Za-z0-9 /\-?:().,'+_]*$";

/// A standalone two-letter upper case token, i.e. an ISO country code.
const COUNTRY_TOKEN: &str = r"(?:^|[^A-Za-z])[A-Z]{2}(?:[^A-Za-z]|$)";

const BIC_PATTERN: &str = r"^[A-Z]{6}[A-Z0-9]{2}(?:[A-Z0-9]{3})?$";

const ROUTING_TYPES: &[&str] = &["FW", "SC", "CH"];

/// Free-text line of up to 35 SWIFT characters.
fn swift_line(name: &'static str, start: usize, message: &'static str) -> FieldDef {
    FieldDef::text(name, start, 35)
        .check(Constraint::pattern(SWIFT_CHARSET, message))
        .check(Constraint::MaxLength(35))
}

fn has_bank_details(record: &Record) -> bool {
    record.present("beneficiary_bank_name").is_some()
        || record.present("beneficiary_bank_address_1").is_some()
}

pub static HEADER: Lazy<RecordDefinition> = Lazy::new(|| RecordDefinition {
    kind: RecordKind::InternationalHeader,
    line_width: LINE_WIDTH,
    fields: vec![
        FieldDef::text("record_type", 1, 2)
            .default_value("01")
            .check(Constraint::NonBlank)
            .check(Constraint::one_of(&["01"], "Header record type must be 01.")),
        FieldDef::date("processing_date", 3, 8, DATE_FORMAT).check(Constraint::NonBlank),
        FieldDef::text("debit_bsb", 11, 7)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                BSB_PATTERN,
                "Debit bsb is invalid. Required format is 000-000.",
            )),
        FieldDef::text("debit_account", 18, 9)
            .justify(Justify::Right)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                ACCOUNT_PATTERN,
                "Debit account is invalid. Must be up to 9 digits only. Remove dashes and spaces.",
            ))
            .check(Constraint::MaxLength(9)),
        FieldDef::text("debit_currency", 27, 3)
            .check(Constraint::NonBlank)
            .check(Constraint::one_of(
                currency::CODES,
                "Debit currency is not a valid ISO 4217 currency code.",
            )),
        swift_line(
            "customer_name",
            30,
            "Customer name is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        )
        .check(Constraint::NonBlank),
        swift_line(
            "description",
            65,
            "Description is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
    ],
    rules: Vec::new(),
});

pub static PAYMENT: Lazy<RecordDefinition> = Lazy::new(|| RecordDefinition {
    kind: RecordKind::InternationalPayment,
    line_width: LINE_WIDTH,
    fields: vec![
        FieldDef::text("record_type", 1, 2)
            .default_value("03")
            .check(Constraint::NonBlank)
            .check(Constraint::one_of(&["03"], "Payment record type must be 03.")),
        FieldDef::text("currency", 3, 3)
            .check(Constraint::NonBlank)
            .check(Constraint::one_of(
                currency::CODES,
                "Pay currency code is not a valid ISO 4217 currency code.",
            )),
        FieldDef::amount("payment_amount", 6, 17, 2)
            .check(Constraint::NonBlank)
            .check(Constraint::NumericRange {
                min: Decimal::new(1, 2),
                max: Decimal::from(999_999_999_999_999i64),
            }),
        FieldDef::date("value_date", 23, 8, DATE_FORMAT).check(Constraint::NonBlank),
        FieldDef::text("reference", 31, 16)
            .check(Constraint::pattern(
                SWIFT_CHARSET,
                "Reference is invalid. Must be up to 16 characters, including special characters(+-/'?.,()).",
            ))
            .check(Constraint::MaxLength(16)),
        swift_line(
            "beneficiary_name",
            47,
            "Beneficiary name is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        )
        .check(Constraint::NonBlank),
        swift_line(
            "beneficiary_address_1",
            82,
            "Beneficiary address 1 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        )
        .check(Constraint::NonBlank),
        swift_line(
            "beneficiary_address_2",
            117,
            "Beneficiary address 2 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "beneficiary_address_3",
            152,
            "Beneficiary address 3 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        )
        .check(Constraint::pattern(
            COUNTRY_TOKEN,
            "Beneficiary address 3 is invalid. Must contain the 2 letter country ISO code.",
        )),
        FieldDef::text("beneficiary_account_number", 187, 34)
            .check(Constraint::NonBlank)
            .check(Constraint::pattern(
                r"^[A-Za-z0-9\- ]*$",
                "Beneficiary account number is invalid. Must be up to 34 characters consisting of letters, numbers, dashes (-) and spaces.",
            ))
            .check(Constraint::MaxLength(34)),
        swift_line(
            "beneficiary_bank_name",
            221,
            "Beneficiary bank name is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "beneficiary_bank_address_1",
            256,
            "Beneficiary bank address 1 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "beneficiary_bank_address_2",
            291,
            "Beneficiary bank address 2 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "beneficiary_bank_address_3",
            326,
            "Beneficiary bank address 3 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        )
        .check(Constraint::pattern(
            COUNTRY_TOKEN,
            "Beneficiary bank address 3 is invalid. Must contain the 2 letter country ISO code.",
        )),
        FieldDef::text("beneficiary_bank_country_code", 361, 2)
            .check(Constraint::when(has_bank_details, Constraint::NonBlank))
            .check(Constraint::pattern(
                r"^[A-Z]{2}$",
                "Beneficiary bank country code is invalid. Must be 2 upper case letters.",
            )),
        FieldDef::text("beneficiary_bic", 363, 11).check(Constraint::pattern(
            BIC_PATTERN,
            "Beneficiary BIC is invalid. Must be an 8 or 11 character BIC.",
        )),
        FieldDef::text("routing_type", 374, 2).check(Constraint::one_of(
            ROUTING_TYPES,
            "Routing type is invalid. Must be one of FW, SC, CH.",
        )),
        FieldDef::text("routing_code", 376, 11)
            .check(Constraint::pattern(
                r"^[A-Za-z0-9]*$",
                "Routing code is invalid. Must be letters and numbers only.",
            ))
            .check(Constraint::MaxLength(11)),
        FieldDef::text("purpose_of_remittance", 387, 3)
            .check(Constraint::pattern(
                SWIFT_CHARSET,
                "Purpose of remittance is invalid. Must be up to 3 characters, including special characters(+-/'?.,()).",
            ))
            .check(Constraint::MaxLength(3)),
        FieldDef::text("overseas_bank_charges", 390, 1).check(Constraint::one_of(
            &["B", "R"],
            "Overseas bank charges is invalid. Must be one of B, R.",
        )),
        FieldDef::text("remitter_name", 391, 35)
            .check(Constraint::pattern(
                r"^[A-Za-z0-9 ]*$",
                "Remitter name is invalid. Must be up to 35 letters and numbers.",
            ))
            .check(Constraint::MaxLength(35)),
        FieldDef::integer("refinance_days", 426, 3)
            .justify(Justify::ZeroOrBlank)
            .check(Constraint::range(7, 365)),
        FieldDef::date("refinance_date", 429, 8, DATE_FORMAT),
        swift_line(
            "additional_beneficiary_instructions_1",
            437,
            "Additional beneficiary instructions 1 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "additional_beneficiary_instructions_2",
            472,
            "Additional beneficiary instructions 2 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "additional_beneficiary_instructions_3",
            507,
            "Additional beneficiary instructions 3 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "additional_beneficiary_instructions_4",
            542,
            "Additional beneficiary instructions 4 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "additional_instructions_to_bank",
            577,
            "Additional instructions to bank is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "originating_applicant_details_1",
            612,
            "Originating applicant details 1 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "originating_applicant_details_2",
            647,
            "Originating applicant details 2 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "originating_applicant_details_3",
            682,
            "Originating applicant details 3 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        swift_line(
            "originating_applicant_details_4",
            717,
            "Originating applicant details 4 is invalid. Must be up to 35 characters, including special characters(+-/'?.,()).",
        ),
        FieldDef::integer("detail_record_count", 752, 3)
            .check(Constraint::NonBlank)
            .check(Constraint::range(0, 999)),
    ],
    rules: vec![CrossFieldRule {
        name: "routing_pair",
        check: routing_pair,
    }],
});

pub static TRAILER: Lazy<RecordDefinition> = Lazy::new(|| RecordDefinition {
    kind: RecordKind::InternationalTrailer,
    line_width: LINE_WIDTH,
    fields: vec![
        FieldDef::text("record_type", 1, 2)
            .default_value("99")
            .check(Constraint::one_of(&["99"], "Trailer record type must be 99.")),
        FieldDef::integer("payment_count", 3, 6).check(Constraint::range(0, 999_999)),
        FieldDef::amount("total_amount", 9, 20, 2)
            .check(Constraint::range(0, 999_999_999_999_999_999)),
    ],
    rules: Vec::new(),
});

/// Routing type and routing code must be set together or not at all.
pub fn routing_pair(record: &Record) -> Option<Violation> {
    let has_type = record.present("routing_type").is_some();
    let has_code = record.present("routing_code").is_some();

    match (has_type, has_code) {
        (false, true) => Some(Violation::field(
            "routing_type",
            ViolationKind::CrossField,
            "Please check payment record routing type. It should be set, because you set routing code.",
        )),
        (true, false) => Some(Violation::field(
            "routing_code",
            ViolationKind::CrossField,
            "Please check payment record routing code. It should be set, because you set routing type.",
        )),
        _ => None,
    }
}

pub fn header_record() -> Record {
    Record::new(&HEADER)
}

pub fn payment_record() -> Record {
    Record::new(&PAYMENT)
}

/// International payments family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct International;

impl PaymentFormat for International {
    const NAME: &'static str = "international";

    fn header_definition() -> &'static RecordDefinition {
        &HEADER
    }

    fn detail_definition() -> &'static RecordDefinition {
        &PAYMENT
    }

    fn trailer_definition() -> &'static RecordDefinition {
        &TRAILER
    }

    /// Every payment record declares the batch size; all must agree with reality.
    fn batch_rules(details: &[Record]) -> Vec<Violation> {
        let actual = Decimal::from(details.len() as u64);
        let mismatch = details
            .iter()
            .filter_map(|d| d.present("detail_record_count").and_then(Value::to_number))
            .find(|declared| *declared != actual);

        match mismatch {
            Some(declared) => vec![Violation::batch(format!(
                "Declared number of detail records ({}) does not match the {} payment record(s) in the batch.",
                declared, actual
            ))],
            None => Vec::new(),
        }
    }

    fn build_trailer(_header: &ValidRecord, details: &[ValidRecord]) -> Record {
        let total: Money = details
            .iter()
            .map(|d| Money::new(d.number("payment_amount").unwrap_or_default()))
            .sum();

        let mut trailer = Record::new(&TRAILER);
        trailer.fill("payment_count", Value::Decimal(Decimal::from(details.len() as u64)));
        trailer.fill("total_amount", Value::from(total));
        trailer
    }
}
