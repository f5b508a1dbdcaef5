//! Edge case tests for batch validation and encoding.
//!
//! These drive the library directly, without the CLI.

use payment_batch::formats::{aba, international};
use payment_batch::{
    assemble, validate, write, Aba, International, Location, Record, TrailerFields,
    ViolationKind,
};
use std::thread;

fn aba_header() -> Record {
    aba::header_record()
        .with("institution", "WBC")
        .and_then(|r| r.with("user_name", "ACME PTY LTD"))
        .and_then(|r| r.with("user_id", "654321"))
        .and_then(|r| r.with("description", "CREDITORS"))
        .and_then(|r| r.with("processing_date", "2024-02-29"))
        .and_then(|r| r.with("trace_bsb", "032-000"))
        .and_then(|r| r.with("trace_account", "123456"))
        .unwrap()
}

fn aba_detail(amount: i64) -> Record {
    aba::detail_record()
        .with("bsb", "062-000")
        .and_then(|r| r.with("account_number", "12345678"))
        .and_then(|r| r.with("transaction_code", "50"))
        .and_then(|r| r.with("amount", amount))
        .and_then(|r| r.with("account_name", "JOHN SMITH"))
        .and_then(|r| r.with("reference", "PAY0001"))
        .unwrap()
}

fn intl_header() -> Record {
    international::header_record()
        .with("processing_date", "2024-03-01")
        .and_then(|r| r.with("debit_bsb", "083-170"))
        .and_then(|r| r.with("debit_account", "739827524"))
        .and_then(|r| r.with("debit_currency", "AUD"))
        .and_then(|r| r.with("customer_name", "ACME PTY LTD"))
        .unwrap()
}

fn intl_payment(amount: &str, declared: i64) -> Record {
    international::payment_record()
        .with("currency", "EUR")
        .and_then(|r| r.with("payment_amount", amount))
        .and_then(|r| r.with("value_date", "2024-03-04"))
        .and_then(|r| r.with("beneficiary_name", "VANDELAY INDUSTRIES"))
        .and_then(|r| r.with("beneficiary_address_1", "KAISERSTRASSE 1"))
        .and_then(|r| r.with("beneficiary_account_number", "DE89370400440532013000"))
        .and_then(|r| r.with("detail_record_count", declared))
        .unwrap()
}

fn aba_lines(details: Vec<Record>) -> Vec<String> {
    let batch = assemble::<Aba>(aba_header(), details, TrailerFields::default()).unwrap();
    String::from_utf8(write(&batch))
        .unwrap()
        .split_terminator("\r\n")
        .map(str::to_string)
        .collect()
}

// ==================== LINE SHAPE ====================

#[test]
fn test_every_line_has_fixed_width() {
    for count in [1, 2, 17] {
        let lines = aba_lines((1..=count).map(aba_detail).collect());
        assert_eq!(lines.len(), count as usize + 2);
        assert!(lines.iter().all(|l| l.chars().count() == 120));
    }
}

#[test]
fn test_maximum_width_values_fill_columns_exactly() {
    let detail = aba_detail(9_999_999_999)
        .with("account_number", "123456789")
        .and_then(|r| r.with("account_name", "X".repeat(32)))
        .and_then(|r| r.with("reference", "Y".repeat(18)))
        .and_then(|r| r.with("remitter", "Z".repeat(16)))
        .unwrap();
    let lines = aba_lines(vec![detail]);

    let line = &lines[1];
    assert_eq!(&line[8..17], "123456789");
    assert_eq!(&line[20..30], "9999999999");
    assert_eq!(&line[30..62], "X".repeat(32));
    assert_eq!(&line[62..80], "Y".repeat(18));
    assert_eq!(&line[96..112], "Z".repeat(16));
}

#[test]
fn test_zero_amount_detail_is_allowed() {
    let lines = aba_lines(vec![aba_detail(0)]);
    assert_eq!(&lines[1][20..30], "0000000000");
    assert_eq!(&lines[2][20..30], "0000000000");
}

// ==================== REQUIRED FIELDS ====================

#[test]
fn test_blank_required_field_reported() {
    for field in ["bsb", "account_number", "account_name", "reference", "transaction_code"] {
        let mut record = aba_detail(100);
        record.set(field, "   ").unwrap();
        let violations = validate(&record);
        assert!(
            violations
                .iter()
                .any(|v| v.field == Some(field) && v.kind == ViolationKind::Blank),
            "{} should be required",
            field
        );

        let rejected = assemble::<Aba>(aba_header(), vec![record], TrailerFields::default());
        assert!(rejected.is_err());
    }
}

#[test]
fn test_absent_and_unparseable_are_distinct() {
    let mut absent = aba_detail(100);
    absent.clear("amount").unwrap();
    assert_eq!(validate(&absent)[0].kind, ViolationKind::Blank);

    let mut garbage = aba_detail(100);
    garbage.set("amount", "1,000").unwrap();
    assert_eq!(validate(&garbage)[0].kind, ViolationKind::NotANumber);
}

#[test]
fn test_amount_limits() {
    let mut over = aba_detail(100);
    over.set("amount", 10_000_000_000i64).unwrap();
    assert_eq!(validate(&over)[0].kind, ViolationKind::OutOfRange);

    let mut negative = aba_detail(100);
    negative.set("amount", -1i64).unwrap();
    assert_eq!(validate(&negative)[0].kind, ViolationKind::OutOfRange);

    let mut cents = aba_detail(100);
    cents.set("amount", "10.5").unwrap();
    assert_eq!(validate(&cents)[0].kind, ViolationKind::NotANumber);
}

#[test]
fn test_impossible_date_rejected() {
    let mut header = aba_header();
    header.set("processing_date", "2023-02-29").unwrap();
    let violations = validate(&header);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, Some("processing_date"));
    assert_eq!(violations[0].kind, ViolationKind::InvalidDate);
}

#[test]
fn test_unknown_field_name_is_an_error() {
    assert!(aba_detail(1).with("colour", "red").is_err());
}

// ==================== BATCH RULES ====================

#[test]
fn test_trailer_count_matches_details() {
    for count in [1usize, 3, 12] {
        let details = (0..count).map(|i| aba_detail(i as i64 + 1)).collect();
        let batch = assemble::<Aba>(aba_header(), details, TrailerFields::default()).unwrap();
        assert_eq!(
            batch.trailer().number("record_count").unwrap(),
            rust_decimal::Decimal::from(count as u64)
        );
    }
}

#[test]
fn test_declared_count_mismatch() {
    let violations = assemble::<Aba>(
        aba_header(),
        vec![aba_detail(1), aba_detail(2)],
        TrailerFields {
            declared_count: Some(3),
        },
    )
    .unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].location, Some(Location::Batch));

    let ok = assemble::<Aba>(
        aba_header(),
        vec![aba_detail(1), aba_detail(2)],
        TrailerFields {
            declared_count: Some(2),
        },
    );
    assert!(ok.is_ok());
}

#[test]
fn test_all_violations_collected_across_records() {
    let mut details: Vec<Record> = (1..=5).map(aba_detail).collect();
    details[1].set("bsb", "62-000").unwrap();
    details[3].set("indicator", "W").unwrap();
    details[4].set("account_name", "").unwrap();

    let violations =
        assemble::<Aba>(aba_header(), details, TrailerFields::default()).unwrap_err();
    let located: Vec<_> = violations.iter().map(|v| (v.location, v.field)).collect();
    assert_eq!(
        located,
        vec![
            (Some(Location::Detail(2)), Some("bsb")),
            (Some(Location::Detail(4)), Some("indicator")),
            (Some(Location::Detail(5)), Some("account_name")),
        ]
    );
}

// ==================== INTERNATIONAL ====================

#[test]
fn test_international_batch_totals() {
    let details = vec![
        intl_payment("100.10", 3),
        intl_payment("0.01", 3),
        intl_payment("1999.99", 3),
    ];
    let batch =
        assemble::<International>(intl_header(), details, TrailerFields::default()).unwrap();
    let text = String::from_utf8(write(&batch)).unwrap();
    let lines: Vec<_> = text.split_terminator("\r\n").collect();

    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|l| l.len() == 754));
    let trailer = lines[4];
    assert_eq!(&trailer[2..8], "000003");
    assert_eq!(&trailer[8..28], "00000000000000210010");
}

#[test]
fn test_international_declared_count_disagrees() {
    let details = vec![intl_payment("10.00", 1), intl_payment("20.00", 1)];
    let violations =
        assemble::<International>(intl_header(), details, TrailerFields::default()).unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::Batch);
}

#[test]
fn test_international_routing_pair_in_batch() {
    let detail = intl_payment("10.00", 1).with("routing_code", "ABC123").unwrap();
    let violations =
        assemble::<International>(intl_header(), vec![detail], TrailerFields::default())
            .unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].location, Some(Location::Detail(1)));
    assert_eq!(violations[0].kind, ViolationKind::CrossField);
}

// ==================== DETERMINISM / CONCURRENCY ====================

#[test]
fn test_concurrent_assembly_is_identical() {
    let expected = aba_lines((1..=20).map(aba_detail).collect());

    let outputs: Vec<Vec<String>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| aba_lines((1..=20).map(aba_detail).collect())))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for output in outputs {
        assert_eq!(output, expected);
    }
}
