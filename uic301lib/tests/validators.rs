mod common;

use common::*;
use uic301lib::{
    config::ParserConfig,
    model::{NetBalanceType, StatementCurrencyPeriod},
    parser::Parser,
    validate::cross::{HEADER_CONSISTENCY, LINE_COUNTS, SUM_CONSISTENCY},
};

#[test]
fn header_consistency_reports_rail_union_mismatch() {
    let lines = [
        "14111000011851180190100000049000001".to_string(),
        g4_detail("1188", "1180", "190100", "EUR", "01", Amounts::debit(420)),
        total("141130000", "1185", "1180", "190100", "EUR", "01", Amounts::debit(420), "2", 420),
    ];
    let docs = parse(&lines);
    let doc = docs.get(0).expect("document");
    let violation = doc
        .violations()
        .iter()
        .find(|v| v.validator == HEADER_CONSISTENCY)
        .expect("header violation");
    assert_eq!(
        violation.message,
        "Rail Union Compiling mismatch: line #2, header='1185', detail='1188'"
    );
    assert_eq!(violation.mismatches.len(), 1);
    assert!(!doc.is_valid());
}

#[test]
fn header_consistency_enumerates_every_mismatch() {
    let lines = [
        header("141110000", "1185", "1180", "190100", 1, 1),
        g4_detail("1188", "1181", "190200", "EUR", "01", Amounts::debit(420)),
        total("141130000", "1185", "1180", "190200", "EUR", "01", Amounts::debit(420), "2", 420),
    ];
    let docs = parse(&lines);
    let violation = docs.get(0).expect("document").violations()[0].clone();
    assert_eq!(violation.validator, HEADER_CONSISTENCY);
    assert_eq!(
        violation.mismatches,
        [
            "Rail Union Compiling mismatch: line #2, header='1185', detail='1188'",
            "Rail Union Receiving mismatch: line #2, header='1180', detail='1181'",
            "Statement period mismatch: line #2, header='190100', detail='190200'",
            "Statement period mismatch: line #3, header='190100', total='190200'",
        ]
    );
}

#[test]
fn sum_consistency_reports_gross_debit_mismatch() {
    let lines = [
        header("141110000", "1185", "1180", "190100", 1, 1),
        g4_detail("1185", "1180", "190100", "EUR", "01", Amounts::debit(420)),
        total("141130000", "1185", "1180", "190100", "EUR", "01", Amounts::debit(430), "2", 420),
    ];
    let docs = parse(&lines);
    let doc = docs.get(0).expect("document");
    assert_eq!(doc.violations().len(), 1);
    let violation = &doc.violations()[0];
    assert_eq!(violation.validator, SUM_CONSISTENCY);
    assert_eq!(violation.message, "Gross debit mismatch: total=000000000430, sum details=4.20");
    assert!(!doc.is_valid());
    assert_eq!(doc.error_count(), 1);
}

#[test]
fn total_without_matching_details_is_reported() {
    let lines = [
        header("141110000", "1185", "1180", "190100", 1, 2),
        g4_detail("1185", "1180", "190100", "EUR", "01", Amounts::debit(420)),
        total("141130000", "1185", "1180", "190100", "EUR", "01", Amounts::debit(420), "2", 420),
        total("141130000", "1185", "1180", "190100", "CHF", "02", Amounts::debit(420), "2", 420),
    ];
    let docs = parse(&lines);
    let violation = &docs.get(0).expect("document").violations()[0];
    assert_eq!(violation.message, "No details for total: line #4, currency/period CHF/02");
}

#[test]
fn net_balance_type_mismatch_is_reported() {
    let lines = [
        header("141110000", "1185", "1180", "190100", 1, 1),
        g4_detail("1185", "1180", "190100", "EUR", "01", Amounts::debit(420)),
        total("141130000", "1185", "1180", "190100", "EUR", "01", Amounts::debit(420), "1", 420),
    ];
    let docs = parse(&lines);
    let violation = &docs.get(0).expect("document").violations()[0];
    assert_eq!(violation.message, "Net balance type mismatch: total=DEBIT, sum details=CREDIT");
}

#[test]
fn g5_net_balance_is_credit_minus_debit() {
    let a = Amounts { gross_debit: 250, gross_credit: 1000, commission_debit: 50, commission_credit: 0 };
    let lines = [
        header("151110000", "1185", "1180", "190100", 1, 1),
        g5_detail("151120000", "1185", "1180", "190100", "EUR", "01", a),
        total("151130000", "1185", "1180", "190100", "EUR", "01", a, "2", 700),
    ];
    let docs = parse(&lines);
    let doc = docs.get(0).expect("document");
    let bucket = &doc.details().amounts()[&StatementCurrencyPeriod::new("EUR", "01")];
    assert_eq!(bucket.net_balance_type(), NetBalanceType::Credit);
    assert_eq!(bucket.net_balance_amount().to_string(), "7.00");
    assert_eq!(bucket.gross_credited().to_string(), "10.00");
    assert!(doc.is_valid(), "{:?}", doc.violations());
}

#[test]
fn g4_net_balance_is_debit_minus_credit() {
    let a = Amounts { gross_debit: 1000, gross_credit: 250, commission_debit: 50, commission_credit: 0 };
    let lines = [
        header("141110000", "1185", "1180", "190100", 1, 1),
        g4_detail("1185", "1180", "190100", "EUR", "01", a),
        total("141130000", "1185", "1180", "190100", "EUR", "01", a, "2", 800),
    ];
    let docs = parse(&lines);
    let doc = docs.get(0).expect("document");
    let bucket = &doc.details().amounts()[&StatementCurrencyPeriod::new("EUR", "01")];
    assert_eq!(bucket.net_balance_type(), NetBalanceType::Credit);
    assert_eq!(bucket.net_balance_amount().to_string(), "8.00");
    assert!(doc.is_valid(), "{:?}", doc.violations());
}

#[test]
fn negative_net_balance_is_debit_magnitude() {
    let a = Amounts { gross_debit: 100, gross_credit: 500, ..Amounts::default() };
    let lines = [
        header("141110000", "1185", "1180", "190100", 1, 1),
        g4_detail("1185", "1180", "190100", "EUR", "01", a),
        total("141130000", "1185", "1180", "190100", "EUR", "01", a, "1", 400),
    ];
    let docs = parse(&lines);
    let doc = docs.get(0).expect("document");
    let bucket = &doc.details().amounts()[&StatementCurrencyPeriod::new("EUR", "01")];
    assert_eq!(bucket.net_balance_type(), NetBalanceType::Debit);
    assert_eq!(bucket.net_balance_amount().to_string(), "4.00");
    assert!(doc.is_valid(), "{:?}", doc.violations());
}

#[test]
fn balanced_details_have_no_net_balance() {
    let a = Amounts { gross_debit: 300, gross_credit: 300, ..Amounts::default() };
    let lines = [
        header("152110000", "1185", "1180", "190100", 2, 1),
        g5_detail("152120000", "1185", "1180", "190100", "EUR", "01", Amounts::debit(300)),
        g5_detail("152120000", "1185", "1180", "190100", "EUR", "01", Amounts::credit(300)),
        total("152130000", "1185", "1180", "190100", "EUR", "01", a, "0", 0),
    ];
    let docs = parse(&lines);
    let doc = docs.get(0).expect("document");
    let bucket = &doc.details().amounts()[&StatementCurrencyPeriod::new("EUR", "01")];
    assert_eq!(bucket.net_balance_type(), NetBalanceType::None);
    assert_eq!(bucket.details(), 2);
    assert!(doc.is_valid(), "{:?}", doc.violations());
}

#[test]
fn line_counts_are_checked_only_when_enabled() {
    let mut lines = g4_document();
    lines[0] = header("141110000", "1185", "1180", "190100", 49, 1);

    let docs = parse(&lines);
    assert!(docs.get(0).expect("document").is_valid());

    let config = ParserConfig { check_line_counts: true, ..ParserConfig::default() };
    let docs = Parser::new(&config)
        .parse_reader(file(&lines).as_bytes())
        .expect("parse");
    let doc = docs.get(0).expect("document");
    assert_eq!(doc.violations().len(), 1);
    assert_eq!(doc.violations()[0].validator, LINE_COUNTS);
    assert_eq!(doc.violations()[0].message, "Detail line count mismatch: header=000049, actual=1");
}

#[test]
fn consistent_document_is_valid_with_default_config() {
    let lines = [
        "14111000011851180190100000049000001".to_string(),
        g4_detail("1185", "1180", "190100", "EUR", "01", Amounts::debit(420)),
        total("141130000", "1185", "1180", "190100", "EUR", "01", Amounts::debit(420), "2", 420),
    ];
    let docs = parse(&lines);
    let doc = docs.get(0).expect("document");
    assert!(doc.violations().is_empty(), "{:?}", doc.violations());
    assert!(doc.is_valid());
}

#[test]
fn sum_consistency_enumerates_every_field() {
    let declared = Amounts { gross_debit: 100, gross_credit: 200, commission_debit: 30, commission_credit: 40 };
    let lines = [
        header("141110000", "1185", "1180", "190100", 1, 1),
        g4_detail("1185", "1180", "190100", "EUR", "01", Amounts::debit(420)),
        total("141130000", "1185", "1180", "190100", "EUR", "01", declared, "1", 999),
    ];
    let docs = parse(&lines);
    let doc = docs.get(0).expect("document");
    assert_eq!(doc.violations().len(), 1);
    let violation = &doc.violations()[0];
    assert_eq!(violation.validator, SUM_CONSISTENCY);
    assert_eq!(
        violation.mismatches,
        [
            "Gross credit mismatch: total=000000000200, sum details=0.00",
            "Gross debit mismatch: total=000000000100, sum details=4.20",
            "Commission credit mismatch: total=00000000040, sum details=0.00",
            "Commission debit mismatch: total=00000000030, sum details=0.00",
            "Net balance amount mismatch: total=000000000999, sum details=4.20",
            "Net balance type mismatch: total=DEBIT, sum details=CREDIT",
        ]
    );
    assert_eq!(violation.message, violation.mismatches[0]);
}

#[test]
fn ignored_companies_skip_cross_checks_and_error_totals() {
    let lines = [
        header("141110000", "1185", "1180", "190100", 1, 1),
        g4_detail("1185", "1180", "190100", "eur", "01", Amounts::debit(420)),
        total("141130000", "1185", "1180", "190100", "EUR", "01", Amounts::debit(430), "2", 420),
    ];
    let config = ParserConfig { ignored_companies: vec!["1185".into()], ..ParserConfig::default() };
    let docs = Parser::new(&config)
        .parse_reader(file(&lines).as_bytes())
        .expect("parse");
    let doc = docs.get(0).expect("document");
    assert!(doc.ignore_block());
    assert!(doc.violations().is_empty());
    assert_eq!(doc.error_count(), 1);
    assert_eq!(docs.error_count(), 0);
}
