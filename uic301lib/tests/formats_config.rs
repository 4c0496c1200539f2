mod common;

use common::*;
use uic301lib::{
    config::Config,
    cursor::Cursor,
    error::Uic301Error,
    formats::{csv::AmountsCsv, uic301::Uic301},
    traits::{ReadFormat, WriteFormat},
};

#[test]
fn cursor_slices_and_pads() {
    let mut c = Cursor::new("14111000011");
    assert_eq!(c.next("identifier", 9), "141110000");
    assert!(!c.overrun());
    assert_eq!(c.remaining(), 2);
    assert_eq!(c.next("ruCompiling", 4), "11  ");
    assert!(c.overrun());
    assert_eq!(c.next("ruReceiving", 4), "    ");
    assert_eq!(c.trace(), "identifier='141110000', ruCompiling='11  ', ruReceiving='    '");
}

#[test]
#[should_panic(expected = "field length must be positive")]
fn cursor_rejects_zero_length() {
    Cursor::new("abc").next("x", 0);
}

#[test]
fn config_defaults_and_overrides() {
    let config = Config::from_toml("").expect("empty config");
    assert!(!config.parser.check_line_counts);
    assert!(!config.parser.cross_checks().line_counts);
    assert!(config.parser.ignored_companies.is_empty());
    assert!(!config.index.force_rebuild);

    let config = Config::from_toml(
        "[parser]\ncheck_line_counts = true\nignored_companies = [\"1080\"]\n\n[index]\nforce_rebuild = true\n",
    )
    .expect("config");
    assert!(config.parser.check_line_counts);
    assert_eq!(config.parser.ignored_companies, ["1080"]);
    assert!(config.index.force_rebuild);
    assert!(config.parser.cross_checks().line_counts);
}

#[test]
fn config_rejects_unknown_keys() {
    let err = Config::from_toml("[parser]\nstrict = true\n").expect_err("unknown key");
    assert!(matches!(err, Uic301Error::Config(_)), "{err}");
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("uic301.toml");
    std::fs::write(&path, "[index]\nforce_rebuild = true\n").expect("write");
    assert!(Config::load(&path).expect("load").index.force_rebuild);
    assert!(matches!(
        Config::load(dir.path().join("missing.toml")),
        Err(Uic301Error::File { op: "read", .. })
    ));
}

#[test]
fn flat_file_round_trips() {
    let docs = parse(&g4_document());
    let mut out = Vec::new();
    Uic301::write(&mut out, &docs).expect("write");
    let text = String::from_utf8(out.clone()).expect("utf-8");
    assert_eq!(text.lines().count(), 3);
    assert_eq!(text.lines().next(), Some(g4_document()[0].as_str()));
    let again = Uic301::read(out.as_slice()).expect("read");
    assert_eq!(again, docs);
}

#[test]
fn amounts_report_has_one_row_per_bucket() {
    let mut lines = g4_document();
    lines.extend([
        header("151110000", "1185", "1180", "190100", 2, 2),
        g5_detail("151120000", "1185", "1180", "190100", "EUR", "01", Amounts::credit(500)),
        g5_detail("151120000", "1185", "1180", "190100", "CHF", "02", Amounts::debit(125)),
        total("151130000", "1185", "1180", "190100", "EUR", "01", Amounts::credit(500), "2", 500),
        total("151130000", "1185", "1180", "190100", "CHF", "02", Amounts::debit(125), "1", 125),
    ]);
    let docs = parse(&lines);
    let mut out = Vec::new();
    AmountsCsv::write(&mut out, &docs).expect("write");
    let text = String::from_utf8(out).expect("utf-8");
    let rows: Vec<_> = text.lines().collect();
    assert_eq!(
        rows,
        [
            "document,type,ru_compiling,ru_receiving,statement_period,currency,bcc_period,details,gross_debit,gross_credit,commission_debit,commission_credit,net_balance_type,net_balance_amount,valid",
            "1,G4,1185,1180,190100,EUR,01,1,4.20,0.00,0.00,0.00,CREDIT,4.20,true",
            "2,G5-allocation,1185,1180,190100,CHF,02,1,1.25,0.00,0.00,0.00,DEBIT,1.25,true",
            "2,G5-allocation,1185,1180,190100,EUR,01,1,0.00,5.00,0.00,0.00,CREDIT,5.00,true",
        ]
    );
}
