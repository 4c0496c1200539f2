#![allow(dead_code)]

use uic301lib::{model::Documents, parser::Parser};

/// Implied-decimal amounts in cents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Amounts {
    pub gross_debit: u64,
    pub gross_credit: u64,
    pub commission_debit: u64,
    pub commission_credit: u64,
}

impl Amounts {
    pub fn debit(cents: u64) -> Self {
        Self { gross_debit: cents, ..Self::default() }
    }

    pub fn credit(cents: u64) -> Self {
        Self { gross_credit: cents, ..Self::default() }
    }
}

pub fn header(id: &str, ruc: &str, rur: &str, period: &str, details: usize, totals: usize) -> String {
    let line = format!("{id}{ruc}{rur}{period}{details:06}{totals:06}");
    assert_eq!(line.len(), 35);
    line
}

fn amounts(a: Amounts) -> [String; 4] {
    [
        format!("{:012}", a.gross_debit),
        format!("{:012}", a.gross_credit),
        format!("{:011}", a.commission_debit),
        format!("{:011}", a.commission_credit),
    ]
}

pub fn g4_detail(ruc: &str, rur: &str, period: &str, currency: &str, bcc: &str, a: Amounts) -> String {
    let [gd, gc, cd, cc] = amounts(a);
    let line = [
        "141120000", ruc, rur, period, "0", currency, bcc,
        "1185", "1185", "01", "1", "1", "IC123", "190115", "12345", "54321", "2", "01", "T0001",
        "001", "001", "190110", "POS001", "TK00000001",
        gd.as_str(), gc.as_str(), "0000", cd.as_str(), cc.as_str(), "0", "          ",
    ]
    .concat();
    assert_eq!(line.len(), 159);
    line
}

pub fn g5_detail(id: &str, ruc: &str, rur: &str, period: &str, currency: &str, bcc: &str, a: Amounts) -> String {
    let [gd, gc, cd, cc] = amounts(a);
    let line = [
        id, ruc, rur, period, "0", currency, bcc,
        "1185", "01", "1", "1", "TK00000001", "190110", "POS001", "12345", "54321", "R0001", "T0001",
        "2", "01", "001", "190115", "00120",
        gd.as_str(), gc.as_str(), "0000", cd.as_str(), cc.as_str(), "0", "        ",
    ]
    .concat();
    assert_eq!(line.len(), 155);
    line
}

#[allow(clippy::too_many_arguments)]
pub fn total(
    id: &str,
    ruc: &str,
    rur: &str,
    period: &str,
    currency: &str,
    bcc: &str,
    a: Amounts,
    net_type: &str,
    net_amount: u64,
) -> String {
    let line = format!(
        "{id}{ruc}{rur}{period}0{currency}{bcc}{:012}{:012}{:011}{:011}{net_type}{net_amount:012}",
        a.gross_debit, a.gross_credit, a.commission_debit, a.commission_credit
    );
    assert_eq!(line.len(), 88);
    line
}

pub fn file(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

pub fn parse(lines: &[String]) -> Documents {
    Parser::default()
        .parse_reader(file(lines).as_bytes())
        .expect("parse")
}

/// One valid G4 document: a 4.20 debit detail and its matching total.
pub fn g4_document() -> Vec<String> {
    vec![
        header("141110000", "1185", "1180", "190100", 1, 1),
        g4_detail("1185", "1180", "190100", "EUR", "01", Amounts::debit(420)),
        total("141130000", "1185", "1180", "190100", "EUR", "01", Amounts::debit(420), "2", 420),
    ]
}
