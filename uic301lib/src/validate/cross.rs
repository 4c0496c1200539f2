//! Проверки согласованности между записями одного документа.
//!
//! Каждая проверка собирает и логирует все расхождения; нарушение хранит полный
//! список, заголовком служит первое.

use crate::model::{Document, Total};
use rust_decimal::Decimal;
use tracing::warn;

pub const HEADER_CONSISTENCY: &str = "header-consistency";
pub const SUM_CONSISTENCY: &str = "sum-consistency";
pub const LINE_COUNTS: &str = "line-counts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorViolation {
    pub validator: &'static str,
    /// First mismatch found.
    pub message: String,
    pub mismatches: Vec<String>,
}

impl ValidatorViolation {
    fn from_mismatches(validator: &'static str, mismatches: Vec<String>) -> Option<Self> {
        for m in &mismatches {
            warn!(validator, "{m}");
        }
        let message = mismatches.first()?.clone();
        Some(Self { validator, message, mismatches })
    }
}

/// Which checks run when a document seals. The line-count check is opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrossChecks {
    pub line_counts: bool,
}

impl CrossChecks {
    pub fn run(&self, document: &Document) -> Vec<ValidatorViolation> {
        let mut found = Vec::new();
        found.extend(check_header_consistency(document));
        found.extend(check_sums(document));
        if self.line_counts {
            found.extend(check_line_counts(document));
        }
        found
    }
}

/// Every detail and total must share the header's identifier family, RU pair and period.
pub fn check_header_consistency(document: &Document) -> Option<ValidatorViolation> {
    let header = document.header();
    let expected = [
        ("Identifier", header.family()),
        ("Rail Union Compiling", header.ru_compiling()),
        ("Rail Union Receiving", header.ru_receiving()),
        ("Statement period", header.statement_period()),
    ];

    let mut mismatches = Vec::new();
    let mut compare = |kind: &str, line: usize, actual: [&str; 4]| {
        for ((label, want), got) in expected.iter().zip(actual) {
            if *want != got {
                mismatches.push(format!(
                    "{label} mismatch: line #{line}, header='{want}', {kind}='{got}'"
                ));
            }
        }
    };

    for d in document.details().iter() {
        compare(
            "detail",
            d.line(),
            [d.family(), d.ru_compiling(), d.ru_receiving(), d.statement_period()],
        );
    }
    for t in document.totals().iter() {
        compare(
            "total",
            t.line(),
            [t.family(), t.ru_compiling(), t.ru_receiving(), t.statement_period()],
        );
    }

    ValidatorViolation::from_mismatches(HEADER_CONSISTENCY, mismatches)
}

/// Every declared total must equal the computed sums of its currency/period.
///
/// Needs the details collection to be sealed; before that no bucket exists and
/// every total is reported as unmatched.
pub fn check_sums(document: &Document) -> Option<ValidatorViolation> {
    let amounts = document.details().amounts();
    let mut mismatches = Vec::new();

    for total in document.totals().iter() {
        let key = total.currency_period();
        let Some(sum) = amounts.get(&key) else {
            mismatches.push(format!(
                "No details for total: line #{}, currency/period {key}",
                total.line()
            ));
            continue;
        };

        let pairs: [(&str, &str, Decimal, Decimal); 5] = [
            ("Gross credit", total.gross_credit_raw(), total.gross_credit(), sum.gross_credited()),
            ("Gross debit", total.gross_debit_raw(), total.gross_debit(), sum.gross_debited()),
            (
                "Commission credit",
                total.commission_credit_raw(),
                total.commission_credit(),
                sum.commission_credited(),
            ),
            (
                "Commission debit",
                total.commission_debit_raw(),
                total.commission_debit(),
                sum.commission_debited(),
            ),
            (
                "Net balance amount",
                total.net_balance_amount_raw(),
                total.net_balance_amount(),
                sum.net_balance_amount(),
            ),
        ];
        for (label, raw, declared, computed) in pairs {
            if declared != computed {
                mismatches.push(format!("{label} mismatch: total={raw}, sum details={computed}"));
            }
        }

        if total.net_balance_type() != Some(sum.net_balance_type()) {
            mismatches.push(format!(
                "Net balance type mismatch: total={}, sum details={}",
                declared_type(total),
                sum.net_balance_type()
            ));
        }
    }

    ValidatorViolation::from_mismatches(SUM_CONSISTENCY, mismatches)
}

fn declared_type(total: &Total) -> String {
    match total.net_balance_type() {
        Some(t) => t.to_string(),
        None => format!("'{}'", total.net_balance_type_code()),
    }
}

/// The header's declared detail and total counts must match the lines read.
pub fn check_line_counts(document: &Document) -> Option<ValidatorViolation> {
    let header = document.header();
    let mut mismatches = Vec::new();
    let checks = [
        ("Detail", header.detail_count(), document.details().len()),
        ("Total", header.total_count(), document.totals().len()),
    ];
    for (label, declared, actual) in checks {
        if declared.trim().parse::<usize>().ok() != Some(actual) {
            mismatches.push(format!(
                "{label} line count mismatch: header={declared}, actual={actual}"
            ));
        }
    }
    ValidatorViolation::from_mismatches(LINE_COUNTS, mismatches)
}
