//! Отчёт сверки: строка на документ и корзину валюта/период.
//! Колонки:
//! document,type,ru_compiling,ru_receiving,statement_period,currency,bcc_period,details,gross_debit,gross_credit,commission_debit,commission_credit,net_balance_type,net_balance_amount,valid

use crate::{error::Result, model::Documents, traits::WriteFormat};
use csv::WriterBuilder;
use std::io::Write;

#[derive(serde::Serialize)]
struct AmountRow<'a> {
    document: usize,
    #[serde(rename = "type")]
    kind: String,
    ru_compiling: &'a str,
    ru_receiving: &'a str,
    statement_period: &'a str,
    currency: &'a str,
    bcc_period: &'a str,
    details: usize,
    gross_debit: String,
    gross_credit: String,
    commission_debit: String,
    commission_credit: String,
    net_balance_type: String,
    net_balance_amount: String,
    valid: bool,
}

pub struct AmountsCsv;

impl WriteFormat for AmountsCsv {
    fn write<W: Write>(mut w: W, docs: &Documents) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);

        for (idx, doc) in docs.iter().enumerate() {
            let header = doc.header();
            for (key, sum) in doc.details().amounts() {
                let row = AmountRow {
                    document: idx + 1,
                    kind: doc.document_type().to_string(),
                    ru_compiling: header.ru_compiling(),
                    ru_receiving: header.ru_receiving(),
                    statement_period: header.statement_period(),
                    currency: &key.currency,
                    bcc_period: &key.period,
                    details: sum.details(),
                    gross_debit: sum.gross_debited().to_string(),
                    gross_credit: sum.gross_credited().to_string(),
                    commission_debit: sum.commission_debited().to_string(),
                    commission_credit: sum.commission_credited().to_string(),
                    net_balance_type: sum.net_balance_type().to_string(),
                    net_balance_amount: sum.net_balance_amount().to_string(),
                    valid: doc.is_valid(),
                };
                wrt.serialize(row)?;
            }
        }
        wrt.flush()?;
        Ok(())
    }
}
