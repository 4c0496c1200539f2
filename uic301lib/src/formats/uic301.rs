//! Плоский файл расчётов фиксированной ширины.

use crate::{
    error::Result,
    model::Documents,
    parser::Parser,
    traits::{ReadFormat, WriteFormat},
};
use std::io::{BufRead, Write};

pub struct Uic301;

impl ReadFormat for Uic301 {
    /// Parses with the default configuration.
    fn read<R: BufRead>(r: R) -> Result<Documents> {
        Parser::default().parse_reader(r)
    }
}

impl WriteFormat for Uic301 {
    /// Writes each record back as its raw fixed-width line, in file order.
    fn write<W: Write>(mut w: W, docs: &Documents) -> Result<()> {
        for doc in docs.iter() {
            writeln!(w, "{}", doc.header().to_line())?;
            for detail in doc.details().iter() {
                writeln!(w, "{}", detail.to_line())?;
            }
            for total in doc.totals().iter() {
                writeln!(w, "{}", total.to_line())?;
            }
        }
        Ok(())
    }
}
