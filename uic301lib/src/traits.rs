//! Трэйты чтения/записи форматов на основе std::io::{BufRead, Write}.

use crate::{error::Result, model::Documents};
use std::io::{BufRead, Write};

pub trait ReadFormat {
    fn read<R: BufRead>(r: R) -> Result<Documents>;
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, docs: &Documents) -> Result<()>;
}

pub trait Format: ReadFormat + WriteFormat {}
impl<T: ReadFormat + WriteFormat> Format for T {}
