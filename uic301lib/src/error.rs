//! Единый тип ошибок публичного API.
//!
//! `Err` возвращается только для структурных ошибок и ошибок ввода-вывода. Ошибки полей
//! и межстрочных проверок это данные: они записываются на записи и документы.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Uic301Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot {op} {path}: {source}")]
    File {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Illegal record order or an unclassifiable line. Aborts the whole parse.
    #[error("line #{line}: {message} [{trace}]")]
    Structure {
        line: usize,
        message: String,
        trace: String,
    },

    /// Malformed tag syntax in the serialized tree.
    #[error("byte {offset}: {message}")]
    Scan { offset: u64, message: String },

    #[error("Index error: {0}")]
    Index(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0} is sealed")]
    Sealed(&'static str),

    #[error("field {0} is already set")]
    FieldAlreadySet(&'static str),

    #[error("Config error: {0}")]
    Config(String),
}

impl Uic301Error {
    pub(crate) fn file(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Uic301Error::File { op, path, source }
    }
}

pub type Result<T> = std::result::Result<T, Uic301Error>;
