//! uic301lib: разбор, проверка, сверка и произвольный доступ
//! для файлов расчётов UIC 301 (G4/G5).

pub mod codes;
pub mod config;
pub mod cursor;
pub mod error;
pub mod index;
pub mod layout;
pub mod model;
pub mod parser;
pub mod traits;
pub mod validate;

pub mod formats {
    pub mod csv;
    pub mod uic301;
    pub mod xml;
}

pub use config::Config;
pub use error::{Result, Uic301Error};
pub use index::IndexStore;
pub use model::{Detail, Document, Documents, Header, Total};
pub use parser::Parser;
