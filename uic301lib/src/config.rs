//! TOML-конфигурация. Все ключи необязательны.
//!
//! ```toml
//! [parser]
//! check_line_counts = false
//! ignored_companies = ["1080"]
//!
//! [index]
//! force_rebuild = false
//! ```

use crate::{
    error::{Result, Uic301Error},
    validate::CrossChecks,
};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parser: ParserConfig,
    pub index: IndexConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Also compare the header's declared line counts with the lines read.
    pub check_line_counts: bool,
    /// RU compiling codes whose documents are flagged `ignore-block`.
    pub ignored_companies: Vec<String>,
}

impl ParserConfig {
    pub fn cross_checks(&self) -> CrossChecks {
        CrossChecks { line_counts: self.check_line_counts }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Ignore an existing side file and rescan.
    pub force_rebuild: bool,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(Uic301Error::file("read", path))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Uic301Error::Config(e.to_string()))
    }
}
