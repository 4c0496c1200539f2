use crate::{
    codes::{self, DocumentType},
    layout::{HeaderField, HeaderLayout, Layout},
    model::record::Record,
};

/// Document header line.
pub type Header = Record<HeaderLayout>;

impl Record<HeaderLayout> {
    pub fn identifier(&self) -> &str {
        self.get(HeaderField::Identifier)
    }

    pub fn family(&self) -> &str {
        codes::family_of(self.identifier())
    }

    pub fn document_type(&self) -> Option<DocumentType> {
        HeaderLayout::document_type(self.identifier())
    }

    pub fn ru_compiling(&self) -> &str {
        self.get(HeaderField::RuCompiling)
    }

    pub fn ru_receiving(&self) -> &str {
        self.get(HeaderField::RuReceiving)
    }

    /// YYMMPP.
    pub fn statement_period(&self) -> &str {
        self.get(HeaderField::StatementPeriod)
    }

    pub fn detail_count(&self) -> &str {
        self.get(HeaderField::DetailCount)
    }

    pub fn total_count(&self) -> &str {
        self.get(HeaderField::TotalCount)
    }
}
