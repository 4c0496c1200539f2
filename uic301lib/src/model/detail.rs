use crate::{
    codes::{self, DocumentType},
    error::{Result, Uic301Error},
    layout::{G4Field, G4Layout, G5Field, G5Layout},
    model::{
        amounts::{implied_amount, StatementCurrencyPeriod},
        record::{FieldError, Record},
    },
};
use rust_decimal::Decimal;

pub type G4Detail = Record<G4Layout>;
pub type G5Detail = Record<G5Layout>;

/// One detail line. G5 allocation and issue share the G5 layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    G4(G4Detail),
    G5Allocation(G5Detail),
    G5Issue(G5Detail),
}

/// Projects the same accessor over both layouts.
macro_rules! common {
    ($self:ident, $g4:expr, $g5:expr) => {
        match $self {
            Detail::G4(d) => d.get($g4),
            Detail::G5Allocation(d) | Detail::G5Issue(d) => d.get($g5),
        }
    };
}

impl Detail {
    /// Wraps a G5 record, selecting the sub-kind from its identifier.
    pub fn from_g5(record: G5Detail) -> Result<Self> {
        match codes::family_of(record.get(G5Field::Identifier)) {
            "151" => Ok(Detail::G5Allocation(record)),
            "152" => Ok(Detail::G5Issue(record)),
            other => Err(Uic301Error::Parse(format!("not a G5 detail family: {other}"))),
        }
    }

    pub fn document_type(&self) -> DocumentType {
        match self {
            Detail::G4(_) => DocumentType::G4,
            Detail::G5Allocation(_) => DocumentType::G5Allocation,
            Detail::G5Issue(_) => DocumentType::G5Issue,
        }
    }

    pub fn identifier(&self) -> &str {
        common!(self, G4Field::Identifier, G5Field::Identifier)
    }

    pub fn family(&self) -> &str {
        codes::family_of(self.identifier())
    }

    pub fn ru_compiling(&self) -> &str {
        common!(self, G4Field::RuCompiling, G5Field::RuCompiling)
    }

    pub fn ru_receiving(&self) -> &str {
        common!(self, G4Field::RuReceiving, G5Field::RuReceiving)
    }

    pub fn statement_period(&self) -> &str {
        common!(self, G4Field::StatementPeriod, G5Field::StatementPeriod)
    }

    pub fn currency(&self) -> &str {
        common!(self, G4Field::Currency, G5Field::Currency)
    }

    pub fn bcc_period(&self) -> &str {
        common!(self, G4Field::BccPeriod, G5Field::BccPeriod)
    }

    pub fn currency_period(&self) -> StatementCurrencyPeriod {
        StatementCurrencyPeriod::new(self.currency(), self.bcc_period())
    }

    pub fn gross_debit(&self) -> Decimal {
        implied_amount(common!(self, G4Field::GrossDebit, G5Field::GrossDebit))
    }

    pub fn gross_credit(&self) -> Decimal {
        implied_amount(common!(self, G4Field::GrossCredit, G5Field::GrossCredit))
    }

    pub fn commission_debit(&self) -> Decimal {
        implied_amount(common!(self, G4Field::CommissionDebit, G5Field::CommissionDebit))
    }

    pub fn commission_credit(&self) -> Decimal {
        implied_amount(common!(self, G4Field::CommissionCredit, G5Field::CommissionCredit))
    }

    pub fn line(&self) -> usize {
        match self {
            Detail::G4(d) => d.line(),
            Detail::G5Allocation(d) | Detail::G5Issue(d) => d.line(),
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            Detail::G4(d) => d.errors(),
            Detail::G5Allocation(d) | Detail::G5Issue(d) => d.errors(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors().len()
    }

    pub fn add_error(&mut self, error: FieldError) -> Result<()> {
        match self {
            Detail::G4(d) => d.add_error(error),
            Detail::G5Allocation(d) | Detail::G5Issue(d) => d.add_error(error),
        }
    }

    pub fn seal(&mut self) {
        match self {
            Detail::G4(d) => d.seal(),
            Detail::G5Allocation(d) | Detail::G5Issue(d) => d.seal(),
        }
    }

    pub fn is_sealed(&self) -> bool {
        match self {
            Detail::G4(d) => d.is_sealed(),
            Detail::G5Allocation(d) | Detail::G5Issue(d) => d.is_sealed(),
        }
    }

    pub fn element(&self) -> &'static str {
        use crate::layout::Layout;
        match self {
            Detail::G4(_) => G4Layout::ELEMENT,
            Detail::G5Allocation(_) | Detail::G5Issue(_) => G5Layout::ELEMENT,
        }
    }

    pub fn to_line(&self) -> String {
        match self {
            Detail::G4(d) => d.to_line(),
            Detail::G5Allocation(d) | Detail::G5Issue(d) => d.to_line(),
        }
    }
}
