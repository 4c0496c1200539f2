use crate::{
    codes::{self, DocumentType},
    layout::{Layout, TotalField, TotalLayout},
    model::{
        amounts::{implied_amount, NetBalanceType, StatementCurrencyPeriod},
        record::Record,
    },
};
use rust_decimal::Decimal;

/// Declared aggregate line for one currency/period of a document.
pub type Total = Record<TotalLayout>;

impl Record<TotalLayout> {
    pub fn identifier(&self) -> &str {
        self.get(TotalField::Identifier)
    }

    pub fn family(&self) -> &str {
        codes::family_of(self.identifier())
    }

    pub fn document_type(&self) -> Option<DocumentType> {
        TotalLayout::document_type(self.identifier())
    }

    pub fn ru_compiling(&self) -> &str {
        self.get(TotalField::RuCompiling)
    }

    pub fn ru_receiving(&self) -> &str {
        self.get(TotalField::RuReceiving)
    }

    pub fn statement_period(&self) -> &str {
        self.get(TotalField::StatementPeriod)
    }

    pub fn currency(&self) -> &str {
        self.get(TotalField::Currency)
    }

    pub fn bcc_period(&self) -> &str {
        self.get(TotalField::BccPeriod)
    }

    pub fn currency_period(&self) -> StatementCurrencyPeriod {
        StatementCurrencyPeriod::new(self.currency(), self.bcc_period())
    }

    pub fn gross_debit_raw(&self) -> &str {
        self.get(TotalField::GrossDebit)
    }

    pub fn gross_credit_raw(&self) -> &str {
        self.get(TotalField::GrossCredit)
    }

    pub fn commission_debit_raw(&self) -> &str {
        self.get(TotalField::CommissionDebit)
    }

    pub fn commission_credit_raw(&self) -> &str {
        self.get(TotalField::CommissionCredit)
    }

    pub fn net_balance_amount_raw(&self) -> &str {
        self.get(TotalField::NetBalanceAmount)
    }

    pub fn gross_debit(&self) -> Decimal {
        implied_amount(self.gross_debit_raw())
    }

    pub fn gross_credit(&self) -> Decimal {
        implied_amount(self.gross_credit_raw())
    }

    pub fn commission_debit(&self) -> Decimal {
        implied_amount(self.commission_debit_raw())
    }

    pub fn commission_credit(&self) -> Decimal {
        implied_amount(self.commission_credit_raw())
    }

    pub fn net_balance_amount(&self) -> Decimal {
        implied_amount(self.net_balance_amount_raw())
    }

    /// `None` for a code outside the table.
    pub fn net_balance_type(&self) -> Option<NetBalanceType> {
        NetBalanceType::from_code(self.get(TotalField::NetBalanceType))
    }

    pub fn net_balance_type_code(&self) -> &str {
        self.get(TotalField::NetBalanceType)
    }
}
