//! Суммы и корзины сверки по паре валюта/период.

use crate::{codes::DocumentType, model::detail::Detail};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// Fixed-width digits with an implied 2-digit scale: `000000000420` is `4.20`.
///
/// Blank or non-numeric input yields zero; the field validator reports it.
pub fn implied_amount(raw: &str) -> Decimal {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Decimal::new(0, 2);
    }
    match digits.parse::<i64>() {
        Ok(units) => Decimal::new(units, 2),
        Err(_) => Decimal::new(0, 2),
    }
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// ISO currency plus BCC period code; orders by currency, then period.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatementCurrencyPeriod {
    pub currency: String,
    pub period: String,
}

impl StatementCurrencyPeriod {
    pub fn new(currency: impl Into<String>, period: impl Into<String>) -> Self {
        Self { currency: currency.into(), period: period.into() }
    }
}

impl fmt::Display for StatementCurrencyPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.currency, self.period)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetBalanceType {
    None,
    Debit,
    Credit,
}

impl NetBalanceType {
    pub fn code(self) -> &'static str {
        match self {
            NetBalanceType::None => "0",
            NetBalanceType::Debit => "1",
            NetBalanceType::Credit => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(NetBalanceType::None),
            "1" => Some(NetBalanceType::Debit),
            "2" => Some(NetBalanceType::Credit),
            _ => None,
        }
    }
}

impl fmt::Display for NetBalanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NetBalanceType::None => "NONE",
            NetBalanceType::Debit => "DEBIT",
            NetBalanceType::Credit => "CREDIT",
        })
    }
}

/// Running sums of every detail sharing one [`StatementCurrencyPeriod`].
///
/// The net balance is derived once, on [`seal`](Self::seal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatedDetailAmounts {
    key: StatementCurrencyPeriod,
    document_type: DocumentType,
    gross_credited: Decimal,
    gross_debited: Decimal,
    commission_credited: Decimal,
    commission_debited: Decimal,
    net_balance_type: NetBalanceType,
    net_balance_amount: Decimal,
    details: usize,
    sealed: bool,
}

impl CalculatedDetailAmounts {
    pub fn new(key: StatementCurrencyPeriod, document_type: DocumentType) -> Self {
        let zero = Decimal::new(0, 2);
        Self {
            key,
            document_type,
            gross_credited: zero,
            gross_debited: zero,
            commission_credited: zero,
            commission_debited: zero,
            net_balance_type: NetBalanceType::None,
            net_balance_amount: zero,
            details: 0,
            sealed: false,
        }
    }

    /// Only the owning details collection folds, and only before sealing.
    pub(crate) fn fold(&mut self, detail: &Detail) {
        debug_assert!(!self.sealed, "bucket {} folded after sealing", self.key);
        self.gross_credited = round2(self.gross_credited + detail.gross_credit());
        self.gross_debited = round2(self.gross_debited + detail.gross_debit());
        self.commission_credited = round2(self.commission_credited + detail.commission_credit());
        self.commission_debited = round2(self.commission_debited + detail.commission_debit());
        self.details += 1;
    }

    /// Derives the net balance. Idempotent.
    pub fn seal(&mut self) {
        if self.sealed {
            return;
        }
        let net = match self.document_type {
            DocumentType::G5Allocation | DocumentType::G5Issue => {
                (self.gross_credited - self.gross_debited)
                    + (self.commission_credited - self.commission_debited)
            }
            DocumentType::G4 => {
                (self.gross_debited - self.gross_credited)
                    + (self.commission_debited - self.commission_credited)
            }
        };
        let net = round2(net);
        (self.net_balance_type, self.net_balance_amount) = if net.is_zero() {
            (NetBalanceType::None, Decimal::new(0, 2))
        } else if net.is_sign_negative() {
            (NetBalanceType::Debit, -net)
        } else {
            (NetBalanceType::Credit, net)
        };
        self.sealed = true;
    }

    pub fn key(&self) -> &StatementCurrencyPeriod {
        &self.key
    }

    pub fn gross_credited(&self) -> Decimal {
        self.gross_credited
    }

    pub fn gross_debited(&self) -> Decimal {
        self.gross_debited
    }

    pub fn commission_credited(&self) -> Decimal {
        self.commission_credited
    }

    pub fn commission_debited(&self) -> Decimal {
        self.commission_debited
    }

    pub fn net_balance_type(&self) -> NetBalanceType {
        self.net_balance_type
    }

    pub fn net_balance_amount(&self) -> Decimal {
        self.net_balance_amount
    }

    /// Number of details folded in.
    pub fn details(&self) -> usize {
        self.details
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}
