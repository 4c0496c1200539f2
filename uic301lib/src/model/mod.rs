//! Объектная модель документа: записи, коллекции и корзины сверки.

pub mod amounts;
pub mod detail;
pub mod document;
pub mod header;
pub mod record;
pub mod total;

pub use amounts::{CalculatedDetailAmounts, NetBalanceType, StatementCurrencyPeriod};
pub use detail::{Detail, G4Detail, G5Detail};
pub use document::{Details, Document, Documents, Totals};
pub use header::Header;
pub use record::{FieldError, Record};
pub use total::Total;
