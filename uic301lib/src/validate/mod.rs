//! Правила полей и межстрочные проверки.

pub mod cross;
pub mod fields;

pub use cross::{CrossChecks, ValidatorViolation};
pub use fields::{validate_record, Rule};
