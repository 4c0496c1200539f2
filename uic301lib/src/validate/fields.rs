use crate::{
    codes::CodeTable,
    error::Result,
    layout::Layout,
    model::record::{FieldError, Record},
};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("digits pattern"));
static LETTERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]+$").expect("letters pattern"));
static PRINTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\x20-\x7E]+$").expect("printable pattern"));

/// Declarative rule attached to a layout field.
#[derive(Debug)]
pub enum Rule {
    Digits,
    /// Uppercase ASCII letters, e.g. ISO currency codes.
    Letters,
    /// YYMMPP statement period.
    Period,
    /// YYMMDD calendar date.
    Date,
    /// Printable, not blank.
    Text,
    /// Anything, including blanks.
    Free,
    Code(&'static CodeTable),
    /// All blanks, or the inner rule.
    Optional(&'static Rule),
}

impl Rule {
    /// Returns a message when `value` violates the rule.
    pub fn check(&self, value: &str, width: usize) -> Option<String> {
        match self {
            Rule::Digits => {
                (!DIGITS.is_match(value)).then(|| format!("must be {width} digits, got '{value}'"))
            }
            Rule::Letters => (!LETTERS.is_match(value))
                .then(|| format!("must be {width} uppercase letters, got '{value}'")),
            Rule::Period => (!is_period(value))
                .then(|| format!("must be a YYMMPP statement period, got '{value}'")),
            Rule::Date => (!is_date(value)).then(|| format!("must be a YYMMDD date, got '{value}'")),
            Rule::Text => {
                if value.trim().is_empty() {
                    Some("must not be blank".into())
                } else if !PRINTABLE.is_match(value) {
                    Some(format!("contains non-printable characters: '{value}'"))
                } else {
                    None
                }
            }
            Rule::Free => None,
            Rule::Code(table) => {
                (!table.contains(value)).then(|| format!("'{value}' is not a valid {}", table.name))
            }
            Rule::Optional(inner) => {
                if value.trim().is_empty() {
                    None
                } else {
                    inner.check(value, width)
                }
            }
        }
    }
}

// chrono skips blanks before numeric items, so the digit guard comes first.
fn is_date(value: &str) -> bool {
    value.len() == 6 && DIGITS.is_match(value) && NaiveDate::parse_from_str(value, "%y%m%d").is_ok()
}

fn is_period(value: &str) -> bool {
    if value.len() != 6 || !DIGITS.is_match(value) {
        return false;
    }
    matches!(value[2..4].parse::<u8>(), Ok(1..=12))
}

/// Applies every field rule of `record`'s layout and attaches the violations.
///
/// `line_len` is the char length of the source line; a line longer than the
/// layout gets a trailing-data error on its last field. Returns the number of
/// errors added.
pub fn validate_record<L: Layout>(record: &mut Record<L>, line_len: usize) -> Result<usize> {
    let mut found = Vec::new();
    for (idx, spec) in L::FIELDS.iter().enumerate() {
        if let Some(message) = spec.rule.check(record.value_at(idx), spec.width) {
            found.push(FieldError::new(spec.attribute, message));
        }
    }

    let width = L::line_width();
    if line_len > width {
        if let Some(last) = L::FIELDS.last() {
            found.push(FieldError::new(
                last.attribute,
                format!("line has {} characters beyond the {width}-character layout", line_len - width),
            ));
        }
    }

    let count = found.len();
    for err in found {
        debug!(line = record.line(), field = err.field, message = %err.message, "field error");
        record.add_error(err)?;
    }
    Ok(count)
}
