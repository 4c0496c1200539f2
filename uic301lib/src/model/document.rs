//! Агрегат документа и его одностороннее «запечатывание».
//!
//! Всё, что ниже [`Document`], изменяемо только до запечатывания документа.
//! Запечатывание замораживает заголовок, каждую детальную и итоговую строку, считает
//! корзины сверки и записывает нарушения межстрочных проверок. Запечатанный документ
//! неизменяем, его можно отдавать любому числу читателей.

use crate::{
    codes::DocumentType,
    error::{Result, Uic301Error},
    model::{
        amounts::{CalculatedDetailAmounts, StatementCurrencyPeriod},
        detail::Detail,
        header::Header,
        total::Total,
    },
    validate::{CrossChecks, ValidatorViolation},
};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Details {
    document_type: DocumentType,
    items: Vec<Detail>,
    amounts: BTreeMap<StatementCurrencyPeriod, CalculatedDetailAmounts>,
    sealed: bool,
}

impl Details {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            items: Vec::new(),
            amounts: BTreeMap::new(),
            sealed: false,
        }
    }

    pub fn push(&mut self, detail: Detail) -> Result<()> {
        if self.sealed {
            return Err(Uic301Error::Sealed("details"));
        }
        self.items.push(detail);
        Ok(())
    }

    /// Seals every detail and freezes the per currency/period sums. Idempotent.
    pub fn seal(&mut self) {
        if self.sealed {
            return;
        }
        for detail in &mut self.items {
            detail.seal();
            let document_type = self.document_type;
            self.amounts
                .entry(detail.currency_period())
                .or_insert_with_key(|key| CalculatedDetailAmounts::new(key.clone(), document_type))
                .fold(detail);
        }
        for bucket in self.amounts.values_mut() {
            bucket.seal();
        }
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Empty until sealed.
    pub fn amounts(&self) -> &BTreeMap<StatementCurrencyPeriod, CalculatedDetailAmounts> {
        &self.amounts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detail> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Detail> {
        self.items.get(idx)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().map(Detail::error_count).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    items: Vec<Total>,
    sealed: bool,
}

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, total: Total) -> Result<()> {
        if self.sealed {
            return Err(Uic301Error::Sealed("totals"));
        }
        self.items.push(total);
        Ok(())
    }

    pub fn seal(&mut self) {
        if self.sealed {
            return;
        }
        for total in &mut self.items {
            total.seal();
        }
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Total> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Total> {
        self.items.get(idx)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().map(Total::error_count).sum()
    }
}

/// One settlement unit: a header, its details and its totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    document_type: DocumentType,
    header: Header,
    details: Details,
    totals: Totals,
    ignore_block: bool,
    patched: bool,
    violations: Vec<ValidatorViolation>,
    sealed: bool,
}

impl Document {
    /// Fails when the header identifier is not a header code.
    pub fn new(header: Header) -> Result<Self> {
        let document_type = header.document_type().ok_or_else(|| {
            Uic301Error::Parse(format!("'{}' is not a header identifier", header.identifier()))
        })?;
        Ok(Self {
            document_type,
            header,
            details: Details::new(document_type),
            totals: Totals::new(),
            ignore_block: false,
            patched: false,
            violations: Vec::new(),
            sealed: false,
        })
    }

    pub fn add_detail(&mut self, detail: Detail) -> Result<()> {
        self.ensure_open()?;
        self.details.push(detail)
    }

    pub fn add_total(&mut self, total: Total) -> Result<()> {
        self.ensure_open()?;
        self.totals.push(total)
    }

    pub fn set_ignore_block(&mut self, ignore: bool) -> Result<()> {
        self.ensure_open()?;
        self.ignore_block = ignore;
        Ok(())
    }

    pub fn set_patched(&mut self, patched: bool) -> Result<()> {
        self.ensure_open()?;
        self.patched = patched;
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.sealed {
            Err(Uic301Error::Sealed("document"))
        } else {
            Ok(())
        }
    }

    /// Seals with the default cross-record checks.
    pub fn seal(&mut self) {
        self.seal_with(&CrossChecks::default());
    }

    /// Seals header, details and totals, then records the cross-record
    /// violations. A second call does nothing.
    pub fn seal_with(&mut self, checks: &CrossChecks) {
        if self.sealed {
            return;
        }
        self.header.seal();
        self.details.seal();
        self.totals.seal();

        if self.ignore_block {
            debug!(line = self.header.line(), "ignored document, skipping cross-record checks");
        } else {
            self.violations = checks.run(self);
        }
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn ignore_block(&self) -> bool {
        self.ignore_block
    }

    pub fn patched(&self) -> bool {
        self.patched
    }

    pub fn violations(&self) -> &[ValidatorViolation] {
        &self.violations
    }

    /// No cross-record violation was found.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Field errors of every record plus one per cross-record violation.
    pub fn error_count(&self) -> usize {
        self.header.error_count()
            + self.details.error_count()
            + self.totals.error_count()
            + self.violations.len()
    }
}

/// All documents of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documents {
    items: Vec<Document>,
    sealed: bool,
}

impl Documents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, document: Document) -> Result<()> {
        if self.sealed {
            return Err(Uic301Error::Sealed("documents"));
        }
        self.items.push(document);
        Ok(())
    }

    /// Seals every document still open. Idempotent.
    pub fn seal_with(&mut self, checks: &CrossChecks) {
        for document in &mut self.items {
            document.seal_with(checks);
        }
        self.sealed = true;
    }

    pub fn seal(&mut self) {
        self.seal_with(&CrossChecks::default());
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.items.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Document> {
        self.items.get(idx)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Errors of every document not flagged `ignore-block`.
    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| !d.ignore_block())
            .map(Document::error_count)
            .sum()
    }
}
