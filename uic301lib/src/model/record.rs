//! Общая запись фиксированной ширины: заголовки, детали и итоги.

use crate::{
    cursor::Cursor,
    error::{Result, Uic301Error},
    layout::Layout,
};
use std::marker::PhantomData;

/// A field that failed its rule. `field` is the layout's XML attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Set-once bitset over a layout's fields. Layouts have fewer than 64 fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FieldSet(u64);

impl FieldSet {
    fn contains(self, idx: usize) -> bool {
        self.0 & (1 << idx) != 0
    }

    fn insert(&mut self, idx: usize) {
        self.0 |= 1 << idx;
    }
}

/// One physical line sliced by layout `L`.
///
/// Every field may be assigned once; after [`Record::seal`] nothing may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<L: Layout> {
    values: Vec<String>,
    assigned: FieldSet,
    line: usize,
    errors: Vec<FieldError>,
    sealed: bool,
    _layout: PhantomData<L>,
}

impl<L: Layout> Record<L> {
    /// Empty record with every field blank and unassigned.
    pub fn new(line: usize) -> Self {
        Self {
            values: L::FIELDS.iter().map(|f| " ".repeat(f.width)).collect(),
            assigned: FieldSet::default(),
            line,
            errors: Vec::new(),
            sealed: false,
            _layout: PhantomData,
        }
    }

    /// Slices `text` field by field in layout order.
    ///
    /// Returns the record and the cursor trace.
    pub fn parse(text: &str, line: usize) -> Result<(Self, String)> {
        let mut cursor = Cursor::new(text);
        let mut record = Self::new(line);
        for (idx, spec) in L::FIELDS.iter().enumerate() {
            let value = cursor.next(spec.name, spec.width);
            record.assign(idx, value)?;
        }
        Ok((record, cursor.into_trace()))
    }

    pub fn set(&mut self, field: L::Field, value: impl Into<String>) -> Result<()> {
        self.assign(L::index(field), value.into())
    }

    pub(crate) fn assign(&mut self, idx: usize, value: String) -> Result<()> {
        if self.sealed {
            return Err(Uic301Error::Sealed(L::LABEL));
        }
        let spec = &L::FIELDS[idx];
        if self.assigned.contains(idx) {
            return Err(Uic301Error::FieldAlreadySet(spec.name));
        }
        self.assigned.insert(idx);
        self.values[idx] = value;
        Ok(())
    }

    /// First field never assigned, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        L::FIELDS
            .iter()
            .enumerate()
            .find(|(idx, _)| !self.assigned.contains(*idx))
            .map(|(_, spec)| spec.attribute)
    }

    pub fn add_error(&mut self, error: FieldError) -> Result<()> {
        if self.sealed {
            return Err(Uic301Error::Sealed(L::LABEL));
        }
        self.errors.push(error);
        Ok(())
    }

    /// Idempotent.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn get(&self, field: L::Field) -> &str {
        &self.values[L::index(field)]
    }

    pub(crate) fn value_at(&self, idx: usize) -> &str {
        &self.values[idx]
    }

    /// `(attribute, value)` pairs in layout order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        L::FIELDS
            .iter()
            .zip(self.values.iter())
            .map(|(spec, value)| (spec.attribute, value.as_str()))
    }

    /// The record re-emitted as its fixed-width line.
    pub fn to_line(&self) -> String {
        self.values.concat()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
