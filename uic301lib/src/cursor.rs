//! Срез полей фиксированной ширины по одной строке файла.

use std::fmt::Write as _;
use tracing::trace;

/// Walks a line field by field.
///
/// Slicing past the end of the line never fails: the missing part is
/// blank-padded, because trailing optional fields are legitimately absent in
/// real files. Every slice is appended to a `name='value'` trace used in
/// diagnostics.
#[derive(Debug)]
pub struct Cursor<'a> {
    line: &'a str,
    /// Byte offset of the next unread char.
    pos: usize,
    trace: String,
    overrun: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            trace: String::new(),
            overrun: false,
        }
    }

    /// Returns exactly `length` chars and advances by `length`.
    ///
    /// # Panics
    /// If `length` is zero or `name` is empty. Both are layout bugs, not data errors.
    pub fn next(&mut self, name: &str, length: usize) -> String {
        assert!(length > 0, "field length must be positive");
        assert!(!name.is_empty(), "field name must not be empty");

        let rest = &self.line[self.pos..];
        let mut value = String::with_capacity(length);
        let mut end = rest.len();
        let mut taken = 0;
        for (idx, ch) in rest.char_indices() {
            if taken == length {
                end = idx;
                break;
            }
            value.push(ch);
            taken += 1;
        }
        self.pos += end;
        if taken < length {
            self.overrun = true;
            trace!(field = name, missing = length - taken, "line shorter than layout, padding");
            value.extend(std::iter::repeat(' ').take(length - taken));
        }

        if !self.trace.is_empty() {
            self.trace.push_str(", ");
        }
        let _ = write!(self.trace, "{name}='{value}'");
        value
    }

    /// Chars left after the last slice.
    pub fn remaining(&self) -> usize {
        self.line[self.pos..].chars().count()
    }

    /// `true` once any slice had to be padded.
    pub fn overrun(&self) -> bool {
        self.overrun
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    pub fn into_trace(self) -> String {
        self.trace
    }
}
