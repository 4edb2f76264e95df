//! Inline byte-range filter predicates, fused into the scan loop.

use std::cmp::Ordering;

use crate::error::{FwfError, Result};
use crate::field::Field;

/// Which side of a comparison a predicate pins down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `record >= value` (or `>` when not inclusive).
    Lower,
    /// `record <= value` (or `<` when not inclusive).
    Upper,
}

/// A single byte-range comparison predicate.
///
/// Comparison is lexicographic unsigned byte order over
/// `record[startpos..startpos+value.len()]` against `value`. One sentinel
/// rule applies before the comparison: if the *last byte* of the compared
/// field is ASCII space (`0x20`), the predicate trivially passes — the domain
/// convention "all spaces means beginning/end of time".
#[derive(Debug, Clone)]
pub struct Predicate {
    startpos: usize,
    value: Vec<u8>,
    bound: Bound,
    inclusive: bool,
}

impl Predicate {
    /// Builds a predicate comparing `record[startpos..startpos+value.len()]`
    /// against `value`, validating it fits within a record of data-width
    /// `record_data_width`.
    pub fn new(
        startpos: usize,
        value: impl Into<Vec<u8>>,
        bound: Bound,
        inclusive: bool,
        record_data_width: usize,
    ) -> Result<Self> {
        let value = value.into();
        if startpos + value.len() > record_data_width {
            return Err(FwfError::Filter(format!(
                "predicate at [{startpos}, {end}) extends past record data width {record_data_width}",
                end = startpos + value.len()
            )));
        }
        Ok(Self {
            startpos,
            value,
            bound,
            inclusive,
        })
    }

    /// Convenience constructor comparing a named field instead of a raw
    /// `startpos`. The predicate's length is fixed to `value.len()`, so a
    /// value shorter than the field compares only that leading prefix.
    pub fn on_field(
        field: &Field,
        value: impl Into<Vec<u8>>,
        bound: Bound,
        inclusive: bool,
    ) -> Result<Self> {
        let value = value.into();
        if value.len() > field.len() {
            return Err(FwfError::Filter(format!(
                "value longer than field '{}' ({} > {})",
                field.name(),
                value.len(),
                field.len()
            )));
        }
        Self::new(
            field.start(),
            value,
            bound,
            inclusive,
            field.start() + field.len(),
        )
    }

    fn sentinel_passes(&self, record: &[u8]) -> bool {
        if self.value.is_empty() {
            return false;
        }
        let last = self.startpos + self.value.len() - 1;
        record[last] == b' '
    }

    /// Evaluates this predicate against one full record.
    fn eval(&self, record: &[u8]) -> bool {
        if self.value.is_empty() {
            return true;
        }
        if self.sentinel_passes(record) {
            return true;
        }
        let field = &record[self.startpos..self.startpos + self.value.len()];
        let cmp = field.cmp(self.value.as_slice());
        match (self.bound, self.inclusive) {
            (Bound::Lower, true) => cmp != Ordering::Less,
            (Bound::Lower, false) => cmp == Ordering::Greater,
            (Bound::Upper, true) => cmp != Ordering::Greater,
            (Bound::Upper, false) => cmp == Ordering::Less,
        }
    }
}

/// An ordered list of predicates, combined as logical AND.
///
/// There is no OR at this layer — disjunctions are expressed by running two
/// scans and unioning the results in a higher layer. Predicate order does not
/// affect correctness; [`FilterSet::optimize`] reorders cheapest-first
/// (shortest value first) for speed, but only when the caller explicitly asks
/// for it, so construction order stays stable for debugging until then.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

impl FilterSet {
    /// An empty filter set; every record passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a predicate.
    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Builder-style variant of [`FilterSet::push`].
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.push(predicate);
        self
    }

    /// Number of predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// True if there are no predicates (every record passes).
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Reorders predicates cheapest-first (shortest compared value first).
    pub fn optimize(&mut self) {
        self.predicates.sort_by_key(|p| p.value.len());
    }

    /// True iff every predicate passes `record`.
    pub fn eval(&self, record: &[u8]) -> bool {
        self.predicates.iter().all(|p| p.eval(record))
    }
}
