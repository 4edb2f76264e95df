//! Field layout: byte ranges within a record.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{FwfError, Result};

/// A single named byte range within a record.
///
/// A field's raw value is the record bytes `[start, start+len)`. Values are
/// never interpreted as an encoding, trimmed, or case-folded by the field table
/// itself — that happens, if at all, in a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    start: usize,
    len: usize,
}

impl Field {
    /// Builds a field, validating that it fits inside a record of data-width
    /// `record_data_width` (the record width minus the newline terminator).
    pub fn new(name: impl Into<String>, start: usize, len: usize, record_data_width: usize) -> Result<Self> {
        let name = name.into();
        if len == 0 {
            return Err(FwfError::Config(format!("field '{name}' has zero length")));
        }
        if start + len > record_data_width {
            return Err(FwfError::Config(format!(
                "field '{name}' [{start}, {end}) extends past record data width {record_data_width}",
                end = start + len
            )));
        }
        Ok(Self { name, start, len })
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start offset in bytes.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if `len() == 0` — never true for a field built through `new`, kept
    /// for API symmetry with other length-bearing types.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exclusive end offset (`start + len`).
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Borrows this field's raw bytes out of a full record slice.
    ///
    /// Panics if `record.len() < self.end()`; callers are expected to have
    /// already validated the field against the table's record width at setup
    /// time (see [`FieldTable::new`]), so this is an invariant violation, not a
    /// recoverable error, if it ever fires during a scan.
    pub fn slice<'a>(&self, record: &'a [u8]) -> &'a [u8] {
        &record[self.start..self.end()]
    }
}

/// Resolves field names to byte ranges in O(1).
///
/// Built once when a table is opened and shared behind an `Arc` so every scan,
/// filter, and sink can reference fields without re-validating them.
#[derive(Debug, Clone)]
pub struct FieldTable {
    fields: Arc<HashMap<String, Field>>,
    order: Arc<Vec<String>>,
}

impl FieldTable {
    /// Builds a field table from an ordered list of fields, rejecting duplicate
    /// names.
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut order = Vec::with_capacity(fields.len());
        let mut map = HashMap::with_capacity(fields.len());
        for field in fields {
            if map.contains_key(field.name()) {
                return Err(FwfError::Config(format!(
                    "duplicate field name '{}'",
                    field.name()
                )));
            }
            order.push(field.name().to_string());
            map.insert(field.name().to_string(), field);
        }
        Ok(Self {
            fields: Arc::new(map),
            order: Arc::new(order),
        })
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Field names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Number of fields in the table.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if the table has no fields.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
