//! Multi index: key → ordered sequence of coordinates.

use std::collections::HashMap;

use crate::coord::Coordinate;
use crate::error::Result;
use crate::field::Field;
use crate::key::{Key, KeyKind};
use crate::sink::Sink;

/// A key → coordinate-sequence map, insertion order preserved.
#[derive(Debug, Clone, Default)]
pub struct MultiIndex {
    map: HashMap<Key, Vec<Coordinate>>,
}

impl MultiIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `coord` to `key`'s list.
    pub fn insert(&mut self, key: Key, coord: Coordinate) {
        self.map.entry(key).or_default().push(coord);
    }

    /// Looks up `key`'s coordinates in insertion order. A miss is an empty
    /// slice, never an error.
    pub fn get(&self, key: &Key) -> &[Coordinate] {
        self.map.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over all `(key, coordinates)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &[Coordinate])> {
        self.map.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// A [`Sink`] that builds a [`MultiIndex`] over a single field.
pub struct MultiIndexSink {
    field: Field,
    kind: KeyKind,
    file_id: crate::coord::FileId,
    index: MultiIndex,
}

impl MultiIndexSink {
    /// Builds a sink keying on `field`, tagging coordinates with `file_id`
    /// (`0` for single-file use).
    pub fn new(field: Field, kind: KeyKind, file_id: crate::coord::FileId) -> Self {
        Self {
            field,
            kind,
            file_id,
            index: MultiIndex::new(),
        }
    }
}

impl Sink for MultiIndexSink {
    type Output = MultiIndex;

    fn accept(&mut self, line_no: u64, record: &[u8]) -> Result<()> {
        let key = Key::extract(&self.field, record, self.kind, line_no)?;
        self.index.insert(key, Coordinate::new(self.file_id, line_no));
        Ok(())
    }

    fn finalize(self) -> Result<Self::Output> {
        Ok(self.index)
    }
}
