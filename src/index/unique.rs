//! Unique index: key → single coordinate, last write wins.

use std::collections::HashMap;

use crate::coord::Coordinate;
use crate::error::Result;
use crate::field::Field;
use crate::key::{Key, KeyKind};
use crate::sink::Sink;

/// A key → single-coordinate map. On a repeated key, the last insertion (in
/// scan order) wins, which is why this is safe to build in a single forward
/// pass over the file.
#[derive(Debug, Clone, Default)]
pub struct UniqueIndex {
    map: HashMap<Key, Coordinate>,
}

impl UniqueIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key -> coord`, overwriting any existing entry.
    pub fn insert(&mut self, key: Key, coord: Coordinate) {
        self.map.insert(key, coord);
    }

    /// Looks up `key`. A miss is `None`, never an error.
    pub fn get(&self, key: &Key) -> Option<Coordinate> {
        self.map.get(key).copied()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over all `(key, coordinate)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Coordinate)> {
        self.map.iter()
    }

    /// Decomposes into the raw backing map, for [`crate::index::io`].
    pub(crate) fn into_raw_parts(self) -> HashMap<Key, Coordinate> {
        self.map
    }

    /// Rebuilds from a previously persisted map.
    pub(crate) fn from_raw_parts(map: HashMap<Key, Coordinate>) -> Self {
        Self { map }
    }
}

/// A [`Sink`] that builds a [`UniqueIndex`] over a single field.
pub struct UniqueIndexSink {
    field: Field,
    kind: KeyKind,
    file_id: crate::coord::FileId,
    index: UniqueIndex,
}

impl UniqueIndexSink {
    /// Builds a sink keying on `field`, tagging coordinates with `file_id`
    /// (`0` for single-file use).
    pub fn new(field: Field, kind: KeyKind, file_id: crate::coord::FileId) -> Self {
        Self {
            field,
            kind,
            file_id,
            index: UniqueIndex::new(),
        }
    }
}

impl Sink for UniqueIndexSink {
    type Output = UniqueIndex;

    fn accept(&mut self, line_no: u64, record: &[u8]) -> Result<()> {
        let key = Key::extract(&self.field, record, self.kind, line_no)?;
        self.index.insert(key, Coordinate::new(self.file_id, line_no));
        Ok(())
    }

    fn finalize(self) -> Result<Self::Output> {
        Ok(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut index = UniqueIndex::new();
        let key = Key::Bytes(b"AR".to_vec());
        index.insert(key.clone(), Coordinate::local(0));
        index.insert(key.clone(), Coordinate::local(10));
        assert_eq!(index.get(&key), Some(Coordinate::local(10)));
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let index = UniqueIndex::new();
        assert_eq!(index.get(&Key::Bytes(b"ZZ".to_vec())), None);
    }

    #[test]
    fn test_sink_builds_index_over_records() {
        let field = Field::new("state", 9, 2, 81).unwrap();
        let mut sink = UniqueIndexSink::new(field, KeyKind::Bytes, 0);
        let records: [&[u8]; 3] = [
            b"US       AR19570526Fbe56008be36eDianne Mcintosh         Whatever    Medic        \n",
            b"US       MI19690322Mbe56008be36eJohn Doe                 Whatever    Medic        \n",
            b"US       AR19770101Mbe56008be36eJohn Doe                 Whatever    Medic        \n",
        ];
        for (line_no, record) in records.iter().enumerate() {
            sink.accept(line_no as u64, record).unwrap();
        }
        let index = sink.finalize().unwrap();
        assert_eq!(index.get(&Key::Bytes(b"AR".to_vec())), Some(Coordinate::local(2)));
        assert_eq!(index.get(&Key::Bytes(b"MI".to_vec())), Some(Coordinate::local(1)));
        assert_eq!(index.len(), 2);
    }
}
