//! Packed multi index: a memory-optimized non-unique index.
//!
//! Instead of a generic `HashMap<Key, Vec<i32>>` — which pays a per-entry
//! list-node and boxed-integer overhead — keys live in one hash map pointing
//! at the *head* of a singly-linked chain, and the chain itself is implicit in
//! two parallel `i32` arrays (`line_no`, `next`). Every entry costs 8 bytes
//! instead of a heap-allocated list node, which is what lets this structure
//! hold a full-table key set for 100M+ records in memory.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::error::{FwfError, Result};
use crate::field::Field;
use crate::key::{Key, KeyKind};
use crate::sink::Sink;

/// Type-state marker: the index accepts `insert`.
#[derive(Debug)]
pub struct Building;

/// Type-state marker: `tail` has been dropped and `insert` is no longer
/// available — only `lookup` and `is_unique` remain.
#[derive(Debug)]
pub struct Finalized;

/// A memory-optimized non-unique index: a hash map of head pointers plus
/// parallel integer arrays for line numbers and chain links.
///
/// Slot `0` is a reserved sentinel meaning "empty" / "end of chain"; real
/// entries occupy slots `[1, last]`. `PackedMultiIndex<Building>` supports
/// [`PackedMultiIndex::insert`]; calling [`PackedMultiIndex::finalize`]
/// consumes it, drops the `tail` array, and returns a
/// `PackedMultiIndex<Finalized>` — the type system enforces the state
/// machine in §4.10 of the design rather than a runtime flag.
pub struct PackedMultiIndex<State = Building> {
    head: HashMap<Key, i32>,
    line_no: Vec<i32>,
    next: Vec<i32>,
    tail: Vec<i32>,
    last: i32,
    cap: i32,
    _state: PhantomData<State>,
}

impl PackedMultiIndex<Building> {
    /// Pre-sizes all three arrays to `cap + 1` slots (slot 0 reserved).
    pub fn with_capacity(cap: usize) -> Self {
        let len = cap + 1;
        Self {
            head: HashMap::new(),
            line_no: vec![0; len],
            next: vec![0; len],
            tail: vec![0; len],
            last: 0,
            cap: cap as i32,
            _state: PhantomData,
        }
    }

    /// Inserts `(key, line_no)`, appending to `key`'s chain in O(1) via the
    /// `tail` pointer. Fails with [`FwfError::State`] once `cap` is exceeded.
    pub fn insert(&mut self, key: Key, line_no: i32) -> Result<()> {
        if self.last >= self.cap {
            return Err(FwfError::State(format!(
                "packed multi index capacity {} exceeded",
                self.cap
            )));
        }
        self.last += 1;
        let slot = self.last;
        self.line_no[slot as usize] = line_no;
        self.next[slot as usize] = 0;

        match self.head.get(&key) {
            None => {
                self.head.insert(key, slot);
                self.tail[slot as usize] = slot;
            }
            Some(&head) => {
                let tail = self.tail[head as usize];
                self.next[tail as usize] = slot;
                self.tail[head as usize] = slot;
            }
        }
        Ok(())
    }

    /// Drops `tail` and transitions to [`Finalized`].
    #[must_use]
    pub fn finalize(self) -> PackedMultiIndex<Finalized> {
        PackedMultiIndex {
            head: self.head,
            line_no: self.line_no,
            next: self.next,
            tail: Vec::new(),
            last: self.last,
            cap: self.cap,
            _state: PhantomData,
        }
    }
}

impl<State> PackedMultiIndex<State> {
    /// Looks up `key`'s line numbers in insertion order. A miss yields an
    /// empty iterator, never an error.
    pub fn lookup(&self, key: &Key) -> PackedIter<'_> {
        let head = self.head.get(key).copied().unwrap_or(0);
        PackedIter {
            line_no: &self.line_no,
            next: &self.next,
            cur: head,
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.head.len()
    }

    /// True if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.head.is_empty()
    }

    /// Number of slots used across all chains.
    pub fn slots_used(&self) -> usize {
        self.last as usize
    }

    /// True iff every key has exactly one entry: `next[head[k]] == 0` for
    /// every key `k`. This is the literal contract adopted in DESIGN.md —
    /// other historical formulations (counting non-zero `next` entries) are
    /// only equivalent given this exact array layout.
    pub fn is_unique(&self) -> bool {
        self.head.values().all(|&h| self.next[h as usize] == 0)
    }
}

impl PackedMultiIndex<Finalized> {
    /// Decomposes a finalized index into its persisted parts: head map, the
    /// `line_no`/`next` arrays, `last`, and `cap`. Used by [`crate::index::io`]
    /// to serialize without re-deriving anything from a rescan.
    pub(crate) fn into_raw_parts(self) -> (HashMap<Key, i32>, Vec<i32>, Vec<i32>, i32, i32) {
        (self.head, self.line_no, self.next, self.last, self.cap)
    }

    /// Rebuilds a finalized index from previously persisted parts.
    pub(crate) fn from_raw_parts(
        head: HashMap<Key, i32>,
        line_no: Vec<i32>,
        next: Vec<i32>,
        last: i32,
        cap: i32,
    ) -> Self {
        Self {
            head,
            line_no,
            next,
            tail: Vec::new(),
            last,
            cap,
            _state: PhantomData,
        }
    }
}

/// Iterator over one key's chain of line numbers, in insertion order.
pub struct PackedIter<'a> {
    line_no: &'a [i32],
    next: &'a [i32],
    cur: i32,
}

impl Iterator for PackedIter<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur == 0 {
            return None;
        }
        let value = self.line_no[self.cur as usize];
        self.cur = self.next[self.cur as usize];
        Some(value)
    }
}

/// A [`Sink`] that builds a [`PackedMultiIndex`] over a single field.
pub struct PackedMultiIndexSink {
    field: Field,
    kind: KeyKind,
    index: PackedMultiIndex<Building>,
}

impl PackedMultiIndexSink {
    /// Builds a sink keying on `field`, pre-sized to `cap` entries
    /// (`cap >= R`, the file's record count).
    pub fn new(field: Field, kind: KeyKind, cap: usize) -> Self {
        Self {
            field,
            kind,
            index: PackedMultiIndex::with_capacity(cap),
        }
    }
}

impl Sink for PackedMultiIndexSink {
    type Output = PackedMultiIndex<Finalized>;

    fn accept(&mut self, line_no: u64, record: &[u8]) -> Result<()> {
        let key = Key::extract(&self.field, record, self.kind, line_no)?;
        self.index.insert(key, line_no as i32)
    }

    fn finalize(self) -> Result<Self::Output> {
        Ok(self.index.finalize())
    }
}
