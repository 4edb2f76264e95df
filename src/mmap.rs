//! Read-only memory-mapped file access.
//!
//! This module provides [`FileMap`], the thin wrapper around `memmap2::Mmap` that
//! every other component in the crate builds on. Mapping a file gives the OS pager
//! full control over how much of it actually lives in RAM, which is what lets scans
//! run over files far larger than physical memory.

use std::{fs::File, path::Path, sync::Arc};

use memmap2::Mmap;

use crate::error::{FwfError, Result};

/// A read-only memory-mapped file.
///
/// `FileMap` owns the mapping for as long as it (or a clone) is alive. All byte
/// slices handed out by [`FileMap::bytes`] and [`FileMap::slice`] borrow directly
/// from the mapping — nothing is copied. Cloning a `FileMap` only clones the
/// `Arc`, so it is cheap to share across scan threads.
///
/// # Safety
///
/// Memory mapping a file is only as safe as the guarantee that nothing else
/// truncates or rewrites it while mapped. This crate does not attempt to detect
/// concurrent external mutation; doing so is undefined behavior, same as with any
/// `mmap`-backed reader.
#[derive(Clone)]
pub struct FileMap {
    map: Arc<Mmap>,
}

impl FileMap {
    /// Opens `path` read-only and maps its entire contents into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        // Safety: we only ever read through the mapping; the caller is
        // responsible for not mutating the underlying file while it is mapped.
        let map = unsafe { Mmap::map(&file)? };
        Ok(Self { map: Arc::new(map) })
    }

    /// Total length of the mapped file in bytes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if the mapped file is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The full mapped byte range.
    pub fn bytes(&self) -> &[u8] {
        &self.map
    }

    /// Returns `self.bytes()[start..end]`, bounds-checked against the mapping.
    pub fn slice(&self, start: usize, end: usize) -> Result<&[u8]> {
        if end > self.map.len() || start > end {
            return Err(FwfError::OutOfRange {
                idx: end,
                max: self.map.len(),
            });
        }
        Ok(&self.map[start..end])
    }
}
