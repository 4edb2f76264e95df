//! Error handling for the fwfdb library.
//!
//! This module defines all error types that can occur while opening, scanning,
//! filtering, or indexing fixed-width-field (FWF) files.

use thiserror::Error;

/// A specialized `Result` type for fwfdb operations.
pub type Result<T> = std::result::Result<T, FwfError>;

/// Error types for fwfdb operations.
///
/// Setup-time variants (`Config`, `Io`, `Filter`) are fatal before any scan runs.
/// Scan-time variants (`Parse`) abort the current scan and carry the line number
/// that triggered them, so a caller can retry with a [`crate::sink::Lenient`]
/// wrapper instead of failing outright.
#[derive(Error, Debug)]
pub enum FwfError {
    /// I/O error from opening or memory-mapping a file.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Malformed `FileSpec`: duplicate field, zero-width record, or a field whose
    /// byte range does not fit inside the record.
    #[error("invalid table configuration: {0}")]
    Config(String),

    /// A filter predicate was built against a record layout it doesn't fit:
    /// the compared value is longer than the field, or the field extends past
    /// the end of the record.
    #[error("invalid filter: {0}")]
    Filter(String),

    /// The decimal integer parser hit a non-digit byte, or the parsed value
    /// overflowed the target integer width.
    #[error("failed to parse integer field at line {line_no}: {raw:?}")]
    Parse {
        /// 0-based ordinal of the record that failed to parse.
        line_no: u64,
        /// The raw, unparsed field bytes.
        raw: Vec<u8>,
    },

    /// A `PackedMultiIndex` operation was attempted in the wrong state, or
    /// exceeded its declared capacity.
    #[error("index state error: {0}")]
    State(String),

    /// A byte offset or record index fell outside the bounds of a mapped file
    /// or a pre-sized buffer.
    #[error("out of range: index {idx} (max {max})")]
    OutOfRange {
        /// The offending index.
        idx: usize,
        /// The maximum valid index (exclusive upper bound).
        max: usize,
    },
}
