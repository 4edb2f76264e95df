//! Record geometry: width, newline convention, comment preamble, record count.

use crate::error::{FwfError, Result};

/// The record terminator convention.
///
/// The terminator is counted in the record width `W` but is never exposed as
/// part of any field's raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newline {
    /// No terminator; records are concatenated with no separator.
    None,
    /// A single terminator byte (commonly `\n`, but any byte is allowed).
    Single(u8),
    /// A two-byte `\r\n` terminator.
    CrLf,
}

impl Newline {
    /// Number of terminator bytes this convention contributes to `W`.
    pub fn len(&self) -> usize {
        match self {
            Newline::None => 0,
            Newline::Single(_) => 1,
            Newline::CrLf => 2,
        }
    }

    /// True for [`Newline::None`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Newline::None)
    }
}

/// Identifies leading "comment" records to skip when locating the first data
/// record. Comment records do not affect the line numbering of data records:
/// line 0 is always the first record *after* the comment preamble.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommentRule {
    /// No comment preamble; every record is a data record.
    #[default]
    None,
    /// A record is a comment iff it starts with this byte prefix.
    Prefix(Vec<u8>),
}

impl CommentRule {
    fn matches(&self, record: &[u8]) -> bool {
        match self {
            CommentRule::None => false,
            CommentRule::Prefix(prefix) => record.starts_with(prefix),
        }
    }
}

/// The derived physical shape of a fixed-width-field file.
///
/// `RecordGeometry` is a pure function of (field widths, newline convention,
/// comment rule, file length + leading bytes): it performs no further I/O once
/// computed, and the scan loop treats `width` as authoritative — it never
/// searches for newlines at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordGeometry {
    /// Total record width in bytes, including the newline terminator.
    width: usize,
    /// Newline terminator length in bytes (0, 1, or 2).
    newline_len: usize,
    /// Byte offset of the first data record (past any comment preamble).
    start: usize,
    /// Number of whole data records in the file.
    count: u64,
}

impl RecordGeometry {
    /// Derives geometry from field widths and a newline convention, locating
    /// the start of the data records by walking any comment preamble found at
    /// the front of `bytes`.
    ///
    /// A trailing byte span shorter than `width` is silently ignored, per the
    /// "partial/unaligned record scans" non-goal: the caller sees a slightly
    /// short but otherwise valid table rather than an error.
    pub fn derive(
        field_widths: &[usize],
        newline: Newline,
        comment: &CommentRule,
        bytes: &[u8],
    ) -> Result<Self> {
        let data_width: usize = field_widths.iter().sum();
        let width = data_width + newline.len();
        if width == 0 {
            return Err(FwfError::Config("record width is zero".to_string()));
        }

        let mut start = 0usize;
        while start + width <= bytes.len() && comment.matches(&bytes[start..start + width]) {
            start += width;
        }

        let count = ((bytes.len() - start) / width) as u64;
        Ok(Self {
            width,
            newline_len: newline.len(),
            start,
            count,
        })
    }

    /// Total record width in bytes, including the terminator.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Record width minus the terminator — the span fields may occupy.
    pub fn data_width(&self) -> usize {
        self.width - self.newline_len
    }

    /// Newline terminator length in bytes.
    pub fn newline_len(&self) -> usize {
        self.newline_len
    }

    /// Byte offset of the first data record.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of whole data records in the file (`R` in the spec).
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Byte offset of record `line_no` within the file.
    pub fn offset_of(&self, line_no: u64) -> usize {
        self.start + (line_no as usize) * self.width
    }
}
