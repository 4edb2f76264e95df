//! Pluggable consumers invoked once per record that passes a [`crate::filter::FilterSet`].
//!
//! Every sink implements [`Sink`]: `accept` is called once per passing record,
//! in ascending line-number order, and `finalize` is called exactly once after
//! the scan completes. The indexing sinks ([`crate::index::unique::UniqueIndexSink`],
//! [`crate::index::multi::MultiIndexSink`], [`crate::index::packed::PackedMultiIndexSink`])
//! live alongside the structures they build.

use tracing::warn;

use crate::error::Result;
use crate::field::Field;
use crate::parse::parse_decimal_i64;

/// A consumer of records that passed a [`crate::filter::FilterSet`].
///
/// Sinks borrow the record bytes during `accept` — anything that needs to
/// outlive the call (an index key, a copied column value) must be copied out
/// before returning.
pub trait Sink {
    /// What `finalize` produces.
    type Output;

    /// Called once per passing record, in ascending `line_no` order.
    fn accept(&mut self, line_no: u64, record: &[u8]) -> Result<()>;

    /// Called exactly once after the scan completes.
    fn finalize(self) -> Result<Self::Output>;
}

/// Collects the line numbers of every passing record.
pub struct LineNumberSink {
    lines: Vec<i32>,
}

impl LineNumberSink {
    /// Pre-sizes the output vector to `capacity` (typically the record count
    /// `R`), so the scan performs at most one capacity resize.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::with_capacity(capacity),
        }
    }
}

impl Sink for LineNumberSink {
    type Output = Vec<i32>;

    fn accept(&mut self, line_no: u64, _record: &[u8]) -> Result<()> {
        self.lines.push(line_no as i32);
        Ok(())
    }

    fn finalize(self) -> Result<Self::Output> {
        Ok(self.lines)
    }
}

/// A row-major, fixed-width byte matrix: `rows` rows of `stride` bytes each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteMatrix {
    data: Vec<u8>,
    stride: usize,
}

impl ByteMatrix {
    /// Number of rows currently stored.
    pub fn rows(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.data.len() / self.stride
        }
    }

    /// Row width in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Borrows row `i`.
    pub fn row(&self, i: usize) -> &[u8] {
        &self.data[i * self.stride..(i + 1) * self.stride]
    }
}

/// Extracts a field's raw bytes into a row-major [`ByteMatrix`].
pub struct BytesColumnSink {
    field: Field,
    data: Vec<u8>,
}

impl BytesColumnSink {
    /// Builds a sink extracting `field`, pre-sizing storage for `capacity`
    /// rows.
    pub fn new(field: Field, capacity: usize) -> Self {
        let stride = field.len();
        Self {
            field,
            data: Vec::with_capacity(capacity * stride),
        }
    }
}

impl Sink for BytesColumnSink {
    type Output = ByteMatrix;

    fn accept(&mut self, _line_no: u64, record: &[u8]) -> Result<()> {
        self.data.extend_from_slice(self.field.slice(record));
        Ok(())
    }

    fn finalize(self) -> Result<Self::Output> {
        Ok(ByteMatrix {
            data: self.data,
            stride: self.field.len(),
        })
    }
}

/// Parses a field as a signed decimal integer (§4.7) into a `Vec<i64>`.
///
/// A parse failure aborts the scan with [`crate::error::FwfError::Parse`];
/// wrap with [`Lenient`] to skip offending records instead.
pub struct IntColumnSink {
    field: Field,
    values: Vec<i64>,
}

impl IntColumnSink {
    /// Builds a sink parsing `field`, pre-sizing storage for `capacity` rows.
    pub fn new(field: Field, capacity: usize) -> Self {
        Self {
            field,
            values: Vec::with_capacity(capacity),
        }
    }
}

impl Sink for IntColumnSink {
    type Output = Vec<i64>;

    fn accept(&mut self, line_no: u64, record: &[u8]) -> Result<()> {
        let raw = self.field.slice(record);
        self.values.push(parse_decimal_i64(raw, line_no)?);
        Ok(())
    }

    fn finalize(self) -> Result<Self::Output> {
        Ok(self.values)
    }
}

/// Wraps a sink whose `accept` can fail with
/// [`crate::error::FwfError::Parse`], turning that one failure mode into a
/// skipped record instead of an aborted scan.
///
/// Every other error kind still propagates — only per-record parse failures
/// are forgiven, since those are the only ones the spec allows a caller to
/// recover from without rescanning.
pub struct Lenient<S> {
    inner: S,
    skipped: u64,
}

impl<S> Lenient<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner, skipped: 0 }
    }

    /// Number of records skipped so far due to a parse error.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<S: Sink> Sink for Lenient<S> {
    type Output = (S::Output, u64);

    fn accept(&mut self, line_no: u64, record: &[u8]) -> Result<()> {
        match self.inner.accept(line_no, record) {
            Ok(()) => Ok(()),
            Err(crate::error::FwfError::Parse { line_no, raw }) => {
                warn!(line_no, raw = %String::from_utf8_lossy(&raw), "skipping record with unparseable field");
                self.skipped += 1;
                Ok(())
            }
            Err(other) => Err(other),
        }
    }

    fn finalize(self) -> Result<Self::Output> {
        let skipped = self.skipped;
        Ok((self.inner.finalize()?, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_number_sink() {
        let mut sink = LineNumberSink::with_capacity(4);
        sink.accept(0, b"").unwrap();
        sink.accept(3, b"").unwrap();
        assert_eq!(sink.finalize().unwrap(), vec![0, 3]);
    }

    #[test]
    fn test_bytes_column_sink() {
        let field = Field::new("state", 9, 2, 81).unwrap();
        let mut sink = BytesColumnSink::new(field, 2);
        let record = b"US       AR19570526Fbe56008be36eDianne Mcintosh         Whatever    Medic        \n";
        sink.accept(0, record).unwrap();
        let matrix = sink.finalize().unwrap();
        assert_eq!(matrix.rows(), 1);
        assert_eq!(matrix.row(0), b"AR");
    }

    #[test]
    fn test_int_column_sink_abort_on_parse_error() {
        let field = Field::new("num", 0, 8, 81).unwrap();
        let mut sink = IntColumnSink::new(field, 1);
        let mut record = b"invalid!".to_vec();
        record.resize(81, b' ');
        let err = sink.accept(5, &record).unwrap_err();
        assert!(matches!(err, crate::error::FwfError::Parse { line_no: 5, .. }));
    }

    #[test]
    fn test_lenient_skips_parse_errors() {
        let field = Field::new("num", 0, 8, 81).unwrap();
        let inner = IntColumnSink::new(field, 2);
        let mut sink = Lenient::new(inner);

        let mut good = format!("{:>8}", 42).into_bytes();
        good.resize(81, b' ');
        let mut bad = b"invalid!".to_vec();
        bad.resize(81, b' ');

        sink.accept(0, &good).unwrap();
        sink.accept(1, &bad).unwrap();
        sink.accept(2, &good).unwrap();

        let (values, skipped) = sink.finalize().unwrap();
        assert_eq!(values, vec![42, 42]);
        assert_eq!(skipped, 1);
    }
}
