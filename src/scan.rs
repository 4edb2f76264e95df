//! The single hot loop: walk a mapped file's records, apply a [`FilterSet`],
//! and push passing records into a [`Sink`].

use tracing::trace;

use crate::error::Result;
use crate::filter::FilterSet;
use crate::geometry::RecordGeometry;
use crate::mmap::FileMap;
use crate::sink::Sink;

/// Runs a single forward pass over every record in `geometry`, evaluating
/// `filters` against each one and, for records that pass, calling
/// `sink.accept` with the record's data bytes (the newline terminator is
/// never included).
///
/// `line_offset` is added to the physical record ordinal before it is handed
/// to the sink, so a caller scanning one file among several in a
/// [`crate::multifile::MultiFileView`] can assign each file's records a
/// distinct, contiguous range of line numbers.
pub struct ScanLoop;

impl ScanLoop {
    /// Scans every record of `file` laid out according to `geometry`.
    pub fn run<S: Sink>(
        file: &FileMap,
        geometry: &RecordGeometry,
        filters: &FilterSet,
        sink: &mut S,
        line_offset: u64,
    ) -> Result<()> {
        let width = geometry.width();
        let data_width = geometry.data_width();
        let base = geometry.start();
        let count = geometry.count();

        let mut matched = 0u64;
        for i in 0..count {
            let offset = base + (i as usize) * width;
            let record = file.slice(offset, offset + data_width)?;
            if !filters.eval(record) {
                continue;
            }
            sink.accept(line_offset + i, record)?;
            matched += 1;
        }
        trace!(scanned = count, matched, "scan loop finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Bound, Predicate};
    use crate::sink::LineNumberSink;
    use std::fs::File;
    use std::io::Write as _;

    const DATA_WIDTH: usize = 81;

    fn sample_records() -> Vec<&'static [u8]> {
        vec![
            b"US       AR19570526Fbe56008be36eDianne Mcintosh         Whatever    Medic        \n",
            b"US       MI19690322Mbe56008be36eJohn Doe                 Whatever    Medic        \n",
            b"US       WI19770101Mbe56008be36eJohn Doe                 Whatever    Medic        \n",
        ]
    }

    fn write_records(name: &str, records: &[&[u8]]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        for record in records {
            file.write_all(record).unwrap();
        }
        path
    }

    #[test]
    fn test_scan_collects_all_line_numbers_with_no_filter() {
        let path = write_records("fwfdb_scan_no_filter.txt", &sample_records());
        let file = FileMap::open(&path).unwrap();
        let geometry = RecordGeometry::derive(
            &[DATA_WIDTH],
            crate::geometry::Newline::Single(b'\n'),
            &crate::geometry::CommentRule::None,
            file.bytes(),
        )
        .unwrap();

        let mut sink = LineNumberSink::with_capacity(3);
        ScanLoop::run(&file, &geometry, &FilterSet::new(), &mut sink, 0).unwrap();
        assert_eq!(sink.finalize().unwrap(), vec![0, 1, 2]);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_scan_applies_filter_and_line_offset() {
        let records: Vec<&[u8]> = vec![
            b"US       AR19570526Fbe56008be36eDianne Mcintosh         Whatever    Medic        \n",
            b"US       MI19690322Mbe56008be36eJohn Doe                 Whatever    Medic        \n",
            b"US       AR19770101Mbe56008be36eJohn Doe                 Whatever    Medic        \n",
        ];
        let path = write_records("fwfdb_scan_filter.txt", &records);
        let file = FileMap::open(&path).unwrap();
        let geometry = RecordGeometry::derive(
            &[DATA_WIDTH],
            crate::geometry::Newline::Single(b'\n'),
            &crate::geometry::CommentRule::None,
            file.bytes(),
        )
        .unwrap();

        let lower = Predicate::new(9, b"AR".to_vec(), Bound::Lower, true, DATA_WIDTH).unwrap();
        let upper = Predicate::new(9, b"AR".to_vec(), Bound::Upper, true, DATA_WIDTH).unwrap();
        let filters = FilterSet::new().with(lower).with(upper);
        let mut sink = LineNumberSink::with_capacity(3);
        ScanLoop::run(&file, &geometry, &filters, &mut sink, 100).unwrap();
        assert_eq!(sink.finalize().unwrap(), vec![100, 102]);
        std::fs::remove_file(path).unwrap();
    }
}
