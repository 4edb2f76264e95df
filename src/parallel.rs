//! Parallel scan processing.
//!
//! This module splits a file's record range evenly across threads and runs an
//! independent scan over each range, applying the same filter set. Each
//! thread owns its own clone of the processor, so no synchronization is
//! needed inside `process_record`; shared state crosses thread boundaries
//! only in `on_batch_complete`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fwfdb::{FileMap, FilterSet, ParallelScan, ParallelScanner, RecordGeometry, ScanProcessor};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Clone, Default)]
//! struct RecordCounter {
//!     local: u64,
//!     global: Arc<Mutex<u64>>,
//! }
//!
//! impl ScanProcessor for RecordCounter {
//!     fn process_record(&mut self, _line_no: u64, _record: &[u8]) -> fwfdb::Result<()> {
//!         self.local += 1;
//!         Ok(())
//!     }
//!
//!     fn on_batch_complete(&mut self) -> fwfdb::Result<()> {
//!         *self.global.lock().unwrap() += self.local;
//!         self.local = 0;
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> fwfdb::Result<()> {
//! let file = FileMap::open("data.fwf")?;
//! let geometry = RecordGeometry::derive(&[80], fwfdb::Newline::Single(b'\n'), &Default::default(), file.bytes())?;
//! let scanner = ParallelScanner::new(file, geometry, FilterSet::new());
//! let counter = RecordCounter::default();
//! scanner.process_parallel(counter.clone(), 4)?;
//! println!("{}", *counter.global.lock().unwrap());
//! # Ok(())
//! # }
//! ```

use tracing::debug;

use crate::error::Result;
use crate::filter::FilterSet;
use crate::geometry::RecordGeometry;
use crate::mmap::FileMap;

/// Batch size: how many records a thread processes before calling
/// `on_batch_complete`.
const BATCH_SIZE: u64 = 8192;

/// Processes one record at a time across many threads.
///
/// Implementors must be `Send + Clone`: every thread gets its own clone, so
/// aggregation across threads has to happen through shared state (an
/// `Arc<Mutex<_>>` or atomic) updated in `on_batch_complete`.
pub trait ScanProcessor: Send + Clone {
    /// Called once per record that passes the scan's filter set, in
    /// ascending `line_no` order within a thread's assigned range (but not
    /// globally ordered across threads).
    fn process_record(&mut self, line_no: u64, record: &[u8]) -> Result<()>;

    /// Called after every [`BATCH_SIZE`] records (and once more at the end of
    /// a thread's range). The default does nothing.
    #[allow(unused_variables)]
    fn on_batch_complete(&mut self) -> Result<()> {
        Ok(())
    }

    /// Sets this processor's thread index. Called once per thread, before
    /// any records are processed. The default does nothing.
    #[allow(unused_variables)]
    fn set_tid(&mut self, tid: usize) {}

    /// Returns this processor's thread index, if `set_tid` stored one.
    fn get_tid(&self) -> Option<usize> {
        None
    }
}

/// A source that can run a [`ScanProcessor`] across multiple threads.
pub trait ParallelScan {
    /// Splits the record range evenly across `num_threads` (or
    /// [`num_cpus::get`] if `0`) and runs an independent scan over each
    /// range with its own clone of `processor`.
    fn process_parallel<P: ScanProcessor + 'static>(
        &self,
        processor: P,
        num_threads: usize,
    ) -> Result<()>;
}

/// A [`FileMap`] plus [`RecordGeometry`] and [`FilterSet`], ready to scan in
/// parallel.
#[derive(Clone)]
pub struct ParallelScanner {
    file: FileMap,
    geometry: RecordGeometry,
    filters: FilterSet,
}

impl ParallelScanner {
    /// Builds a scanner over every record of `file` laid out by `geometry`,
    /// restricted to records passing `filters`.
    pub fn new(file: FileMap, geometry: RecordGeometry, filters: FilterSet) -> Self {
        Self {
            file,
            geometry,
            filters,
        }
    }
}

impl ParallelScan for ParallelScanner {
    fn process_parallel<P: ScanProcessor + 'static>(
        &self,
        processor: P,
        num_threads: usize,
    ) -> Result<()> {
        let num_threads = if num_threads == 0 {
            num_cpus::get()
        } else {
            num_threads
        }
        .max(1);

        let total = self.geometry.count();
        let chunk = total.div_ceil(num_threads as u64).max(1);

        debug!(total, num_threads, chunk, "starting parallel scan");

        std::thread::scope(|scope| -> Result<()> {
            let mut handles = Vec::with_capacity(num_threads);
            for tid in 0..num_threads {
                let start = tid as u64 * chunk;
                if start >= total {
                    break;
                }
                let end = (start + chunk).min(total);
                let file = self.file.clone();
                let geometry = self.geometry;
                let filters = self.filters.clone();
                let mut processor = processor.clone();
                processor.set_tid(tid);

                handles.push(scope.spawn(move || -> Result<()> {
                    scan_range(&file, &geometry, &filters, &mut processor, start, end)
                }));
            }

            for handle in handles {
                handle.join().expect("scan thread panicked")?;
            }
            Ok(())
        })
    }
}

fn scan_range<P: ScanProcessor>(
    file: &FileMap,
    geometry: &RecordGeometry,
    filters: &FilterSet,
    processor: &mut P,
    start: u64,
    end: u64,
) -> Result<()> {
    let width = geometry.width();
    let data_width = geometry.data_width();
    let base = geometry.start();

    let mut since_batch = 0u64;
    for line_no in start..end {
        let offset = base + (line_no as usize) * width;
        let record = file.slice(offset, offset + data_width)?;
        if !filters.eval(record) {
            continue;
        }
        processor.process_record(line_no, record)?;
        since_batch += 1;
        if since_batch >= BATCH_SIZE {
            processor.on_batch_complete()?;
            since_batch = 0;
        }
    }
    if since_batch > 0 {
        processor.on_batch_complete()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{CommentRule, Newline};
    use std::fs::File;
    use std::io::Write as _;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    const DATA_WIDTH: usize = 10;

    fn write_records(name: &str, count: usize) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        for i in 0..count {
            writeln!(file, "{:>9}", i).unwrap();
        }
        path
    }

    #[derive(Clone, Default)]
    struct Counter {
        local: u64,
        global: Arc<AtomicU64>,
        tid: Option<usize>,
    }

    impl ScanProcessor for Counter {
        fn process_record(&mut self, _line_no: u64, _record: &[u8]) -> Result<()> {
            self.local += 1;
            Ok(())
        }

        fn on_batch_complete(&mut self) -> Result<()> {
            self.global.fetch_add(self.local, Ordering::Relaxed);
            self.local = 0;
            Ok(())
        }

        fn set_tid(&mut self, tid: usize) {
            self.tid = Some(tid);
        }

        fn get_tid(&self) -> Option<usize> {
            self.tid
        }
    }

    #[test]
    fn test_parallel_scan_counts_all_records() {
        let path = write_records("fwfdb_parallel_count.txt", 500);
        let file = FileMap::open(&path).unwrap();
        let geometry =
            RecordGeometry::derive(&[DATA_WIDTH], Newline::Single(b'\n'), &CommentRule::None, file.bytes())
                .unwrap();
        let scanner = ParallelScanner::new(file, geometry, FilterSet::new());

        let counter = Counter::default();
        scanner.process_parallel(counter.clone(), 4).unwrap();

        assert_eq!(counter.global.load(Ordering::Relaxed), 500);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_parallel_scan_zero_threads_uses_all_cores() {
        let path = write_records("fwfdb_parallel_zero.txt", 50);
        let file = FileMap::open(&path).unwrap();
        let geometry =
            RecordGeometry::derive(&[DATA_WIDTH], Newline::Single(b'\n'), &CommentRule::None, file.bytes())
                .unwrap();
        let scanner = ParallelScanner::new(file, geometry, FilterSet::new());

        let counter = Counter::default();
        scanner.process_parallel(counter.clone(), 0).unwrap();

        assert_eq!(counter.global.load(Ordering::Relaxed), 50);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_processor_is_send_and_clone() {
        fn is_send<T: Send>() {}
        fn is_clone<T: Clone>() {}
        is_send::<Counter>();
        is_clone::<Counter>();
    }
}
