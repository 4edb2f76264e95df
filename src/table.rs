//! [`FwfTable`]: the top-level entry point tying a mapped file, its field
//! layout, and the scan/index machinery together.

use std::path::Path;

use tracing::debug;

use crate::config::FileSpec;
use crate::error::Result;
use crate::field::FieldTable;
use crate::filter::FilterSet;
use crate::geometry::RecordGeometry;
use crate::index::{
    MultiIndex, MultiIndexSink, PackedMultiIndex, PackedMultiIndexSink, UniqueIndex, UniqueIndexSink,
};
use crate::key::KeyKind;
use crate::mmap::FileMap;
use crate::scan::ScanLoop;
use crate::sink::{ByteMatrix, BytesColumnSink, IntColumnSink, LineNumberSink};

/// An opened fixed-width-field table: a memory-mapped file plus its derived
/// [`RecordGeometry`] and [`FieldTable`].
///
/// `FwfTable` is the single entry point most callers need — it wraps the
/// lower-level [`ScanLoop`] and the various sinks behind a small,
/// record-count-aware API.
#[derive(Clone)]
pub struct FwfTable {
    file: FileMap,
    geometry: RecordGeometry,
    fields: FieldTable,
}

impl FwfTable {
    /// Opens `path`, derives its geometry from `spec`, and builds the field
    /// table. Does no further I/O: the whole file is memory-mapped, and every
    /// field access afterwards is a pointer offset.
    pub fn open(path: impl AsRef<Path>, spec: &FileSpec) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening fwf table");
        let file = FileMap::open(path)?;
        let widths = spec.field_widths()?;
        let geometry = RecordGeometry::derive(&widths, spec.newline(), &spec.comment_rule(), file.bytes())?;
        let fields = spec.field_table()?;
        debug!(
            records = geometry.count(),
            width = geometry.width(),
            "table opened"
        );
        Ok(Self {
            file,
            geometry,
            fields,
        })
    }

    /// The derived record geometry.
    pub fn geometry(&self) -> &RecordGeometry {
        &self.geometry
    }

    /// The field table.
    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    /// Number of data records (`R`).
    pub fn record_count(&self) -> u64 {
        self.geometry.count()
    }

    /// Line numbers of every record passing `filters`.
    pub fn scan_line_numbers(&self, filters: &FilterSet) -> Result<Vec<i32>> {
        let mut sink = LineNumberSink::with_capacity(self.geometry.count() as usize);
        ScanLoop::run(&self.file, &self.geometry, filters, &mut sink, 0)?;
        sink.finalize()
    }

    /// Raw bytes of `field_name` for every record passing `filters`.
    pub fn scan_bytes_column(&self, field_name: &str, filters: &FilterSet) -> Result<ByteMatrix> {
        let field = self.lookup_field(field_name)?;
        let mut sink = BytesColumnSink::new(field, self.geometry.count() as usize);
        ScanLoop::run(&self.file, &self.geometry, filters, &mut sink, 0)?;
        sink.finalize()
    }

    /// `field_name` parsed as a signed decimal integer for every record
    /// passing `filters`. Aborts on the first unparseable value; see
    /// [`crate::sink::Lenient`] to skip them instead.
    pub fn scan_int_column(&self, field_name: &str, filters: &FilterSet) -> Result<Vec<i64>> {
        let field = self.lookup_field(field_name)?;
        let mut sink = IntColumnSink::new(field, self.geometry.count() as usize);
        ScanLoop::run(&self.file, &self.geometry, filters, &mut sink, 0)?;
        sink.finalize()
    }

    /// Builds a [`UniqueIndex`] keyed on `field_name` (last write wins) over
    /// every record passing `filters`.
    pub fn build_unique_index(&self, field_name: &str, filters: &FilterSet, kind: KeyKind) -> Result<UniqueIndex> {
        let field = self.lookup_field(field_name)?;
        let mut sink = UniqueIndexSink::new(field, kind, 0);
        ScanLoop::run(&self.file, &self.geometry, filters, &mut sink, 0)?;
        sink.finalize()
    }

    /// Builds a [`MultiIndex`] keyed on `field_name` over every record
    /// passing `filters`.
    pub fn build_multi_index(&self, field_name: &str, filters: &FilterSet, kind: KeyKind) -> Result<MultiIndex> {
        let field = self.lookup_field(field_name)?;
        let mut sink = MultiIndexSink::new(field, kind, 0);
        ScanLoop::run(&self.file, &self.geometry, filters, &mut sink, 0)?;
        sink.finalize()
    }

    /// Builds a [`PackedMultiIndex`] keyed on `field_name` over every record
    /// passing `filters`, pre-sized to `cap` entries. `cap` must be at least
    /// the table's record count, since a caller scanning a
    /// [`crate::multifile::MultiFileView`] may want to leave room to append
    /// more entries than this table alone contains.
    pub fn build_packed_multi_index(
        &self,
        field_name: &str,
        filters: &FilterSet,
        kind: KeyKind,
        cap: usize,
    ) -> Result<PackedMultiIndex<crate::index::Finalized>> {
        if (cap as u64) < self.record_count() {
            return Err(crate::error::FwfError::Config(format!(
                "packed multi index cap {cap} is less than record count {}",
                self.record_count()
            )));
        }
        let field = self.lookup_field(field_name)?;
        let mut sink = PackedMultiIndexSink::new(field, kind, cap);
        ScanLoop::run(&self.file, &self.geometry, filters, &mut sink, 0)?;
        sink.finalize()
    }

    fn lookup_field(&self, name: &str) -> Result<crate::field::Field> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| crate::error::FwfError::Config(format!("no such field '{name}'")))
    }
}
