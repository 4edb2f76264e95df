//! # fwfdb - scan and index engine for fixed-width-field flat files
//!
//! `fwfdb` reads flat files made of fixed-width byte records — the kind
//! produced by mainframe exports, census extracts, and other systems with no
//! delimiter at all, just a byte layout agreed on out of band. Every record
//! has the same width; every field lives at the same byte offset in every
//! record. There is no parser in the usual sense: locating a field is
//! arithmetic, not scanning.
//!
//! The library is built around three ideas:
//!
//! - **Memory mapping.** [`FileMap`] maps a file once; every scan thereafter
//!   walks the mapping directly, with the OS page cache doing the work of
//!   keeping hot regions in RAM. Files far larger than physical memory scan
//!   without a special code path.
//! - **Fused filtering.** A [`FilterSet`] of byte-range comparisons is
//!   evaluated inline, per record, inside the single hot loop in
//!   [`ScanLoop`] — there is no separate filter pass or intermediate
//!   representation to materialize.
//! - **Sinks over inheritance.** What happens to a record that passes the
//!   filter is a [`Sink`]: a small trait with `accept`/`finalize`. Indexes
//!   ([`UniqueIndex`], [`MultiIndex`], [`PackedMultiIndex`]) are sinks;
//!   column extraction is a sink; so is counting matching line numbers.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fwfdb::{FileSpec, FwfTable, FilterSet, Bound, Predicate};
//!
//! # fn main() -> fwfdb::Result<()> {
//! let spec = FileSpec::from_json(r#"{
//!     "fields": [
//!         {"name": "country", "start": 0, "len": 9},
//!         {"name": "state", "start": 9, "len": 2},
//!         {"name": "birthday", "start": 11, "len": 8},
//!         {"name": "sex", "start": 19, "len": 1}
//!     ],
//!     "newline": "lf"
//! }"#)?;
//!
//! let table = FwfTable::open("records.fwf", &spec)?;
//! let sex = table.fields().get("sex").unwrap();
//! let filters = FilterSet::new()
//!     .with(Predicate::on_field(sex, b"F".to_vec(), Bound::Lower, true)?)
//!     .with(Predicate::on_field(sex, b"F".to_vec(), Bound::Upper, true)?);
//!
//! let lines = table.scan_line_numbers(&filters)?;
//! println!("{} records matched", lines.len());
//! # Ok(())
//! # }
//! ```

mod config;
mod coord;
mod error;
mod field;
mod filter;
mod geometry;
mod index;
mod key;
mod mmap;
mod multifile;
mod parallel;
mod parse;
mod scan;
mod sink;
mod table;

pub use config::{FieldSpec, FileSpec, NewlineSpec};
pub use coord::{Coordinate, FileId};
pub use error::{FwfError, Result};
pub use field::{Field, FieldTable};
pub use filter::{Bound, FilterSet, Predicate};
pub use geometry::{CommentRule, Newline, RecordGeometry};
pub use index::{
    load_packed_index, load_unique_index, save_packed_index, save_unique_index, Building, Finalized,
    MultiIndex, MultiIndexSink, PackedMultiIndex, PackedMultiIndexSink, UniqueIndex, UniqueIndexSink,
};
pub use key::{Key, KeyKind};
pub use mmap::FileMap;
pub use multifile::{MultiFileView, Numbering};
pub use parallel::{ParallelScan, ParallelScanner, ScanProcessor};
pub use parse::{format_int, parse_decimal_i64};
pub use scan::ScanLoop;
pub use sink::{ByteMatrix, BytesColumnSink, IntColumnSink, Lenient, LineNumberSink, Sink};
pub use table::FwfTable;
