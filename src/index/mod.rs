//! Index structures built by scanning a table: [`unique`], [`multi`], and
//! [`packed`], plus [`io`] for persisting them.

pub mod io;
pub mod multi;
pub mod packed;
pub mod unique;

pub use io::{load_packed_index, load_unique_index, save_packed_index, save_unique_index};
pub use multi::{MultiIndex, MultiIndexSink};
pub use packed::{Building, Finalized, PackedMultiIndex, PackedMultiIndexSink};
pub use unique::{UniqueIndex, UniqueIndexSink};
