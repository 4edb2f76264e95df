//! Federates several files sharing one record geometry into one logical
//! stream.

use crate::coord::{Coordinate, FileId};
use crate::error::Result;
use crate::filter::FilterSet;
use crate::geometry::RecordGeometry;
use crate::mmap::FileMap;
use crate::scan::ScanLoop;
use crate::sink::Sink;

/// How line numbers are assigned across a [`MultiFileView`]'s member files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numbering {
    /// Each file's records are numbered from 0, independently. Two records
    /// from different files can share a `line_no`; they are distinguished by
    /// `file_id` in the resulting [`Coordinate`].
    Local,
    /// Records are numbered 0, 1, 2, ... continuously across every file, in
    /// file order.
    Global,
}

/// One member file of a [`MultiFileView`].
struct Member {
    file_id: FileId,
    file: FileMap,
    geometry: RecordGeometry,
}

/// A logical view over several physically separate files that share a record
/// layout, scanned as if they were one file.
///
/// Every member must agree on field layout; only `RecordGeometry::count` may
/// differ between them (different files may hold different numbers of
/// records). Coordinates produced while scanning a `MultiFileView` always
/// carry the originating `file_id`, so a caller can always map a result back
/// to its source file regardless of `Numbering`.
pub struct MultiFileView {
    members: Vec<Member>,
    numbering: Numbering,
}

impl MultiFileView {
    /// Builds an empty view with the given line-numbering convention.
    pub fn new(numbering: Numbering) -> Self {
        Self {
            members: Vec::new(),
            numbering,
        }
    }

    /// Adds a member file, identified by `file_id`.
    pub fn add(&mut self, file_id: FileId, file: FileMap, geometry: RecordGeometry) {
        self.members.push(Member {
            file_id,
            file,
            geometry,
        });
    }

    /// Total record count across every member file.
    pub fn total_count(&self) -> u64 {
        self.members.iter().map(|m| m.geometry.count()).sum()
    }

    /// Runs `filters` and `sink` over every member file in sequence.
    ///
    /// Under [`Numbering::Local`] each file's records are numbered from 0;
    /// under [`Numbering::Global`] numbering continues across files. Either
    /// way, a wrapping sink that wants physical file provenance must pair
    /// this scan with [`MultiFileView::coordinate_of`], since [`Sink`] itself
    /// only ever sees a bare `line_no`.
    pub fn scan<S: Sink>(&self, filters: &FilterSet, sink: &mut S) -> Result<()> {
        let mut offset = 0u64;
        for member in &self.members {
            let line_offset = match self.numbering {
                Numbering::Local => 0,
                Numbering::Global => offset,
            };
            ScanLoop::run(&member.file, &member.geometry, filters, sink, line_offset)?;
            offset += member.geometry.count();
        }
        Ok(())
    }

    /// Resolves a scan-assigned `line_no` back to the originating file's
    /// [`Coordinate`], per this view's [`Numbering`].
    ///
    /// Under [`Numbering::Local`] this requires knowing which file produced
    /// `line_no`; callers scanning per-file already have `file_id` in hand.
    /// Under [`Numbering::Global`], the file is found by walking cumulative
    /// record counts.
    pub fn coordinate_of(&self, file_id: FileId, line_no: u64) -> Option<Coordinate> {
        match self.numbering {
            Numbering::Local => self
                .members
                .iter()
                .find(|m| m.file_id == file_id)
                .map(|_| Coordinate::new(file_id, line_no)),
            Numbering::Global => {
                let mut offset = 0u64;
                for member in &self.members {
                    let count = member.geometry.count();
                    if line_no < offset + count {
                        return Some(Coordinate::new(member.file_id, line_no - offset));
                    }
                    offset += count;
                }
                None
            }
        }
    }
}
