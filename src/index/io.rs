//! Persisted index formats.
//!
//! An index built once over a large file is expensive to rebuild on every
//! process start. These functions serialize a finalized
//! [`PackedMultiIndex`] or [`UniqueIndex`] to a flat file that reloads
//! without rescanning the source: the integer arrays are written as raw
//! bytes, and the (non-`Pod`) key map rides alongside as a length-prefixed
//! JSON blob.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::coord::Coordinate;
use crate::error::{FwfError, Result};
use crate::key::Key;

use super::packed::{Finalized, PackedMultiIndex};
use super::unique::UniqueIndex;

const PACKED_MAGIC: [u8; 8] = *b"FWFPIDX1";
const UNIQUE_MAGIC: [u8; 8] = *b"FWFUIDX1";

fn write_len_prefixed(writer: &mut impl Write, bytes: &[u8]) -> Result<()> {
    writer.write_all(&(bytes.len() as u64).to_le_bytes())?;
    writer.write_all(bytes)?;
    Ok(())
}

fn read_len_prefixed(reader: &mut impl Read) -> Result<Vec<u8>> {
    let mut len_buf = [0u8; 8];
    reader.read_exact(&mut len_buf)?;
    let len = u64::from_le_bytes(len_buf) as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

fn check_magic(reader: &mut impl Read, expected: [u8; 8]) -> Result<()> {
    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic)?;
    if magic != expected {
        return Err(FwfError::Config("index file has an unrecognized magic header".to_string()));
    }
    Ok(())
}

fn to_json(value: &impl serde::Serialize) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| FwfError::Config(format!("failed to encode index key map: {e}")))
}

fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| FwfError::Config(format!("failed to decode index key map: {e}")))
}

/// Writes a finalized [`PackedMultiIndex`] to `path`.
pub fn save_packed_index(path: impl AsRef<Path>, index: PackedMultiIndex<Finalized>) -> Result<()> {
    let (head, line_no, next, last, cap) = index.into_raw_parts();
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&PACKED_MAGIC)?;
    writer.write_all(&last.to_le_bytes())?;
    writer.write_all(&cap.to_le_bytes())?;
    write_len_prefixed(&mut writer, bytemuck::cast_slice(&line_no))?;
    write_len_prefixed(&mut writer, bytemuck::cast_slice(&next))?;
    let entries: Vec<(Key, i32)> = head.into_iter().collect();
    write_len_prefixed(&mut writer, &to_json(&entries)?)?;
    writer.flush()?;
    Ok(())
}

/// Reads a [`PackedMultiIndex`] previously written by [`save_packed_index`].
pub fn load_packed_index(path: impl AsRef<Path>) -> Result<PackedMultiIndex<Finalized>> {
    let mut reader = BufReader::new(File::open(path)?);
    check_magic(&mut reader, PACKED_MAGIC)?;

    let mut i32_buf = [0u8; 4];
    reader.read_exact(&mut i32_buf)?;
    let last = i32::from_le_bytes(i32_buf);
    reader.read_exact(&mut i32_buf)?;
    let cap = i32::from_le_bytes(i32_buf);

    let line_no: Vec<i32> = bytemuck::pod_collect_to_vec(&read_len_prefixed(&mut reader)?);
    let next: Vec<i32> = bytemuck::pod_collect_to_vec(&read_len_prefixed(&mut reader)?);
    let entries: Vec<(Key, i32)> = from_json(&read_len_prefixed(&mut reader)?)?;
    let head = entries.into_iter().collect();

    Ok(PackedMultiIndex::from_raw_parts(head, line_no, next, last, cap))
}

/// Writes a [`UniqueIndex`] to `path`.
pub fn save_unique_index(path: impl AsRef<Path>, index: UniqueIndex) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&UNIQUE_MAGIC)?;
    let entries: Vec<(Key, Coordinate)> = index.into_raw_parts().into_iter().collect();
    write_len_prefixed(&mut writer, &to_json(&entries)?)?;
    writer.flush()?;
    Ok(())
}

/// Reads a [`UniqueIndex`] previously written by [`save_unique_index`].
pub fn load_unique_index(path: impl AsRef<Path>) -> Result<UniqueIndex> {
    let mut reader = BufReader::new(File::open(path)?);
    check_magic(&mut reader, UNIQUE_MAGIC)?;
    let entries: Vec<(Key, Coordinate)> = from_json(&read_len_prefixed(&mut reader)?)?;
    Ok(UniqueIndex::from_raw_parts(entries.into_iter().collect()))
}
