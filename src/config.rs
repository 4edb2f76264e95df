//! Declarative table configuration, deserialized from JSON.
//!
//! A [`FileSpec`] is the on-disk description of a fixed-width-field table:
//! field layout, newline convention, and an optional comment rule. It is the
//! only place in the crate that talks JSON; everything downstream
//! ([`crate::field::FieldTable`], [`crate::geometry::RecordGeometry`]) works
//! with plain Rust values.

use serde::{Deserialize, Serialize};

use crate::error::{FwfError, Result};
use crate::field::{Field, FieldTable};
use crate::geometry::{CommentRule, Newline};

/// One field's layout, as written in a config file.
///
/// Any two of `start`, `len`, `stop` determine the third; supplying all three
/// consistently is allowed, supplying only one (or an inconsistent trio) is a
/// [`FwfError::Config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,
    /// 0-based start offset in bytes.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start: Option<usize>,
    /// Length in bytes.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub len: Option<usize>,
    /// Exclusive end offset in bytes (`start + len`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stop: Option<usize>,
}

impl FieldSpec {
    /// Resolves `(start, len)` from whichever two of the three are present.
    fn resolve(&self) -> Result<(usize, usize)> {
        match (self.start, self.len, self.stop) {
            (Some(start), Some(len), None) => Ok((start, len)),
            (Some(start), None, Some(stop)) => {
                if stop < start {
                    return Err(FwfError::Config(format!(
                        "field '{}': stop {stop} precedes start {start}",
                        self.name
                    )));
                }
                Ok((start, stop - start))
            }
            (None, Some(len), Some(stop)) => {
                if stop < len {
                    return Err(FwfError::Config(format!(
                        "field '{}': stop {stop} shorter than len {len}",
                        self.name
                    )));
                }
                Ok((stop - len, len))
            }
            (Some(start), Some(len), Some(stop)) => {
                if start + len != stop {
                    return Err(FwfError::Config(format!(
                        "field '{}': start {start} + len {len} != stop {stop}",
                        self.name
                    )));
                }
                Ok((start, len))
            }
            _ => Err(FwfError::Config(format!(
                "field '{}': need exactly two of start/len/stop",
                self.name
            ))),
        }
    }
}

/// The newline convention, as written in a config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewlineSpec {
    /// No terminator.
    None,
    /// A single `\n` terminator.
    Lf,
    /// A two-byte `\r\n` terminator.
    CrLf,
    /// A single terminator byte other than `\n`, e.g. a NUL-delimited file.
    Byte(u8),
}

impl From<NewlineSpec> for Newline {
    fn from(spec: NewlineSpec) -> Self {
        match spec {
            NewlineSpec::None => Newline::None,
            NewlineSpec::Lf => Newline::Single(b'\n'),
            NewlineSpec::CrLf => Newline::CrLf,
            NewlineSpec::Byte(b) => Newline::Single(b),
        }
    }
}

/// A full table description: field layout, newline convention, an optional
/// comment-line prefix, and an optional default column ordering for CLI
/// output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSpec {
    /// Field definitions, in any order — [`FileSpec::field_table`] sorts
    /// nothing and preserves this order in
    /// [`crate::field::FieldTable::names`].
    pub fields: Vec<FieldSpec>,
    /// Newline convention for every record.
    #[serde(default = "default_newline")]
    pub newline: NewlineSpec,
    /// Optional byte prefix marking a record as a comment to be skipped when
    /// locating the first data record.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comment_prefix: Option<Vec<u8>>,
    /// Optional default column ordering for CLI output; defaults to
    /// declaration order when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_columns: Option<Vec<String>>,
}

fn default_newline() -> NewlineSpec {
    NewlineSpec::Lf
}

impl FileSpec {
    /// Parses a `FileSpec` from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| FwfError::Config(format!("invalid table config: {e}")))
    }

    /// Sum of every field's resolved `len` — the record data width, before
    /// the newline terminator is added.
    fn data_width(&self) -> Result<usize> {
        let mut width = 0usize;
        for field in &self.fields {
            let (_, len) = field.resolve()?;
            width += len;
        }
        Ok(width)
    }

    /// The newline convention as a [`Newline`].
    pub fn newline(&self) -> Newline {
        self.newline.into()
    }

    /// The comment rule, if any.
    pub fn comment_rule(&self) -> CommentRule {
        match &self.comment_prefix {
            Some(prefix) => CommentRule::Prefix(prefix.clone()),
            None => CommentRule::None,
        }
    }

    /// Builds the [`FieldTable`] this spec describes.
    pub fn field_table(&self) -> Result<FieldTable> {
        let data_width = self.data_width()?;
        let mut fields = Vec::with_capacity(self.fields.len());
        for spec in &self.fields {
            let (start, len) = spec.resolve()?;
            fields.push(Field::new(spec.name.clone(), start, len, data_width)?);
        }
        FieldTable::new(fields)
    }

    /// Field widths in declaration order, for [`crate::geometry::RecordGeometry::derive`].
    pub fn field_widths(&self) -> Result<Vec<usize>> {
        self.fields.iter().map(|f| Ok(f.resolve()?.1)).collect()
    }
}
