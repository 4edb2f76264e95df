//! Index keys: either raw field bytes or a parsed integer.

use crate::error::Result;
use crate::field::Field;
use crate::parse::parse_decimal_i64;

/// Which representation an index sink should key records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum KeyKind {
    /// Key on the field's raw bytes, unchanged.
    Bytes,
    /// Key on the field parsed as a signed decimal integer (§4.7).
    Int,
}

/// An index key: the raw bytes of a field, or its parsed integer value.
///
/// Both variants borrow nothing — index sinks must own their keys, since the
/// underlying record bytes are only valid for the duration of `accept`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Key {
    /// Raw field bytes, copied out of the record.
    Bytes(Vec<u8>),
    /// A field parsed as a signed decimal integer.
    Int(i64),
}

impl Key {
    /// Extracts a key of the given kind from `field` within `record`.
    pub fn extract(field: &Field, record: &[u8], kind: KeyKind, line_no: u64) -> Result<Self> {
        let raw = field.slice(record);
        match kind {
            KeyKind::Bytes => Ok(Key::Bytes(raw.to_vec())),
            KeyKind::Int => Ok(Key::Int(parse_decimal_i64(raw, line_no)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bytes_key() {
        let field = Field::new("state", 9, 2, 81).unwrap();
        let record = b"US       AR19570526Fbe56008be36eDianne Mcintosh         Whatever    Medic        \n";
        let key = Key::extract(&field, record, KeyKind::Bytes, 0).unwrap();
        assert_eq!(key, Key::Bytes(b"AR".to_vec()));
    }

    #[test]
    fn test_extract_int_key() {
        let field = Field::new("birthday", 11, 8, 81).unwrap();
        let record = b"US       AR19570526Fbe56008be36eDianne Mcintosh         Whatever    Medic        \n";
        let key = Key::extract(&field, record, KeyKind::Int, 0).unwrap();
        assert_eq!(key, Key::Int(19_570_526));
    }

    #[test]
    fn test_extract_int_key_parse_error() {
        let field = Field::new("bad", 0, 8, 81).unwrap();
        let record = b"invalid!".to_vec();
        let mut padded = record.clone();
        padded.resize(81, b' ');
        let err = Key::extract(&field, &padded, KeyKind::Int, 3).unwrap_err();
        match err {
            crate::error::FwfError::Parse { line_no, .. } => assert_eq!(line_no, 3),
            other => panic!("expected Parse, got {other:?}"),
        }
    }
}
