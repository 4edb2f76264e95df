//! Byte-exact decimal integer parsing for field values.
//!
//! This is deliberately narrower than `str::parse`: it never looks at encoding,
//! only at bytes, and it treats anything that isn't `[ ]*[+-]?[0-9]+` as an error
//! rather than silently truncating or defaulting.

use crate::error::{FwfError, Result};

/// Parses a field's raw bytes as a signed decimal integer.
///
/// Leading `0x20` spaces are skipped, one optional `+`/`-` sign is accepted,
/// and at least one digit `0x30..=0x39` is required. Any other byte anywhere
/// after the sign — including a second sign, a decimal point, or an embedded
/// space — is a parse error. Overflow of `i64` is also a parse error.
///
/// `line_no` and the raw bytes are threaded through purely so the caller can
/// build a [`FwfError::Parse`] with full context; this function does not know
/// about line numbers itself.
pub fn parse_decimal_i64(field: &[u8], line_no: u64) -> Result<i64> {
    let fail = || FwfError::Parse {
        line_no,
        raw: field.to_vec(),
    };

    let mut i = 0;
    while i < field.len() && field[i] == b' ' {
        i += 1;
    }

    let negative = match field.get(i) {
        Some(b'+') => {
            i += 1;
            false
        }
        Some(b'-') => {
            i += 1;
            true
        }
        _ => false,
    };

    if i >= field.len() || !field[i].is_ascii_digit() {
        return Err(fail());
    }

    let mut value: i64 = 0;
    while i < field.len() {
        let byte = field[i];
        if !byte.is_ascii_digit() {
            return Err(fail());
        }
        let digit = (byte - b'0') as i64;
        value = value.checked_mul(10).ok_or_else(fail)?;
        value = value.checked_add(digit).ok_or_else(fail)?;
        i += 1;
    }

    Ok(if negative { -value } else { value })
}

/// Formats `value` right-justified in a field of `width` bytes, left-padded
/// with `0x20` spaces. The inverse of [`parse_decimal_i64`] for values that
/// fit in the given width — used by the int-parser round-trip property test.
pub fn format_int(value: i64, width: usize) -> Vec<u8> {
    let digits = value.to_string();
    let mut out = vec![b' '; width.saturating_sub(digits.len())];
    out.extend_from_slice(digits.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse_decimal_i64(b"19570526", 0).unwrap(), 19_570_526);
    }

    #[test]
    fn test_parse_leading_spaces() {
        assert_eq!(parse_decimal_i64(b"   42", 0).unwrap(), 42);
    }

    #[test]
    fn test_parse_signed() {
        assert_eq!(parse_decimal_i64(b"-42", 0).unwrap(), -42);
        assert_eq!(parse_decimal_i64(b"+42", 0).unwrap(), 42);
    }

    #[test]
    fn test_parse_invalid_byte() {
        let err = parse_decimal_i64(b"invalid!", 7).unwrap_err();
        match err {
            FwfError::Parse { line_no, raw } => {
                assert_eq!(line_no, 7);
                assert_eq!(raw, b"invalid!");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_no_digits() {
        assert!(parse_decimal_i64(b"   ", 0).is_err());
        assert!(parse_decimal_i64(b"-", 0).is_err());
        assert!(parse_decimal_i64(b"", 0).is_err());
    }

    #[test]
    fn test_parse_embedded_space_is_error() {
        assert!(parse_decimal_i64(b"12 34", 0).is_err());
    }

    #[test]
    fn test_parse_overflow() {
        assert!(parse_decimal_i64(b"99999999999999999999", 0).is_err());
    }

    #[test]
    fn test_format_int_round_trip() {
        for value in [0_i64, 42, -42, 19_570_526, i64::from(i32::MAX)] {
            let formatted = format_int(value, 24);
            let parsed = parse_decimal_i64(&formatted, 0).unwrap();
            assert_eq!(parsed, value);
        }
    }
}
