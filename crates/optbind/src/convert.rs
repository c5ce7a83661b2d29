//! String to value conversions used when assigning option values.
//!
//! All parsing is locale-independent: ASCII digits, `.` as the decimal
//! separator, and ASCII whitespace around the number is ignored.

use crate::error::ConversionError;
use std::num::{IntErrorKind, ParseFloatError, ParseIntError};
use std::str::FromStr;

const TRUE_WORDS: &[&str] = &["+", "ON", "TRUE", "1", "YES", "Y"];
const FALSE_WORDS: &[&str] = &["-", "OFF", "FALSE", "0", "NO", "N"];

/// Interpret a boolean option value.
///
/// An empty value means the option was given bare, so `presence` (the value
/// the option was declared to set) is returned.
pub fn boolean(raw: &str, presence: bool) -> Result<bool, ConversionError> {
    if raw.is_empty() {
        return Ok(presence);
    }
    if TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(raw)) {
        return Ok(true);
    }
    if FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(raw)) {
        return Ok(false);
    }
    Err(ConversionError::InvalidBooleanValue)
}

/// Parse a base-10 integer into `T`, telling overflow apart from garbage.
pub fn integer<T>(raw: &str, ty: &'static str) -> Result<T, ConversionError>
where
    T: FromStr<Err = ParseIntError>,
{
    let text = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    match text.parse::<T>() {
        Ok(v) => Ok(v),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                Err(ConversionError::Overflow { ty })
            }
            // Unsigned types reject a minus sign as a bad digit; a negative
            // number is still a number, just out of range.
            IntErrorKind::InvalidDigit => match negative_digits(text) {
                Some(digits) if digits.bytes().all(|b| b == b'0') => "0"
                    .parse::<T>()
                    .map_err(|_| ConversionError::InvalidFormat { ty }),
                Some(_) => Err(ConversionError::Overflow { ty }),
                None => Err(ConversionError::InvalidFormat { ty }),
            },
            _ => Err(ConversionError::InvalidFormat { ty }),
        },
    }
}

fn negative_digits(text: &str) -> Option<&str> {
    let digits = text.strip_prefix('-')?;
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

/// Parse a floating-point number into `T`.
///
/// Rust saturates out-of-range literals to infinity; that is reported as
/// overflow unless the text actually spells an infinity.
pub fn floating_point<T>(raw: &str, ty: &'static str) -> Result<T, ConversionError>
where
    T: FromStr<Err = ParseFloatError> + Copy + Into<f64>,
{
    let text = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    let value = text
        .parse::<T>()
        .map_err(|_| ConversionError::InvalidFormat { ty })?;
    if value.into().is_infinite() && !spells_infinity(text) {
        return Err(ConversionError::Overflow { ty });
    }
    Ok(value)
}

fn spells_infinity(text: &str) -> bool {
    let unsigned = text
        .strip_prefix(['+', '-'])
        .unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_vocabulary() {
        for word in ["YES", "y", "True", "1", "on", "+"] {
            assert_eq!(boolean(word, false), Ok(true), "word: {word}");
        }
        for word in ["no", "N", "false", "0", "OFF", "-"] {
            assert_eq!(boolean(word, true), Ok(false), "word: {word}");
        }
        assert_eq!(boolean("maybe", true), Err(ConversionError::InvalidBooleanValue));
        assert_eq!(boolean(" yes", true), Err(ConversionError::InvalidBooleanValue));
    }

    #[test]
    fn bare_boolean_uses_presence_value() {
        assert_eq!(boolean("", true), Ok(true));
        assert_eq!(boolean("", false), Ok(false));
    }

    #[test]
    fn i32_limits() {
        assert_eq!(integer::<i32>("2147483647", "i32"), Ok(i32::MAX));
        assert_eq!(integer::<i32>("-2147483648", "i32"), Ok(i32::MIN));
        assert_eq!(
            integer::<i32>("2147483648", "i32"),
            Err(ConversionError::Overflow { ty: "i32" })
        );
        assert_eq!(
            integer::<i32>("-2147483649", "i32"),
            Err(ConversionError::Overflow { ty: "i32" })
        );
    }

    #[test]
    fn integer_format_errors() {
        for raw in ["", "abc", "1.5", "0x10", "--1"] {
            assert_eq!(
                integer::<i64>(raw, "i64"),
                Err(ConversionError::InvalidFormat { ty: "i64" }),
                "raw: {raw:?}"
            );
        }
        assert_eq!(integer::<u8>(" 42 ", "u8"), Ok(42));
        assert_eq!(integer::<i8>("+7", "i8"), Ok(7));
    }

    #[test]
    fn negative_into_unsigned_is_overflow() {
        assert_eq!(
            integer::<u32>("-1", "u32"),
            Err(ConversionError::Overflow { ty: "u32" })
        );
        assert_eq!(integer::<u32>("-0", "u32"), Ok(0));
        assert_eq!(
            integer::<u32>("-", "u32"),
            Err(ConversionError::InvalidFormat { ty: "u32" })
        );
    }

    #[test]
    fn floats() {
        assert_eq!(floating_point::<f64>("3.25", "f64"), Ok(3.25));
        assert_eq!(floating_point::<f32>("-1e3", "f32"), Ok(-1000.0));
        assert_eq!(
            floating_point::<f64>("1e400", "f64"),
            Err(ConversionError::Overflow { ty: "f64" })
        );
        assert_eq!(
            floating_point::<f32>("1e39", "f32"),
            Err(ConversionError::Overflow { ty: "f32" })
        );
        assert_eq!(
            floating_point::<f64>("ten", "f64"),
            Err(ConversionError::InvalidFormat { ty: "f64" })
        );
        assert_eq!(
            floating_point::<f64>("", "f64"),
            Err(ConversionError::InvalidFormat { ty: "f64" })
        );
        assert_eq!(floating_point::<f64>("-inf", "f64"), Ok(f64::NEG_INFINITY));
    }
}
