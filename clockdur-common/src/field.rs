use crate::error::InputError;

/// Position of a piece inside an `HH:MM[:SS]` display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Hours,
    Minutes,
    Seconds,
}

impl Field {
    pub const ORDER: [Field; 3] = [Field::Hours, Field::Minutes, Field::Seconds];

    /// Inclusive upper bound. Hours are unbounded up to the integer range.
    pub fn max(&self) -> u64 {
        match self {
            Field::Hours => u64::MAX,
            Field::Minutes | Field::Seconds => 59,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Hours => write!(f, "hours"),
            Field::Minutes => write!(f, "minutes"),
            Field::Seconds => write!(f, "seconds"),
        }
    }
}

/// Parses one piece of a display string.
///
/// Only ASCII digits are accepted: signs, whitespace, hex prefixes and
/// trailing garbage are all rejected. Leading zeros are insignificant, so
/// `"007"` and `"7"` parse the same and `"00"` is zero.
pub fn parse_piece(piece: &str, field: Field) -> Result<u64, InputError> {
    if piece.is_empty() {
        return Err(InputError::EmptyPiece { field });
    }

    if !piece.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::NotDecimal {
            field,
            piece: piece.to_string(),
        });
    }

    let digits = piece.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }

    // Digits only, so the sole failure left is exceeding u64
    let value: u64 = digits.parse().map_err(|_| InputError::Overflow)?;

    if value > field.max() {
        return Err(InputError::OutOfRange {
            field,
            value,
            max: field.max(),
        });
    }

    Ok(value)
}

/// Parses a normalized value supplied as text, e.g. straight from a form post.
///
/// Canonical decimal only: `"0"` or digits without a leading zero.
pub fn parse_normalized(text: &str) -> Result<u64, InputError> {
    let canonical = !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'));

    if !canonical {
        return Err(InputError::NotAnInteger {
            value: text.to_string(),
        });
    }

    text.parse().map_err(|_| InputError::Overflow)
}
