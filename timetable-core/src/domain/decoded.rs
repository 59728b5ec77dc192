//! Values read back from loosely-typed storage.

use std::fmt;

/// A value decoded from storage, remembering whether a default stood in.
///
/// Stored data is user-entered and may predate the current format, so
/// decoding never fails outright. Callers that only want the value use
/// [`Decoded::value`]; callers that care (logging, repair) can tell a
/// genuine value from a default substituted for a missing or malformed one.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::Decoded;
///
/// assert_eq!(Decoded::parse_int("07"), Decoded::Value(7));
/// assert_eq!(Decoded::parse_int("  "), Decoded::Absent(0));
/// assert_eq!(Decoded::parse_int("7a"), Decoded::Malformed(0));
/// assert_eq!(Decoded::parse_int("7a").value(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded<T> {
    /// Read and parsed successfully.
    Value(T),
    /// Nothing was stored; the default is used.
    Absent(T),
    /// Something was stored but could not be parsed; the default is used.
    Malformed(T),
}

impl Decoded<i32> {
    /// Parse a decimal integer token, substituting 0.
    pub fn parse_int(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            return Decoded::Absent(0);
        }
        match token.parse::<i32>() {
            Ok(v) => Decoded::Value(v),
            Err(_) => Decoded::Malformed(0),
        }
    }
}

impl<T> Decoded<T> {
    /// The decoded value or the default that replaced it.
    pub fn value(self) -> T {
        match self {
            Decoded::Value(v) | Decoded::Absent(v) | Decoded::Malformed(v) => v,
        }
    }

    /// The value only if it was actually read.
    pub fn ok(self) -> Option<T> {
        match self {
            Decoded::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Decoded::Malformed(_))
    }
}

impl<T: fmt::Display> fmt::Display for Decoded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Value(v) => write!(f, "{v}"),
            Decoded::Absent(v) => write!(f, "{v} (absent)"),
            Decoded::Malformed(v) => write!(f, "{v} (malformed)"),
        }
    }
}
