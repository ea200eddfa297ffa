//! Amount type for transaction values that arrive as either JSON text or JSON numbers.
//!
//! The upstream payload is loose about amounts: `"10"`, `10`, `"12.50 USD"`, `""` and `null` all
//! occur. `Amount` keeps the raw value exactly as it was received, so that it can be displayed
//! unchanged, and parses it to `f64` with the same rules as JavaScript's `parseFloat`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;
use std::fmt::{Display, Formatter};

/// The raw form in which an amount was received.
#[derive(Debug, Clone, Default, PartialEq)]
enum Raw {
    /// The field was absent.
    #[default]
    Missing,
    /// The field was `null`.
    Null,
    /// The field was a JSON string (or some other non-numeric JSON value, rendered as text).
    Text(String),
    /// The field was a JSON number.
    Number(Number),
}

/// Represents a transaction amount.
///
/// Equality compares the raw value, so `"10"` and `10` are different amounts with the same
/// `value()`.
///
/// # Examples
///
/// ```
/// # use customer_ledger::model::Amount;
/// let amount = Amount::from("12.50 USD");
/// assert_eq!(amount.value(), 12.5);
/// assert_eq!(amount.to_string(), "12.50 USD");
///
/// let garbage = Amount::from("abc");
/// assert!(garbage.value().is_nan());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    raw: Raw,
    value: f64,
}

impl Default for Amount {
    fn default() -> Self {
        Amount::missing()
    }
}

impl Amount {
    /// An amount that was not present in the payload. Its value is `NaN`.
    pub fn missing() -> Self {
        Self {
            raw: Raw::Missing,
            value: f64::NAN,
        }
    }

    /// An amount given as JSON `null`. Its value is `NaN`.
    pub fn null() -> Self {
        Self {
            raw: Raw::Null,
            value: f64::NAN,
        }
    }

    /// Returns the value parsed with `parse_float`, as used for totals. Unparseable, missing and
    /// `null` amounts are `NaN`.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the value the amount has when compared with a number in JavaScript, i.e. the way
    /// `Number()` converts it. Unlike `value`, text must be a complete numeric literal:
    ///
    /// - missing is `NaN`, `null` is `0`
    /// - text that is empty after trimming is `0`
    /// - `"12abc"` is `NaN`, `" 12 "` is `12`, `"0x1A"` is `26`
    pub fn numeric_value(&self) -> f64 {
        match &self.raw {
            Raw::Missing => f64::NAN,
            Raw::Null => 0.0,
            Raw::Text(s) => to_number(s),
            Raw::Number(_) => self.value,
        }
    }

    /// Returns true if the field was absent from the payload.
    pub fn is_missing(&self) -> bool {
        matches!(self.raw, Raw::Missing)
    }

    /// Returns true if the field was `null`.
    pub fn is_null(&self) -> bool {
        matches!(self.raw, Raw::Null)
    }

    /// Returns true when the raw value would be falsy in a JavaScript truthiness test: missing,
    /// `null`, the empty string, or the number zero. The string `"0"` is not falsy.
    pub fn is_falsy(&self) -> bool {
        match &self.raw {
            Raw::Missing | Raw::Null => true,
            Raw::Text(s) => s.is_empty(),
            Raw::Number(n) => n.as_f64().map(|f| f == 0.0 || f.is_nan()).unwrap_or(false),
        }
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Self {
            value: parse_float(value),
            raw: Raw::Text(value.to_string()),
        }
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Self {
            value: parse_float(&value),
            raw: Raw::Text(value),
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(n) => Self {
                raw: Raw::Number(n),
                value,
            },
            None => Self {
                raw: Raw::Text(value.to_string()),
                value,
            },
        }
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self {
            raw: Raw::Number(Number::from(value)),
            value: value as f64,
        }
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Raw::Missing | Raw::Null => Ok(()),
            Raw::Text(s) => write!(f, "{s}"),
            Raw::Number(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.raw {
            Raw::Missing | Raw::Null => serializer.serialize_none(),
            Raw::Text(s) => serializer.serialize_str(s),
            Raw::Number(n) => n.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // An absent field never reaches here: `#[serde(default)]` gives `Amount::missing()`.
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => Amount::null(),
            Value::String(s) => Amount::from(s),
            Value::Number(n) => Amount {
                value: n.as_f64().unwrap_or(f64::NAN),
                raw: Raw::Number(n),
            },
            // Booleans, arrays and objects never parse to a number.
            other => Amount {
                raw: Raw::Text(other.to_string()),
                value: f64::NAN,
            },
        })
    }
}

/// Parses the longest leading decimal literal of `s`, after skipping leading whitespace, the way
/// JavaScript's `parseFloat` does. Returns `NaN` when no literal is found.
///
/// Recognized: an optional sign, then either `Infinity` or digits with an optional fraction and an
/// optional exponent. Trailing garbage is ignored, so `"12.5kg"` is `12.5`.
pub fn parse_float(s: &str) -> f64 {
    let s = s.trim_start();
    match literal_len(s) {
        Some(len) => parse_literal(&s[..len]),
        None => f64::NAN,
    }
}

/// Converts text the way JavaScript's `Number()` does: surrounding whitespace is ignored, empty
/// text is `0`, and anything that is not entirely one numeric literal is `NaN`.
fn to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    if let Some(value) = radix_literal(s) {
        return value;
    }
    match literal_len(s) {
        Some(len) if len == s.len() => parse_literal(s),
        _ => f64::NAN,
    }
}

/// Parses an unsigned `0x`, `0o` or `0b` literal. `None` when `s` has none of those prefixes.
fn radix_literal(s: &str) -> Option<f64> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    });
    Some(value.unwrap_or(f64::NAN))
}

/// The length in bytes of the decimal literal at the start of `s`, or `None` if `s` does not start
/// with one.
fn literal_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut ix = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        ix += 1;
    }

    if s[ix..].starts_with(INFINITY) {
        return Some(ix + INFINITY.len());
    }

    let int_start = ix;
    while ix < bytes.len() && bytes[ix].is_ascii_digit() {
        ix += 1;
    }
    let mut digits = ix - int_start;

    if ix < bytes.len() && bytes[ix] == b'.' {
        let frac_start = ix + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        digits += end - frac_start;
        if digits > 0 {
            ix = end;
        }
    }

    if digits == 0 {
        return None;
    }

    // An exponent only counts when at least one digit follows the marker and optional sign.
    if ix < bytes.len() && (bytes[ix] == b'e' || bytes[ix] == b'E') {
        let mut end = ix + 1;
        if matches!(bytes.get(end), Some(b'+') | Some(b'-')) {
            end += 1;
        }
        let exp_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > exp_start {
            ix = end;
        }
    }

    Some(ix)
}

const INFINITY: &str = "Infinity";

/// Parses a literal accepted by `literal_len`.
fn parse_literal(literal: &str) -> f64 {
    if literal.ends_with(INFINITY) {
        return if literal.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    literal.parse::<f64>().unwrap_or(f64::NAN)
}
