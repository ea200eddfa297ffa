use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// A loosely typed payload field that is only ever displayed, such as a date or a name.
///
/// The payload usually sends text, but a number (`"date": 20220101`) or a boolean is shown as
/// its text form instead of rejecting the whole payload. The raw value is kept so that it
/// serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scalar(Value);

impl Scalar {
    /// The value as display text. `null` is the empty string.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.0 {
            Value::String(s) => Cow::Borrowed(s),
            Value::Null => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// The value if it was given as JSON text.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Returns true when the value would be falsy in a JavaScript truthiness test: `null`,
    /// `false`, the empty string, or the number zero.
    pub fn is_falsy(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::String(s) => s.is_empty(),
            Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
            Value::Array(_) | Value::Object(_) => false,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}
