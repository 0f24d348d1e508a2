//! Single-field conversion between raw JSON fragments and typed values.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::DecodeError;

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The three states a JSON field can be in before type conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Presence<T> {
    /// The key does not appear in the object.
    Absent,
    /// The key appears with a JSON `null`.
    Null,
    /// The key appears with a value that converted to `T`.
    Present(T),
}

impl<T> Presence<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Collapses `Absent` and `Null` into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Presence<U> {
        match self {
            Self::Absent => Presence::Absent,
            Self::Null => Presence::Null,
            Self::Present(value) => Presence::Present(f(value)),
        }
    }
}

/// A typed scalar that can be read from and written to one JSON value.
pub trait FieldValue: Sized {
    /// Human-readable name of the expected JSON shape, used in errors.
    const EXPECTED: &'static str;

    /// Converts a non-null JSON value, returning `None` on a type mismatch.
    fn from_json(value: &Value) -> Option<Self>;

    fn to_json(&self) -> Value;
}

impl FieldValue for String {
    const EXPECTED: &'static str = "string";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FieldValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FieldValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_i64()
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }
}

impl FieldValue for f64 {
    const EXPECTED: &'static str = "number";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_f64()
    }

    /// Integral values within the exact `f64` integer range are written
    /// without a fraction, the way the service publishes them.
    #[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
    fn to_json(&self) -> Value {
        const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;
        if self.trunc() == *self && self.abs() < EXACT_INTEGER_LIMIT {
            return Value::from(*self as i64);
        }
        Value::from(*self)
    }
}

impl FieldValue for DateTime<Utc> {
    const EXPECTED: &'static str = "RFC 3339 date-time";

    fn from_json(value: &Value) -> Option<Self> {
        let raw = value.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc))
    }

    fn to_json(&self) -> Value {
        Value::String(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl FieldValue for NaiveDate {
    const EXPECTED: &'static str = "date (YYYY-MM-DD)";

    fn from_json(value: &Value) -> Option<Self> {
        NaiveDate::parse_from_str(value.as_str()?, DATE_FORMAT).ok()
    }

    fn to_json(&self) -> Value {
        Value::String(self.format(DATE_FORMAT).to_string())
    }
}

/// Any JSON value, kept undecoded.
impl FieldValue for Value {
    const EXPECTED: &'static str = "any JSON value";

    fn from_json(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn to_json(&self) -> Value {
        self.clone()
    }
}

/// A free-form JSON object such as document metadata.
impl FieldValue for Map<String, Value> {
    const EXPECTED: &'static str = "object";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }

    fn to_json(&self) -> Value {
        Value::Object(self.clone())
    }
}

/// Binary content carried in JSON as standard base64 text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Binary(pub Vec<u8>);

impl Binary {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl FieldValue for Binary {
    const EXPECTED: &'static str = "base64 string";

    fn from_json(value: &Value) -> Option<Self> {
        STANDARD.decode(value.as_str()?).ok().map(Self)
    }

    fn to_json(&self) -> Value {
        Value::String(STANDARD.encode(&self.0))
    }
}

/// Reads `name` from `object` and converts it to `T`.
///
/// Absence is not an error here; whether a field is required is decided by
/// the caller.
pub fn decode_field<T: FieldValue>(
    object: &Map<String, Value>,
    name: &str,
) -> Result<Presence<T>, DecodeError> {
    match object.get(name) {
        None => Ok(Presence::Absent),
        Some(Value::Null) => Ok(Presence::Null),
        Some(raw) => decode_value(raw, name).map(Presence::Present),
    }
}

/// Converts one non-null JSON value, naming `field` in the error.
pub(crate) fn decode_value<T: FieldValue>(raw: &Value, field: &str) -> Result<T, DecodeError> {
    T::from_json(raw).ok_or_else(|| DecodeError::mismatch(field, T::EXPECTED, raw))
}
