//! Cell conversions for each supported field type.
//!
//! Every field type implements [`FieldValue`]: it reports its [`FieldKind`],
//! parses trimmed cell text, and renders itself back to text. Integers and
//! floats are range checked against their declared width, times go through
//! a chrono format string, and anything serde can handle is carried as a
//! single-line JSON literal through [`Json`].

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::FieldError;
use crate::schema::{FieldDescriptor, FieldKind};

const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A type that can live in one column of a fixed-width table.
pub trait FieldValue: Sized {
    fn kind() -> FieldKind;

    /// Whether a blank cell means "no value".
    fn is_optional() -> bool {
        false
    }

    /// Parse a trimmed cell.
    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError>;

    /// Render the value. `None` means no value and is written as spaces.
    fn encode(&self, field: &FieldDescriptor) -> Result<Option<String>, FieldError>;
}

macro_rules! int_field {
    ($kind:ident, $wide:ty; $($t:ty),*) => {
        $(
            impl FieldValue for $t {
                fn kind() -> FieldKind {
                    FieldKind::$kind { bits: <$t>::BITS }
                }

                fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
                    let wide: $wide = raw.parse().map_err(|e| FieldError::cast(raw, field, e))?;
                    <$t>::try_from(wide).map_err(|_| FieldError::overflow(wide, field))
                }

                fn encode(&self, _field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
                    Ok(Some(self.to_string()))
                }
            }
        )*
    };
}

int_field!(Int, i128; i8, i16, i32, i64, isize);
int_field!(Uint, u128; u8, u16, u32, u64, usize);

fn parse_float(raw: &str, field: &FieldDescriptor) -> Result<f64, FieldError> {
    let value: f64 = raw.parse().map_err(|e| FieldError::cast(raw, field, e))?;
    if value.is_infinite() && !raw.to_ascii_lowercase().contains("inf") {
        return Err(FieldError::overflow(raw, field));
    }
    Ok(value)
}

impl FieldValue for f64 {
    fn kind() -> FieldKind {
        FieldKind::Float { bits: 64 }
    }

    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
        parse_float(raw, field)
    }

    fn encode(&self, _field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        Ok(Some(self.to_string()))
    }
}

impl FieldValue for f32 {
    fn kind() -> FieldKind {
        FieldKind::Float { bits: 32 }
    }

    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
        let value = parse_float(raw, field)?;
        if value.is_finite() && value.abs() > f64::from(f32::MAX) {
            return Err(FieldError::overflow(value, field));
        }
        Ok(value as f32)
    }

    fn encode(&self, _field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        Ok(Some(self.to_string()))
    }
}

impl FieldValue for bool {
    fn kind() -> FieldKind {
        FieldKind::Bool
    }

    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(FieldError::cast(raw, field, "invalid boolean literal")),
        }
    }

    fn encode(&self, _field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        Ok(Some(if *self { "true" } else { "false" }.to_string()))
    }
}

impl FieldValue for String {
    fn kind() -> FieldKind {
        FieldKind::Str
    }

    fn decode(raw: &str, _field: &FieldDescriptor) -> Result<Self, FieldError> {
        Ok(raw.to_string())
    }

    fn encode(&self, _field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        Ok(Some(self.clone()))
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn kind() -> FieldKind {
        T::kind()
    }

    fn is_optional() -> bool {
        true
    }

    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
        if raw.is_empty() {
            return Ok(None);
        }
        T::decode(raw, field).map(Some)
    }

    fn encode(&self, field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        match self {
            Some(value) => value.encode(field),
            None => Ok(None),
        }
    }
}

// Times

/// Parse a zoned timestamp. Without an explicit format this is RFC 3339.
/// With one, fall back from a full timestamp to a naive date-time and then
/// to a bare date, both taken as UTC.
fn parse_zoned(raw: &str, field: &FieldDescriptor) -> Result<DateTime<FixedOffset>, FieldError> {
    let Some(format) = field.format() else {
        return DateTime::parse_from_rfc3339(raw).map_err(|e| FieldError::cast(raw, field, e));
    };
    DateTime::parse_from_str(raw, format)
        .or_else(|err| {
            NaiveDateTime::parse_from_str(raw, format)
                .or_else(|_| NaiveDate::parse_from_str(raw, format).map(|d| d.and_time(NaiveTime::MIN)))
                .map(|naive| naive.and_utc().fixed_offset())
                .map_err(|_| err)
        })
        .map_err(|e| FieldError::cast(raw, field, e))
}

fn render_zoned<Tz>(value: &DateTime<Tz>, field: &FieldDescriptor) -> Result<Option<String>, FieldError>
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match field.format() {
        None => Ok(Some(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))),
        Some(format) => render_with(value.format(format), field),
    }
}

/// Render a chrono formatter without panicking on a bad format string.
fn render_with(formatted: impl std::fmt::Display, field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
    let mut out = String::new();
    write!(out, "{formatted}").map_err(|_| {
        let format = field.format().unwrap_or_default();
        FieldError::encode(field, format!("invalid time format \"{format}\""))
    })?;
    Ok(Some(out))
}

impl FieldValue for DateTime<FixedOffset> {
    fn kind() -> FieldKind {
        FieldKind::Time("DateTime<FixedOffset>")
    }

    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
        parse_zoned(raw, field)
    }

    fn encode(&self, field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        render_zoned(self, field)
    }
}

impl FieldValue for DateTime<Utc> {
    fn kind() -> FieldKind {
        FieldKind::Time("DateTime<Utc>")
    }

    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
        parse_zoned(raw, field).map(|dt| dt.with_timezone(&Utc))
    }

    fn encode(&self, field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        render_zoned(self, field)
    }
}

impl FieldValue for NaiveDateTime {
    fn kind() -> FieldKind {
        FieldKind::Time("NaiveDateTime")
    }

    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
        let format = field.format().unwrap_or(NAIVE_DATETIME_FORMAT);
        NaiveDateTime::parse_from_str(raw, format).map_err(|e| FieldError::cast(raw, field, e))
    }

    fn encode(&self, field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        render_with(self.format(field.format().unwrap_or(NAIVE_DATETIME_FORMAT)), field)
    }
}

impl FieldValue for NaiveDate {
    fn kind() -> FieldKind {
        FieldKind::Time("NaiveDate")
    }

    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
        let format = field.format().unwrap_or(NAIVE_DATE_FORMAT);
        NaiveDate::parse_from_str(raw, format).map_err(|e| FieldError::cast(raw, field, e))
    }

    fn encode(&self, field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        render_with(self.format(field.format().unwrap_or(NAIVE_DATE_FORMAT)), field)
    }
}

// JSON fallback

fn decode_json<T: DeserializeOwned>(raw: &str, field: &FieldDescriptor) -> Result<T, FieldError> {
    serde_json::from_str(raw).map_err(|e| FieldError::cast(raw, field, e))
}

fn encode_json<T: Serialize>(value: &T, field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
    serde_json::to_string(value)
        .map(Some)
        .map_err(|e| FieldError::encode(field, e))
}

/// Carries any serde type through a column as a one-line JSON literal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize + DeserializeOwned> FieldValue for Json<T> {
    fn kind() -> FieldKind {
        FieldKind::Other(std::any::type_name::<T>())
    }

    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
        decode_json(raw, field).map(Json)
    }

    fn encode(&self, field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        encode_json(&self.0, field)
    }
}

impl<T: Serialize + DeserializeOwned> FieldValue for Vec<T> {
    fn kind() -> FieldKind {
        FieldKind::Other(std::any::type_name::<Self>())
    }

    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
        decode_json(raw, field)
    }

    fn encode(&self, field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        encode_json(self, field)
    }
}

impl FieldValue for serde_json::Value {
    fn kind() -> FieldKind {
        FieldKind::Other("serde_json::Value")
    }

    fn decode(raw: &str, field: &FieldDescriptor) -> Result<Self, FieldError> {
        decode_json(raw, field)
    }

    fn encode(&self, field: &FieldDescriptor) -> Result<Option<String>, FieldError> {
        encode_json(self, field)
    }
}
