//! Generic decoded value tree
//!
//! `TemplateValue` is the dynamically-shaped value representation a document
//! decoder hands to the intrinsic dispatch layer: scalars, ordered lists, and
//! named-field records. Records keep their field order so that a decoded
//! document re-serializes the way it was written.
//!
//! Scalars are projected to text through [`TemplateValue::to_display_string`]
//! when they are interpolated into a call envelope. The projection is
//! deliberately lossy: numbers and booleans become their default textual
//! form and do not round-trip as typed scalars.

use std::fmt;

use serde::de::{Error as DeError, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A decoded document value of unknown shape
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TemplateValue {
    /// Absent or null value
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Numeric scalar (IEEE 754 double-precision)
    Number(f64),
    /// String scalar
    String(String),
    /// Ordered list of values
    List(Vec<TemplateValue>),
    /// Named-field record, field order preserved
    Record(Vec<(String, TemplateValue)>),
}

impl TemplateValue {
    /// Build a string value
    pub fn string(s: impl Into<String>) -> Self {
        TemplateValue::String(s.into())
    }

    /// Build a record from key/value pairs
    pub fn record(fields: Vec<(String, TemplateValue)>) -> Self {
        TemplateValue::Record(fields)
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, TemplateValue::Null)
    }

    /// Check if this value is a scalar (null, bool, number, or string)
    pub fn is_scalar(&self) -> bool {
        !matches!(self, TemplateValue::List(_) | TemplateValue::Record(_))
    }

    /// Check if this value is a list
    pub fn is_list(&self) -> bool {
        matches!(self, TemplateValue::List(_))
    }

    /// Check if this value is a record
    pub fn is_record(&self) -> bool {
        matches!(self, TemplateValue::Record(_))
    }

    /// Extract as boolean, returns None if not a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TemplateValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract as number, returns None if not a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TemplateValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract as string reference, returns None if not a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TemplateValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract as list slice, returns None if not a list
    pub fn as_list(&self) -> Option<&[TemplateValue]> {
        match self {
            TemplateValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Extract as record fields, returns None if not a record
    pub fn as_record(&self) -> Option<&[(String, TemplateValue)]> {
        match self {
            TemplateValue::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a record field by name
    ///
    /// Returns None for missing fields and for non-record values.
    pub fn field(&self, name: &str) -> Option<&TemplateValue> {
        match self {
            TemplateValue::Record(fields) => fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Uniform string projection
    ///
    /// Renders any value to its default textual form: strings stay bare,
    /// numbers drop a trailing `.0`, booleans render `true`/`false`, null
    /// renders `null`. Lists and records render their elements recursively.
    /// The conversion never fails; original scalar types are erased.
    pub fn to_display_string(&self) -> String {
        match self {
            TemplateValue::Null => "null".to_string(),
            TemplateValue::Bool(b) => b.to_string(),
            TemplateValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            TemplateValue::String(s) => s.clone(),
            TemplateValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_display_string()).collect();
                format!("[{}]", parts.join(", "))
            }
            TemplateValue::Record(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value.to_display_string()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
        }
    }
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::String(s.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::String(s)
    }
}

impl From<f64> for TemplateValue {
    fn from(n: f64) -> Self {
        TemplateValue::Number(n)
    }
}

impl From<bool> for TemplateValue {
    fn from(b: bool) -> Self {
        TemplateValue::Bool(b)
    }
}

impl From<Vec<TemplateValue>> for TemplateValue {
    fn from(items: Vec<TemplateValue>) -> Self {
        TemplateValue::List(items)
    }
}

impl From<serde_json::Value> for TemplateValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => TemplateValue::Null,
            serde_json::Value::Bool(b) => TemplateValue::Bool(b),
            serde_json::Value::Number(n) => TemplateValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => TemplateValue::String(s),
            serde_json::Value::Array(items) => {
                TemplateValue::List(items.into_iter().map(TemplateValue::from).collect())
            }
            serde_json::Value::Object(fields) => TemplateValue::Record(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, TemplateValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<TemplateValue> for serde_json::Value {
    fn from(value: TemplateValue) -> Self {
        match value {
            TemplateValue::Null => serde_json::Value::Null,
            TemplateValue::Bool(b) => serde_json::Value::Bool(b),
            TemplateValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    serde_json::Value::from(n as i64)
                } else {
                    serde_json::Value::from(n)
                }
            }
            TemplateValue::String(s) => serde_json::Value::String(s),
            TemplateValue::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            TemplateValue::Record(fields) => serde_json::Value::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for TemplateValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TemplateValue::Null => serializer.serialize_unit(),
            TemplateValue::Bool(b) => serializer.serialize_bool(*b),
            TemplateValue::Number(n) => {
                // Integral numbers serialize without a trailing .0
                if n.fract() == 0.0 && n.is_finite() {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            TemplateValue::String(s) => serializer.serialize_str(s),
            TemplateValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            TemplateValue::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for TemplateValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = TemplateValue;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a template document value")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(TemplateValue::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(TemplateValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                TemplateValue::deserialize(deserializer)
            }

            fn visit_bool<E>(self, b: bool) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(TemplateValue::Bool(b))
            }

            fn visit_i64<E>(self, n: i64) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(TemplateValue::Number(n as f64))
            }

            fn visit_u64<E>(self, n: u64) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(TemplateValue::Number(n as f64))
            }

            fn visit_f64<E>(self, n: f64) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(TemplateValue::Number(n))
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(TemplateValue::String(s.to_string()))
            }

            fn visit_string<E>(self, s: String) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(TemplateValue::String(s))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(TemplateValue::List(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                // Field order is kept as encountered in the document
                let mut fields = Vec::new();
                while let Some((key, value)) = map.next_entry()? {
                    fields.push((key, value));
                }
                Ok(TemplateValue::Record(fields))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
