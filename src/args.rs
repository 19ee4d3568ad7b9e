//! Coerced argument values and their wire encodings.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// A user-supplied value after coercion to its declared wire type.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// The argument's raw encoded bytes, not decoded as UTF-8
    Raw(Vec<u8>),
}

impl ArgValue {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Unsigned(v) => Value::from(*v),
            Self::Signed(v) => Value::from(*v),
            Self::Float(v) => Value::from(*v),
            Self::Bool(v) => Value::Bool(*v),
            Self::Text(s) => Value::String(s.clone()),
            Self::Raw(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Percent-encoded form for a query string.
    pub fn to_query_value(&self) -> Cow<'_, str> {
        match self {
            Self::Unsigned(v) => Cow::Owned(v.to_string()),
            Self::Signed(v) => Cow::Owned(v.to_string()),
            Self::Float(v) => Cow::Owned(v.to_string()),
            Self::Bool(v) => Cow::Borrowed(if *v { "true" } else { "false" }),
            Self::Text(s) => urlencoding::encode(s),
            Self::Raw(bytes) => urlencoding::encode_binary(bytes),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Parameter name → coerced value, in insertion order.
///
/// Only parameters that were actually supplied are present; absent optional
/// parameters never appear here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<(String, ArgValue)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing (in place) any previous value for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.entries
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// JSON object used as a POST body.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(n, v)| (n.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }

    /// `name=value&...` with both sides percent-encoded.
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(n, v)| format!("{}={}", urlencoding::encode(n), v.to_query_value()))
            .collect::<Vec<_>>()
            .join("&")
    }
}
