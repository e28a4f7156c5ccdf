// File: src/query.rs
// Purpose: Query parameters attached to a navigation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A scalar query value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Bool(b) => write!(f, "{}", b),
            QueryValue::Integer(i) => write!(f, "{}", i),
            QueryValue::Float(v) => write!(f, "{}", v),
            QueryValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Integer(value.into())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

/// Query mapping (`key -> scalar | null`), ordered by key
///
/// ```
/// use rhtmx_nav::QueryParams;
///
/// let query = QueryParams::new()
///     .with("page", 2)
///     .with("q", "rust & htmx")
///     .with_null("cursor");
/// assert_eq!(query.to_query_string(), "?page=2&q=rust%20%26%20htmx");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, Option<QueryValue>>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set `key` to a scalar value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.0.insert(key.into(), Some(value.into()));
        self
    }

    /// Builder: set `key` to null
    pub fn with_null(mut self, key: impl Into<String>) -> Self {
        self.0.insert(key.into(), None);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<QueryValue>) {
        self.0.insert(key.into(), value);
    }

    /// Value for `key`; `None` both when absent and when null
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key).and_then(Option::as_ref)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<QueryValue>)> {
        self.0.iter()
    }

    /// Renders `?k=v&...`, skipping null values.
    ///
    /// Returns an empty string when nothing is left to render.
    pub fn to_query_string(&self) -> String {
        let pairs: Vec<String> = self
            .0
            .iter()
            .filter_map(|(key, value)| {
                value.as_ref().map(|v| {
                    format!(
                        "{}={}",
                        urlencoding::encode(key),
                        urlencoding::encode(&v.to_string())
                    )
                })
            })
            .collect();

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }
}
