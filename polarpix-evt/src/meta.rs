//! Header metadata maps.
//!
//! Event files carry keyword/value metadata on the primary header and on
//! each extension. Values are integers, floats, or text; keys are stored
//! sorted so serialization is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// Integer keyword value.
    Int(i64),
    /// Floating-point keyword value.
    Float(f64),
    /// Text keyword value.
    Text(String),
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Keyword/value metadata attached to a header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaMap {
    entries: BTreeMap<String, MetaValue>,
}

impl MetaMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a keyword, replacing any previous value.
    pub fn set<V: Into<MetaValue>>(&mut self, key: &str, value: V) {
        self.entries.insert(key.to_string(), value.into());
    }

    /// Returns the raw value for a keyword.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    /// Returns true if the keyword is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns a keyword as a float, coercing integer values.
    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.entries.get(key)? {
            MetaValue::Float(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            MetaValue::Int(v) => Some(*v as f64),
            MetaValue::Text(_) => None,
        }
    }

    /// Returns a keyword as an integer.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.entries.get(key)? {
            MetaValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a keyword as text.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.entries.get(key)? {
            MetaValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a float keyword, failing if absent or non-numeric.
    ///
    /// # Errors
    /// Returns [`Error::MissingKeyword`].
    pub fn require_f64(&self, key: &str) -> Result<f64> {
        self.get_f64(key).ok_or_else(|| Error::MissingKeyword {
            name: key.to_string(),
        })
    }

    /// Iterates over keyword/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no keywords are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
