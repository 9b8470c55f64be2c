//! Cache Configuration Module
//!
//! Case-insensitive option map owned by each backend instance.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{CacheError, Result};

// == Cache Config ==
/// Option name -> value mapping with case-insensitive keys.
///
/// Names are folded to lower case on insert and on lookup, so
/// `memcacheHost` and `MEMCACHEHOST` address the same option. The last
/// write for a folded name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    options: BTreeMap<String, String>,
}

impl CacheConfig {
    // == Constructor ==
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::new();
        for (name, value) in pairs {
            config.set(name, value);
        }
        config
    }

    // == From JSON ==
    /// Builds a configuration from a JSON object.
    ///
    /// Anything other than an object (including `null`) is rejected. String
    /// values are taken as-is; numbers and booleans use their JSON text.
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            CacheError::InvalidConfig(format!(
                "configuration must be a JSON object, got {}",
                json_kind(value)
            ))
        })?;

        let mut config = Self::new();
        for (name, value) in map {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(CacheError::InvalidConfig(format!(
                        "option '{}' must be a string, number or boolean, got {}",
                        name,
                        json_kind(other)
                    )))
                }
            };
            config.set(name, value);
        }
        Ok(config)
    }

    // == Set ==
    /// Sets a single option, replacing any previous value.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.options
            .insert(name.as_ref().to_lowercase(), value.into());
    }

    /// Sets an option only when it is not present yet.
    pub fn set_default(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.options
            .entry(name.as_ref().to_lowercase())
            .or_insert_with(|| value.into());
    }

    // == Merge ==
    /// Overlays `other` on top of this configuration.
    pub fn merge(&mut self, other: &CacheConfig) {
        for (name, value) in &other.options {
            self.options.insert(name.clone(), value.clone());
        }
    }

    /// Returns a copy of this configuration with `other` overlaid.
    pub fn merged(&self, other: &CacheConfig) -> CacheConfig {
        let mut merged = self.clone();
        merged.merge(other);
        merged
    }

    // == Lookup ==
    /// Returns the raw value of an option.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.options.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Parses an option into `T`.
    ///
    /// Returns `Ok(None)` when the option is missing and `InvalidConfig`
    /// when it does not parse.
    pub fn get_parsed<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        match self.get_str(name) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
                CacheError::InvalidConfig(format!(
                    "option '{}' has invalid value '{}'",
                    name.to_lowercase(),
                    raw
                ))
            }),
        }
    }

    /// Returns true if the option is set.
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(&name.to_lowercase())
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns true if no options are set.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates over `(lower-cased name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
