//! Field lists and the data/instance field name resolver
//!
//! Data-side names are the keys of the raw input; instance-side names are the
//! attribute names on records. A [`FieldMapping`] declares the pairs that
//! differ, every other name maps to itself.
//!
//! Copyright (c) 2025 Swamper Team
//! Licensed under the Apache-2.0 license

use crate::error::{CleanerError, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Ordered set of field names, first occurrence wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    names: Vec<String>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field name, ignoring duplicates
    pub fn push<S: Into<String>>(&mut self, name: S) {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    /// Read a field list from JSON.
    ///
    /// Only an array of strings is accepted; objects, bare strings, nested
    /// arrays and other scalars are rejected.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                let mut fields = Self::new();
                for item in items {
                    match item {
                        Value::String(name) => fields.push(name.as_str()),
                        _ => {
                            return Err(CleanerError::invalid_fields(
                                "'fields' must only contain field names",
                            ))
                        }
                    }
                }
                Ok(fields)
            }
            _ => Err(CleanerError::invalid_fields(
                "'fields' must be a 1-dimensional list of field names",
            )),
        }
    }

    /// Read a field list from JSON without shape checks.
    ///
    /// A bare string is taken as a single field name and non-string array
    /// entries are skipped.
    pub fn from_value_lenient(value: &Value) -> Self {
        match value {
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .collect(),
            Value::String(name) => std::iter::once(name.as_str()).collect(),
            Value::Object(map) => map.keys().map(String::as_str).collect(),
            _ => Self::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}

impl<S: Into<String>> FromIterator<S> for FieldSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut fields = Self::new();
        for name in iter {
            fields.push(name);
        }
        fields
    }
}

impl From<&[&str]> for FieldSet {
    fn from(names: &[&str]) -> Self {
        names.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for FieldSet {
    fn from(names: [&str; N]) -> Self {
        names.into_iter().collect()
    }
}

impl From<Vec<String>> for FieldSet {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<Vec<&str>> for FieldSet {
    fn from(names: Vec<&str>) -> Self {
        names.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// Instance-side name to data-side name pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    pairs: BTreeMap<String, String>,
}

impl FieldMapping {
    /// Mapping where every name maps to itself
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build a mapping from `(instance_field, data_field)` pairs
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(a, b)| (a.into(), b.into()))
                .collect(),
        }
    }

    /// Read a mapping from a JSON object of string values
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| CleanerError::InvalidFieldMapping {
            message: "'instance_to_data_fields' must be a key-value mapping".to_string(),
        })?;

        let mut pairs = BTreeMap::new();
        for (instance_field, data_field) in object {
            let data_field = data_field.as_str().ok_or_else(|| CleanerError::InvalidFieldMapping {
                message: format!("data field for '{}' must be a field name", instance_field),
            })?;
            pairs.insert(instance_field.clone(), data_field.to_string());
        }
        Ok(Self { pairs })
    }

    pub fn insert<A: Into<String>, B: Into<String>>(mut self, instance_field: A, data_field: B) -> Self {
        self.pairs.insert(instance_field.into(), data_field.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Check that no two instance fields share a data field
    pub fn verify(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (instance_field, data_field) in &self.pairs {
            if !seen.insert(data_field.as_str()) {
                return Err(CleanerError::InvalidFieldMapping {
                    message: format!(
                        "data field '{}' is mapped more than once (again by '{}')",
                        data_field, instance_field
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Translates between data-side and instance-side field names
#[derive(Debug, Clone, Default)]
pub struct FieldResolver {
    instance_to_data: BTreeMap<String, String>,
    data_to_instance: BTreeMap<String, String>,
}

impl FieldResolver {
    /// Build a resolver, checking the mapping is a bijection
    pub fn new(mapping: FieldMapping) -> Result<Self> {
        mapping.verify()?;
        Ok(Self::new_unchecked(mapping))
    }

    /// Build a resolver without checking the mapping.
    ///
    /// If two instance fields share a data field, the last one wins when
    /// resolving back to instance names.
    pub fn new_unchecked(mapping: FieldMapping) -> Self {
        let data_to_instance = mapping
            .pairs
            .iter()
            .map(|(a, b)| (b.clone(), a.clone()))
            .collect();
        Self {
            instance_to_data: mapping.pairs,
            data_to_instance,
        }
    }

    /// Data-side name for an instance-side name
    pub fn data_field<'a>(&'a self, instance_field: &'a str) -> &'a str {
        self.instance_to_data
            .get(instance_field)
            .map(String::as_str)
            .unwrap_or(instance_field)
    }

    /// Instance-side name for a data-side name
    pub fn instance_field<'a>(&'a self, data_field: &'a str) -> &'a str {
        self.data_to_instance
            .get(data_field)
            .map(String::as_str)
            .unwrap_or(data_field)
    }

    /// Translate a set of instance-side names to data-side names
    pub fn to_data_fields(&self, fields: &FieldSet) -> FieldSet {
        fields.iter().map(|f| self.data_field(f).to_string()).collect()
    }

    /// Translate a set of data-side names to instance-side names
    pub fn to_instance_fields(&self, fields: &FieldSet) -> FieldSet {
        fields.iter().map(|f| self.instance_field(f).to_string()).collect()
    }
}
