//! Records that cleaned values are read from and written onto
//!
//! A [`Record`] exposes its attributes by name through typed accessors. The
//! [`InstanceRegistry`] holds at most one record per [`Record::Kind`].
//!
//! Copyright (c) 2025 Swamper Team
//! Licensed under the Apache-2.0 license

use crate::error::{CleanerError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Debug;
use thiserror::Error;

/// Failure assigning a value onto a record attribute
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Record has no attribute '{field}'")]
    UnknownAttribute { field: String },

    #[error("Invalid value for attribute '{field}': {source}")]
    InvalidValue {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

/// An object whose attributes can be read and set by instance-side name
pub trait Record: Sized {
    /// Tag identifying the kind of record
    type Kind: Copy + Ord + Debug;

    /// Kind of this record
    fn kind(&self) -> Self::Kind;

    /// Fresh record of the given kind
    fn create(kind: Self::Kind) -> Self;

    /// Current value of an attribute
    fn field(&self, name: &str) -> Option<Value>;

    /// Assign a value to an attribute
    fn set_field(&mut self, name: &str, value: Value) -> std::result::Result<(), RecordError>;
}

/// Deserialize `value` into a typed attribute slot
pub fn assign<T: DeserializeOwned>(
    slot: &mut T,
    field: &str,
    value: Value,
) -> std::result::Result<(), RecordError> {
    *slot = serde_json::from_value(value).map_err(|source| RecordError::InvalidValue {
        field: field.to_string(),
        source,
    })?;
    Ok(())
}

/// Record backed by a JSON object; accepts any attribute name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapRecord {
    pub attributes: Map<String, Value>,
}

impl MapRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute<K: Into<String>>(mut self, name: K, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

impl Record for MapRecord {
    type Kind = ();

    fn kind(&self) -> Self::Kind {}

    fn create(_kind: Self::Kind) -> Self {
        Self::new()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }

    fn set_field(&mut self, name: &str, value: Value) -> std::result::Result<(), RecordError> {
        self.attributes.insert(name.to_string(), value);
        Ok(())
    }
}

/// At most one record per kind
#[derive(Debug, Clone)]
pub struct InstanceRegistry<R: Record> {
    instances: BTreeMap<R::Kind, R>,
}

impl<R: Record> Default for InstanceRegistry<R> {
    fn default() -> Self {
        Self {
            instances: BTreeMap::new(),
        }
    }
}

impl<R: Record> InstanceRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, rejecting a second record of the same kind
    pub fn from_records<I: IntoIterator<Item = R>>(records: I) -> Result<Self> {
        let mut registry = Self::new();
        for record in records {
            let kind = record.kind();
            if registry.instances.insert(kind, record).is_some() {
                return Err(CleanerError::InvalidInstances {
                    message: format!("more than one instance of kind {:?}", kind),
                });
            }
        }
        Ok(registry)
    }

    /// Build a registry where a later record replaces an earlier one of the same kind
    pub fn from_records_unchecked<I: IntoIterator<Item = R>>(records: I) -> Self {
        Self {
            instances: records.into_iter().map(|r| (r.kind(), r)).collect(),
        }
    }

    pub fn get(&self, kind: R::Kind) -> Option<&R> {
        self.instances.get(&kind)
    }

    pub fn get_mut(&mut self, kind: R::Kind) -> Option<&mut R> {
        self.instances.get_mut(&kind)
    }

    pub fn contains(&self, kind: R::Kind) -> bool {
        self.instances.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&R::Kind, &R)> {
        self.instances.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&R::Kind, &mut R)> {
        self.instances.iter_mut()
    }

    pub fn kinds(&self) -> impl Iterator<Item = R::Kind> + '_ {
        self.instances.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Kind {
        Job,
        Person,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Model {
        Job { title: String },
        Person { age: u32 },
    }

    impl Record for Model {
        type Kind = Kind;

        fn kind(&self) -> Kind {
            match self {
                Model::Job { .. } => Kind::Job,
                Model::Person { .. } => Kind::Person,
            }
        }

        fn create(kind: Kind) -> Self {
            match kind {
                Kind::Job => Model::Job { title: String::new() },
                Kind::Person => Model::Person { age: 0 },
            }
        }

        fn field(&self, name: &str) -> Option<Value> {
            match (self, name) {
                (Model::Job { title }, "title") => Some(json!(title)),
                (Model::Person { age }, "age") => Some(json!(age)),
                _ => None,
            }
        }

        fn set_field(&mut self, name: &str, value: Value) -> std::result::Result<(), RecordError> {
            match (self, name) {
                (Model::Job { title }, "title") => assign(title, name, value),
                (Model::Person { age }, "age") => assign(age, name, value),
                _ => Err(RecordError::UnknownAttribute { field: name.to_string() }),
            }
        }
    }

    #[test]
    fn test_assign_typed_value() {
        let mut person = Model::create(Kind::Person);
        person.set_field("age", json!(41)).unwrap();
        assert_eq!(person.field("age"), Some(json!(41)));

        let err = person.set_field("age", json!("old")).unwrap_err();
        assert!(matches!(err, RecordError::InvalidValue { .. }));
        assert!(matches!(
            person.set_field("title", json!("x")),
            Err(RecordError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_registry_one_per_kind() {
        let registry = InstanceRegistry::from_records(vec![
            Model::create(Kind::Job),
            Model::create(Kind::Person),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(Kind::Job));

        let err = InstanceRegistry::from_records(vec![
            Model::create(Kind::Job),
            Model::Job { title: "swamper".into() },
        ])
        .unwrap_err();
        assert!(err.is_shape_error());

        let registry = InstanceRegistry::from_records_unchecked(vec![
            Model::create(Kind::Job),
            Model::Job { title: "swamper".into() },
        ]);
        assert_eq!(registry.get(Kind::Job).and_then(|r| r.field("title")), Some(json!("swamper")));
    }

    #[test]
    fn test_map_record_accepts_anything() {
        let mut record = MapRecord::new().with_attribute("name", json!(""));
        record.set_field("name", json!("swamper")).unwrap();
        record.set_field("other", json!(1)).unwrap();
        assert_eq!(record.field("name"), Some(json!("swamper")));
        assert_eq!(record.attributes.len(), 2);
    }
}
