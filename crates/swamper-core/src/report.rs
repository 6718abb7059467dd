//! Validation errors and the per-field error store
//!
//! Copyright (c) 2025 Swamper Team
//! Licensed under the Apache-2.0 license

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Key used for whole-object errors when an [`ErrorStore`] is serialized
pub const NON_FIELD_ERRORS: &str = "__all__";

/// An error kind that hooks raise to report invalid input.
///
/// Failures of this kind are caught by the pipeline and turned into messages;
/// every other error propagates to the caller.
pub trait ErrorKind: std::error::Error + Send + Sync + 'static {
    /// Messages recorded for this error
    fn messages(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

/// Default designated error kind: one or more human-readable messages
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}", .messages.join("; "))]
pub struct ValidationError {
    /// Messages in the order they were raised
    pub messages: Vec<String>,
}

impl ValidationError {
    /// Create a validation error with a single message
    pub fn new<M: Into<String>>(message: M) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    /// Create a validation error carrying several messages
    pub fn with_messages<I, M>(messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}

impl ErrorKind for ValidationError {
    fn messages(&self) -> Vec<String> {
        self.messages.clone()
    }
}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Where an error belongs: a declared field or the object as a whole
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKey {
    /// Whole-object error
    NonField,
    /// Error for a data-side field name
    Field(String),
}

impl ErrorKey {
    /// Field name, if this key refers to a field
    pub fn field(&self) -> Option<&str> {
        match self {
            ErrorKey::NonField => None,
            ErrorKey::Field(name) => Some(name),
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKey::NonField => write!(f, "{}", NON_FIELD_ERRORS),
            ErrorKey::Field(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for ErrorKey {
    fn from(field: &str) -> Self {
        ErrorKey::Field(field.to_string())
    }
}

impl From<String> for ErrorKey {
    fn from(field: String) -> Self {
        ErrorKey::Field(field)
    }
}

/// Messages to record for a single key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<String>);

impl ErrorList {
    /// Build a list from the messages of a designated error
    pub fn from_error<E: ErrorKind>(error: &E) -> Self {
        Self(error.messages())
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for ErrorList {
    fn from(message: &str) -> Self {
        Self(vec![message.to_string()])
    }
}

impl From<String> for ErrorList {
    fn from(message: String) -> Self {
        Self(vec![message])
    }
}

impl From<Vec<String>> for ErrorList {
    fn from(messages: Vec<String>) -> Self {
        Self(messages)
    }
}

impl From<ValidationError> for ErrorList {
    fn from(error: ValidationError) -> Self {
        Self(error.messages)
    }
}

/// Accumulated error messages keyed by field
///
/// A key is present only when at least one message was recorded for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorStore {
    entries: BTreeMap<ErrorKey, Vec<String>>,
}

impl ErrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append messages for a key. Empty lists leave the store untouched.
    pub fn add(&mut self, key: ErrorKey, messages: ErrorList) {
        let messages = messages.into_inner();
        if messages.is_empty() {
            return;
        }
        self.entries.entry(key).or_default().extend(messages);
    }

    /// Messages for a data-side field
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.entries
            .get(&ErrorKey::Field(field.to_string()))
            .map(Vec::as_slice)
    }

    /// Whole-object messages
    pub fn non_field(&self) -> Option<&[String]> {
        self.entries.get(&ErrorKey::NonField).map(Vec::as_slice)
    }

    pub fn get(&self, key: &ErrorKey) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &ErrorKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys with errors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of messages across all keys
    pub fn message_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ErrorKey, &[String])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Plain map view keyed by display name
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl fmt::Display for ErrorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, messages) in &self.entries {
            for message in messages {
                if !first {
                    writeln!(f)?;
                }
                first = false;
                match key {
                    ErrorKey::NonField => write!(f, "{}", message)?,
                    ErrorKey::Field(name) => write!(f, "{}: {}", name, message)?,
                }
            }
        }
        Ok(())
    }
}

impl Serialize for ErrorStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, messages) in &self.entries {
            map.serialize_entry(&key.to_string(), messages)?;
        }
        map.end()
    }
}
