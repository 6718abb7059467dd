//! State shared with hooks while a cleaner runs
//!
//! Copyright (c) 2025 Swamper Team
//! Licensed under the Apache-2.0 license

use crate::error::{CleanerError, Result};
use crate::fields::{FieldResolver, FieldSet};
use crate::record::{InstanceRegistry, Record};
use crate::report::{ErrorKey, ErrorList, ErrorStore};
use crate::{CleanedData, RawData};
use serde_json::Value;

/// Whether a raw value counts as blank.
///
/// Blank means the key is present in the raw data and its value is empty:
/// `null`, an empty string, or an empty array or object. Numbers and booleans
/// are never blank, and neither is an absent key.
pub fn is_blank(raw: Option<&Value>) -> bool {
    match raw {
        None => false,
        Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => false,
    }
}

/// Inputs available to [`Schema::build_instances`](super::Schema::build_instances)
#[derive(Debug)]
pub struct BuildContext<'a, R: Record> {
    raw_data: &'a RawData,
    fields: &'a FieldSet,
    resolver: &'a FieldResolver,
    provided: Vec<R>,
}

impl<'a, R: Record> BuildContext<'a, R> {
    pub(crate) fn new(
        raw_data: &'a RawData,
        fields: &'a FieldSet,
        resolver: &'a FieldResolver,
        provided: Vec<R>,
    ) -> Self {
        Self {
            raw_data,
            fields,
            resolver,
            provided,
        }
    }

    pub fn raw_data(&self) -> &'a RawData {
        self.raw_data
    }

    /// Declared fields, data-side names
    pub fn fields(&self) -> &'a FieldSet {
        self.fields
    }

    pub fn resolver(&self) -> &'a FieldResolver {
        self.resolver
    }

    /// Records handed to the cleaner with `Cleaner::with_instances`
    pub fn provided(&self) -> &[R] {
        &self.provided
    }

    pub fn take_provided(&mut self) -> Vec<R> {
        std::mem::take(&mut self.provided)
    }
}

/// Mutable cleaning state seen by instance, field and cross-field hooks
///
/// Field cleaners only receive a shared reference: their return value is the
/// only way they change cleaned data.
#[derive(Debug)]
pub struct CleanContext<'a, R: Record> {
    raw_data: &'a RawData,
    fields: &'a FieldSet,
    resolver: &'a FieldResolver,
    instances: InstanceRegistry<R>,
    cleaned_data: CleanedData,
    errors: ErrorStore,
}

impl<'a, R: Record> CleanContext<'a, R> {
    pub(crate) fn new(
        raw_data: &'a RawData,
        fields: &'a FieldSet,
        resolver: &'a FieldResolver,
        instances: InstanceRegistry<R>,
    ) -> Self {
        Self {
            raw_data,
            fields,
            resolver,
            instances,
            cleaned_data: CleanedData::new(),
            errors: ErrorStore::new(),
        }
    }

    pub fn raw_data(&self) -> &'a RawData {
        self.raw_data
    }

    /// Declared fields, data-side names
    pub fn fields(&self) -> &'a FieldSet {
        self.fields
    }

    pub fn resolver(&self) -> &'a FieldResolver {
        self.resolver
    }

    pub fn instances(&self) -> &InstanceRegistry<R> {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut InstanceRegistry<R> {
        &mut self.instances
    }

    /// Record of the given kind, if the instance builder produced one
    pub fn instance(&self, kind: R::Kind) -> Option<&R> {
        self.instances.get(kind)
    }

    pub fn cleaned_data(&self) -> &CleanedData {
        &self.cleaned_data
    }

    pub fn cleaned_data_mut(&mut self) -> &mut CleanedData {
        &mut self.cleaned_data
    }

    pub fn errors(&self) -> &ErrorStore {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Record messages for a declared field or for the whole object.
    ///
    /// The field is removed from cleaned data. Adding an error for a field
    /// that was never declared fails with [`CleanerError::UnknownField`].
    pub fn add_error<K, M>(&mut self, key: K, messages: M) -> Result<()>
    where
        K: Into<ErrorKey>,
        M: Into<ErrorList>,
    {
        let key = key.into();
        if let ErrorKey::Field(name) = &key {
            if !self.fields.contains(name) {
                return Err(CleanerError::UnknownField {
                    field: name.clone(),
                });
            }
        }
        self.record_error(key, messages.into());
        Ok(())
    }

    /// Record a whole-object error
    pub fn add_non_field_error<M: Into<ErrorList>>(&mut self, messages: M) {
        self.record_error(ErrorKey::NonField, messages.into());
    }

    pub(crate) fn record_error(&mut self, key: ErrorKey, messages: ErrorList) {
        log::debug!("Recording error for '{}': {:?}", key, messages);
        if let Some(field) = key.field() {
            self.cleaned_data.remove(field);
        }
        self.errors.add(key, messages);
    }

    pub(crate) fn seed(&mut self, field: &str, value: Value) {
        self.cleaned_data.entry(field.to_string()).or_insert(value);
    }

    pub(crate) fn set_cleaned(&mut self, field: &str, value: Value) {
        self.cleaned_data.insert(field.to_string(), value);
    }

    pub(crate) fn replace_cleaned(&mut self, cleaned_data: CleanedData) {
        self.cleaned_data = cleaned_data;
    }

    pub(crate) fn into_parts(self) -> (ErrorStore, CleanedData, InstanceRegistry<R>) {
        (self.errors, self.cleaned_data, self.instances)
    }
}
