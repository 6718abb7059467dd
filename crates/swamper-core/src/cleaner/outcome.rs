//! Result of a clean run and projection of cleaned values onto records
//!
//! Copyright (c) 2025 Swamper Team
//! Licensed under the Apache-2.0 license

use crate::config::CleanerConfig;
use crate::error::{CleanerError, Result};
use crate::fields::{FieldResolver, FieldSet};
use crate::record::{InstanceRegistry, Record};
use crate::report::ErrorStore;
use crate::CleanedData;
use serde_json::Value;

/// What [`CleanOutcome::build_or_update`] writes onto
#[derive(Debug, Clone)]
pub enum Target<R: Record> {
    /// Reuse the registry's record of this kind, or create a fresh one
    Kind(R::Kind),
    /// Update an existing record
    Instance(R),
}

/// Frozen result of [`Cleaner::full_clean`](super::Cleaner::full_clean)
#[derive(Debug, Clone)]
pub struct CleanOutcome<R: Record> {
    fields: FieldSet,
    resolver: FieldResolver,
    config: CleanerConfig,
    errors: ErrorStore,
    cleaned_data: CleanedData,
    instances: InstanceRegistry<R>,
}

impl<R: Record> CleanOutcome<R> {
    pub(crate) fn new(
        fields: FieldSet,
        resolver: FieldResolver,
        config: CleanerConfig,
        errors: ErrorStore,
        cleaned_data: CleanedData,
        instances: InstanceRegistry<R>,
    ) -> Self {
        Self {
            fields,
            resolver,
            config,
            errors,
            cleaned_data,
            instances,
        }
    }

    pub fn errors(&self) -> &ErrorStore {
        &self.errors
    }

    /// True when no error was recorded
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Cleaned values keyed by data-side name; fields with errors are absent
    pub fn cleaned_data(&self) -> &CleanedData {
        &self.cleaned_data
    }

    pub fn instances(&self) -> &InstanceRegistry<R> {
        &self.instances
    }

    /// Declared fields, data-side names
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn resolver(&self) -> &FieldResolver {
        &self.resolver
    }

    /// Cleaned data when clean, the error store otherwise
    pub fn into_result(self) -> std::result::Result<CleanedData, ErrorStore> {
        if self.errors.is_empty() {
            Ok(self.cleaned_data)
        } else {
            Err(self.errors)
        }
    }

    /// Assign cleaned values for `fields` onto a record and return it.
    ///
    /// `fields` may use instance-side or data-side names. Fields without a
    /// cleaned value are skipped and attributes not listed are left alone.
    pub fn build_or_update(&self, target: Target<R>, fields: impl Into<FieldSet>) -> Result<R>
    where
        R: Clone,
    {
        if !self.is_clean() {
            return Err(CleanerError::NotClean {
                error_count: self.errors.message_count(),
            });
        }

        let (kind, mut record) = match target {
            Target::Kind(kind) => {
                let record = self
                    .instances
                    .get(kind)
                    .cloned()
                    .unwrap_or_else(|| R::create(kind));
                (kind, record)
            }
            Target::Instance(record) => (record.kind(), record),
        };

        if !self.instances.is_empty() && !self.instances.contains(kind) {
            return Err(CleanerError::UndeclaredInstanceKind {
                kind: format!("{:?}", kind),
            });
        }

        let fields: FieldSet = fields.into();
        for field in fields.iter() {
            self.assign(&mut record, field)?;
        }

        Ok(record)
    }

    /// Same as [`build_or_update`](Self::build_or_update) with a JSON field
    /// list, checked unless verification is skipped.
    pub fn build_or_update_from_json(&self, target: Target<R>, fields: &Value) -> Result<R>
    where
        R: Clone,
    {
        let fields = if self.config.skip_verification {
            FieldSet::from_value_lenient(fields)
        } else {
            FieldSet::from_value(fields)?
        };
        self.build_or_update(target, fields)
    }

    /// Build a record of the given kind
    pub fn build(&self, kind: R::Kind, fields: impl Into<FieldSet>) -> Result<R>
    where
        R: Clone,
    {
        self.build_or_update(Target::Kind(kind), fields)
    }

    /// Update an existing record
    pub fn update(&self, record: R, fields: impl Into<FieldSet>) -> Result<R>
    where
        R: Clone,
    {
        self.build_or_update(Target::Instance(record), fields)
    }

    fn assign(&self, record: &mut R, field: &str) -> Result<()> {
        let data_field = self.resolver.data_field(field);
        let instance_field = self.resolver.instance_field(data_field);

        if let Some(value) = self.cleaned_data.get(data_field) {
            log::trace!("Assigning '{}' from data field '{}'", instance_field, data_field);
            record.set_field(instance_field, value.clone())?;
        }
        Ok(())
    }
}
