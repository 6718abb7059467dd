//! The cleaner: schema hooks, construction and the clean entry point
//!
//! A [`Schema`] declares how data is cleaned. A [`Cleaner`] pairs a schema with
//! one set of inputs; [`Cleaner::full_clean`] consumes it, runs every stage
//! once and returns a [`CleanOutcome`].
//!
//! Stages, in order:
//!
//! - **build_instances**: load the records the data is checked against
//! - **clean_instances**: validation spanning the records as a whole
//! - **field cleaners**: one function per declared field
//! - **clean**: cross-field validation with access to all cleaned data
//!
//! A failure in the first two stages stops the run; field and cross-field
//! failures are recorded without stopping siblings.
//!
//! Copyright (c) 2025 Swamper Team
//! Licensed under the Apache-2.0 license

pub mod context;
pub mod outcome;
mod pipeline;

pub use context::{is_blank, BuildContext, CleanContext};
pub use outcome::{CleanOutcome, Target};

use crate::config::CleanerConfig;
use crate::error::{CleanerError, Result};
use crate::fields::{FieldMapping, FieldResolver, FieldSet};
use crate::record::Record;
use crate::report::ErrorKind;
use crate::{CleanedData, RawData};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Boxed per-field cleaning function
pub type FieldCleanFn<S> = Box<
    dyn Fn(&S, &CleanContext<'_, <S as Schema>::Record>, Value, bool) -> anyhow::Result<Value>,
>;

/// Dispatch table from data-side field name to its cleaning function
pub struct FieldCleaners<S: Schema> {
    cleaners: HashMap<String, FieldCleanFn<S>>,
}

impl<S: Schema> FieldCleaners<S> {
    pub fn new() -> Self {
        Self {
            cleaners: HashMap::new(),
        }
    }

    /// Register the cleaning function for a field.
    ///
    /// The function receives the current value and whether the raw value is
    /// blank; its return value replaces the cleaned value.
    pub fn register<F>(mut self, field: impl Into<String>, cleaner: F) -> Self
    where
        F: Fn(&S, &CleanContext<'_, S::Record>, Value, bool) -> anyhow::Result<Value> + 'static,
    {
        self.cleaners.insert(field.into(), Box::new(cleaner));
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldCleanFn<S>> {
        self.cleaners.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.cleaners.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.cleaners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cleaners.is_empty()
    }
}

impl<S: Schema> Default for FieldCleaners<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> fmt::Debug for FieldCleaners<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self.cleaners.keys().collect();
        fields.sort();
        f.debug_struct("FieldCleaners").field("fields", &fields).finish()
    }
}

/// Hooks describing how one kind of input is cleaned
///
/// Every hook has a default; a schema overrides the ones it needs. Hooks
/// return `anyhow::Result`: an error whose root is [`Schema::Error`] is
/// recorded as a validation message, anything else aborts the run.
pub trait Schema: Sized {
    /// Records the cleaned data is checked against and applied to
    type Record: Record;

    /// Designated error kind caught from hooks
    type Error: ErrorKind;

    /// Instance-side to data-side field names
    fn field_mapping(&self) -> FieldMapping {
        FieldMapping::identity()
    }

    /// Per-field cleaning functions keyed by data-side name
    fn field_cleaners(&self) -> FieldCleaners<Self> {
        FieldCleaners::new()
    }

    /// Build the records for this run. Defaults to the records supplied with
    /// [`Cleaner::with_instances`].
    fn build_instances(
        &self,
        ctx: &mut BuildContext<'_, Self::Record>,
    ) -> anyhow::Result<Vec<Self::Record>> {
        Ok(ctx.take_provided())
    }

    /// Validate the records as a whole. May pre-populate cleaned data.
    fn clean_instances(&self, _ctx: &mut CleanContext<'_, Self::Record>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Cross-field validation. `Some` replaces cleaned data, `None` keeps it.
    fn clean(&self, _ctx: &mut CleanContext<'_, Self::Record>) -> anyhow::Result<Option<CleanedData>> {
        Ok(None)
    }
}

/// A schema bound to one set of inputs, ready to run
pub struct Cleaner<S: Schema> {
    schema: S,
    fields: FieldSet,
    instance_fields: FieldSet,
    raw_data: RawData,
    resolver: FieldResolver,
    config: CleanerConfig,
    provided: Vec<S::Record>,
}

impl<S: Schema> Cleaner<S> {
    /// Create a cleaner with the default configuration.
    ///
    /// `fields` are instance-side names.
    pub fn new(schema: S, fields: impl Into<FieldSet>, data: RawData) -> Result<Self> {
        Self::with_config(schema, fields, data, CleanerConfig::default())
    }

    /// Create a cleaner with an explicit configuration
    pub fn with_config(
        schema: S,
        fields: impl Into<FieldSet>,
        data: RawData,
        config: CleanerConfig,
    ) -> Result<Self> {
        let mapping = schema.field_mapping();
        let resolver = if config.skip_verification {
            FieldResolver::new_unchecked(mapping)
        } else {
            FieldResolver::new(mapping)?
        };

        let fields: FieldSet = fields.into();
        let fields = resolver.to_data_fields(&fields);
        let instance_fields = resolver.to_instance_fields(&fields);

        Ok(Self {
            schema,
            fields,
            instance_fields,
            raw_data: data,
            resolver,
            config,
            provided: Vec::new(),
        })
    }

    /// Create a cleaner from untyped JSON inputs.
    ///
    /// `fields` must be an array of strings and `data` an object, unless the
    /// configuration skips verification.
    pub fn from_json(schema: S, fields: &Value, data: &Value, config: CleanerConfig) -> Result<Self> {
        let (fields, data) = if config.skip_verification {
            (
                FieldSet::from_value_lenient(fields),
                data.as_object().cloned().unwrap_or_default(),
            )
        } else {
            let fields = FieldSet::from_value(fields)?;
            let data = data.as_object().cloned().ok_or_else(|| CleanerError::InvalidData {
                message: "'data' must be a key-value mapping".to_string(),
            })?;
            (fields, data)
        };
        Self::with_config(schema, fields, data, config)
    }

    /// Supply records for the default instance builder
    pub fn with_instances<I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = S::Record>,
    {
        self.provided.extend(records);
        self
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// Declared fields, data-side names
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Declared fields, instance-side names
    pub fn instance_fields(&self) -> &FieldSet {
        &self.instance_fields
    }

    pub fn raw_data(&self) -> &RawData {
        &self.raw_data
    }

    pub fn resolver(&self) -> &FieldResolver {
        &self.resolver
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Run every stage once and return the outcome
    pub fn full_clean(self) -> Result<CleanOutcome<S::Record>> {
        pipeline::run(self)
    }
}

impl<S: Schema + fmt::Debug> fmt::Debug for Cleaner<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleaner")
            .field("schema", &self.schema)
            .field("fields", &self.fields)
            .field("raw_data", &self.raw_data)
            .field("config", &self.config)
            .field("provided", &self.provided.len())
            .finish()
    }
}
