//! Clean pipeline implementation
//!
//! Copyright (c) 2025 Swamper Team
//! Licensed under the Apache-2.0 license

use super::context::{is_blank, BuildContext, CleanContext};
use super::outcome::CleanOutcome;
use super::{Cleaner, Schema};
use crate::error::{CleanerError, Result};
use crate::record::InstanceRegistry;
use crate::report::{ErrorKey, ErrorList, ErrorStore};
use crate::CleanedData;
use serde_json::Value;

/// Run all stages for a cleaner
pub(super) fn run<S: Schema>(cleaner: Cleaner<S>) -> Result<CleanOutcome<S::Record>> {
    let Cleaner {
        schema,
        fields,
        instance_fields: _,
        raw_data,
        resolver,
        config,
        provided,
    } = cleaner;

    log::debug!("Cleaning {} field(s)", fields.len());

    let built = {
        let mut build_ctx = BuildContext::new(&raw_data, &fields, &resolver, provided);
        schema.build_instances(&mut build_ctx)
    };
    let records = match built {
        Ok(records) => records,
        Err(err) => {
            let messages = catch::<S>("build_instances", err)?;
            log::info!("Instance building failed, skipping field cleaning");
            let mut errors = ErrorStore::new();
            errors.add(ErrorKey::NonField, messages);
            return Ok(CleanOutcome::new(
                fields,
                resolver,
                config,
                errors,
                CleanedData::new(),
                InstanceRegistry::new(),
            ));
        }
    };

    let instances = if config.skip_verification {
        InstanceRegistry::from_records_unchecked(records)
    } else {
        InstanceRegistry::from_records(records)?
    };

    let mut ctx = CleanContext::new(&raw_data, &fields, &resolver, instances);

    if let Err(err) = schema.clean_instances(&mut ctx) {
        let messages = catch::<S>("clean_instances", err)?;
        ctx.record_error(ErrorKey::NonField, messages);
    }

    if ctx.has_errors() {
        log::info!("Instance validation failed, skipping field cleaning");
    } else {
        clean_fields(&schema, &mut ctx)?;
        clean_all(&schema, &mut ctx)?;
    }

    let (errors, cleaned_data, instances) = ctx.into_parts();
    log::debug!(
        "Cleaning finished with {} error(s) across {} key(s)",
        errors.message_count(),
        errors.len()
    );
    Ok(CleanOutcome::new(fields, resolver, config, errors, cleaned_data, instances))
}

/// Run the registered cleaner of every declared field, including fields
/// absent from the raw data.
fn clean_fields<S: Schema>(schema: &S, ctx: &mut CleanContext<'_, S::Record>) -> Result<()> {
    let cleaners = schema.field_cleaners();
    let raw_data = ctx.raw_data();
    let fields = ctx.fields();

    for field in fields.iter() {
        let raw = raw_data.get(field);
        ctx.seed(field, raw.cloned().unwrap_or(Value::Null));

        let Some(cleaner) = cleaners.get(field) else {
            continue;
        };

        let blank = is_blank(raw);
        let value = ctx.cleaned_data().get(field).cloned().unwrap_or(Value::Null);
        log::trace!("Cleaning field '{}' (blank: {})", field, blank);

        match cleaner(schema, &*ctx, value, blank) {
            Ok(value) => ctx.set_cleaned(field, value),
            Err(err) => {
                let messages = catch::<S>("clean_field", err)?;
                ctx.record_error(ErrorKey::Field(field.to_string()), messages);
            }
        }
    }

    Ok(())
}

/// Run the cross-field hook
fn clean_all<S: Schema>(schema: &S, ctx: &mut CleanContext<'_, S::Record>) -> Result<()> {
    match schema.clean(ctx) {
        Ok(Some(cleaned_data)) => ctx.replace_cleaned(cleaned_data),
        Ok(None) => {}
        Err(err) => {
            let messages = catch::<S>("clean", err)?;
            ctx.record_error(ErrorKey::NonField, messages);
        }
    }
    Ok(())
}

/// Turn a designated-kind failure into messages; propagate anything else
fn catch<S: Schema>(hook: &'static str, err: anyhow::Error) -> Result<ErrorList> {
    match err.downcast::<S::Error>() {
        Ok(designated) => Ok(ErrorList::from_error(&designated)),
        Err(other) => {
            log::warn!("Hook '{}' failed: {}", hook, other);
            Err(CleanerError::from_hook(hook, other))
        }
    }
}
