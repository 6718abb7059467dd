//! Cleaning demonstration example
//!
//! Copyright (c) 2025 Swamper Team
//! Licensed under the Apache-2.0 license

use serde_json::{json, Value};
use swamper_core::{
    BuildContext, CleanContext, CleanedData, Cleaner, CleanerConfig, FieldCleaners, FieldMapping,
    MapRecord, Schema, ValidationError,
};

/// Account form: `username` on the record is `login` in the submitted data
struct AccountForm {
    taken: Vec<&'static str>,
}

impl AccountForm {
    fn clean_login(
        &self,
        _ctx: &CleanContext<'_, MapRecord>,
        value: Value,
        is_blank: bool,
    ) -> anyhow::Result<Value> {
        if is_blank {
            return Err(ValidationError::new("Login is required").into());
        }
        let login = value
            .as_str()
            .ok_or_else(|| ValidationError::new("Login must be text"))?
            .trim()
            .to_lowercase();
        if self.taken.contains(&login.as_str()) {
            return Err(ValidationError::new(format!("Login '{}' is taken", login)).into());
        }
        Ok(json!(login))
    }

    fn clean_age(
        &self,
        _ctx: &CleanContext<'_, MapRecord>,
        value: Value,
        _is_blank: bool,
    ) -> anyhow::Result<Value> {
        match value.as_u64() {
            Some(age) if age >= 13 => Ok(json!(age)),
            Some(_) => Err(ValidationError::new("Must be at least 13").into()),
            None => Err(ValidationError::new("Age must be a whole number").into()),
        }
    }
}

impl Schema for AccountForm {
    type Record = MapRecord;
    type Error = ValidationError;

    fn field_mapping(&self) -> FieldMapping {
        FieldMapping::identity().insert("username", "login")
    }

    fn field_cleaners(&self) -> FieldCleaners<Self> {
        FieldCleaners::new()
            .register("login", Self::clean_login)
            .register("age", Self::clean_age)
    }

    fn build_instances(&self, ctx: &mut BuildContext<'_, MapRecord>) -> anyhow::Result<Vec<MapRecord>> {
        let mut records = ctx.take_provided();
        if records.is_empty() {
            records.push(MapRecord::new().with_attribute("plan", json!("free")));
        }
        Ok(records)
    }

    fn clean(&self, ctx: &mut CleanContext<'_, MapRecord>) -> anyhow::Result<Option<CleanedData>> {
        let password = ctx.cleaned_data().get("password").cloned();
        if password != ctx.cleaned_data().get("confirm").cloned() {
            return Err(ValidationError::new("Passwords do not match").into());
        }
        let mut cleaned = ctx.cleaned_data().clone();
        cleaned.remove("confirm");
        Ok(Some(cleaned))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Swamper Cleaning Demo ===\n");

    demo_valid_submission()?;

    println!();

    demo_invalid_submission()?;

    println!();

    demo_unverified_inputs()?;

    Ok(())
}

fn form() -> AccountForm {
    AccountForm {
        taken: vec!["admin", "root"],
    }
}

fn demo_valid_submission() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Valid submission ---");

    let data = json!({
        "login": "  Swamper ",
        "age": 34,
        "password": "hunter2",
        "confirm": "hunter2"
    });
    let fields = json!(["username", "age", "password", "confirm"]);

    let outcome = Cleaner::from_json(form(), &fields, &data, CleanerConfig::default())?.full_clean()?;
    println!("Clean: {}", outcome.is_clean());
    println!("Cleaned data: {}", serde_json::to_string_pretty(outcome.cleaned_data())?);

    let account = outcome.build((), ["username", "age"])?;
    println!("Built record: {}", serde_json::to_string(&account.attributes)?);

    Ok(())
}

fn demo_invalid_submission() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Invalid submission ---");

    let data = json!({
        "login": "Admin",
        "age": 9,
        "password": "hunter2",
        "confirm": "hunter3"
    });
    let fields = json!(["username", "age", "password", "confirm"]);

    let outcome = Cleaner::from_json(form(), &fields, &data, CleanerConfig::default())?.full_clean()?;
    println!("Clean: {}", outcome.is_clean());
    println!("Errors: {}", serde_json::to_string_pretty(outcome.errors())?);

    match outcome.build((), ["username"]) {
        Ok(_) => println!("Unexpectedly built a record"),
        Err(e) => println!("Build refused: {}", e),
    }

    Ok(())
}

fn demo_unverified_inputs() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Malformed inputs ---");

    let fields = json!("username");
    let data = json!({"login": "guest"});

    match Cleaner::from_json(form(), &fields, &data, CleanerConfig::default()) {
        Ok(_) => println!("Unexpectedly accepted"),
        Err(e) => println!("Rejected: {}", e),
    }

    let config = CleanerConfig::from_yaml_str("skip_verification: true")?;
    let outcome = Cleaner::from_json(form(), &fields, &data, config)?.full_clean()?;
    println!("Without verification: {}", outcome.errors());

    Ok(())
}
