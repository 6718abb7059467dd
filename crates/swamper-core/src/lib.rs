//! Swamper Core - field cleaning and validation pipeline
//!
//! Given a declared list of fields and a mapping of raw input values, a
//! [`Cleaner`] produces cleaned values and an error report, then applies the
//! cleaned values onto new or existing records.
//!
//! ## Features
//!
//! - **Field name mapping**: data keys and record attributes may differ
//! - **Instance hooks**: load records to validate against before cleaning
//! - **Per-field cleaners**: registered per field, told whether input is blank
//! - **Cross-field cleaning**: final pass over all cleaned values
//! - **Error accumulation**: ordered messages per field plus whole-object errors
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::{json, Value};
//! use swamper_core::{
//!     CleanContext, Cleaner, FieldCleaners, MapRecord, RawData, Schema, ValidationError,
//! };
//!
//! struct Signup;
//!
//! impl Signup {
//!     fn clean_name(&self, _ctx: &CleanContext<'_, MapRecord>, value: Value, _blank: bool) -> anyhow::Result<Value> {
//!         if !value.is_string() {
//!             return Err(ValidationError::new("Name must be a string").into());
//!         }
//!         Ok(value)
//!     }
//! }
//!
//! impl Schema for Signup {
//!     type Record = MapRecord;
//!     type Error = ValidationError;
//!
//!     fn field_cleaners(&self) -> FieldCleaners<Self> {
//!         FieldCleaners::new().register("name", Self::clean_name)
//!     }
//! }
//!
//! let data: RawData = json!({"name": 4567}).as_object().cloned().unwrap();
//! let outcome = Cleaner::new(Signup, ["name"], data).unwrap().full_clean().unwrap();
//!
//! assert!(!outcome.is_clean());
//! assert_eq!(outcome.errors().field("name").unwrap(), &["Name must be a string".to_string()]);
//! assert!(!outcome.cleaned_data().contains_key("name"));
//! ```
//!
//! Copyright (c) 2025 Swamper Team
//! Licensed under the Apache-2.0 license

pub mod cleaner;
pub mod config;
pub mod error;
pub mod fields;
pub mod record;
pub mod report;

/// Raw input: data-side field name to value
pub type RawData = serde_json::Map<String, serde_json::Value>;

/// Cleaned values keyed by data-side field name
pub type CleanedData = serde_json::Map<String, serde_json::Value>;

// Re-export commonly used types for convenience
pub use cleaner::{
    is_blank, BuildContext, CleanContext, CleanOutcome, Cleaner, FieldCleanFn, FieldCleaners,
    Schema, Target,
};
pub use config::CleanerConfig;
pub use error::{CleanerError, ErrorCategory, Result};
pub use fields::{FieldMapping, FieldResolver, FieldSet};
pub use record::{assign, InstanceRegistry, MapRecord, Record, RecordError};
pub use report::{ErrorKey, ErrorKind, ErrorList, ErrorStore, ValidationError, NON_FIELD_ERRORS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
