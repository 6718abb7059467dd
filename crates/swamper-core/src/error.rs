//! Error types for the Swamper core library
//!
//! Errors returned here are never recorded in an [`ErrorStore`](crate::ErrorStore):
//! they describe malformed inputs, misuse of the API, or hook failures that are
//! not of the schema's designated error kind.
//!
//! Copyright (c) 2025 Swamper Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

use crate::record::RecordError;

/// Main error type for cleaner operations
#[derive(Error, Debug)]
pub enum CleanerError {
    /// The field list is not a flat list of field names
    #[error("Invalid fields: {message}")]
    InvalidFields {
        message: String,
    },

    /// The raw data is not a key-value mapping
    #[error("Invalid data: {message}")]
    InvalidData {
        message: String,
    },

    /// The instance-to-data field mapping is malformed
    #[error("Invalid field mapping: {message}")]
    InvalidFieldMapping {
        message: String,
    },

    /// The instance builder produced a registry breaking the one-per-kind rule
    #[error("Invalid instances: {message}")]
    InvalidInstances {
        message: String,
    },

    /// A build target kind was not declared by the instance builder
    #[error("Instance kind {kind} must be in the instance registry")]
    UndeclaredInstanceKind {
        kind: String,
    },

    /// An error was added for a field that was never declared
    #[error("No field named '{field}'")]
    UnknownField {
        field: String,
    },

    /// Materialization was requested while errors exist
    #[error("Cannot build or update because there are errors ({error_count} recorded)")]
    NotClean {
        error_count: usize,
    },

    /// Configuration could not be parsed
    #[error("Configuration error: {message}")]
    InvalidConfig {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Assigning a cleaned value onto a record failed
    #[error(transparent)]
    Record(#[from] RecordError),

    /// A hook failed with an error outside the designated error kind
    #[error("Hook '{hook}' failed: {source}")]
    Hook {
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our error type
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Broad classification of a [`CleanerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Inputs violate a declared shape contract (a type error)
    Shape,
    /// The API was used incorrectly (a value error)
    Misuse,
    /// A hook or record failed outside of validation
    Hook,
}

impl CleanerError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            CleanerError::InvalidFields { .. }
            | CleanerError::InvalidData { .. }
            | CleanerError::InvalidFieldMapping { .. }
            | CleanerError::InvalidInstances { .. }
            | CleanerError::UndeclaredInstanceKind { .. }
            | CleanerError::InvalidConfig { .. } => ErrorCategory::Shape,
            CleanerError::UnknownField { .. } | CleanerError::NotClean { .. } => {
                ErrorCategory::Misuse
            }
            CleanerError::Record(_) | CleanerError::Hook { .. } => ErrorCategory::Hook,
        }
    }

    /// True for errors caused by malformed inputs
    pub fn is_shape_error(&self) -> bool {
        self.category() == ErrorCategory::Shape
    }

    /// True for errors caused by API misuse
    pub fn is_misuse(&self) -> bool {
        self.category() == ErrorCategory::Misuse
    }

    pub(crate) fn invalid_fields<M: Into<String>>(message: M) -> Self {
        CleanerError::InvalidFields {
            message: message.into(),
        }
    }

    /// Rebuild a crate error that travelled through a hook as `anyhow::Error`,
    /// or wrap a foreign error as a hook failure.
    pub(crate) fn from_hook(hook: &'static str, err: anyhow::Error) -> Self {
        match err.downcast::<CleanerError>() {
            Ok(own) => own,
            Err(source) => CleanerError::Hook { hook, source },
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Shape => write!(f, "shape"),
            ErrorCategory::Misuse => write!(f, "misuse"),
            ErrorCategory::Hook => write!(f, "hook"),
        }
    }
}
