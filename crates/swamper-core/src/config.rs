//! Cleaner configuration
//!
//! Copyright (c) 2025 Swamper Team
//! Licensed under the Apache-2.0 license

use crate::error::{CleanerError, Result};
use serde::{Deserialize, Serialize};

/// Options controlling how a cleaner checks its inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Skip shape checks on fields, data, field mapping and instances.
    /// Only for callers that guarantee well-formed inputs.
    pub skip_verification: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self::verified()
    }
}

impl CleanerConfig {
    /// Configuration with all shape checks enabled
    pub fn verified() -> Self {
        Self {
            skip_verification: false,
        }
    }

    /// Configuration with shape checks disabled
    pub fn unverified() -> Self {
        Self {
            skip_verification: true,
        }
    }

    pub fn with_skip_verification(mut self, skip: bool) -> Self {
        self.skip_verification = skip;
        self
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| CleanerError::InvalidConfig {
            message: format!("Failed to parse JSON config: {}", e),
            source: Some(e.into()),
        })
    }

    /// Parse a configuration from YAML text
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).map_err(|e| CleanerError::InvalidConfig {
            message: format!("Failed to parse YAML config: {}", e),
            source: Some(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CleanerConfig::default();
        assert!(!config.skip_verification);
        assert_eq!(config, CleanerConfig::verified());
    }

    #[test]
    fn test_config_builders() {
        assert!(CleanerConfig::unverified().skip_verification);
        assert!(CleanerConfig::verified().with_skip_verification(true).skip_verification);
    }

    #[test]
    fn test_config_from_text() {
        assert!(CleanerConfig::from_json_str(r#"{"skip_verification": true}"#)
            .unwrap()
            .skip_verification);
        assert!(!CleanerConfig::from_json_str("{}").unwrap().skip_verification);
        assert!(CleanerConfig::from_yaml_str("skip_verification: true\n")
            .unwrap()
            .skip_verification);

        let err = CleanerConfig::from_json_str("{not json").unwrap_err();
        assert!(err.is_shape_error());
        assert!(CleanerConfig::from_yaml_str("skip_verification: [1, 2]").is_err());
    }
}
