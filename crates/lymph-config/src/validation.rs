// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Cross-field checks on a parsed configuration. Structural graph
//! validation (cycles, reachability) is the graph crate's job; this
//! module only rejects values that are wrong on their face.

use crate::types::ModelConfig;
use crate::{ConfigError, ConfigResult};

const LOG_LEVELS: [&str; 6] = ["ERROR", "WARN", "WARNING", "INFO", "DEBUG", "TRACE"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
    DuplicateLnl { name: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
            Self::DuplicateLnl { name } => {
                write!(f, "Lymph node level '{}' declared more than once", name)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - a non-empty tumor row whenever a graph is configured
/// - no LNL appearing twice as a connection source
/// - `alpha_mix` within [0, 1]
/// - a known log level string
pub fn validate_config(config: &ModelConfig) -> ConfigResult<()> {
    let mut errors: Vec<ConfigValidationError> = Vec::new();

    let has_graph = !config.graph.tumor.is_empty() || !config.graph.connections.is_empty();
    if has_graph && config.graph.tumor.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "graph.tumor".to_string(),
        });
    }

    let mut seen: Vec<&str> = Vec::new();
    for row in &config.graph.connections {
        if seen.contains(&row.from.as_str()) {
            errors.push(ConfigValidationError::DuplicateLnl {
                name: row.from.clone(),
            });
        }
        seen.push(&row.from);
    }

    if !(0.0..=1.0).contains(&config.model.alpha_mix) || config.model.alpha_mix.is_nan() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "model.alpha_mix".to_string(),
            reason: format!("{} is outside [0, 1]", config.model.alpha_mix),
        });
    }

    if config.model.midline && config.model.base_symmetric {
        errors.push(ConfigValidationError::InvalidValue {
            field: "model.base_symmetric".to_string(),
            reason: "midline extension requires asymmetric base probabilities".to_string(),
        });
    }

    let level = config.logging.level.to_uppercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("unknown level '{}'", config.logging.level),
        });
    }

    if let Some(first) = errors.first() {
        return Err(ConfigError::ValidationError(first.to_string()));
    }
    Ok(())
}
