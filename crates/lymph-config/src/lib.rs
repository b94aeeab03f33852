// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Lymph Model Configuration
//!
//! Type-safe configuration loader for spread models with support for:
//! - TOML file parsing
//! - Environment variable overrides
//! - Cross-field validation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lymph_config::{load_config, ModelConfig};
//!
//! // Load configuration with automatic file discovery and overrides
//! let config = load_config(None).expect("Failed to load config");
//!
//! // Access type-safe configuration values
//! println!("midline: {}", config.model.midline);
//! println!("levels: {:?}", config.graph.tumor);
//! ```
//!
//! The `[graph]` section converts into a
//! [`Topology`](lymph_graph::Topology) via
//! [`GraphSection::to_topology`](types::GraphSection::to_topology);
//! structural validation (cycles, reachability, duplicate edges) happens
//! at graph construction, not here.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_environment_overrides, find_config_file, load_config};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Re-export for convenience
pub use serde;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
