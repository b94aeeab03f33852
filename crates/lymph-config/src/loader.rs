// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file discovery, parsing, and override application

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::ModelConfig;
use crate::validation::validate_config;
use crate::{ConfigError, ConfigResult};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "lymph_configuration.toml";

/// Search the working directory and `config/` for the default file
pub fn find_config_file() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from(CONFIG_FILE_NAME),
        PathBuf::from("config").join(CONFIG_FILE_NAME),
    ];
    candidates.into_iter().find(|path| path.is_file())
}

/// Load, override, and validate a configuration.
///
/// With `path = None` the default locations are searched; a missing file
/// is not an error in that case — defaults apply.
pub fn load_config(path: Option<&Path>) -> ConfigResult<ModelConfig> {
    let mut config = match path {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            parse_file(path)?
        }
        None => match find_config_file() {
            Some(path) => parse_file(&path)?,
            None => ModelConfig::default(),
        },
    };

    apply_environment_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

fn parse_file(path: &Path) -> ConfigResult<ModelConfig> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Environment variables override file values:
/// - `LYMPH_LOG_LEVEL` → `logging.level`
/// - `LYMPH_ALPHA_MIX` → `model.alpha_mix`
/// - `LYMPH_MIDLINE`   → `model.midline` ("1"/"true")
pub fn apply_environment_overrides(config: &mut ModelConfig) {
    if let Ok(level) = std::env::var("LYMPH_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(alpha) = std::env::var("LYMPH_ALPHA_MIX")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        config.model.alpha_mix = alpha;
    }
    if let Ok(midline) = std::env::var("LYMPH_MIDLINE") {
        config.model.midline = midline == "1" || midline.eq_ignore_ascii_case("true");
    }
}
