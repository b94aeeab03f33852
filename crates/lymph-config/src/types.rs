// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `lymph_configuration.toml`.

use lymph_graph::Topology;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub graph: GraphSection,
    pub model: ModelSection,
    pub logging: LoggingSection,
}

/// Graph topology: tumor targets plus LNL → LNL connections.
///
/// Row and target order are preserved into the topology, which makes the
/// parameter-vector layout of every system built from this config
/// deterministic.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphSection {
    /// LNLs seeded directly by the tumor (base edges), in order
    pub tumor: Vec<String>,
    /// LNL → LNL spread connections (trans edges), in order
    pub connections: Vec<LnlRow>,
}

/// One LNL → LNL connection row
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LnlRow {
    pub from: String,
    pub to: Vec<String>,
}

impl GraphSection {
    /// Convert into the canonical topology description
    pub fn to_topology(&self) -> Topology {
        let mut rows = vec![lymph_graph::TopologyRow {
            source: "tumor".to_string(),
            targets: self.tumor.clone(),
        }];
        for row in &self.connections {
            rows.push(lymph_graph::TopologyRow {
                source: row.from.clone(),
                targets: row.to.clone(),
            });
        }
        Topology { rows }
    }
}

/// Model composition configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelSection {
    /// Tie ipsi/contra base probabilities (bilateral model only)
    pub base_symmetric: bool,
    /// Tie ipsi/contra trans probabilities
    pub trans_symmetric: bool,
    /// Build the midline-extension variant instead of the plain bilateral
    pub midline: bool,
    /// Initial mixing weight for the midline-extension variant
    pub alpha_mix: f64,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            base_symmetric: false,
            trans_symmetric: true,
            midline: false,
            alpha_mix: 0.0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "WARNING".to_string(),
        }
    }
}
