// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Serializable topology description.
//!
//! A topology is an ordered list of rows, each mapping a source (the
//! literal `"tumor"` or an LNL name) to an ordered list of target LNL
//! names. Row and target order are canonical: every system built from the
//! same topology enumerates nodes and edges identically, so parameter
//! vectors are directly comparable across systems.

use serde::{Deserialize, Serialize};

/// Reserved source name for the tumor row
pub(crate) const TUMOR: &str = "tumor";

/// One row of a topology: a source and its ordered spread targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyRow {
    pub source: String,
    pub targets: Vec<String>,
}

/// Ordered graph description consumed by [`SpreadGraph::new`](crate::SpreadGraph::new).
///
/// Validation happens at graph construction, not here; a `Topology` is
/// pure data and may describe an invalid graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Topology {
    pub rows: Vec<TopologyRow>,
}

impl Topology {
    /// Build a topology from `(source, targets)` pairs, preserving order
    pub fn new<S: AsRef<str>>(rows: &[(S, &[S])]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|(source, targets)| TopologyRow {
                    source: source.as_ref().to_string(),
                    targets: targets.iter().map(|t| t.as_ref().to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Names of all declared LNLs, in order of first appearance.
    ///
    /// Tumor-row targets come first, then any names introduced by later
    /// rows (as source or target).
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if name != TUMOR && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        };
        for row in &self.rows {
            push(&row.source);
            for target in &row.targets {
                push(target);
            }
        }
        names
    }
}
