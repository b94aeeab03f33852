// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Hidden Markov Engine for Lymphatic Spread
//!
//! Models the irreversible progression of metastatic involvement through a
//! [`SpreadGraph`](lymph_graph::SpreadGraph) as a discrete-time hidden
//! Markov process:
//! - **StateSpace**: enumeration of all 2^N joint involvement states
//! - **node_trans_prob**: the per-node probabilistic transition rule
//! - **Unilateral**: one side of the neck — owns the graph, the transition
//!   matrix, and the flat `spread_probs` parameter vector
//! - **ObservationMatrix**: externally calibrated emission matrix consumed
//!   by the risk/likelihood queries
//!
//! The transition matrix is derived data: it is rebuilt whenever the
//! parameter vector is set and never mutated directly.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod observation;
pub mod state_space;
pub mod transition;
pub mod unilateral;

pub use observation::ObservationMatrix;
pub use state_space::StateSpace;
pub use transition::node_trans_prob;
pub use unilateral::Unilateral;

use lymph_graph::GraphError;

/// Error type shared by the model systems (unilateral and composite)
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Malformed model configuration (bad topology, bad matrix shape, ...)
    #[error("Invalid model configuration: {0}")]
    Configuration(String),

    /// Parameter vector of the wrong length
    #[error("Parameter vector length mismatch: expected {expected}, got {actual}")]
    ParameterLength { expected: usize, actual: usize },

    /// Probability or mixing weight outside [0, 1]
    #[error("Parameter '{name}' = {value} is outside [0, 1]")]
    ParameterRange { name: String, value: f64 },

    /// Write attempt on parameters that are always derived
    #[error("{0} parameters are derived and cannot be set directly")]
    NotSettable(&'static str),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;
