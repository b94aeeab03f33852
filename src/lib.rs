// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # lymph - Hidden Markov Modelling of Lymphatic Metastatic Spread
//!
//! Models the irreversible spread of microscopic metastases through a
//! directed graph of lymph node levels (LNLs) as a hidden Markov process,
//! and infers the risk of occult involvement given observed diagnostic
//! findings.
//!
//! ## Components
//! - [`lymph_graph`]: nodes, edges, validated topologies
//! - [`lymph_hmm`]: state space, transition engine, the unilateral system
//! - [`lymph_models`]: bilateral and midline-extension composition
//! - [`lymph_config`]: TOML configuration loader
//!
//! ## Quick Start
//!
//! ```rust
//! use lymph::prelude::*;
//!
//! // tumor -> II -> III chain
//! let topology = Topology::new(&[
//!     ("tumor", ["II", "III"].as_slice()),
//!     ("II", ["III"].as_slice()),
//! ]);
//!
//! let mut system = Unilateral::new(&topology).unwrap();
//! system.set_spread_probs(&[0.25, 0.1, 0.4]).unwrap();
//!
//! // marginal involvement risk after three time steps
//! let risk = system.involvement_dist(3);
//! assert!(risk[0] > risk[1]);
//! ```
//!
//! Parameter vectors are the sole write interface for model parameters;
//! sampling and optimization drivers propose vectors, the systems rebuild
//! their transition matrices, and the query surface answers risk and
//! likelihood questions.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use lymph_config;
pub use lymph_graph;
pub use lymph_hmm;
pub use lymph_models;

/// Re-export of the everyday API surface
pub mod prelude {
    pub use lymph_config::{load_config, ModelConfig};
    pub use lymph_graph::{Edge, Involvement, Node, NodeId, SpreadGraph, Topology};
    pub use lymph_hmm::{
        node_trans_prob, ModelError, ModelResult, ObservationMatrix, StateSpace, Unilateral,
    };
    pub use lymph_models::{Bilateral, MidlineExtension, Side};
}
