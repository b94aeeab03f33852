// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Lymphatic Spread Graph (Foundation)
//!
//! Defines the graph a spread model runs on:
//! - **Nodes**: lymph node levels (LNLs) with a binary involvement state
//! - **Edges**: directed spread arcs carrying a per-step seeding probability
//! - **Topology**: a serializable, order-preserving graph description
//! - **SpreadGraph**: the validated, immutable-shape graph arena
//!
//! Edges partition into *base* edges (tumor → LNL) and *trans* edges
//! (LNL → LNL). That partition, in declaration order, fixes the layout of
//! every parameter vector in the downstream model crates.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod edge;
mod error;
mod graph;
mod node;
mod topology;

pub use edge::{Edge, EdgeId, Parent};
pub use error::{GraphError, GraphResult};
pub use graph::SpreadGraph;
pub use node::{Involvement, Node, NodeId};
pub use topology::{Topology, TopologyRow};
