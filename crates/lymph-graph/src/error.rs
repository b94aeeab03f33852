// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for graph construction and mutation

/// Errors raised while validating a topology or mutating a graph
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("Topology has no tumor row; exactly one is required")]
    MissingTumor,

    #[error("Topology declares {0} tumor rows; exactly one is required")]
    MultipleTumorRows(usize),

    #[error("Unknown lymph node level '{0}' referenced as a spread target")]
    UnknownNode(String),

    #[error("Duplicate edge {parent} -> {child}")]
    DuplicateEdge { parent: String, child: String },

    #[error("Self-loop on lymph node level '{0}'")]
    SelfLoop(String),

    #[error("Circular dependency detected among lymph node levels: {0}")]
    CircularDependency(String),

    #[error("Lymph node level '{0}' is not reachable from the tumor")]
    Unreachable(String),

    #[error("'tumor' cannot appear as a spread target")]
    TumorAsTarget,

    #[error("Spread probability {value} for edge {edge} is outside [0, 1]")]
    ProbabilityOutOfRange { edge: String, value: f64 },

    #[error("Invalid edge index {0}")]
    InvalidEdgeId(usize),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
