// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Hidden-State Space
//!
//! Enumerates all joint involvement states of an N-level graph. A state is
//! an index in `0..2^N` encoding one binary involvement pattern:
//!
//! ```text
//! state index bits (N = 3):
//!     bit 2 (MSB)  ->  first declared level
//!     bit 1        ->  second declared level
//!     bit 0 (LSB)  ->  third declared level
//! ```
//!
//! The first-declared level sits in the most significant bit, so for two
//! levels (A, B) the states order as (0,0), (0,1), (1,0), (1,1).
//!
//! ## Resource ceiling
//! State count is 2^N and the dense transition matrix is 4^N f64 entries:
//! N = 10 → 8 MB, N = 12 → 128 MB, N = 14 → 2 GB. Construction refuses
//! graphs beyond [`StateSpace::MAX_NODES`] and warns above
//! [`StateSpace::COMFORT_NODES`].

use lymph_graph::{Involvement, NodeId};
use tracing::warn;

use crate::{ModelError, ModelResult};

/// Enumeration of all 2^N joint involvement states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSpace {
    num_nodes: usize,
}

impl StateSpace {
    /// Hard ceiling on graph size; the dense matrix above this does not
    /// fit in ordinary memory.
    pub const MAX_NODES: usize = 14;

    /// Above this, matrix rebuilds get slow enough to warn about.
    pub const COMFORT_NODES: usize = 11;

    pub fn new(num_nodes: usize) -> ModelResult<Self> {
        if num_nodes == 0 {
            return Err(ModelError::Configuration(
                "state space needs at least one lymph node level".to_string(),
            ));
        }
        if num_nodes > Self::MAX_NODES {
            return Err(ModelError::Configuration(format!(
                "{} levels exceed the supported maximum of {} (dense matrix is 4^N)",
                num_nodes,
                Self::MAX_NODES
            )));
        }
        if num_nodes > Self::COMFORT_NODES {
            warn!(
                num_nodes,
                states = 1usize << num_nodes,
                "large state space; transition matrix rebuilds will be slow"
            );
        }
        Ok(Self { num_nodes })
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of joint states (2^N)
    #[inline]
    pub fn len(&self) -> usize {
        1usize << self.num_nodes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Bit position of a level within a state index
    #[inline]
    fn bit(&self, node: NodeId) -> usize {
        self.num_nodes - 1 - node.index()
    }

    /// Whether the level is involved in the given state
    #[inline]
    pub fn is_involved(&self, state: usize, node: NodeId) -> bool {
        state >> self.bit(node) & 1 == 1
    }

    /// The state with the given level switched to involved
    #[inline]
    pub fn with_involved(&self, state: usize, node: NodeId) -> usize {
        state | 1 << self.bit(node)
    }

    /// Involvement pattern of a state, in declaration order
    pub fn pattern(&self, state: usize) -> Vec<Involvement> {
        (0..self.num_nodes)
            .map(|idx| Involvement::from(self.is_involved(state, NodeId(idx))))
            .collect()
    }

    /// State index of an involvement pattern
    pub fn index(&self, pattern: &[Involvement]) -> ModelResult<usize> {
        if pattern.len() != self.num_nodes {
            return Err(ModelError::ParameterLength {
                expected: self.num_nodes,
                actual: pattern.len(),
            });
        }
        Ok(pattern.iter().fold(0usize, |state, involvement| {
            state << 1 | involvement.is_involved() as usize
        }))
    }

    /// Indices of the levels still healthy in the given state
    pub fn healthy_nodes(&self, state: usize) -> Vec<NodeId> {
        (0..self.num_nodes)
            .map(NodeId)
            .filter(|&node| !self.is_involved(state, node))
            .collect()
    }

    /// True if `to` never reverts an involved level of `from`
    #[inline]
    pub fn is_monotonic(&self, from: usize, to: usize) -> bool {
        from & !to == 0
    }
}
