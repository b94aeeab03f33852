// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Unilateral System
//!
//! One side of the neck: a spread graph, its hidden-state space, and the
//! transition matrix derived from the current `spread_probs` vector.
//!
//! ## Parameter layout
//! ```text
//! spread_probs = [ base edges (declaration order) | trans edges (declaration order) ]
//! ```
//!
//! Setting the vector is all-or-nothing: length and range are validated
//! before any edge is written, so a failed set leaves the system at its
//! last valid state. Every successful set rebuilds the transition matrix.

use ndarray::{Array1, Array2};
use std::time::Instant;
use tracing::{debug, warn};

use lymph_graph::{EdgeId, NodeId, SpreadGraph, Topology};

use crate::observation::ObservationMatrix;
use crate::state_space::StateSpace;
use crate::transition::build_transition_matrix;
use crate::{ModelError, ModelResult};

/// Rebuild latency above which a warning is logged
const SLOW_REBUILD_MS: u128 = 50;

/// Hidden Markov model of metastatic progression on one side.
pub struct Unilateral {
    graph: SpreadGraph,
    state_space: StateSpace,
    transition: Array2<f64>,
}

impl Unilateral {
    /// Build a system from a topology. All spread probabilities start at
    /// 0, so the initial transition matrix is the identity.
    pub fn new(topology: &Topology) -> ModelResult<Self> {
        let graph = SpreadGraph::new(topology)?;
        let state_space = StateSpace::new(graph.num_nodes())?;
        let transition = build_transition_matrix(&graph, &state_space);
        Ok(Self {
            graph,
            state_space,
            transition,
        })
    }

    pub fn graph(&self) -> &SpreadGraph {
        &self.graph
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.state_space
    }

    pub fn num_base_edges(&self) -> usize {
        self.graph.base_edges().len()
    }

    pub fn num_trans_edges(&self) -> usize {
        self.graph.trans_edges().len()
    }

    /// Length of the `spread_probs` vector
    pub fn num_params(&self) -> usize {
        self.num_base_edges() + self.num_trans_edges()
    }

    /// Current parameter vector: base-edge probabilities first, then
    /// trans-edge probabilities, each in declaration order.
    pub fn spread_probs(&self) -> Vec<f64> {
        self.param_edge_ids()
            .map(|edge_id| self.graph.edge(edge_id).spread_prob())
            .collect()
    }

    /// Set the parameter vector and rebuild the transition matrix.
    ///
    /// # Errors
    /// [`ModelError::ParameterLength`] on a wrong-length vector,
    /// [`ModelError::ParameterRange`] on any element outside [0, 1]. In
    /// both cases nothing is mutated.
    pub fn set_spread_probs(&mut self, values: &[f64]) -> ModelResult<()> {
        let expected = self.num_params();
        if values.len() != expected {
            return Err(ModelError::ParameterLength {
                expected,
                actual: values.len(),
            });
        }
        for (k, &value) in values.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(ModelError::ParameterRange {
                    name: self.param_name(k),
                    value,
                });
            }
        }

        // everything validated; the writes below cannot fail
        let edge_ids: Vec<EdgeId> = self.param_edge_ids().collect();
        for (edge_id, &value) in edge_ids.iter().zip(values) {
            self.graph.set_edge_prob(*edge_id, value)?;
        }
        self.rebuild();
        Ok(())
    }

    /// Row-stochastic state-transition matrix for the current parameters
    pub fn transition_matrix(&self) -> &Array2<f64> {
        &self.transition
    }

    /// Distribution over hidden states after `t` steps, starting from the
    /// all-healthy state.
    pub fn state_dist(&self, t: usize) -> Array1<f64> {
        let mut dist = Array1::<f64>::zeros(self.state_space.len());
        dist[0] = 1.0;
        for _ in 0..t {
            dist = dist.dot(&self.transition);
        }
        dist
    }

    /// Per-level marginal involvement probability after `t` steps
    pub fn involvement_dist(&self, t: usize) -> Vec<f64> {
        self.marginalize(&self.state_dist(t))
    }

    /// Distribution over diagnostic outcomes after `t` steps
    pub fn obs_dist(&self, obs: &ObservationMatrix, t: usize) -> Array1<f64> {
        self.state_dist(t).dot(obs.matrix())
    }

    /// Bayes posterior over hidden states given one observed outcome at
    /// time `t`.
    pub fn posterior(
        &self,
        obs: &ObservationMatrix,
        outcome: usize,
        t: usize,
    ) -> ModelResult<Array1<f64>> {
        if outcome >= obs.num_outcomes() {
            return Err(ModelError::Configuration(format!(
                "outcome index {} out of range for {} diagnostic outcomes",
                outcome,
                obs.num_outcomes()
            )));
        }
        let prior = self.state_dist(t);
        let likelihood = obs.matrix().column(outcome);
        let joint = &prior * &likelihood;
        let evidence = joint.sum();
        if evidence <= 0.0 {
            return Err(ModelError::Configuration(format!(
                "outcome {} has zero probability at time {}",
                outcome, t
            )));
        }
        Ok(joint / evidence)
    }

    /// Per-level posterior probability of occult involvement given an
    /// observed diagnostic outcome.
    pub fn risk(
        &self,
        obs: &ObservationMatrix,
        outcome: usize,
        t: usize,
    ) -> ModelResult<Vec<f64>> {
        let posterior = self.posterior(obs, outcome, t)?;
        Ok(self.marginalize(&posterior))
    }

    /// Parameter edge ids in vector order: base edges, then trans edges
    fn param_edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph
            .base_edges()
            .iter()
            .chain(self.graph.trans_edges())
            .copied()
    }

    /// Edge label of the k-th parameter, used in range errors
    fn param_name(&self, k: usize) -> String {
        match self.param_edge_ids().nth(k) {
            Some(edge_id) => self.graph.edge_label(edge_id),
            None => format!("spread_probs[{}]", k),
        }
    }

    /// Collapse a state distribution to per-level marginals
    fn marginalize(&self, dist: &Array1<f64>) -> Vec<f64> {
        (0..self.state_space.num_nodes())
            .map(|idx| {
                let node = NodeId(idx);
                (0..self.state_space.len())
                    .filter(|&state| self.state_space.is_involved(state, node))
                    .map(|state| dist[state])
                    .sum()
            })
            .collect()
    }

    fn rebuild(&mut self) {
        let start = Instant::now();
        self.transition = build_transition_matrix(&self.graph, &self.state_space);
        let elapsed = start.elapsed();
        debug!(
            states = self.state_space.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "rebuilt transition matrix"
        );
        if elapsed.as_millis() > SLOW_REBUILD_MS {
            warn!(
                states = self.state_space.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "slow transition matrix rebuild"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn chain() -> Unilateral {
        let topology = Topology::new(&[("tumor", ["A"].as_slice()), ("A", ["B"].as_slice())]);
        Unilateral::new(&topology).unwrap()
    }

    #[test]
    fn test_initial_matrix_is_identity() {
        let system = chain();
        let matrix = system.transition_matrix();
        for from in 0..4 {
            for to in 0..4 {
                let expected = if from == to { 1.0 } else { 0.0 };
                assert_eq!(matrix[[from, to]], expected);
            }
        }
    }

    #[test]
    fn test_spread_probs_round_trip() {
        let mut system = chain();
        system.set_spread_probs(&[0.3, 0.4]).unwrap();
        assert_eq!(system.spread_probs(), vec![0.3, 0.4]);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let mut system = chain();
        let result = system.set_spread_probs(&[0.3]);
        assert!(matches!(
            result,
            Err(ModelError::ParameterLength {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_out_of_range_rejected_without_partial_state() {
        let mut system = chain();
        system.set_spread_probs(&[0.3, 0.4]).unwrap();

        // first element valid, second invalid; nothing may be applied
        let result = system.set_spread_probs(&[0.9, 1.4]);
        assert!(matches!(result, Err(ModelError::ParameterRange { .. })));
        assert_eq!(system.spread_probs(), vec![0.3, 0.4]);
        assert!((system.transition_matrix()[[0b00, 0b10]] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_state_dist_two_steps() {
        let mut system = chain();
        system.set_spread_probs(&[0.3, 0.4]).unwrap();

        let dist = system.state_dist(1);
        assert!((dist[0b00] - 0.7).abs() < 1e-12);
        assert!((dist[0b10] - 0.3).abs() < 1e-12);

        // after two steps: P(1,1) = 0.3 * 0.4
        let dist = system.state_dist(2);
        assert!((dist[0b00] - 0.49).abs() < 1e-12);
        assert!((dist[0b10] - (0.3 * 0.6 + 0.7 * 0.3)).abs() < 1e-12);
        assert!((dist[0b11] - 0.12).abs() < 1e-12);
        assert!((dist.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_involvement_dist() {
        let mut system = chain();
        system.set_spread_probs(&[0.3, 0.4]).unwrap();
        let marginals = system.involvement_dist(1);
        assert!((marginals[0] - 0.3).abs() < 1e-12);
        assert!((marginals[1] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_posterior_and_risk() {
        let mut system = chain();
        system.set_spread_probs(&[0.3, 0.4]).unwrap();

        // perfectly informative two-outcome modality on state (A involved?)
        let obs = ObservationMatrix::new(
            array![
                [1.0, 0.0],
                [1.0, 0.0],
                [0.0, 1.0],
                [0.0, 1.0],
            ],
            system.state_space(),
        )
        .unwrap();

        // outcome 1 = "A seen involved" after one step -> state (1,0) for sure
        let posterior = system.posterior(&obs, 1, 1).unwrap();
        assert!((posterior[0b10] - 1.0).abs() < 1e-12);

        let risk = system.risk(&obs, 1, 1).unwrap();
        assert!((risk[0] - 1.0).abs() < 1e-12);
        assert!((risk[1] - 0.0).abs() < 1e-12);

        // outcome index out of range
        assert!(system.posterior(&obs, 2, 1).is_err());
    }
}
