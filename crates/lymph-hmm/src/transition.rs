// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Transition Rule & Matrix Construction
//!
//! The per-node rule and the global state-transition matrix built from it.
//!
//! ## Per-node rule
//! ```text
//! P(node involved at t+1 | joint state s) =
//!     1                                          if node involved in s
//!     1 - Π (1 - b_e)                            otherwise,
//!         over incoming edges e whose source is involved in s
//! ```
//! The tumor counts as permanently involved, so base edges always
//! contribute. Each active edge is an independent Bernoulli seeding event;
//! the complement of the product of non-seeding probabilities is the
//! probability that at least one edge seeds.
//!
//! ## Joint rule
//! Node transitions are conditionally independent given the joint state,
//! so a row of the matrix factorizes into per-node terms. Any transition
//! that would revert an involved level has probability 0 by construction,
//! and rows sum to 1.

use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayViewMut1, Axis};
use std::sync::OnceLock;
use tracing::trace;

use lymph_graph::{NodeId, Parent, SpreadGraph};

use crate::state_space::StateSpace;

/// Row count above which rows are filled in parallel.
/// Rayon overhead dominates below this (empirically, around 7 levels).
const PAR_ROW_THRESHOLD: usize = 128;

/// Runtime-gated tracing config for matrix construction.
/// Enable with:
/// - LYMPH_TRACE_TRANSITIONS=1
/// Optional filter:
/// - LYMPH_TRACE_STATE=<usize state index> (single row)
struct TransitionTraceCfg {
    enabled: bool,
    state_filter: Option<usize>,
}

fn transition_trace_cfg() -> &'static TransitionTraceCfg {
    static CFG: OnceLock<TransitionTraceCfg> = OnceLock::new();
    CFG.get_or_init(|| {
        let enabled = std::env::var("LYMPH_TRACE_TRANSITIONS")
            .ok()
            .as_deref()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let state_filter = std::env::var("LYMPH_TRACE_STATE").ok().and_then(|v| v.parse().ok());

        TransitionTraceCfg {
            enabled,
            state_filter,
        }
    })
}

/// Probability that `node` is involved at the next step, given the
/// current joint `state`.
///
/// Already-involved levels return 1.0 (absorbing); healthy levels return
/// the at-least-one-edge-seeds probability over their active incoming
/// edges.
pub fn node_trans_prob(
    graph: &SpreadGraph,
    space: &StateSpace,
    state: usize,
    node: NodeId,
) -> f64 {
    if space.is_involved(state, node) {
        return 1.0;
    }

    let mut stays_healthy = 1.0;
    for &edge_id in graph.incoming(node) {
        let edge = graph.edge(edge_id);
        let source_involved = match edge.parent() {
            Parent::Tumor => true,
            Parent::Lnl(source) => space.is_involved(state, source),
        };
        if source_involved {
            stays_healthy *= 1.0 - edge.spread_prob();
        }
    }
    1.0 - stays_healthy
}

/// Build the full (2^N x 2^N) row-stochastic transition matrix.
pub(crate) fn build_transition_matrix(graph: &SpreadGraph, space: &StateSpace) -> Array2<f64> {
    let n = space.len();
    let mut matrix = Array2::<f64>::zeros((n, n));

    if n >= PAR_ROW_THRESHOLD {
        matrix
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(state, row)| fill_row(graph, space, state, row));
    } else {
        for (state, row) in matrix.axis_iter_mut(Axis(0)).enumerate() {
            fill_row(graph, space, state, row);
        }
    }

    matrix
}

/// Fill one row: enumerate the subsets of the healthy levels that could
/// become involved in this step.
fn fill_row(graph: &SpreadGraph, space: &StateSpace, state: usize, mut row: ArrayViewMut1<f64>) {
    let healthy = space.healthy_nodes(state);
    let probs: Vec<f64> = healthy
        .iter()
        .map(|&node| node_trans_prob(graph, space, state, node))
        .collect();

    // Each subset of newly involved levels is one reachable target state;
    // everything else stays 0 (monotonicity).
    for subset in 0..1usize << healthy.len() {
        let mut target = state;
        let mut prob = 1.0;
        for (k, &node) in healthy.iter().enumerate() {
            if subset >> k & 1 == 1 {
                target = space.with_involved(target, node);
                prob *= probs[k];
            } else {
                prob *= 1.0 - probs[k];
            }
        }
        row[target] = prob;
    }

    let cfg = transition_trace_cfg();
    if cfg.enabled && cfg.state_filter.map(|s| s == state).unwrap_or(true) {
        trace!(
            state,
            healthy = healthy.len(),
            reachable = 1usize << healthy.len(),
            stay_prob = row[state],
            "filled transition row"
        );
    }
}
