// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the state-space and transition-matrix engine.

use lymph::prelude::*;

/// Four levels, mixed first- and second-order spread
fn larynx_like_topology() -> Topology {
    Topology::new(&[
        ("tumor", ["I", "II", "III", "IV"].as_slice()),
        ("I", ["II"].as_slice()),
        ("II", ["III"].as_slice()),
        ("III", ["IV"].as_slice()),
    ])
}

/// Small deterministic LCG so the property tests need no rand dependency
fn pseudo_random_probs(seed: u64, len: usize) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}

#[test]
fn rows_are_stochastic_for_many_parameter_vectors() {
    let mut system = Unilateral::new(&larynx_like_topology()).unwrap();
    let n_params = system.num_params();

    for seed in 1..=25u64 {
        let probs = pseudo_random_probs(seed, n_params);
        system.set_spread_probs(&probs).unwrap();

        let matrix = system.transition_matrix();
        for (row_idx, row) in matrix.rows().into_iter().enumerate() {
            let sum: f64 = row.sum();
            assert!(
                (sum - 1.0).abs() < 1e-9,
                "seed {}: row {} sums to {}",
                seed,
                row_idx,
                sum
            );
        }
    }
}

#[test]
fn reverting_transitions_stay_impossible() {
    let mut system = Unilateral::new(&larynx_like_topology()).unwrap();
    system
        .set_spread_probs(&pseudo_random_probs(7, system.num_params()))
        .unwrap();

    let space = *system.state_space();
    let matrix = system.transition_matrix();
    for from in 0..space.len() {
        for to in 0..space.len() {
            if !space.is_monotonic(from, to) {
                assert_eq!(matrix[[from, to]], 0.0);
            }
        }
    }
}

#[test]
fn chain_scenario_exact_probabilities() {
    let topology = Topology::new(&[("tumor", ["A"].as_slice()), ("A", ["B"].as_slice())]);
    let mut system = Unilateral::new(&topology).unwrap();
    system.set_spread_probs(&[0.3, 0.4]).unwrap();

    let matrix = system.transition_matrix();
    // state indices: (A,B) with A in the most significant bit
    assert!((matrix[[0b00, 0b10]] - 0.3).abs() < 1e-12);
    assert!((matrix[[0b00, 0b00]] - 0.7).abs() < 1e-12);
    // a single step cannot skip a level
    assert_eq!(matrix[[0b00, 0b11]], 0.0);
    assert_eq!(matrix[[0b00, 0b01]], 0.0);
}

#[test]
fn per_node_rule_matches_matrix_diagonal_factor() {
    let topology = larynx_like_topology();
    let mut system = Unilateral::new(&topology).unwrap();
    system
        .set_spread_probs(&pseudo_random_probs(3, system.num_params()))
        .unwrap();

    let space = *system.state_space();
    let graph = system.graph();
    let matrix = system.transition_matrix();

    // staying put means no healthy level gets involved
    for state in 0..space.len() {
        let expected: f64 = (0..space.num_nodes())
            .map(|idx| {
                let node = NodeId(idx);
                if space.is_involved(state, node) {
                    1.0
                } else {
                    1.0 - node_trans_prob(graph, &space, state, node)
                }
            })
            .product();
        assert!((matrix[[state, state]] - expected).abs() < 1e-12);
    }
}

#[test]
fn involvement_marginals_are_monotonic_in_time() {
    let mut system = Unilateral::new(&larynx_like_topology()).unwrap();
    system
        .set_spread_probs(&pseudo_random_probs(11, system.num_params()))
        .unwrap();

    let mut previous = vec![0.0; 4];
    for t in 0..8 {
        let current = system.involvement_dist(t);
        for (node, (&prev, &cur)) in previous.iter().zip(&current).enumerate() {
            assert!(
                cur >= prev - 1e-12,
                "involvement of level {} decreased from {} to {} at t={}",
                node,
                prev,
                cur,
                t
            );
        }
        previous = current;
    }
}
