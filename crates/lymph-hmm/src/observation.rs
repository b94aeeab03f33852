// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Externally supplied observation (emission) matrices.
//!
//! Calibrating a diagnostic modality is not this crate's job; an
//! [`ObservationMatrix`] merely wraps a matrix handed in by the caller and
//! validates its shape once, so every downstream query can rely on it.

use ndarray::Array2;

use crate::state_space::StateSpace;
use crate::{ModelError, ModelResult};

/// Emission matrix mapping hidden states (rows) to diagnostic outcomes
/// (columns). Rows must be stochastic.
#[derive(Debug, Clone)]
pub struct ObservationMatrix {
    matrix: Array2<f64>,
}

impl ObservationMatrix {
    const ROW_SUM_TOLERANCE: f64 = 1e-6;

    /// Wrap and validate an emission matrix for the given state space.
    pub fn new(matrix: Array2<f64>, space: &StateSpace) -> ModelResult<Self> {
        if matrix.nrows() != space.len() {
            return Err(ModelError::Configuration(format!(
                "observation matrix has {} rows, state space has {} states",
                matrix.nrows(),
                space.len()
            )));
        }
        if matrix.ncols() == 0 {
            return Err(ModelError::Configuration(
                "observation matrix needs at least one diagnostic outcome".to_string(),
            ));
        }
        for (row_idx, row) in matrix.rows().into_iter().enumerate() {
            let mut sum = 0.0;
            for (col_idx, &p) in row.iter().enumerate() {
                if !(0.0..=1.0).contains(&p) || p.is_nan() {
                    return Err(ModelError::ParameterRange {
                        name: format!("observation[{}, {}]", row_idx, col_idx),
                        value: p,
                    });
                }
                sum += p;
            }
            if (sum - 1.0).abs() > Self::ROW_SUM_TOLERANCE {
                return Err(ModelError::Configuration(format!(
                    "observation matrix row {} sums to {}, expected 1",
                    row_idx, sum
                )));
            }
        }
        Ok(Self { matrix })
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Number of diagnostic outcomes (columns)
    pub fn num_outcomes(&self) -> usize {
        self.matrix.ncols()
    }
}
