// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Bilateral System
//!
//! Two unilateral systems over the same topology, one per side of the
//! neck. The symmetry flags declare which parameter blocks the sides
//! share:
//!
//! ```text
//! spread_probs = [ ipsi_base | ipsi_trans | contra_base? | contra_trans? ]
//!                                            ^ only if !base_symmetric
//!                                                          ^ only if !trans_symmetric
//! ```
//!
//! Shared blocks are reported once and written to both sides on set, so
//! with `base_symmetric` the two base-probability blocks are numerically
//! identical after every successful set (same for `trans_symmetric`).

use tracing::debug;

use lymph_graph::Topology;
use lymph_hmm::{ModelError, ModelResult, Unilateral};

/// Ipsilateral + contralateral spread model with partial parameter sharing.
pub struct Bilateral {
    ipsi: Unilateral,
    contra: Unilateral,
    base_symmetric: bool,
    trans_symmetric: bool,
}

impl Bilateral {
    /// Build both sides from one topology. Both start with all spread
    /// probabilities at 0.
    pub fn new(
        topology: &Topology,
        base_symmetric: bool,
        trans_symmetric: bool,
    ) -> ModelResult<Self> {
        let ipsi = Unilateral::new(topology)?;
        let contra = Unilateral::new(topology)?;
        debug!(
            num_nodes = ipsi.graph().num_nodes(),
            base_symmetric, trans_symmetric, "constructed bilateral system"
        );
        Ok(Self {
            ipsi,
            contra,
            base_symmetric,
            trans_symmetric,
        })
    }

    pub fn ipsi(&self) -> &Unilateral {
        &self.ipsi
    }

    pub fn contra(&self) -> &Unilateral {
        &self.contra
    }

    pub fn base_symmetric(&self) -> bool {
        self.base_symmetric
    }

    pub fn trans_symmetric(&self) -> bool {
        self.trans_symmetric
    }

    /// Length of the combined parameter vector
    pub fn num_params(&self) -> usize {
        let nb = self.ipsi.num_base_edges();
        let nt = self.ipsi.num_trans_edges();
        let mut n = nb + nt;
        if !self.base_symmetric {
            n += nb;
        }
        if !self.trans_symmetric {
            n += nt;
        }
        n
    }

    /// Combined parameter vector in the layout documented on this module
    pub fn spread_probs(&self) -> Vec<f64> {
        let nb = self.ipsi.num_base_edges();
        let mut values = self.ipsi.spread_probs();
        let contra = self.contra.spread_probs();
        if !self.base_symmetric {
            values.extend_from_slice(&contra[..nb]);
        }
        if !self.trans_symmetric {
            values.extend_from_slice(&contra[nb..]);
        }
        values
    }

    /// Split the incoming vector per the symmetry configuration and write
    /// both sides, each rebuilding its own transition matrix.
    ///
    /// Validation is complete before either side is touched; a failed set
    /// leaves both sides at their previous state.
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
                    name: format!("spread_probs[{}]", k),
                    value,
                });
            }
        }

        let nb = self.ipsi.num_base_edges();
        let nt = self.ipsi.num_trans_edges();
        let ipsi_base = &values[..nb];
        let ipsi_trans = &values[nb..nb + nt];
        let mut cursor = nb + nt;

        let contra_base = if self.base_symmetric {
            ipsi_base
        } else {
            let block = &values[cursor..cursor + nb];
            cursor += nb;
            block
        };
        let contra_trans = if self.trans_symmetric {
            ipsi_trans
        } else {
            &values[cursor..cursor + nt]
        };

        let mut contra_values = Vec::with_capacity(nb + nt);
        contra_values.extend_from_slice(contra_base);
        contra_values.extend_from_slice(contra_trans);

        // every element range-checked above, so neither set can fail
        self.ipsi.set_spread_probs(&values[..nb + nt])?;
        self.contra.set_spread_probs(&contra_values)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topology() -> Topology {
        Topology::new(&[
            ("tumor", ["II", "III"].as_slice()),
            ("II", ["III"].as_slice()),
        ])
    }

    #[test]
    fn test_fully_symmetric_layout() {
        let mut system = Bilateral::new(&topology(), true, true).unwrap();
        // 2 base + 1 trans, shared
        assert_eq!(system.num_params(), 3);
        system.set_spread_probs(&[0.1, 0.2, 0.3]).unwrap();
        assert_eq!(system.spread_probs(), vec![0.1, 0.2, 0.3]);
        assert_eq!(system.ipsi().spread_probs(), system.contra().spread_probs());
    }

    #[test]
    fn test_base_symmetric_only() {
        let mut system = Bilateral::new(&topology(), true, false).unwrap();
        // shared base (2) + ipsi trans (1) + contra trans (1)
        assert_eq!(system.num_params(), 4);
        system.set_spread_probs(&[0.1, 0.2, 0.3, 0.4]).unwrap();

        let ipsi = system.ipsi().spread_probs();
        let contra = system.contra().spread_probs();
        assert_eq!(&ipsi[..2], &contra[..2]);
        assert!((ipsi[2] - 0.3).abs() < 1e-12);
        assert!((contra[2] - 0.4).abs() < 1e-12);
        assert_eq!(system.spread_probs(), vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_fully_asymmetric_layout() {
        let mut system = Bilateral::new(&topology(), false, false).unwrap();
        assert_eq!(system.num_params(), 6);
        let values = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        system.set_spread_probs(&values).unwrap();
        assert_eq!(system.ipsi().spread_probs(), vec![0.1, 0.2, 0.3]);
        assert_eq!(system.contra().spread_probs(), vec![0.4, 0.5, 0.6]);
        assert_eq!(system.spread_probs(), values.to_vec());
    }

    #[test]
    fn test_wrong_length_and_atomicity() {
        let mut system = Bilateral::new(&topology(), false, false).unwrap();
        system
            .set_spread_probs(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6])
            .unwrap();

        assert!(matches!(
            system.set_spread_probs(&[0.1, 0.2]),
            Err(ModelError::ParameterLength { .. })
        ));

        // invalid element in the contra block: ipsi must stay untouched too
        let result = system.set_spread_probs(&[0.9, 0.9, 0.9, 0.9, 0.9, 1.1]);
        assert!(matches!(result, Err(ModelError::ParameterRange { .. })));
        assert_eq!(system.ipsi().spread_probs(), vec![0.1, 0.2, 0.3]);
        assert_eq!(system.contra().spread_probs(), vec![0.4, 0.5, 0.6]);
    }

    #[test]
    fn test_sides_rebuild_their_matrices() {
        let mut system = Bilateral::new(&topology(), false, false).unwrap();
        system
            .set_spread_probs(&[0.3, 0.0, 0.0, 0.6, 0.0, 0.0])
            .unwrap();
        // state bit layout: II is the MSB of 2 bits
        let ipsi_matrix = system.ipsi().transition_matrix();
        let contra_matrix = system.contra().transition_matrix();
        assert!((ipsi_matrix[[0b00, 0b10]] - 0.3).abs() < 1e-12);
        assert!((contra_matrix[[0b00, 0b10]] - 0.6).abs() < 1e-12);
    }
}
