// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Midline-Extension System
//!
//! A tumor that grows over the mid-sagittal line spreads to the
//! contralateral side more readily. This model captures that with a third
//! unilateral system whose base probabilities are a convex mix of the two
//! bilateral sides:
//!
//! ```text
//! b_ext = alpha * b_ipsi + (1 - alpha) * b_contra
//! ```
//!
//! so the extension's base risk lies between the contralateral and the
//! ipsilateral base risk. Its trans probabilities are copied from the
//! ipsilateral side (spread beyond the first echelon no longer depends on
//! which side of the midline the tumor sits on).
//!
//! ```text
//! spread_probs = [ bilateral layout (base_symmetric = false) | alpha ]
//! ```
//!
//! The extension system holds no parameters of its own: it is rederived
//! inside every successful set and cannot be written directly.

use tracing::debug;

use lymph_graph::Topology;
use lymph_hmm::{ModelError, ModelResult, Unilateral};

use crate::bilateral::Bilateral;

/// Selector for the three systems owned by [`MidlineExtension`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Ipsi,
    Contra,
    /// Contralateral side for patients with midline extension; derived,
    /// never directly settable
    ContraExt,
}

/// Bilateral model extended with a derived contralateral system for
/// midline-crossing tumors, plus the scalar mixing weight `alpha`.
pub struct MidlineExtension {
    bilateral: Bilateral,
    contra_ext: Unilateral,
    alpha_mix: f64,
}

impl MidlineExtension {
    /// Build the three systems from one topology.
    ///
    /// The owned bilateral is always `base_symmetric = false` (midline
    /// extension is pointless if both sides share base probabilities);
    /// trans symmetry stays configurable. `alpha` starts at 0.
    pub fn new(topology: &Topology, trans_symmetric: bool) -> ModelResult<Self> {
        let bilateral = Bilateral::new(topology, false, trans_symmetric)?;
        let contra_ext = Unilateral::new(topology)?;
        debug!(trans_symmetric, "constructed midline-extension system");
        Ok(Self {
            bilateral,
            contra_ext,
            alpha_mix: 0.0,
        })
    }

    /// Current mixing weight
    pub fn alpha_mix(&self) -> f64 {
        self.alpha_mix
    }

    pub fn bilateral(&self) -> &Bilateral {
        &self.bilateral
    }

    /// Shared access to one of the three owned systems
    pub fn side(&self, side: Side) -> &Unilateral {
        match side {
            Side::Ipsi => self.bilateral.ipsi(),
            Side::Contra => self.bilateral.contra(),
            Side::ContraExt => &self.contra_ext,
        }
    }

    pub fn ipsi(&self) -> &Unilateral {
        self.bilateral.ipsi()
    }

    pub fn contra(&self) -> &Unilateral {
        self.bilateral.contra()
    }

    pub fn contra_ext(&self) -> &Unilateral {
        &self.contra_ext
    }

    /// Length of the externally visible parameter vector
    pub fn num_params(&self) -> usize {
        self.bilateral.num_params() + 1
    }

    /// `[bilateral.spread_probs..., alpha]` — the mixing weight is always
    /// the last component.
    pub fn spread_probs(&self) -> Vec<f64> {
        let mut values = self.bilateral.spread_probs();
        values.push(self.alpha_mix);
        values
    }

    /// Set the full parameter vector.
    ///
    /// Protocol: split off `alpha` (last element), feed the rest to the
    /// bilateral, then rederive the extension system. Validation is
    /// complete before any state changes, so a failed set leaves all
    /// three systems and `alpha` untouched.
    ///
    /// # Errors
    /// [`ModelError::ParameterLength`] on a wrong-length vector;
    /// [`ModelError::ParameterRange`] if `alpha` or any probability is
    /// outside [0, 1].
    pub fn set_spread_probs(&mut self, values: &[f64]) -> ModelResult<()> {
        let expected = self.num_params();
        if values.len() != expected {
            return Err(ModelError::ParameterLength {
                expected,
                actual: values.len(),
            });
        }
        let (alpha, bilateral_values) = match values.split_last() {
            Some((&alpha, rest)) => (alpha, rest),
            None => unreachable!("num_params() is at least 1"),
        };
        if !(0.0..=1.0).contains(&alpha) || alpha.is_nan() {
            return Err(ModelError::ParameterRange {
                name: "alpha_mix".to_string(),
                value: alpha,
            });
        }

        // the bilateral set is itself all-or-nothing
        self.bilateral.set_spread_probs(bilateral_values)?;
        self.alpha_mix = alpha;
        self.rederive_contra_ext()
    }

    /// Write one side's `[base | trans]` vector directly.
    ///
    /// `Ipsi` and `Contra` writes go through the owned bilateral (the
    /// trans block is shared between the sides when `trans_symmetric`)
    /// and rederive the extension. `ContraExt` always fails: its
    /// parameters are a deterministic function of `(ipsi, contra, alpha)`.
    pub fn set_spread_probs_of(&mut self, side: Side, values: &[f64]) -> ModelResult<()> {
        let nb = self.ipsi().num_base_edges();
        let nt = self.ipsi().num_trans_edges();

        match side {
            Side::ContraExt => Err(ModelError::NotSettable("contralateral-extension")),
            Side::Ipsi | Side::Contra => {
                if values.len() != nb + nt {
                    return Err(ModelError::ParameterLength {
                        expected: nb + nt,
                        actual: values.len(),
                    });
                }
                let ipsi = self.ipsi().spread_probs();
                let contra = self.contra().spread_probs();
                let trans_symmetric = self.bilateral.trans_symmetric();

                // reassemble the full bilateral vector with this side's
                // blocks replaced, then reuse the validated set path
                let mut full = Vec::with_capacity(self.bilateral.num_params());
                match side {
                    Side::Ipsi => {
                        full.extend_from_slice(values);
                        full.extend_from_slice(&contra[..nb]);
                        if !trans_symmetric {
                            full.extend_from_slice(&contra[nb..]);
                        }
                    }
                    Side::Contra => {
                        full.extend_from_slice(&ipsi[..nb]);
                        if trans_symmetric {
                            full.extend_from_slice(&values[nb..]);
                        } else {
                            full.extend_from_slice(&ipsi[nb..]);
                        }
                        full.extend_from_slice(&values[..nb]);
                        if !trans_symmetric {
                            full.extend_from_slice(&values[nb..]);
                        }
                    }
                    Side::ContraExt => unreachable!(),
                }
                self.bilateral.set_spread_probs(&full)?;
                self.rederive_contra_ext()
            }
        }
    }

    /// Recompute the extension system from `(ipsi, contra, alpha)`:
    /// mixed base block, ipsi trans block.
    fn rederive_contra_ext(&mut self) -> ModelResult<()> {
        let nb = self.ipsi().num_base_edges();
        let ipsi = self.ipsi().spread_probs();
        let contra = self.contra().spread_probs();

        let mut ext = Vec::with_capacity(ipsi.len());
        for k in 0..nb {
            let mixed = self.alpha_mix * ipsi[k] + (1.0 - self.alpha_mix) * contra[k];
            // guard f64 rounding at the interval boundaries
            ext.push(mixed.clamp(0.0, 1.0));
        }
        ext.extend_from_slice(&ipsi[nb..]);
        self.contra_ext.set_spread_probs(&ext)
    }
}
