// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Model Composition
//!
//! Hierarchical composition of [`Unilateral`](lymph_hmm::Unilateral)
//! systems into clinically meaningful models:
//! - **Bilateral**: ipsilateral + contralateral side, with optional
//!   symmetry constraints tying their base and/or trans parameters
//! - **MidlineExtension**: a bilateral model plus a third, fully derived
//!   system for patients whose tumor crosses the mid-sagittal line
//!
//! All parameter flow is top-down: a vector set on a composite system is
//! decomposed, written into the owned unilateral systems, and each of
//! those rebuilds its own transition matrix. Derived systems are never
//! independently settable.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bilateral;
pub mod midline;

pub use bilateral::Bilateral;
pub use midline::{MidlineExtension, Side};

// the composite systems share the unilateral error type
pub use lymph_hmm::{ModelError, ModelResult};
