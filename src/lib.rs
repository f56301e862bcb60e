//! # Dense Subgraph Discovery
//!
//! A small, deterministic solver for the weighted densest-subgraph problem:
//! given a symmetric, non-negative pairwise-affinity matrix over `n` candidate
//! elements, find the subset whose total internal edge weight divided by its
//! size is maximal, and return it as an ascending index list.
//!
//! This crate provides:
//! - A validated [`affinity::AffinityMatrix`] container with a plain-text
//!   serialization format.
//! - An **incremental** weighted-degree tracker ([`peel::PeelState`]) that
//!   supports the classic greedy peeling loop in O(n²) total.
//! - A deterministic spectral sweep ([`spectral::principal_ordering`]) that
//!   refines the greedy result without giving up its approximation bound.
//! - A pure-function solver ([`solve::solve`]) plus a rayon-parallel batch
//!   entry point for independent matrices.
//!
//! ## Quick Start
//!
//! ```
//! use dsd::prelude::*;
//!
//! // Elements 0, 1, 2 are mutually consistent; element 3 is an outlier.
//! let rows = vec![
//!     vec![0.0, 0.9, 0.8, 0.0],
//!     vec![0.9, 0.0, 0.7, 0.0],
//!     vec![0.8, 0.7, 0.0, 0.1],
//!     vec![0.0, 0.0, 0.1, 0.0],
//! ];
//! let matrix = AffinityMatrix::from_rows(&rows).unwrap();
//! assert_eq!(solve(&matrix), vec![0, 1, 2]);
//! ```
//!
//! ## Loading a Matrix from Text
//!
//! ```
//! use dsd::prelude::*;
//!
//! let matrix = parse_affinity_matrix("0 1\n1 0\n").unwrap();
//! assert_eq!(solve(&matrix), vec![0, 1]);
//! ```
//!
//! ## Modules
//!
//! - [`affinity`]: validated affinity matrices, parsing, and serialization.
//! - [`peel`]: incremental weighted-degree and density bookkeeping.
//! - [`spectral`]: principal-eigenvector vertex ordering via power iteration.
//! - [`solve`]: the peeling driver and public solver entry points.
//! - [`validate`]: deterministic validation of the bundled reference scenario.
//!
//! ## Performance Notes
//!
//! - Greedy peeling runs in O(n²) time and O(n) space beyond the matrix.
//! - The spectral sweep costs O(n²) per power-iteration step with a fixed
//!   iteration cap, so the whole solve stays quadratic in practice.
//! - Independent matrices can be solved concurrently; the matrix is read-only
//!   for the solver's lifetime.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::needless_range_loop)] // Often clearer for matrix indexing
#![allow(clippy::doc_markdown)]
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod affinity;
pub mod peel;
pub mod spectral;
pub mod solve;
pub mod validate;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::affinity::{parse_affinity_matrix, AffinityError, AffinityMatrix};
    pub use crate::solve::{density_of, solve, solve_batch, solve_rows};
    pub use crate::validate::validate_reference_scenario;
}
