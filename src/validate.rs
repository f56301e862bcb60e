//! Fast deterministic validation of the bundled reference scenario.
//!
//! The repository bundles a 20-element affinity matrix with one dominant
//! 5-element cluster (near-complete pairwise weights around 0.97-0.99) buried
//! among near-zero cross-cluster noise and a smaller decoy cluster. The
//! solver must isolate exactly the dominant cluster.

use crate::affinity::parse_affinity_matrix;
use crate::solve::{density_of, solve};

/// Expected consensus set for the bundled reference matrix.
const REFERENCE_CONSENSUS: [usize; 5] = [3, 5, 12, 14, 15];

/// Density of the expected consensus set within the bundled matrix.
const REFERENCE_DENSITY: f64 = 0.75818;

/// Validates the bundled reference scenario.
///
/// Parses `affinity_n20.txt`, runs the solver, and checks both the returned
/// index list and its density.
///
/// # Errors
/// Returns an error message naming the bundled artifact if parsing fails or
/// the solver output deviates from the reference.
pub fn validate_reference_scenario() -> Result<(), String> {
    let text = include_str!("../affinity_n20.txt");
    let matrix = parse_affinity_matrix(text).map_err(|e| format!("affinity_n20.txt: {e}"))?;

    let consensus = solve(&matrix);
    if consensus != REFERENCE_CONSENSUS {
        return Err(format!(
            "affinity_n20.txt: expected consensus {REFERENCE_CONSENSUS:?}, got {consensus:?}"
        ));
    }

    let density = density_of(&matrix, &consensus);
    if (density - REFERENCE_DENSITY).abs() > 1e-4 {
        return Err(format!(
            "affinity_n20.txt: expected consensus density {REFERENCE_DENSITY}, got {density}"
        ));
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
