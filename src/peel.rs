//! Incremental weighted-degree and density bookkeeping for the peeling loop.
//!
//! [`PeelState`] tracks, for a shrinking vertex set S, each remaining vertex's
//! weighted degree deg(i) = Σ_{j∈S, j≠i} M[i][j] together with the total edge
//! weight W(S) = ½ Σ_{i∈S} deg(i). Removing a vertex costs O(|S|); the full
//! peeling sequence therefore costs O(n²), the same as reading the matrix
//! once. W(S) is updated *before* the degree decrements so that
//! W(S \ {v}) = W(S) − deg(v) holds with deg(v) measured at removal time.

use crate::affinity::AffinityMatrix;

/// Mutable peeling state over a borrowed, read-only affinity matrix.
///
/// Created fresh per solver invocation; never shared between invocations.
#[derive(Clone, Debug)]
pub struct PeelState<'a> {
    matrix: &'a AffinityMatrix,
    alive: Vec<bool>,
    degree: Vec<f64>,
    total_weight: f64,
    remaining: usize,
}

impl<'a> PeelState<'a> {
    /// Initializes degrees and total weight over the full vertex set in O(n²).
    pub fn new(matrix: &'a AffinityMatrix) -> Self {
        let n = matrix.n();
        let mut degree = vec![0.0; n];
        for (i, deg) in degree.iter_mut().enumerate() {
            // The diagonal is stored as zero, so the row sum is the
            // off-diagonal weighted degree.
            *deg = matrix.row(i).iter().sum();
        }
        let total_weight = 0.5 * degree.iter().sum::<f64>();
        Self {
            matrix,
            alive: vec![true; n],
            degree,
            total_weight,
            remaining: n,
        }
    }

    /// Returns the number of vertices still in the working set.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Returns whether vertex `v` is still in the working set.
    #[inline(always)]
    pub fn is_alive(&self, v: usize) -> bool {
        self.alive[v]
    }

    /// Returns the current weighted degree of `v`.
    ///
    /// Valid only while `v` is in the working set.
    #[inline(always)]
    pub fn degree_of(&self, v: usize) -> f64 {
        debug_assert!(self.alive[v], "degree_of on removed vertex {v}");
        self.degree[v]
    }

    /// Returns the total edge weight W(S) of the working set.
    #[inline(always)]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Returns the vertex with the minimum weighted degree, or `None` when
    /// the working set is empty.
    ///
    /// Ties go to the smallest index, which makes the whole peeling sequence
    /// reproducible.
    pub fn min_degree_vertex(&self) -> Option<usize> {
        let mut best = None;
        let mut best_degree = f64::INFINITY;
        for (v, &alive) in self.alive.iter().enumerate() {
            if alive && self.degree[v] < best_degree {
                best_degree = self.degree[v];
                best = Some(v);
            }
        }
        best
    }

    /// Removes `v` from the working set and returns its weighted degree as
    /// captured just before removal.
    ///
    /// Every remaining degree is decremented by `M[i][v]`, and the total
    /// weight drops by the returned value. O(|S|).
    ///
    /// # Panics
    /// Panics in debug builds if `v` was already removed.
    pub fn remove(&mut self, v: usize) -> f64 {
        debug_assert!(self.alive[v], "remove on removed vertex {v}");
        let removed_degree = self.degree[v];
        self.total_weight -= removed_degree;
        self.alive[v] = false;
        self.remaining -= 1;

        let row = self.matrix.row(v);
        for i in 0..self.alive.len() {
            if self.alive[i] {
                self.degree[i] -= row[i];
            }
        }
        removed_degree
    }

    /// Returns density(S) = W(S) / |S|, or `None` for the empty set.
    #[inline]
    pub fn density(&self) -> Option<f64> {
        if self.remaining == 0 {
            None
        } else {
            Some(self.total_weight / self.remaining as f64)
        }
    }

    /// Returns the working set as an ascending index list.
    pub fn live_vertices(&self) -> Vec<usize> {
        self.alive
            .iter()
            .enumerate()
            .filter_map(|(v, &alive)| alive.then_some(v))
            .collect()
    }

    #[cfg(test)]
    fn recompute_for_test(&self) -> (Vec<f64>, f64) {
        let n = self.matrix.n();
        let mut degree = vec![0.0; n];
        let mut total = 0.0;
        for i in 0..n {
            if !self.alive[i] {
                continue;
            }
            for j in 0..n {
                if i != j && self.alive[j] {
                    degree[i] += self.matrix.weight(i, j);
                }
            }
            total += degree[i];
        }
        (degree, total / 2.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn assert_close(a: f64, b: f64, context: &str) {
        assert!((a - b).abs() < 1e-9, "{context}: {a} vs {b}");
    }

    #[test]
    fn initial_total_weight_matches_pair_sum() {
        let mut rng = XorShiftRng::seed_from_u64(0xC0FFEE);
        let m = AffinityMatrix::random(&mut rng, 20, 0.35);
        let state = PeelState::new(&m);

        let mut pair_sum = 0.0;
        for i in 0..20 {
            for j in (i + 1)..20 {
                pair_sum += m.weight(i, j);
            }
        }
        assert_close(state.total_weight(), pair_sum, "total weight");
    }

    #[test]
    fn removal_matches_recompute_invariants() {
        let mut rng = XorShiftRng::seed_from_u64(0xBEEF);
        let m = AffinityMatrix::random(&mut rng, 24, 0.4);
        let mut state = PeelState::new(&m);

        while let Some(v) = state.min_degree_vertex() {
            state.remove(v);
            let (degree, total) = state.recompute_for_test();
            assert_close(state.total_weight(), total, "total weight after removal");
            for i in 0..24 {
                if state.is_alive(i) {
                    assert_close(state.degree_of(i), degree[i], "degree after removal");
                }
            }
        }
        assert_eq!(state.remaining(), 0);
    }

    #[test]
    fn remove_returns_degree_captured_before_removal() {
        let rows = vec![
            vec![0.0, 0.4, 0.6],
            vec![0.4, 0.0, 0.2],
            vec![0.6, 0.2, 0.0],
        ];
        let m = AffinityMatrix::from_rows(&rows).unwrap();
        let mut state = PeelState::new(&m);

        let before = state.degree_of(1);
        assert_close(before, 0.6, "initial degree of 1");
        let captured = state.remove(1);
        assert_close(captured, before, "captured degree");
        assert_close(state.degree_of(0), 0.6, "degree of 0 after removal");
        assert_close(state.degree_of(2), 0.6, "degree of 2 after removal");
    }

    #[test]
    fn min_degree_ties_select_smallest_index() {
        // All off-diagonal weights equal: every degree ties.
        let rows = vec![
            vec![0.0, 0.5, 0.5],
            vec![0.5, 0.0, 0.5],
            vec![0.5, 0.5, 0.0],
        ];
        let m = AffinityMatrix::from_rows(&rows).unwrap();
        let mut state = PeelState::new(&m);

        assert_eq!(state.min_degree_vertex(), Some(0));
        state.remove(0);
        assert_eq!(state.min_degree_vertex(), Some(1));
        state.remove(1);
        assert_eq!(state.min_degree_vertex(), Some(2));
    }

    #[test]
    fn density_is_none_only_when_empty() {
        let rows = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let m = AffinityMatrix::from_rows(&rows).unwrap();
        let mut state = PeelState::new(&m);

        assert_close(state.density().unwrap(), 0.5, "pair density");
        state.remove(0);
        assert_close(state.density().unwrap(), 0.0, "singleton density");
        state.remove(1);
        assert!(state.density().is_none());
    }

    #[test]
    fn live_vertices_are_ascending() {
        let mut rng = XorShiftRng::seed_from_u64(0x5EED);
        let m = AffinityMatrix::random(&mut rng, 12, 0.5);
        let mut state = PeelState::new(&m);
        state.remove(7);
        state.remove(2);
        state.remove(11);

        let live = state.live_vertices();
        assert_eq!(live, vec![0, 1, 3, 4, 5, 6, 8, 9, 10]);
    }
}
