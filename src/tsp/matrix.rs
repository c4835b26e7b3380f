//! Pairwise distance table.

use super::point::Point;

/// Symmetric `n × n` table of Euclidean distances with a zero diagonal.
///
/// Built once per run in O(n²) time and space; every distance query
/// during the run is then a single indexed load.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Computes all pairwise distances between `points`.
    ///
    /// With the `parallel` feature, rows are filled concurrently.
    pub fn build(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        if n == 0 {
            return Self { n, data };
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            data.par_chunks_mut(n)
                .enumerate()
                .for_each(|(i, row)| fill_row(points, i, row));
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (i, row) in data.chunks_mut(n).enumerate() {
                fill_row(points, i, row);
            }
        }

        Self { n, data }
    }

    /// Number of points covered by the table.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between points `i` and `j`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// All distances from point `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Length of the closed tour: consecutive legs plus the wrap-around
    /// leg from the last position back to the first.
    ///
    /// # Complexity
    /// O(n)
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        if tour.len() < 2 {
            return 0.0;
        }
        tour.iter()
            .zip(tour.iter().cycle().skip(1))
            .map(|(&from, &to)| self.distance(from, to))
            .sum()
    }
}

/// Distances from `points[i]` to every point. Both halves are computed
/// directly; `hypot` of negated deltas is bit-identical, so the table
/// stays exactly symmetric.
fn fill_row(points: &[Point], i: usize, row: &mut [f64]) {
    let origin = &points[i];
    for (j, slot) in row.iter_mut().enumerate() {
        *slot = if i == j { 0.0 } else { origin.distance(&points[j]) };
    }
}
