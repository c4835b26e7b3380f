//! Tour representation and helpers.

use rand::Rng;

use super::point::Point;

/// Visiting order over point indices.
///
/// A valid tour is a permutation of `0..n` whose element 0 is the
/// designated start index. Neighborhood operators and replacement rules
/// never move position 0.
pub type Tour = Vec<usize>;

/// Random tour over `n` points beginning at `start`.
///
/// The remaining indices are shuffled uniformly and appended after the
/// start index.
pub fn random_tour<R: Rng>(n: usize, start: usize, rng: &mut R) -> Tour {
    if n == 0 {
        return Vec::new();
    }
    let mut rest: Vec<usize> = (0..n).filter(|&i| i != start).collect();
    u_numflow::random::shuffle(&mut rest, rng);

    let mut tour = Vec::with_capacity(n);
    tour.push(start);
    tour.extend(rest);
    tour
}

/// Whether `tour` is a permutation of `0..n` that begins at `start`.
pub fn is_valid_tour(tour: &[usize], n: usize, start: usize) -> bool {
    if tour.len() != n || tour.first() != Some(&start) {
        return false;
    }
    let mut seen = vec![false; n];
    for &idx in tour {
        if idx >= n || seen[idx] {
            return false;
        }
        seen[idx] = true;
    }
    true
}

/// Closed tour length summed directly from point coordinates.
///
/// Reference computation for [`DistanceMatrix::tour_length`](super::DistanceMatrix::tour_length).
pub fn direct_tour_length(points: &[Point], tour: &[usize]) -> f64 {
    if tour.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for (pos, &from) in tour.iter().enumerate() {
        let to = tour[(pos + 1) % tour.len()];
        total += points[from].distance(&points[to]);
    }
    total
}
