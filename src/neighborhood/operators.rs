//! Tour perturbations restricted to positions `1..n`.
//!
//! With `n <= 2` there is at most one free position, so every operator is
//! a no-op there.

use rand::Rng;

/// Swap: exchange the contents of two distinct free positions.
///
/// # Complexity
/// O(1)
pub fn swap<R: Rng>(tour: &mut [usize], rng: &mut R) {
    let n = tour.len();
    if n <= 2 {
        return;
    }
    let (i, j) = distinct_positions(n, rng);
    tour.swap(i, j);
}

/// Two-opt: pick `i < j` among the free positions and reverse `tour[i..=j]`.
///
/// # Complexity
/// O(n) worst case for segment reversal
pub fn two_opt<R: Rng>(tour: &mut [usize], rng: &mut R) {
    let n = tour.len();
    if n <= 2 {
        return;
    }
    let i = rng.random_range(1..n - 1);
    let j = rng.random_range(i + 1..n);
    tour[i..=j].reverse();
}

/// Insert: remove the element at one free position and reinsert it at
/// another, shifting the elements in between by one.
///
/// # Complexity
/// O(n) due to shifting
pub fn insert<R: Rng>(tour: &mut [usize], rng: &mut R) {
    let n = tour.len();
    if n <= 2 {
        return;
    }
    let (from, to) = distinct_positions(n, rng);
    if from < to {
        tour[from..=to].rotate_left(1);
    } else {
        tour[to..=from].rotate_right(1);
    }
}

/// Pitch adjustment for harmony search: a fair coin between [`swap`] and
/// [`two_opt`].
pub fn pitch_adjust<R: Rng>(tour: &mut [usize], rng: &mut R) {
    if rng.random_bool(0.5) {
        swap(tour, rng);
    } else {
        two_opt(tour, rng);
    }
}

/// Two distinct positions drawn uniformly from `1..n`. Requires `n >= 3`.
fn distinct_positions<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(1..n);
    let mut b = rng.random_range(1..n - 1);
    if b >= a {
        b += 1;
    }
    (a, b)
}
