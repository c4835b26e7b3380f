//! Neighborhood operators over tours.
//!
//! Every operator keeps the tour a permutation of the same index set and
//! never touches position 0 (the fixed start).
//!
//! - [`swap`]: exchange two positions (O(1))
//! - [`two_opt`]: reverse a contiguous segment (O(n))
//! - [`insert`]: remove one element and reinsert it elsewhere (O(n))
//!
//! # References
//!
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

mod operators;

pub use operators::{insert, pitch_adjust, swap, two_opt};

use rand::Rng;

/// Perturbation used by the SA engine to propose candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Neighborhood {
    Swap,
    #[default]
    TwoOpt,
    Insert,
}

impl Neighborhood {
    /// Applies the operator to `tour` in place.
    pub fn apply_in_place<R: Rng>(self, tour: &mut [usize], rng: &mut R) {
        match self {
            Neighborhood::Swap => swap(tour, rng),
            Neighborhood::TwoOpt => two_opt(tour, rng),
            Neighborhood::Insert => insert(tour, rng),
        }
    }

    /// Returns a perturbed copy of `tour`, leaving the input untouched.
    pub fn neighbor<R: Rng>(self, tour: &[usize], rng: &mut R) -> Vec<usize> {
        let mut next = tour.to_vec();
        self.apply_in_place(&mut next, rng);
        next
    }

    pub fn name(self) -> &'static str {
        match self {
            Neighborhood::Swap => "swap",
            Neighborhood::TwoOpt => "two-opt",
            Neighborhood::Insert => "insert",
        }
    }
}

impl std::fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
