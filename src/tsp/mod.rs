//! TSP data model.
//!
//! - [`Point`]: a normalized location in the unit square
//! - [`Tour`]: a visiting order over point indices with a fixed start
//! - [`DistanceMatrix`]: precomputed pairwise Euclidean distances
//! - [`dataset`]: point-set generation, import and normalization

pub mod dataset;
mod matrix;
mod point;
mod tour;

pub use dataset::{MIN_POINT_COUNT, PointLayout, RawPoint};
pub use matrix::DistanceMatrix;
pub use point::Point;
pub use tour::{direct_tour_length, is_valid_tour, random_tour, Tour};
