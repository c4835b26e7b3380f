//! Convergence tracking.
//!
//! Decimates the per-iteration best-distance stream into a trace of
//! bounded length for charting and reports.

mod sampler;

pub use sampler::{ConvergencePoint, ConvergenceSampler, DEFAULT_SAMPLE_TARGET};
