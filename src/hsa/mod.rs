//! Harmony Search (HSA).
//!
//! A population search over a fixed-size harmony memory. Each step
//! improvises one candidate, either recalled from memory (optionally
//! pitch-adjusted) or generated at random, and lets it replace a
//! non-elite memory slot it beats.
//!
//! # References
//!
//! - Geem, Kim & Loganathan (2001), "A New Heuristic Optimization Algorithm: Harmony Search"

mod config;
mod engine;

pub use config::HsaSettings;
pub use engine::{HsaState, HsaStep, Improvisation};
