//! Simulated Annealing (SA).
//!
//! A single-tour trajectory search that accepts worsening moves with a
//! probability that decreases as the temperature cools, plus a reheat
//! rule that raises the temperature again after prolonged stagnation.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod engine;

pub use config::SaSettings;
pub use engine::{SaState, SaStep, MIN_TEMPERATURE};
