//! SA settings.

use crate::error::{Error, Result};
use crate::neighborhood::Neighborhood;

/// Configuration for a Simulated Annealing run.
///
/// Cooling is geometric: `T_{k+1} = max(cooling_rate * T_k, ε)`.
///
/// # Examples
///
/// ```
/// use tsp_anneal::neighborhood::Neighborhood;
/// use tsp_anneal::sa::SaSettings;
///
/// let settings = SaSettings::default()
///     .with_initial_temperature(500.0)
///     .with_cooling_rate(0.995)
///     .with_iterations(20_000)
///     .with_neighborhood(Neighborhood::Insert)
///     .with_reheat(1_000, 1.5);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SaSettings {
    /// Starting temperature. Must be positive.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1). Higher = slower cooling.
    pub cooling_rate: f64,

    /// Iteration budget; the run terminates when it is reached.
    pub iterations: usize,

    /// Operator used to propose candidates.
    pub neighborhood: Neighborhood,

    /// Iterations without improvement before reheating. 0 disables.
    pub reheat_interval: usize,

    /// Reheat target as a multiple of the initial temperature (>= 1).
    pub reheat_multiplier: f64,
}

impl Default for SaSettings {
    fn default() -> Self {
        Self {
            initial_temperature: 1500.0,
            cooling_rate: 0.988,
            iterations: 12_000,
            neighborhood: Neighborhood::TwoOpt,
            reheat_interval: 2_000,
            reheat_multiplier: 1.15,
        }
    }
}

impl SaSettings {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    /// Sets the reheat interval and multiplier together.
    pub fn with_reheat(mut self, interval: usize, multiplier: f64) -> Self {
        self.reheat_interval = interval;
        self.reheat_multiplier = multiplier;
        self
    }

    /// Disables reheating.
    pub fn without_reheat(mut self) -> Self {
        self.reheat_interval = 0;
        self
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(Error::invalid_settings(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if self.cooling_rate.is_nan() || self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(Error::invalid_settings(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if !self.reheat_multiplier.is_finite() || self.reheat_multiplier < 1.0 {
            return Err(Error::invalid_settings(format!(
                "reheat_multiplier must be >= 1, got {}",
                self.reheat_multiplier
            )));
        }
        Ok(())
    }
}
