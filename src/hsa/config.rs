//! HSA settings.

use crate::error::{Error, Result};

/// Configuration for a Harmony Search run.
///
/// # Examples
///
/// ```
/// use tsp_anneal::hsa::HsaSettings;
///
/// let settings = HsaSettings::default()
///     .with_memory_size(32)
///     .with_hmcr(0.9)
///     .with_par(0.4)
///     .with_elite_count(4);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HsaSettings {
    /// Harmony memory size (HMS). At least 1.
    #[cfg_attr(feature = "serde", serde(rename = "hms"))]
    pub memory_size: usize,

    /// Memory consideration rate in [0, 1]: probability of recalling a
    /// memory slot instead of improvising a random tour.
    pub hmcr: f64,

    /// Pitch adjustment rate in [0, 1]: probability of perturbing a
    /// recalled tour.
    pub par: f64,

    /// Iteration budget; the run terminates when it is reached.
    pub iterations: usize,

    /// Best slots protected from replacement. Clamped to `memory_size - 1`.
    pub elite_count: usize,
}

impl Default for HsaSettings {
    fn default() -> Self {
        Self {
            memory_size: 24,
            hmcr: 0.93,
            par: 0.32,
            iterations: 10_000,
            elite_count: 2,
        }
    }
}

impl HsaSettings {
    pub fn with_memory_size(mut self, n: usize) -> Self {
        self.memory_size = n;
        self
    }

    pub fn with_hmcr(mut self, rate: f64) -> Self {
        self.hmcr = rate;
        self
    }

    pub fn with_par(mut self, rate: f64) -> Self {
        self.par = rate;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    /// Validates the settings.
    ///
    /// An oversized `elite_count` is not an error; it is clamped when the
    /// memory is built.
    pub fn validate(&self) -> Result<()> {
        if self.memory_size == 0 {
            return Err(Error::invalid_settings("memory_size must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.hmcr) {
            return Err(Error::invalid_settings(format!(
                "hmcr must be in [0, 1], got {}",
                self.hmcr
            )));
        }
        if !(0.0..=1.0).contains(&self.par) {
            return Err(Error::invalid_settings(format!(
                "par must be in [0, 1], got {}",
                self.par
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = HsaSettings::default();
        assert_eq!(settings.memory_size, 24);
        assert!((settings.hmcr - 0.93).abs() < 1e-12);
        assert!((settings.par - 0.32).abs() < 1e-12);
        assert_eq!(settings.iterations, 10_000);
        assert_eq!(settings.elite_count, 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_memory_size() {
        assert!(HsaSettings::default().with_memory_size(0).validate().is_err());
        assert!(HsaSettings::default().with_memory_size(1).validate().is_ok());
    }

    #[test]
    fn test_validate_rates() {
        for rate in [-0.1, 1.1, f64::NAN] {
            assert!(HsaSettings::default().with_hmcr(rate).validate().is_err());
            assert!(HsaSettings::default().with_par(rate).validate().is_err());
        }
        assert!(HsaSettings::default().with_hmcr(0.0).with_par(1.0).validate().is_ok());
    }

    #[test]
    fn test_oversized_elite_is_valid() {
        let settings = HsaSettings::default().with_memory_size(3).with_elite_count(10);
        assert!(settings.validate().is_ok());
    }
}
