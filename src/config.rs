//! Simulation configuration
//!
//! All parameters are validated up front so that a bad configuration fails
//! before a single coin is flipped.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default number of flips per trial.
pub const DEFAULT_MAX_FLIPS: u32 = 1000;
/// Default number of trials.
pub const DEFAULT_NUM_TRIALS: u32 = 20;
/// Default number of flips that must pass before a critical point may trigger.
pub const DEFAULT_THRESHOLD: u32 = 20;
/// Default output folder for rendered artifacts.
pub const DEFAULT_OUTPUT_FOLDER: &str = "plots";
/// Default lower bound of the critical band.
pub const DEFAULT_LOW_BOUND: f64 = 0.49999;
/// Default upper bound of the critical band.
pub const DEFAULT_HIGH_BOUND: f64 = 0.50001;

/// Open interval `(low, high)` around 0.5 used to detect convergence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalBand {
    low: f64,
    high: f64,
}

impl CriticalBand {
    /// Create a band from its bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a bound is not finite, lies
    /// outside `[0, 1]`, or `low >= high`.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let band = Self { low, high };
        band.validate()?;
        Ok(band)
    }

    /// Lower (exclusive) bound.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Upper (exclusive) bound.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Whether `frequency` lies strictly inside the band.
    #[must_use]
    pub fn contains(&self, frequency: f64) -> bool {
        self.low < frequency && frequency < self.high
    }

    fn validate(&self) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "critical band bounds must be finite (low={}, high={})",
                self.low, self.high
            )));
        }
        if !(0.0..=1.0).contains(&self.low) || !(0.0..=1.0).contains(&self.high) {
            return Err(Error::InvalidConfiguration(format!(
                "critical band bounds must lie within [0, 1] (low={}, high={})",
                self.low, self.high
            )));
        }
        if self.low >= self.high {
            return Err(Error::InvalidConfiguration(format!(
                "critical band low bound {} must be below high bound {}",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

impl Default for CriticalBand {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_BOUND,
            high: DEFAULT_HIGH_BOUND,
        }
    }
}

/// Parameters of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    max_flips: u32,
    num_trials: u32,
    threshold: u32,
    output_folder: PathBuf,
    band: CriticalBand,
    seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_flips: DEFAULT_MAX_FLIPS,
            num_trials: DEFAULT_NUM_TRIALS,
            threshold: DEFAULT_THRESHOLD,
            output_folder: PathBuf::from(DEFAULT_OUTPUT_FOLDER),
            band: CriticalBand::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a builder starting from the default configuration.
    #[must_use]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// describes an invalid configuration.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Turn this configuration back into a builder, e.g. to apply overrides.
    #[must_use]
    pub fn into_builder(self) -> SimulationConfigBuilder {
        SimulationConfigBuilder { config: self }
    }

    /// Maximum number of flips per trial.
    #[must_use]
    pub const fn max_flips(&self) -> u32 {
        self.max_flips
    }

    /// Number of trials to run.
    #[must_use]
    pub const fn num_trials(&self) -> u32 {
        self.num_trials
    }

    /// Flip count that must be exceeded before a critical point can trigger.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Folder receiving rendered artifacts and the JSON report.
    #[must_use]
    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    /// Critical band.
    #[must_use]
    pub const fn band(&self) -> CriticalBand {
        self.band
    }

    /// Seed for the bit source, if the run should be reproducible.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when:
    /// - `max_flips` or `num_trials` is zero
    /// - `threshold >= max_flips` (no critical point could ever trigger)
    /// - the critical band is malformed
    pub fn validate(&self) -> Result<()> {
        if self.max_flips == 0 {
            return Err(Error::InvalidConfiguration(
                "max_flips must be at least 1".to_string(),
            ));
        }
        if self.num_trials == 0 {
            return Err(Error::InvalidConfiguration(
                "num_trials must be at least 1".to_string(),
            ));
        }
        if self.threshold >= self.max_flips {
            return Err(Error::InvalidConfiguration(format!(
                "threshold {} must be below max_flips {}",
                self.threshold, self.max_flips
            )));
        }
        self.band.validate()
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Debug, Default)]
pub struct SimulationConfigBuilder {
    config: SimulationConfig,
}

impl SimulationConfigBuilder {
    /// Set the maximum number of flips per trial.
    #[must_use]
    pub fn max_flips(mut self, max_flips: u32) -> Self {
        self.config.max_flips = max_flips;
        self
    }

    /// Set the number of trials.
    #[must_use]
    pub fn num_trials(mut self, num_trials: u32) -> Self {
        self.config.num_trials = num_trials;
        self
    }

    /// Set the threshold.
    #[must_use]
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set the output folder.
    #[must_use]
    pub fn output_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.config.output_folder = folder.into();
        self
    }

    /// Set the critical band bounds. Checked in [`Self::build`].
    #[must_use]
    pub fn band(mut self, low: f64, high: f64) -> Self {
        self.config.band = CriticalBand { low, high };
        self
    }

    /// Seed the bit source.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if any parameter is out of range.
    pub fn build(self) -> Result<SimulationConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_flips(), 1000);
        assert_eq!(config.num_trials(), 20);
        assert_eq!(config.threshold(), 20);
        assert_eq!(config.output_folder(), Path::new("plots"));
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn test_band_contains_is_open_interval() {
        let band = CriticalBand::new(0.4, 0.6).unwrap();
        assert!(band.contains(0.5));
        assert!(!band.contains(0.4));
        assert!(!band.contains(0.6));
    }

    #[test]
    fn test_band_rejects_inverted_bounds() {
        assert!(CriticalBand::new(0.6, 0.4).is_err());
        assert!(CriticalBand::new(0.5, 0.5).is_err());
    }

    #[test]
    fn test_band_rejects_out_of_range_bounds() {
        assert!(CriticalBand::new(-0.1, 0.5).is_err());
        assert!(CriticalBand::new(0.5, 1.5).is_err());
        assert!(CriticalBand::new(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_partial_band_json_uses_default_bound() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"band": {"low": 0.4}}"#).unwrap();
        assert!((config.band().low() - 0.4).abs() < f64::EPSILON);
        assert!((config.band().high() - DEFAULT_HIGH_BOUND).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());

        let config: SimulationConfig = serde_json::from_str(r#"{"band": {}}"#).unwrap();
        assert_eq!(config.band(), CriticalBand::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig = serde_json::from_str(r#"{"num_trials": 3}"#).unwrap();
        assert_eq!(config.num_trials(), 3);
        assert_eq!(config.max_flips(), DEFAULT_MAX_FLIPS);
    }
}
