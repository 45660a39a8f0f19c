//! Simulation driver - runs every trial, then aggregates
//!
//! Trials run strictly one after another against a single bit source.

use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::aggregate::{Aggregation, TrialAggregator};
use crate::bits::{RandomBitSource, SeededBitSource};
use crate::config::SimulationConfig;
use crate::histogram::Histogram;
use crate::trial::{TrialRecord, TrialRunner};
use crate::Result;

/// A validated simulation ready to run.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    runner: TrialRunner,
}

impl Simulation {
    /// Create a simulation, rejecting an invalid configuration before any
    /// trial runs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the configuration is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let runner = TrialRunner::from_config(&config);
        Ok(Self { config, runner })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run all trials with flips drawn from `source`, then aggregate.
    pub fn run<S>(&self, source: &mut S) -> SimulationReport
    where
        S: RandomBitSource + ?Sized,
    {
        let span = info_span!(
            "simulation",
            trials = self.config.num_trials(),
            max_flips = self.config.max_flips(),
            threshold = self.config.threshold()
        );
        let _guard = span.enter();

        let trials: Vec<TrialRecord> = (1..=self.config.num_trials())
            .map(|trial_index| {
                let record = self.runner.run_trial(trial_index, &mut *source);
                match record.critical_flip_count() {
                    Some(flips) => info!(trial = trial_index, flips, "Critical point reached"),
                    None => info!(
                        trial = trial_index,
                        max_flips = self.config.max_flips(),
                        "No critical point found within the flip limit"
                    ),
                }
                record
            })
            .collect();

        let aggregation = TrialAggregator::aggregate(&trials);

        SimulationReport {
            config: self.config.clone(),
            trials,
            aggregation,
        }
    }

    /// Run with a [`SeededBitSource`] built from the configured seed, or from
    /// OS entropy when no seed is set.
    #[must_use]
    pub fn run_seeded(&self) -> SimulationReport {
        let mut source = self
            .config
            .seed()
            .map_or_else(SeededBitSource::from_entropy, SeededBitSource::from_seed);
        self.run(&mut source)
    }
}

/// The outcome of a full simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    config: SimulationConfig,
    trials: Vec<TrialRecord>,
    aggregation: Aggregation,
}

impl SimulationReport {
    /// Configuration the run used.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Every trial in order.
    #[must_use]
    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    /// Cross-trial aggregation.
    #[must_use]
    pub const fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    /// Histogram of the critical points.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InsufficientData`] when no trial found a critical point.
    pub fn critical_point_histogram(&self) -> Result<Histogram> {
        Histogram::auto(self.aggregation.critical_points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::ScriptedBitSource;

    #[test]
    fn test_rejects_invalid_config() {
        let builder = SimulationConfig::default().into_builder().threshold(5000);
        assert!(builder.build().is_err());

        let unchecked: SimulationConfig =
            serde_json::from_str(r#"{"max_flips": 10, "threshold": 10}"#).unwrap();
        assert!(Simulation::new(unchecked).is_err());
    }

    #[test]
    fn test_runs_every_trial() {
        let config = SimulationConfig::builder()
            .max_flips(30)
            .num_trials(4)
            .threshold(3)
            .build()
            .unwrap();
        let report = Simulation::new(config)
            .unwrap()
            .run(&mut ScriptedBitSource::alternating());

        assert_eq!(report.trials().len(), 4);
        let indices: Vec<u32> = report.trials().iter().map(TrialRecord::trial_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
        assert!(report.trials().iter().all(|t| t.critical_flip_count() == Some(4)));
        assert_eq!(report.aggregation().counts().found(), 4);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let config = SimulationConfig::builder()
            .max_flips(200)
            .num_trials(5)
            .seed(99)
            .build()
            .unwrap();
        let simulation = Simulation::new(config).unwrap();
        assert_eq!(simulation.run_seeded(), simulation.run_seeded());
    }
}
