//! Trial Runner - flips until the critical band or the flip cap is reached

use tracing::{debug, trace};

use super::{TrialOutcome, TrialRecord};
use crate::bits::RandomBitSource;
use crate::config::{CriticalBand, SimulationConfig};

/// Runs individual trials with fixed stopping parameters.
///
/// A trial stops at the first flip `n` with `n > threshold` whose running
/// frequency lies strictly inside the critical band. Otherwise it runs all
/// `max_flips` flips and reports [`TrialOutcome::NoCriticalPoint`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialRunner {
    max_flips: u32,
    threshold: u32,
    band: CriticalBand,
}

impl TrialRunner {
    /// Create a runner using the default critical band.
    #[must_use]
    pub fn new(max_flips: u32, threshold: u32) -> Self {
        Self {
            max_flips,
            threshold,
            band: CriticalBand::default(),
        }
    }

    /// Create a runner from a simulation configuration.
    #[must_use]
    pub const fn from_config(config: &SimulationConfig) -> Self {
        Self {
            max_flips: config.max_flips(),
            threshold: config.threshold(),
            band: config.band(),
        }
    }

    /// Replace the critical band.
    #[must_use]
    pub const fn with_band(mut self, band: CriticalBand) -> Self {
        self.band = band;
        self
    }

    /// Maximum number of flips per trial.
    #[must_use]
    pub const fn max_flips(&self) -> u32 {
        self.max_flips
    }

    /// Flip count that must be exceeded before stopping.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Critical band.
    #[must_use]
    pub const fn band(&self) -> CriticalBand {
        self.band
    }

    /// Run one trial, drawing flips from `source`.
    ///
    /// Never fails: a trial that never reaches the band is a valid outcome.
    pub fn run_trial<S>(&self, trial_index: u32, source: &mut S) -> TrialRecord
    where
        S: RandomBitSource + ?Sized,
    {
        let capacity = usize::try_from(self.max_flips).unwrap_or(0);
        let mut flip_counts = Vec::with_capacity(capacity);
        let mut running_frequencies = Vec::with_capacity(capacity);

        let mut heads: u32 = 0;
        let mut flips: u32 = 0;
        let mut outcome = TrialOutcome::NoCriticalPoint;

        while flips < self.max_flips {
            flips += 1;
            if source.next_bit() {
                heads += 1;
            }

            let frequency = f64::from(heads) / f64::from(flips);
            flip_counts.push(flips);
            running_frequencies.push(frequency);

            if flips > self.threshold && self.band.contains(frequency) {
                debug!(
                    trial = trial_index,
                    flips,
                    frequency,
                    "Critical point reached"
                );
                outcome = TrialOutcome::Critical { flip_count: flips };
                break;
            }
            trace!(trial = trial_index, flip = flips, frequency, "Coin flip");
        }

        if !outcome.is_critical() {
            debug!(
                trial = trial_index,
                max_flips = self.max_flips,
                "No critical point found"
            );
        }

        TrialRecord::from_parts(trial_index, flip_counts, running_frequencies, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::ScriptedBitSource;

    #[test]
    fn test_alternating_stops_at_flip_two() {
        let runner = TrialRunner::new(100, 0);
        let record = runner.run_trial(1, &mut ScriptedBitSource::alternating());

        assert_eq!(record.flip_counts(), &[1, 2]);
        assert_eq!(record.running_frequencies(), &[1.0, 0.5]);
        assert_eq!(record.critical_flip_count(), Some(2));
    }

    #[test]
    fn test_threshold_defers_to_next_even_flip() {
        let runner = TrialRunner::new(100, 2);
        let record = runner.run_trial(1, &mut ScriptedBitSource::alternating());
        assert_eq!(record.critical_flip_count(), Some(4));

        let runner = TrialRunner::new(100, 5);
        let record = runner.run_trial(1, &mut ScriptedBitSource::alternating());
        assert_eq!(record.critical_flip_count(), Some(6));
    }

    #[test]
    fn test_exhausts_max_flips_without_critical_point() {
        let runner = TrialRunner::new(50, 10);
        let record = runner.run_trial(3, &mut ScriptedBitSource::always_heads());

        assert!(!record.critical_found());
        assert_eq!(record.len(), 50);
        assert!(record.running_frequencies().iter().all(|&f| (f - 1.0).abs() < f64::EPSILON));
        assert_eq!(record.trial_index(), 3);
    }

    #[test]
    fn test_custom_band() {
        let band = CriticalBand::new(0.6, 0.7).unwrap();
        let runner = TrialRunner::new(100, 0).with_band(band);
        // H H T: 1.0, 1.0, 0.667
        let record = runner.run_trial(1, &mut ScriptedBitSource::new(vec![true, true, false]));
        assert_eq!(record.critical_flip_count(), Some(3));
    }
}
