//! Cross-trial aggregation
//!
//! Aggregation runs once every trial has finished: per-index means need the
//! contribution of every trial at every index.
//!
//! ## Usage
//!
//! ```rust
//! use lln_sim::bits::ScriptedBitSource;
//! use lln_sim::{TrialAggregator, TrialRunner};
//!
//! let runner = TrialRunner::new(100, 0);
//! let mut source = ScriptedBitSource::alternating();
//! let records: Vec<_> = (1..=3).map(|t| runner.run_trial(t, &mut source)).collect();
//!
//! let aggregation = TrialAggregator::aggregate(&records);
//! assert_eq!(aggregation.counts().found(), 3);
//! assert_eq!(aggregation.statistics()?.mean(), 2.0);
//! # Ok::<(), lln_sim::Error>(())
//! ```

mod per_index;
mod statistics;

pub use per_index::PerIndexMean;
pub use statistics::SummaryStatistics;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::trial::TrialRecord;
use crate::{Error, Result};

/// Expected random variation of the running frequency after `flips` flips,
/// `1 / sqrt(flips)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn expected_variation(flips: usize) -> f64 {
    1.0 / (flips as f64).sqrt()
}

/// How many trials did and did not find a critical point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialCounts {
    found: usize,
    not_found: usize,
}

impl TrialCounts {
    /// Trials that found a critical point.
    #[must_use]
    pub const fn found(&self) -> usize {
        self.found
    }

    /// Trials that ran out of flips.
    #[must_use]
    pub const fn not_found(&self) -> usize {
        self.not_found
    }

    /// All trials.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.found + self.not_found
    }
}

/// Everything derived from a completed set of trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    counts: TrialCounts,
    per_index_mean: PerIndexMean,
    critical_points: Vec<u32>,
    statistics: Option<SummaryStatistics>,
}

impl Aggregation {
    /// Found / not-found counts.
    #[must_use]
    pub const fn counts(&self) -> TrialCounts {
        self.counts
    }

    /// Per-flip-index mean running frequency.
    #[must_use]
    pub const fn per_index_mean(&self) -> &PerIndexMean {
        &self.per_index_mean
    }

    /// Critical flip counts of the trials that found one, in trial order.
    #[must_use]
    pub fn critical_points(&self) -> &[u32] {
        &self.critical_points
    }

    /// Critical-point statistics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] when no trial found a critical
    /// point. Counts and per-index means remain available.
    pub fn statistics(&self) -> Result<&SummaryStatistics> {
        self.statistics.as_ref().ok_or(Error::InsufficientData {
            sample_count: 0,
            required: 1,
        })
    }
}

/// Aggregates completed trial records.
pub struct TrialAggregator {
    _private: (),
}

impl TrialAggregator {
    /// Aggregate `records` into counts, per-index means and statistics.
    #[must_use]
    pub fn aggregate(records: &[TrialRecord]) -> Aggregation {
        let critical_points: Vec<u32> = records
            .iter()
            .filter_map(TrialRecord::critical_flip_count)
            .collect();

        let counts = TrialCounts {
            found: critical_points.len(),
            not_found: records.len() - critical_points.len(),
        };

        let per_index_mean = PerIndexMean::from_records(records);

        let statistics = match SummaryStatistics::from_critical_points(&critical_points) {
            Ok(statistics) => Some(statistics),
            Err(err) => {
                warn!(trials = records.len(), "Critical-point statistics unavailable: {err}");
                None
            }
        };

        info!(
            found = counts.found,
            not_found = counts.not_found,
            longest_trial = per_index_mean.len(),
            "Aggregated trials"
        );

        Aggregation {
            counts,
            per_index_mean,
            critical_points,
            statistics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::TrialOutcome;

    #[test]
    fn test_counts_partition_trials() {
        let records = vec![
            TrialRecord::new(1, vec![1.0, 0.5], TrialOutcome::Critical { flip_count: 2 }).unwrap(),
            TrialRecord::new(2, vec![1.0, 1.0, 1.0], TrialOutcome::NoCriticalPoint).unwrap(),
        ];
        let aggregation = TrialAggregator::aggregate(&records);

        assert_eq!(aggregation.counts().found(), 1);
        assert_eq!(aggregation.counts().not_found(), 1);
        assert_eq!(aggregation.counts().total(), 2);
        assert_eq!(aggregation.critical_points(), &[2]);
    }

    #[test]
    fn test_zero_critical_points_still_aggregates() {
        let records = vec![
            TrialRecord::new(1, vec![1.0, 1.0], TrialOutcome::NoCriticalPoint).unwrap(),
            TrialRecord::new(2, vec![0.0, 0.0], TrialOutcome::NoCriticalPoint).unwrap(),
        ];
        let aggregation = TrialAggregator::aggregate(&records);

        assert_eq!(aggregation.counts().found(), 0);
        assert_eq!(aggregation.per_index_mean().values(), &[0.5, 0.5]);
        assert!(aggregation.statistics().unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_expected_variation() {
        assert!((expected_variation(1) - 1.0).abs() < f64::EPSILON);
        assert!((expected_variation(100) - 0.1).abs() < 1e-12);
    }
}
