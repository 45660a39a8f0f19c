//! Per-flip-index mean across trials of differing lengths

use serde::{Deserialize, Serialize};

use crate::trial::TrialRecord;

/// Cross-trial mean running frequency at each flip index.
///
/// The value for flip `n` averages only the trials that actually reached
/// flip `n`. Trials that stopped early drop out of later indices; nothing is
/// padded or forward-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerIndexMean {
    means: Vec<f64>,
}

impl PerIndexMean {
    /// Compute per-index means over `records`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_records(records: &[TrialRecord]) -> Self {
        let longest = records.iter().map(TrialRecord::len).max().unwrap_or(0);
        let mut sums = vec![0.0_f64; longest];
        let mut contributors = vec![0_usize; longest];

        for record in records {
            for (i, frequency) in record.running_frequencies().iter().enumerate() {
                sums[i] += frequency;
                contributors[i] += 1;
            }
        }

        // The longest trial covers every index, so no divisor is zero
        let means = sums
            .into_iter()
            .zip(contributors)
            .map(|(sum, count)| sum / count as f64)
            .collect();

        Self { means }
    }

    /// Means in flip order; element `n - 1` belongs to flip `n`.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.means
    }

    /// Mean at 1-based flip index `flip`.
    #[must_use]
    pub fn at(&self, flip: usize) -> Option<f64> {
        flip.checked_sub(1).and_then(|i| self.means.get(i).copied())
    }

    /// Longest trial length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.means.len()
    }

    /// Whether there were no flips at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Flip indices `1..=len` covered by the means.
    pub fn flip_indices(&self) -> impl Iterator<Item = usize> {
        1..=self.means.len()
    }

    /// `(flip_index, mean)` pairs starting at flip 1.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.means.iter().enumerate().map(|(i, &m)| (i + 1, m))
    }
}
