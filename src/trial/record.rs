//! Trial Record - the full history of one trial

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How a trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrialOutcome {
    /// The running frequency entered the critical band at `flip_count`.
    Critical {
        /// Flip count at which the trial stopped.
        flip_count: u32,
    },
    /// The trial used every flip without entering the band.
    NoCriticalPoint,
}

impl TrialOutcome {
    /// Whether a critical point was found.
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self, Self::Critical { .. })
    }

    /// The critical flip count, if any.
    #[must_use]
    pub const fn flip_count(&self) -> Option<u32> {
        match self {
            Self::Critical { flip_count } => Some(*flip_count),
            Self::NoCriticalPoint => None,
        }
    }
}

/// Trial Record holds the running frequency after every flip of one trial.
///
/// `flip_counts[i] == i + 1` and `running_frequencies[i]` is the heads
/// frequency over the first `i + 1` flips. Records are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrialRecord")]
pub struct TrialRecord {
    trial_index: u32,
    flip_counts: Vec<u32>,
    running_frequencies: Vec<f64>,
    outcome: TrialOutcome,
}

/// Wire form of [`TrialRecord`], checked before it becomes one.
#[derive(Deserialize)]
struct RawTrialRecord {
    trial_index: u32,
    flip_counts: Vec<u32>,
    running_frequencies: Vec<f64>,
    outcome: TrialOutcome,
}

impl TryFrom<RawTrialRecord> for TrialRecord {
    type Error = Error;

    fn try_from(raw: RawTrialRecord) -> Result<Self> {
        let RawTrialRecord {
            trial_index,
            flip_counts,
            running_frequencies,
            outcome,
        } = raw;

        if flip_counts.len() != running_frequencies.len() {
            return Err(Error::InvalidRecord(format!(
                "trial {trial_index}: {} flip counts but {} running frequencies",
                flip_counts.len(),
                running_frequencies.len()
            )));
        }
        if !flip_counts.iter().zip(1_u32..).all(|(&n, expected)| n == expected) {
            return Err(Error::InvalidRecord(format!(
                "trial {trial_index}: flip counts are not 1..={}",
                flip_counts.len()
            )));
        }

        Self::new(trial_index, running_frequencies, outcome)
    }
}

impl TrialRecord {
    /// Build a record from a running-frequency series.
    ///
    /// Flip counts are derived as `1..=len`. Useful for feeding externally
    /// produced series into the aggregator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] if a frequency lies outside `[0, 1]`,
    /// or a critical outcome does not point at the last flip.
    pub fn new(
        trial_index: u32,
        running_frequencies: Vec<f64>,
        outcome: TrialOutcome,
    ) -> Result<Self> {
        if let Some(bad) = running_frequencies
            .iter()
            .find(|f| !(0.0..=1.0).contains(*f))
        {
            return Err(Error::InvalidRecord(format!(
                "trial {trial_index}: running frequency {bad} outside [0, 1]"
            )));
        }

        let len = u32::try_from(running_frequencies.len()).map_err(|_| {
            Error::InvalidRecord(format!("trial {trial_index}: too many flips"))
        })?;

        if let TrialOutcome::Critical { flip_count } = outcome {
            if flip_count == 0 || flip_count != len {
                return Err(Error::InvalidRecord(format!(
                    "trial {trial_index}: critical flip count {flip_count} does not match final flip {len}"
                )));
            }
        }

        Ok(Self::from_parts(
            trial_index,
            (1..=len).collect(),
            running_frequencies,
            outcome,
        ))
    }

    pub(super) fn from_parts(
        trial_index: u32,
        flip_counts: Vec<u32>,
        running_frequencies: Vec<f64>,
        outcome: TrialOutcome,
    ) -> Self {
        Self {
            trial_index,
            flip_counts,
            running_frequencies,
            outcome,
        }
    }

    /// 1-based trial index.
    #[must_use]
    pub const fn trial_index(&self) -> u32 {
        self.trial_index
    }

    /// Flip counts `1..=len`.
    #[must_use]
    pub fn flip_counts(&self) -> &[u32] {
        &self.flip_counts
    }

    /// Running heads frequency after each flip.
    #[must_use]
    pub fn running_frequencies(&self) -> &[f64] {
        &self.running_frequencies
    }

    /// Number of flips performed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flip_counts.len()
    }

    /// Whether no flip was performed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flip_counts.is_empty()
    }

    /// How the trial ended.
    #[must_use]
    pub const fn outcome(&self) -> TrialOutcome {
        self.outcome
    }

    /// Whether the trial stopped at a critical point.
    #[must_use]
    pub const fn critical_found(&self) -> bool {
        self.outcome.is_critical()
    }

    /// Critical flip count, present iff [`Self::critical_found`].
    #[must_use]
    pub const fn critical_flip_count(&self) -> Option<u32> {
        self.outcome.flip_count()
    }

    /// `(flip_count, running_frequency)` of the last flip.
    #[must_use]
    pub fn final_point(&self) -> Option<(u32, f64)> {
        Some((*self.flip_counts.last()?, *self.running_frequencies.last()?))
    }

    /// `(flip_count, running_frequency)` pairs, e.g. for plotting.
    pub fn points(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.flip_counts
            .iter()
            .copied()
            .zip(self.running_frequencies.iter().copied())
    }
}
