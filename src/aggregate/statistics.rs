//! Descriptive statistics over critical points

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Mean, median, spread and extrema of the critical flip counts.
///
/// Built only from trials that found a critical point. Dispersion needs at
/// least two samples; with a single sample [`Self::std_dev`] and
/// [`Self::std_error`] report [`Error::InsufficientData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    sample_count: usize,
    mean: f64,
    median: f64,
    std_dev: Option<f64>,
    std_error: Option<f64>,
    min: u32,
    max: u32,
}

impl SummaryStatistics {
    /// Compute statistics over critical flip counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] if `critical_points` is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lln_sim::SummaryStatistics;
    ///
    /// let stats = SummaryStatistics::from_critical_points(&[10, 20, 30])?;
    /// assert_eq!(stats.mean(), 20.0);
    /// assert_eq!(stats.std_dev()?, 10.0);
    /// # Ok::<(), lln_sim::Error>(())
    /// ```
    #[allow(clippy::cast_precision_loss)]
    pub fn from_critical_points(critical_points: &[u32]) -> Result<Self> {
        let sample_count = critical_points.len();
        let (Some(&min), Some(&max)) = (
            critical_points.iter().min(),
            critical_points.iter().max(),
        ) else {
            return Err(Error::InsufficientData {
                sample_count,
                required: 1,
            });
        };

        let n = sample_count as f64;
        let mean = critical_points.iter().copied().map(f64::from).sum::<f64>() / n;

        let mut sorted = critical_points.to_vec();
        sorted.sort_unstable();
        let mid = sample_count / 2;
        let median = if sample_count % 2 == 0 {
            (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
        } else {
            f64::from(sorted[mid])
        };

        // Bessel's correction: divide by n - 1
        let std_dev = (sample_count >= 2).then(|| {
            let squared: f64 = critical_points
                .iter()
                .map(|&x| (f64::from(x) - mean).powi(2))
                .sum();
            (squared / (n - 1.0)).sqrt()
        });
        let std_error = std_dev.map(|sd| sd / n.sqrt());

        Ok(Self {
            sample_count,
            mean,
            median,
            std_dev,
            std_error,
            min,
            max,
        })
    }

    /// Number of critical points the statistics were computed from.
    #[must_use]
    pub const fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Arithmetic mean.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Median (mean of the two middle values for even counts).
    #[must_use]
    pub const fn median(&self) -> f64 {
        self.median
    }

    /// Sample standard deviation (n - 1 denominator).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] with fewer than two samples.
    pub fn std_dev(&self) -> Result<f64> {
        match self.std_dev {
            Some(sd) => Ok(sd),
            None => Err(self.needs_two()),
        }
    }

    /// Standard error of the mean, `std_dev / sqrt(n)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] with fewer than two samples.
    pub fn std_error(&self) -> Result<f64> {
        match self.std_error {
            Some(se) => Ok(se),
            None => Err(self.needs_two()),
        }
    }

    /// Smallest critical point.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Largest critical point.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    fn needs_two(&self) -> Error {
        Error::InsufficientData {
            sample_count: self.sample_count,
            required: 2,
        }
    }
}

impl fmt::Display for SummaryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Critical-point stats over {} trials:", self.sample_count)?;
        writeln!(f, "  mean = {:.2}", self.mean)?;
        writeln!(f, "  median = {:.2}", self.median)?;
        match self.std_dev {
            Some(sd) => writeln!(f, "  standard deviation = {sd:.2}")?,
            None => writeln!(f, "  standard deviation = n/a")?,
        }
        match self.std_error {
            Some(se) => writeln!(f, "  standard error = {se:.2}")?,
            None => writeln!(f, "  standard error = n/a")?,
        }
        write!(f, "  min = {}, max = {}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bessel_corrected_std_dev() {
        let stats = SummaryStatistics::from_critical_points(&[10, 20, 30]).unwrap();
        assert_eq!(stats.sample_count(), 3);
        assert!((stats.mean() - 20.0).abs() < 1e-12);
        assert!((stats.median() - 20.0).abs() < 1e-12);
        assert!((stats.std_dev().unwrap() - 10.0).abs() < 1e-12);
        assert!((stats.std_error().unwrap() - 10.0 / 3f64.sqrt()).abs() < 1e-12);
        assert!((stats.std_error().unwrap() - 5.7735).abs() < 1e-4);
        assert_eq!(stats.min(), 10);
        assert_eq!(stats.max(), 30);
    }

    #[test]
    fn test_even_count_median_averages_middle_values() {
        let stats = SummaryStatistics::from_critical_points(&[40, 22, 100, 30]).unwrap();
        assert!((stats.median() - 35.0).abs() < 1e-12);
        assert!((stats.mean() - 48.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_is_insufficient_data() {
        let err = SummaryStatistics::from_critical_points(&[]).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientData {
                sample_count: 0,
                required: 1
            }
        ));
    }

    #[test]
    fn test_single_sample_has_no_dispersion() {
        let stats = SummaryStatistics::from_critical_points(&[42]).unwrap();
        assert!((stats.mean() - 42.0).abs() < 1e-12);
        assert!((stats.median() - 42.0).abs() < 1e-12);
        assert!(stats.std_dev().unwrap_err().is_insufficient_data());
        assert!(stats.std_error().unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_display_matches_report_layout() {
        let stats = SummaryStatistics::from_critical_points(&[10, 20, 30]).unwrap();
        let text = stats.to_string();
        assert!(text.contains("over 3 trials"));
        assert!(text.contains("mean = 20.00"));
        assert!(text.contains("standard error = 5.77"));
        assert!(text.contains("min = 10, max = 30"));

        let single = SummaryStatistics::from_critical_points(&[7]).unwrap();
        assert!(single.to_string().contains("standard deviation = n/a"));
    }
}
