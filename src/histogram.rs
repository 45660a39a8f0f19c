//! Automatic histogram binning for critical points
//!
//! Bin width follows the "auto" rule used by common plotting stacks: the
//! smaller of the Freedman-Diaconis and Sturges widths, falling back to
//! Sturges when the interquartile range is zero.
//!
//! References:
//! - Freedman & Diaconis (1981): On the histogram as a density estimator
//! - Sturges (1926): The choice of a class interval

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Upper limit on the number of bins.
pub const MAX_BINS: usize = 1_000;

/// Equal-width bins over a set of critical points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` with automatically chosen equal-width bins.
    ///
    /// The bin count never exceeds the value range or [`MAX_BINS`].
    ///
    /// Bin `i` covers `[edges[i], edges[i + 1])`; the last bin also includes
    /// its upper edge. When all values are equal a single unit-wide bin is
    /// centred on the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] if `values` is empty.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn auto(values: &[u32]) -> Result<Self> {
        let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
            return Err(Error::InsufficientData {
                sample_count: 0,
                required: 1,
            });
        };

        let (mut first, mut last) = (f64::from(min), f64::from(max));
        if min == max {
            first -= 0.5;
            last += 0.5;
        }

        // Values are integers, so bins narrower than one flip are never needed
        let range = last - first;
        let max_bins = (range.ceil() as usize).clamp(1, MAX_BINS);
        let width = auto_bin_width(values);
        let bin_count = if width > 0.0 {
            ((range / width).ceil() as usize).clamp(1, max_bins)
        } else {
            1
        };

        let step = (last - first) / bin_count as f64;
        let edges: Vec<f64> = (0..=bin_count)
            .map(|i| if i == bin_count { last } else { (i as f64).mul_add(step, first) })
            .collect();

        let mut counts = vec![0_usize; bin_count];
        for &value in values {
            let offset = (f64::from(value) - first) / step;
            let bin = (offset.floor() as usize).min(bin_count - 1);
            counts[bin] += 1;
        }

        Ok(Self { edges, counts })
    }

    /// Bin edges, one more than the number of bins.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of values per bin.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of bins.
    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// Tallest bin.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(lower_edge, upper_edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter().copied())
            .map(|(edge, count)| (edge[0], edge[1], count))
    }
}

#[allow(clippy::cast_precision_loss)]
fn auto_bin_width(values: &[u32]) -> f64 {
    let n = values.len() as f64;
    let mut sorted: Vec<f64> = values.iter().copied().map(f64::from).collect();
    sorted.sort_by(f64::total_cmp);

    let range = sorted[sorted.len() - 1] - sorted[0];
    let sturges = range / (n.log2() + 1.0);

    let iqr = percentile(&sorted, 0.75) - percentile(&sorted, 0.25);
    let freedman_diaconis = 2.0 * iqr * n.powf(-1.0 / 3.0);

    if freedman_diaconis > 0.0 {
        freedman_diaconis.min(sturges)
    } else {
        sturges
    }
}

/// Linear-interpolation percentile of sorted data, `q` in `[0, 1]`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    (sorted[upper] - sorted[lower]).mul_add(fraction, sorted[lower])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_cover_every_value() {
        let values = [22, 24, 30, 30, 46, 58, 90, 134, 210, 400];
        let histogram = Histogram::auto(&values).unwrap();

        assert_eq!(histogram.counts().iter().sum::<usize>(), values.len());
        assert_eq!(histogram.edges().len(), histogram.bin_count() + 1);
        assert!((histogram.edges()[0] - 22.0).abs() < 1e-9);
        assert!((histogram.edges()[histogram.bin_count()] - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_maximum_lands_in_last_bin() {
        let histogram = Histogram::auto(&[10, 20, 30]).unwrap();
        assert_eq!(*histogram.counts().last().unwrap(), 1);
    }

    #[test]
    fn test_identical_values_single_bin() {
        let histogram = Histogram::auto(&[42, 42, 42]).unwrap();
        assert_eq!(histogram.bin_count(), 1);
        assert_eq!(histogram.counts(), &[3]);
        assert_eq!(histogram.edges(), &[41.5, 42.5]);
    }

    #[test]
    fn test_far_outlier_caps_bin_count() {
        let values = [1, 2, 2, 3, 4_000_000_000];
        let histogram = Histogram::auto(&values).unwrap();

        assert_eq!(histogram.bin_count(), MAX_BINS);
        assert_eq!(histogram.counts().iter().sum::<usize>(), values.len());
        assert_eq!(histogram.counts()[0], 4);
        assert_eq!(*histogram.counts().last().unwrap(), 1);
    }

    #[test]
    fn test_narrow_range_caps_bins_at_range() {
        let histogram = Histogram::auto(&[10, 11, 11, 11, 12]).unwrap();
        assert!(histogram.bin_count() <= 2);
        assert_eq!(histogram.counts().iter().sum::<usize>(), 5);
    }

    #[test]
    fn test_empty_is_insufficient_data() {
        assert!(Histogram::auto(&[]).unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&sorted, 0.25) - 1.75).abs() < 1e-12);
        assert!((percentile(&sorted, 0.75) - 3.25).abs() < 1e-12);
    }
}
