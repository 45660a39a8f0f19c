//! Rendering of simulation results
//!
//! The simulation core hands plain data to a [`Renderer`]; nothing in the core
//! depends on this module. [`PlotRenderer`] (feature `render`) draws PNG charts
//! with plotters.
//!
//! ## Artifacts
//!
//! ```text
//! <output_folder>/
//!   trial_01.png ... trial_NN.png   one chart per trial
//!   summary.png                     every trial + per-index mean
//!   critical_points_graph.png       histogram of critical points
//! ```

#[cfg(feature = "render")]
mod plot;

#[cfg(feature = "render")]
pub use plot::PlotRenderer;

use tracing::warn;

use crate::aggregate::{Aggregation, SummaryStatistics};
use crate::simulation::SimulationReport;
use crate::trial::TrialRecord;
use crate::Result;

/// File name of the cross-trial summary chart.
pub const SUMMARY_FILE_NAME: &str = "summary.png";
/// File name of the critical-point histogram.
pub const HISTOGRAM_FILE_NAME: &str = "critical_points_graph.png";

/// File name of the chart for trial `trial_index`, zero-padded to two digits.
#[must_use]
pub fn trial_file_name(trial_index: u32) -> String {
    format!("trial_{trial_index:02}.png")
}

/// Consumer of simulation output.
pub trait Renderer {
    /// Draw one trial's running frequency.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be produced.
    fn render_trial(&mut self, trial: &TrialRecord) -> Result<()>;

    /// Draw all trials together with the per-index mean.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be produced.
    fn render_summary(&mut self, trials: &[TrialRecord], aggregation: &Aggregation) -> Result<()>;

    /// Draw the distribution of critical points.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be produced.
    fn render_histogram(
        &mut self,
        critical_points: &[u32],
        statistics: &SummaryStatistics,
    ) -> Result<()>;
}

/// Feed a whole report to `renderer`: every trial, the summary, then the
/// histogram. The histogram is skipped when no trial found a critical point.
///
/// # Errors
///
/// Propagates the first renderer error.
pub fn render_report<R>(renderer: &mut R, report: &SimulationReport) -> Result<()>
where
    R: Renderer + ?Sized,
{
    for trial in report.trials() {
        renderer.render_trial(trial)?;
    }

    let aggregation = report.aggregation();
    renderer.render_summary(report.trials(), aggregation)?;

    match aggregation.statistics() {
        Ok(statistics) => renderer.render_histogram(aggregation.critical_points(), statistics),
        Err(err) if err.is_insufficient_data() => {
            warn!("Skipping critical-point histogram: {err}");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Split a polyline into alternating drawn segments of `on` points separated
/// by `off` skipped points, for dashed strokes.
#[cfg_attr(not(feature = "render"), allow(dead_code))]
fn dashed_segments<T: Copy>(points: &[T], on: usize, off: usize) -> Vec<Vec<T>> {
    if on < 2 {
        return vec![points.to_vec()];
    }
    let period = on + off;
    let mut segments = Vec::new();
    let mut start = 0;
    while start < points.len() {
        let end = (start + on).min(points.len());
        if end - start >= 2 {
            segments.push(points[start..end].to_vec());
        }
        start += period;
    }
    segments
}
