//! PNG charts via plotters' bitmap backend
//!
//! Charts are 1200x800 and drawn with the bitmap backend so rendering works
//! without a display server.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use super::{
    dashed_segments, trial_file_name, Renderer, HISTOGRAM_FILE_NAME, SUMMARY_FILE_NAME,
};
use crate::aggregate::{expected_variation, Aggregation, SummaryStatistics};
use crate::histogram::Histogram;
use crate::trial::TrialRecord;
use crate::{Error, Result};

const CHART_SIZE: (u32, u32) = (1200, 800);
const FONT: &str = "sans-serif";
const VARIATION_FILL: RGBColor = RGBColor(255, 171, 88);

// Dash pattern in data points
const DASH_ON: usize = 6;
const DASH_OFF: usize = 4;

#[allow(clippy::needless_pass_by_value)]
fn render_err<E: std::fmt::Display>(err: E) -> Error {
    Error::Render(err.to_string())
}

/// Writes PNG charts into an output folder.
#[derive(Debug, Clone)]
pub struct PlotRenderer {
    output_folder: PathBuf,
}

impl PlotRenderer {
    /// Create a renderer writing into `output_folder`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be created.
    pub fn new(output_folder: impl Into<PathBuf>) -> Result<Self> {
        let output_folder = output_folder.into();
        fs::create_dir_all(&output_folder)?;
        Ok(Self { output_folder })
    }

    /// Folder receiving the charts.
    #[must_use]
    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    fn path_for(&self, file_name: &str) -> PathBuf {
        self.output_folder.join(file_name)
    }
}

fn as_xy(points: impl Iterator<Item = (u32, f64)>) -> Vec<(f64, f64)> {
    points.map(|(n, f)| (f64::from(n), f)).collect()
}

impl Renderer for PlotRenderer {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    fn render_trial(&mut self, trial: &TrialRecord) -> Result<()> {
        let path = self.path_for(&trial_file_name(trial.trial_index()));
        let points = as_xy(trial.points());
        let x_max = points.last().map_or(2.0, |&(x, _)| x.max(2.0));

        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Coin Flip Simulation - Trial {}", trial.trial_index()),
                (FONT, 36),
            )
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(1.0..x_max, 0.0..1.0)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Number of Flips")
            .y_desc("Probability of Heads")
            .label_style((FONT, 20))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))
            .map_err(render_err)?
            .label("Head Probability")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        let reference: Vec<(f64, f64)> = (1..=x_max as u32).map(|n| (f64::from(n), 0.5)).collect();
        let mut labelled = false;
        for segment in dashed_segments(&reference, DASH_ON, DASH_OFF) {
            let anno = chart
                .draw_series(LineSeries::new(segment, RED.stroke_width(2)))
                .map_err(render_err)?;
            if !labelled {
                anno.label("Expected Probability 0.5")
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
                labelled = true;
            }
        }

        match (trial.critical_flip_count(), trial.final_point()) {
            (Some(_), Some((flips, frequency))) => {
                let final_point = (f64::from(flips), frequency);
                chart
                    .draw_series(std::iter::once(Circle::new(final_point, 8, BLUE.filled())))
                    .map_err(render_err)?
                    .label("Final Value")
                    .legend(|(x, y)| Circle::new((x + 10, y), 5, BLUE.filled()));
                chart
                    .draw_series(std::iter::once(Text::new(
                        format!("Flips: {flips}"),
                        (final_point.0, frequency + 0.04),
                        (FONT, 20).into_font().color(&BLUE),
                    )))
                    .map_err(render_err)?;
            }
            _ => {
                root.draw(&Text::new(
                    "No final value found",
                    (CHART_SIZE.0 as i32 / 2 - 120, 70),
                    (FONT, 26).into_font().color(&RED),
                ))
                .map_err(render_err)?;
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 18))
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        info!(trial = trial.trial_index(), path = %path.display(), "Saved trial chart");
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn render_summary(&mut self, trials: &[TrialRecord], aggregation: &Aggregation) -> Result<()> {
        let path = self.path_for(SUMMARY_FILE_NAME);
        let means = aggregation.per_index_mean();
        let x_max = (means.len() as f64).max(2.0);
        let counts = aggregation.counts();

        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Coin Flip Simulation - Summary Across Trials", (FONT, 36))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(1.0..x_max, 0.0..1.0)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Number of Flips")
            .y_desc("Probability of Heads")
            .label_style((FONT, 20))
            .draw()
            .map_err(render_err)?;

        // 0.5 +/- 1/sqrt(n), clipped to the plot
        let upper = (1..=means.len()).map(|n| (n as f64, (0.5 + expected_variation(n)).min(1.0)));
        let lower = (1..=means.len())
            .rev()
            .map(|n| (n as f64, (0.5 - expected_variation(n)).max(0.0)));
        let band: Vec<(f64, f64)> = upper.chain(lower).collect();
        let band_style = VARIATION_FILL.mix(0.4).filled();
        chart
            .draw_series(std::iter::once(Polygon::new(band, band_style)))
            .map_err(render_err)?
            .label("Expected random variation")
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], band_style));

        let mut found_labelled = false;
        let mut not_found_labelled = false;
        for (i, trial) in trials.iter().enumerate() {
            let color = Palette99::pick(i).mix(0.5);
            let points = as_xy(trial.points());

            if trial.critical_found() {
                let anno = chart
                    .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(1)))
                    .map_err(render_err)?;
                if !found_labelled {
                    anno.label(format!("Individual trials (critical found: {})", counts.found()))
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
                    found_labelled = true;
                }
                if let Some(&last) = points.last() {
                    chart
                        .draw_series(std::iter::once(Circle::new(last, 4, color.filled())))
                        .map_err(render_err)?;
                }
            } else {
                for segment in dashed_segments(&points, DASH_ON, DASH_OFF) {
                    let anno = chart
                        .draw_series(LineSeries::new(segment, color.stroke_width(1)))
                        .map_err(render_err)?;
                    if !not_found_labelled {
                        anno.label(format!(
                            "Individual trials (no critical: {})",
                            counts.not_found()
                        ))
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 8, y)], color));
                        not_found_labelled = true;
                    }
                }
            }
        }

        chart
            .draw_series(LineSeries::new(
                means.points().map(|(n, m)| (n as f64, m)),
                BLUE.stroke_width(3),
            ))
            .map_err(render_err)?
            .label("Average across trials")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(3)));

        let reference = [(1.0, 0.5), (x_max, 0.5)];
        chart
            .draw_series(LineSeries::new(reference, RED.stroke_width(2)))
            .map_err(render_err)?
            .label("Expected Probability 0.5")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 16))
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        info!(path = %path.display(), "Saved summary overlay");
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn render_histogram(
        &mut self,
        critical_points: &[u32],
        statistics: &SummaryStatistics,
    ) -> Result<()> {
        let path = self.path_for(HISTOGRAM_FILE_NAME);
        let histogram = Histogram::auto(critical_points)?;
        let edges = histogram.edges();
        let (x_min, x_max) = (edges[0], edges[edges.len() - 1]);
        let y_max = histogram.max_count() as f64 + 1.0;

        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Distribution of Critical Points Across Trials", (FONT, 36))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Critical point (flip count)")
            .y_desc("Number of trials")
            .x_label_formatter(&|x| format!("{:.0}", x.round()))
            .y_label_formatter(&|y| format!("{:.0}", y.round()))
            .label_style((FONT, 20))
            .draw()
            .map_err(render_err)?;

        let bar_style = BLUE.mix(0.7).filled();
        chart
            .draw_series(
                histogram
                    .bins()
                    .map(|(lo, hi, count)| Rectangle::new([(lo, 0.0), (hi, count as f64)], bar_style)),
            )
            .map_err(render_err)?
            .label(format!("Critical points (n={})", critical_points.len()))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], bar_style));

        chart
            .draw_series(
                histogram
                    .bins()
                    .map(|(lo, hi, count)| Rectangle::new([(lo, 0.0), (hi, count as f64)], BLACK)),
            )
            .map_err(render_err)?;

        let mean = statistics.mean();
        chart
            .draw_series(LineSeries::new([(mean, 0.0), (mean, y_max)], RED.stroke_width(2)))
            .map_err(render_err)?
            .label(format!("mean = {mean:.2}"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 18))
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        info!(path = %path.display(), "Saved critical-points bar graph");
        Ok(())
    }
}
