//! Command-line entry point for the coin-flip convergence simulation.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: 20 trials of up to 1000 flips, charts in ./plots
//! cargo run --release
//!
//! # Reproducible run without charts
//! cargo run --release -- --seed 42 --no-plots
//!
//! # Load settings from a JSON file and override the trial count
//! cargo run --release -- --config sim.json --trials 50
//! ```
//!
//! Set `RUST_LOG=lln_sim=trace` to see every flip.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lln_sim::export::write_report_json;
use lln_sim::SimulationConfig;
use lln_sim::Simulation;

/// Law of Large Numbers coin-flip simulation
#[derive(Parser, Debug)]
#[command(name = "lln-sim")]
#[command(about = "Simulate coin-flip trials and measure convergence toward 0.5")]
#[command(version)]
struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum flips per trial
    #[arg(long)]
    max_flips: Option<u32>,

    /// Number of trials
    #[arg(short, long)]
    trials: Option<u32>,

    /// Flips that must pass before a critical point may trigger
    #[arg(long)]
    threshold: Option<u32>,

    /// Lower bound of the critical band
    #[arg(long)]
    low: Option<f64>,

    /// Upper bound of the critical band
    #[arg(long)]
    high: Option<f64>,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output directory for charts and report.json
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    no_plots: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<(SimulationConfig, bool)> {
        let base = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        let band = base.band();
        let mut builder = base.into_builder().band(
            self.low.unwrap_or_else(|| band.low()),
            self.high.unwrap_or_else(|| band.high()),
        );
        if let Some(max_flips) = self.max_flips {
            builder = builder.max_flips(max_flips);
        }
        if let Some(trials) = self.trials {
            builder = builder.num_trials(trials);
        }
        if let Some(threshold) = self.threshold {
            builder = builder.threshold(threshold);
        }
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        if let Some(output) = self.output {
            builder = builder.output_folder(output);
        }

        let config = builder.build().context("invalid simulation configuration")?;
        Ok((config, !self.no_plots))
    }
}

fn init_logging(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lln_sim=info".into());

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.json_logs);

    let (config, render) = args.into_config()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        max_flips = config.max_flips(),
        trials = config.num_trials(),
        threshold = config.threshold(),
        seed = ?config.seed(),
        "Starting simulation"
    );

    let simulation = Simulation::new(config)?;
    let report = simulation.run_seeded();
    let output_folder = report.config().output_folder().to_path_buf();

    let counts = report.aggregation().counts();
    info!(
        found = counts.found(),
        not_found = counts.not_found(),
        "Trials complete"
    );

    match report.aggregation().statistics() {
        Ok(statistics) => info!("\n{statistics}"),
        Err(err) => warn!("{err}"),
    }

    write_report_json(&report, &output_folder)
        .with_context(|| format!("failed to write report to {}", output_folder.display()))?;

    if render {
        render_charts(&report, &output_folder)?;
    }

    Ok(())
}

#[cfg(feature = "render")]
fn render_charts(report: &lln_sim::SimulationReport, folder: &std::path::Path) -> anyhow::Result<()> {
    use lln_sim::render::{render_report, PlotRenderer};

    let mut renderer = PlotRenderer::new(folder)
        .with_context(|| format!("failed to create {}", folder.display()))?;
    render_report(&mut renderer, report).context("failed to render charts")?;
    info!(
        folder = %folder.display(),
        trials = report.trials().len(),
        "Saved charts"
    );
    Ok(())
}

#[cfg(not(feature = "render"))]
fn render_charts(_report: &lln_sim::SimulationReport, _folder: &std::path::Path) -> anyhow::Result<()> {
    warn!("Built without the `render` feature; skipping charts");
    Ok(())
}
