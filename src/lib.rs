//! # lln-sim: Law of Large Numbers Coin-Flip Simulator
//!
//! **Version**: 0.1.0
//!
//! lln-sim flips a virtual fair coin over many independent trials and
//! watches the running heads frequency converge toward 0.5. Each trial stops
//! at its *critical point*: the first flip count beyond a threshold at which
//! the running frequency falls strictly inside a narrow band around 0.5.
//! Trials are then aggregated into per-flip-index means and critical-point
//! statistics.
//!
//! ## Pipeline
//!
//! ```text
//! RandomBitSource ──> TrialRunner (x num_trials) ──> Vec<TrialRecord>
//!                                                        │
//!                                                        v
//!                     Renderer <── Aggregation <── TrialAggregator
//! ```
//!
//! The computational core (`bits`, `trial`, `aggregate`) is pure data and
//! never depends on the `render` module. PNG output lives behind the
//! `render` feature (on by default).
//!
//! ## Example Usage
//!
//! ```rust
//! use lln_sim::bits::SeededBitSource;
//! use lln_sim::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::builder()
//!     .max_flips(500)
//!     .num_trials(5)
//!     .threshold(10)
//!     .build()?;
//!
//! let simulation = Simulation::new(config)?;
//! let report = simulation.run(&mut SeededBitSource::from_seed(7));
//!
//! let counts = report.aggregation().counts();
//! assert_eq!(counts.total(), 5);
//! # Ok::<(), lln_sim::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregate;
pub mod bits;
pub mod config;
pub mod error;
pub mod export;
pub mod histogram;
pub mod render;
pub mod simulation;
pub mod trial;

pub use aggregate::{Aggregation, PerIndexMean, SummaryStatistics, TrialAggregator, TrialCounts};
pub use config::{CriticalBand, SimulationConfig, SimulationConfigBuilder};
pub use error::{Error, Result};
pub use simulation::{Simulation, SimulationReport};
pub use trial::{TrialOutcome, TrialRecord, TrialRunner};
