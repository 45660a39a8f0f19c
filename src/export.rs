//! JSON export of simulation reports
//!
//! Lets other visualization or analysis tools consume the raw trial data
//! without going through the renderer.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::simulation::SimulationReport;
use crate::Result;

/// File name of the exported report inside the output folder.
pub const REPORT_FILE_NAME: &str = "report.json";

#[derive(Serialize)]
struct ExportEnvelope<'a> {
    generated_at: DateTime<Utc>,
    crate_version: &'static str,
    #[serde(flatten)]
    report: &'a SimulationReport,
}

/// Serialize `report` as pretty-printed JSON with a generation timestamp.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn report_to_json(report: &SimulationReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&envelope(report))?)
}

/// Write `report` to `<folder>/report.json`, creating the folder if needed.
///
/// # Errors
///
/// Returns an error if the folder or file cannot be written.
pub fn write_report_json(report: &SimulationReport, folder: impl AsRef<Path>) -> Result<PathBuf> {
    let folder = folder.as_ref();
    fs::create_dir_all(folder)?;

    let path = folder.join(REPORT_FILE_NAME);
    let writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(writer, &envelope(report))?;

    info!(path = %path.display(), "Saved JSON report");
    Ok(path)
}

fn envelope(report: &SimulationReport) -> ExportEnvelope<'_> {
    ExportEnvelope {
        generated_at: Utc::now(),
        crate_version: env!("CARGO_PKG_VERSION"),
        report,
    }
}
