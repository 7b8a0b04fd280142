//! File-driven query script.
//!
//! Reads newline-delimited dish names from an input file; for each name it
//! posts the dish (so the report also works against an empty store - a
//! duplicate rejection is fine) and then looks the dish up by name,
//! appending one formatted sentence per input name to the output file.
//! Nutrition fields absent from the lookup response render as `N/A` and
//! are logged, rather than silently leaving a blank in the sentence.

use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use crate::client::{ApiClient, CreateOutcome, Lookup};
use crate::error::HarnessError;

/// Summary of a query run.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct QueryReport {
    /// Lines written to the output file (one per input name).
    pub lines_written: usize,
    /// Lookups that came back without a dish or with missing fields.
    pub lookups_degraded: usize,
}

/// Placeholder rendered when a lookup response lacks a nutrition field.
const MISSING_FIELD: &str = "N/A";

fn render(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v),
        None => MISSING_FIELD.to_string(),
    }
}

fn format_line(name: &str, cal: Option<f64>, sodium: Option<f64>, sugar: Option<f64>) -> String {
    format!(
        "{} contains {} calories, {} mgs of sodium, and {} grams of sugar",
        name,
        render(cal),
        render(sodium),
        render(sugar)
    )
}

/// Run the query script: `input` holds one dish name per line; `output`
/// is created or truncated and receives exactly one line per name.
pub async fn run(
    client: &ApiClient,
    input: &Path,
    output: &Path,
) -> Result<QueryReport, HarnessError> {
    let contents = fs::read_to_string(input).map_err(|err| HarnessError::Io {
        path: input.display().to_string(),
        details: err.to_string(),
    })?;

    let file = File::create(output).map_err(|err| HarnessError::Io {
        path: output.display().to_string(),
        details: err.to_string(),
    })?;
    let mut writer = BufWriter::new(file);
    let mut report = QueryReport::default();

    for name in contents.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match client.create_dish(name).await? {
            CreateOutcome::Created { id, .. } => {
                info!("[Query] created dish {:?} (id {:?})", name, id)
            }
            CreateOutcome::Rejected { status, rejection } => {
                // Expected when the dish already exists; the lookup below
                // still resolves it by name.
                info!(
                    "[Query] dish {:?} not created (status {}): {:?}",
                    name, status, rejection
                )
            }
        }

        let (cal, sodium, sugar) = match client.get_dish(name).await? {
            Lookup::Found(dish) => {
                if dish.cal.is_none() || dish.sodium.is_none() || dish.sugar.is_none() {
                    warn!("[Query] dish {:?} lookup missing nutrition fields", name);
                    report.lookups_degraded += 1;
                }
                (dish.cal, dish.sodium, dish.sugar)
            }
            Lookup::Missing { status, rejection } => {
                warn!(
                    "[Query] dish {:?} lookup failed (status {}): {:?}",
                    name, status, rejection
                );
                report.lookups_degraded += 1;
                (None, None, None)
            }
        };

        let line = format_line(name, cal, sodium, sugar);
        writeln!(writer, "{}", line).map_err(|err| HarnessError::Io {
            path: output.display().to_string(),
            details: err.to_string(),
        })?;
        report.lines_written += 1;
    }

    writer.flush().map_err(|err| HarnessError::Io {
        path: output.display().to_string(),
        details: err.to_string(),
    })?;

    info!(
        "[Query] wrote {} lines to {} ({} degraded)",
        report.lines_written,
        output.display(),
        report.lookups_degraded
    );
    Ok(report)
}
