//! Export module for fairshare
//!
//! Writes settlement reports so a group can keep a record of who pays whom:
//! - JSON: full report with balances, transfers and metadata
//! - CSV: transfers only (spreadsheet-compatible)

pub mod csv;
pub mod json;

pub use self::csv::export_transfers_csv;
pub use self::json::{
    export_settlement_json, import_settlement_json, BalanceEntry, SettlementReport,
    EXPORT_SCHEMA_VERSION,
};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::info;

use crate::error::{FairshareError, FairshareResult};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// JSON format (full report)
    Json,
    /// CSV format (transfers only)
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Write `report` to `writer` in the given format
pub fn write_report<W: Write>(
    report: &SettlementReport,
    format: ExportFormat,
    writer: &mut W,
) -> FairshareResult<()> {
    match format {
        ExportFormat::Json => export_settlement_json(report, writer, true),
        ExportFormat::Csv => export_transfers_csv(&report.transfers, writer),
    }
}

/// Write `report` into `dir` under a timestamped file name
///
/// Returns the path of the written file.
pub fn write_report_file(
    report: &SettlementReport,
    format: ExportFormat,
    dir: &Path,
) -> FairshareResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        FairshareError::Export(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let output = dir.join(format!(
        "settlement-{}.{}",
        report.exported_at.format("%Y%m%d-%H%M%S"),
        format.extension()
    ));
    let file = File::create(&output).map_err(|e| {
        FairshareError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;

    let mut writer = BufWriter::new(file);
    write_report(report, format, &mut writer)?;
    writer
        .flush()
        .map_err(|e| FairshareError::Export(e.to_string()))?;

    info!(path = %output.display(), ?format, "settlement exported");
    Ok(output)
}
