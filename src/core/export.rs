// Collection Report - core/export.rs
//
// CSV and JSON serialisation of a collection report.
//
// `export_csv` / `export_json` write to any Write trait object.
// `write_report` owns the destination file: it writes a sibling temp file
// and renames it into place, so a failed write never leaves a truncated
// report behind and never clobbers the previous report at that path.

use crate::core::model::{CollectionReportRow, Report};
use crate::util::constants;
use crate::util::error::ExportError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Output format of a written report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    /// File extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    /// Parse a config/CLI value. Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// File name for a report generated at `timestamp`,
/// e.g. `collections_report_20240131T084500.csv`.
pub fn default_report_file_name(timestamp: NaiveDateTime, format: ReportFormat) -> String {
    format!(
        "{}_{}.{}",
        constants::REPORT_FILE_PREFIX,
        timestamp.format(constants::REPORT_TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// Export a report to CSV format.
///
/// Writes the header `Collection,Processed Movies,Missing Movies` followed by
/// one record per row. Names containing commas or quotes are quoted by the
/// csv writer. Returns the number of rows written.
pub fn export_csv<W: Write>(
    report: &Report,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            constants::CSV_COLUMN_COLLECTION,
            constants::CSV_COLUMN_PROCESSED,
            constants::CSV_COLUMN_MISSING,
        ])
        .map_err(csv_err)?;

    let mut count = 0;
    for row in &report.rows {
        let processed = row.processed.to_string();
        let missing = row.missing.to_string();
        csv_writer
            .write_record([row.collection.as_str(), processed.as_str(), missing.as_str()])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export a report to JSON format (array of row objects).
pub fn export_json<W: Write>(
    report: &Report,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, &report.rows).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(report.len())
}

/// Re-read a CSV report written by `export_csv`.
///
/// The header row is skipped; records are read positionally as
/// (collection, processed, missing).
pub fn import_csv<R: Read>(reader: R, source_path: &Path) -> Result<Report, ExportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<(String, u64, u64)>() {
        let (collection, processed, missing) = record.map_err(|e| ExportError::Csv {
            path: source_path.to_path_buf(),
            source: e,
        })?;
        rows.push(CollectionReportRow {
            collection,
            processed,
            missing,
        });
    }

    Ok(Report { rows })
}

/// Write `report` to `destination` in `format`.
///
/// The destination's parent directory must already exist. Returns the number
/// of rows written.
pub fn write_report(
    report: &Report,
    destination: &Path,
    format: ReportFormat,
) -> Result<usize, ExportError> {
    let tmp = temp_path_for(destination);
    let io_err = |path: &Path, e: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let written = File::create(&tmp)
        .map_err(|e| io_err(&tmp, e))
        .and_then(|file| {
            let mut out = BufWriter::new(file);
            let count = match format {
                ReportFormat::Csv => export_csv(report, &mut out, destination)?,
                ReportFormat::Json => export_json(report, &mut out, destination)?,
            };
            out.flush().map_err(|e| io_err(&tmp, e))?;
            Ok(count)
        });

    let count = match written {
        Ok(count) => count,
        Err(e) => {
            // Clean up the temp file on failure; ignore any secondary error.
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
    };

    std::fs::rename(&tmp, destination).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        io_err(destination, e)
    })?;

    tracing::info!(
        path = %destination.display(),
        rows = count,
        format = ?format,
        "Report written"
    );
    Ok(count)
}

/// `report.csv` -> `report.csv.tmp`, in the same directory so the final
/// rename never crosses filesystems.
fn temp_path_for(destination: &Path) -> PathBuf {
    let mut name: OsString = destination.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
