// Collection Report - app/report.rs
//
// One report-generation request, end to end:
//   list collection folders -> resolve selection -> aggregate -> write file.
//
// Everything the run needs arrives in `ReportRequest`; nothing is kept
// between runs. Per-item problems come back as warnings in `ReportOutcome`;
// only an unusable logs root (other than a missing one) or a failed write
// is returned as `Err`.

use crate::core::aggregate::{self, LogSource};
use crate::core::discovery;
use crate::core::export::{self, ReportFormat};
use crate::core::model::{CollectionFolder, Report, RowOrder};
use crate::util::error::{AggregationWarning, CollectionReportError, DiscoveryError, Result};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::path::PathBuf;

/// Which collections to include.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every collection folder found under the logs root.
    All,
    /// Only these names. Names with no folder are reported as warnings.
    Named(Vec<String>),
}

/// Where the report file goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Exactly this file.
    File(PathBuf),
    /// A timestamped file name inside this directory.
    Directory(PathBuf),
}

/// Inputs of a single report run.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub logs_root: PathBuf,
    pub selection: Selection,
    pub order: RowOrder,
    pub format: ReportFormat,
    pub output: OutputTarget,
}

/// Result of a successful report run.
#[derive(Debug)]
pub struct ReportOutcome {
    /// The report as written, for display.
    pub report: Report,
    /// Path of the written report file.
    pub output_path: PathBuf,
    /// Problems listing the logs root itself.
    pub discovery_warnings: Vec<String>,
    /// Per-folder, per-file and per-line problems.
    pub warnings: Vec<AggregationWarning>,
    /// Aggregation warnings dropped after the warning cap.
    pub suppressed_warnings: usize,
}

impl ReportOutcome {
    /// Total number of warnings of every kind.
    pub fn warning_count(&self) -> usize {
        self.discovery_warnings.len() + self.warnings.len() + self.suppressed_warnings
    }
}

/// Run `request` against `source`, stamping a generated file name with `now`.
pub fn generate_report<S>(
    request: &ReportRequest,
    source: &S,
    now: NaiveDateTime,
) -> Result<ReportOutcome>
where
    S: LogSource + ?Sized,
{
    tracing::info!(
        logs_root = %request.logs_root.display(),
        selection = ?request.selection,
        order = ?request.order,
        format = ?request.format,
        "Report generation starting"
    );

    let (folders, discovery_warnings) = match discovery::list_collections(&request.logs_root)
    {
        Ok(result) => result,
        Err(DiscoveryError::RootNotFound { path }) => {
            // A missing logs root is a warning: every named collection is
            // then reported as not found and the report is written empty.
            let msg = format!("Logs folder '{}' does not exist", path.display());
            tracing::debug!(warning = %msg, "Discovery warning");
            (Vec::new(), vec![msg])
        }
        Err(e) => return Err(e.into()),
    };

    let selected = resolve_selection(&request.selection, &folders)?;

    let outcome = aggregate::aggregate(&folders, &selected, request.order, source);

    let output_path = match &request.output {
        OutputTarget::File(path) => path.clone(),
        OutputTarget::Directory(dir) => {
            dir.join(export::default_report_file_name(now, request.format))
        }
    };

    if let Err(e) = export::write_report(&outcome.report, &output_path, request.format) {
        tracing::error!(error = %e, "Report could not be written");
        return Err(e.into());
    }

    Ok(ReportOutcome {
        report: outcome.report,
        output_path,
        discovery_warnings,
        warnings: outcome.warnings,
        suppressed_warnings: outcome.suppressed_warnings,
    })
}

/// Turn a `Selection` into the name set the aggregator filters on.
fn resolve_selection(
    selection: &Selection,
    folders: &[CollectionFolder],
) -> Result<HashSet<String>> {
    match selection {
        Selection::All => Ok(folders.iter().map(|f| f.name.clone()).collect()),
        Selection::Named(names) if names.is_empty() => Err(CollectionReportError::NoSelection),
        Selection::Named(names) => Ok(names.iter().cloned().collect()),
    }
}
