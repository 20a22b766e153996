// Collection Report - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. All errors preserve the causal chain
// for diagnostic logging.
//
// Two tiers:
//   - Fatal errors (`CollectionReportError` and its subsystem enums) abort
//     a report-generation request and are returned as `Err`.
//   - Non-fatal `AggregationWarning`s are collected alongside the report and
//     never abort aggregation.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all report operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CollectionReportError {
    /// Listing collection folders failed.
    Discovery(DiscoveryError),

    /// Writing the report failed.
    Export(ExportError),

    /// No logs folder was given on the command line or in config.toml.
    NoLogsFolder,

    /// The request selected no collections at all.
    NoSelection,
}

impl fmt::Display for CollectionReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::NoLogsFolder => write!(
                f,
                "No logs folder given. Pass one on the command line or set \
                 [report] logs_folder in config.toml."
            ),
            Self::NoSelection => write!(
                f,
                "No collections selected. Use --collection NAME, --all, or set \
                 [report] collections in config.toml."
            ),
        }
    }
}

impl std::error::Error for CollectionReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Discovery(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::NoLogsFolder | Self::NoSelection => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to listing collection folders under the logs root.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The logs root does not exist.
    RootNotFound { path: PathBuf },

    /// The logs root is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied accessing the logs root.
    PermissionDenied { path: PathBuf, source: io::Error },

    /// Walkdir traversal error on the root itself.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Logs folder '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Logs folder '{}' is not a directory", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
            Self::Traversal { path, source } => {
                write!(f, "Error listing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for CollectionReportError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing (or re-reading) a report file.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error creating, writing, or renaming the report file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation or deserialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Report I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV report error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON report error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for CollectionReportError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Non-fatal aggregation warnings
// ---------------------------------------------------------------------------

/// A per-folder, per-file, or per-line problem that was contained locally.
///
/// The affected item contributes nothing to the report; everything else is
/// still aggregated.
#[derive(Debug)]
pub enum AggregationWarning {
    /// The logs root or a selected collection folder does not exist.
    /// `path` is `None` when a selected name matched no listed folder.
    FolderNotFound {
        collection: String,
        path: Option<PathBuf>,
    },

    /// A log file (or a collection folder's listing) could not be read.
    LogReadError { path: PathBuf, source: io::Error },

    /// A marker line had no usable integer before the marker text.
    MarkerParseError {
        path: PathBuf,
        line_number: u64,
        marker: &'static str,
        /// The offending token, or `None` when nothing preceded the marker.
        token: Option<String>,
    },
}

impl fmt::Display for AggregationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FolderNotFound {
                collection,
                path: Some(path),
            } => write!(
                f,
                "Collection '{collection}': folder '{}' not found",
                path.display()
            ),
            Self::FolderNotFound {
                collection,
                path: None,
            } => write!(f, "Collection '{collection}': no such folder in logs root"),
            Self::LogReadError { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
            Self::MarkerParseError {
                path,
                line_number,
                marker,
                token: Some(token),
            } => write!(
                f,
                "'{}' line {line_number}: '{token}' before \"{marker}\" is not a count",
                path.display()
            ),
            Self::MarkerParseError {
                path,
                line_number,
                marker,
                token: None,
            } => write!(
                f,
                "'{}' line {line_number}: no count before \"{marker}\"",
                path.display()
            ),
        }
    }
}

/// Convenience type alias for report results.
pub type Result<T> = std::result::Result<T, CollectionReportError>;
