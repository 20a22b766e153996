// Collection Report - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Collection Report";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "CollectionReport";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log markers
// =============================================================================

/// Marker text for lines reporting how many items a collection run processed.
pub const MARKER_PROCESSED: &str = "Movies Processed";

/// Marker text for lines reporting how many items a collection run could not find.
pub const MARKER_MISSING: &str = "Movies Missing";

/// Filename pattern for collection log files. Matched against the filename
/// only; files in nested subdirectories are never considered.
pub const LOG_FILE_PATTERN: &str = "*.log";

/// Maximum length of a token echoed back in a marker parse warning.
/// Keeps warnings readable when a line carries a long garbage token.
pub const MAX_TOKEN_PREVIEW: usize = 64;

// =============================================================================
// Report output
// =============================================================================

/// CSV header: collection name column.
pub const CSV_COLUMN_COLLECTION: &str = "Collection";

/// CSV header: processed count column.
pub const CSV_COLUMN_PROCESSED: &str = "Processed Movies";

/// CSV header: missing count column.
pub const CSV_COLUMN_MISSING: &str = "Missing Movies";

/// Prefix of generated report file names.
pub const REPORT_FILE_PREFIX: &str = "collections_report";

/// chrono format for the timestamp embedded in generated report file names.
/// No colons so the name is valid on Windows.
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Maximum number of non-fatal warnings kept for a single report run.
/// Further warnings are counted but not stored.
pub const MAX_WARNINGS: usize = 1_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
