// Collection Report - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use crate::util::error::AggregationWarning;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// =============================================================================
// Collection folder (input of aggregation)
// =============================================================================

/// A directory under the logs root whose name is the collection's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFolder {
    /// Collection name (the folder's final path component).
    pub name: String,

    /// Full path to the folder.
    pub path: PathBuf,
}

impl CollectionFolder {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

// =============================================================================
// Marker
// =============================================================================

/// The two count markers a metadata manager writes into collection logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Processed,
    Missing,
}

impl Marker {
    /// The literal text that identifies this marker in a log line.
    pub fn text(&self) -> &'static str {
        match self {
            Marker::Processed => constants::MARKER_PROCESSED,
            Marker::Missing => constants::MARKER_MISSING,
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

// =============================================================================
// Report
// =============================================================================

/// One collection's totals across all of its log files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionReportRow {
    pub collection: String,
    pub processed: u64,
    pub missing: u64,
}

impl CollectionReportRow {
    /// A row with zero counts, for a collection with no matching lines.
    pub fn empty(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            processed: 0,
            missing: 0,
        }
    }

    /// Adds `count` to the total for `marker`, saturating at `u64::MAX`.
    pub fn add(&mut self, marker: Marker, count: u64) {
        let total = match marker {
            Marker::Processed => &mut self.processed,
            Marker::Missing => &mut self.missing,
        };
        *total = total.saturating_add(count);
    }
}

/// The ordered table of per-collection totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<CollectionReportRow>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Sum of processed counts over all rows.
    pub fn total_processed(&self) -> u64 {
        self.rows
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.processed))
    }

    /// Sum of missing counts over all rows.
    pub fn total_missing(&self) -> u64 {
        self.rows
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.missing))
    }

    /// Look up a row by collection name.
    pub fn row(&self, collection: &str) -> Option<&CollectionReportRow> {
        self.rows.iter().find(|r| r.collection == collection)
    }
}

// =============================================================================
// Row order
// =============================================================================

/// How report rows are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowOrder {
    /// Same order as the folders were supplied to the aggregator.
    #[default]
    Listing,

    /// Case-insensitive alphabetical by collection name.
    Alphabetical,
}

impl RowOrder {
    /// Parse a config/CLI value. Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "listing" => Some(Self::Listing),
            "alphabetical" => Some(Self::Alphabetical),
            _ => None,
        }
    }

    /// Reorder `rows` in place according to this policy.
    pub fn apply(&self, rows: &mut [CollectionReportRow]) {
        if let RowOrder::Alphabetical = self {
            rows.sort_by(|a, b| {
                a.collection
                    .to_lowercase()
                    .cmp(&b.collection.to_lowercase())
                    .then_with(|| a.collection.cmp(&b.collection))
            });
        }
    }
}

// =============================================================================
// Aggregation outcome
// =============================================================================

/// A report together with every non-fatal problem met while building it.
#[derive(Debug, Default)]
pub struct AggregationOutcome {
    pub report: Report,

    /// Warnings kept, capped at `constants::MAX_WARNINGS`.
    pub warnings: Vec<AggregationWarning>,

    /// Warnings dropped after the cap was reached.
    pub suppressed_warnings: usize,
}

impl AggregationOutcome {
    /// Record a warning, respecting the warning cap.
    pub fn warn(&mut self, warning: AggregationWarning) {
        tracing::debug!(warning = %warning, "Aggregation warning");
        if self.warnings.len() < constants::MAX_WARNINGS {
            self.warnings.push(warning);
        } else {
            self.suppressed_warnings += 1;
        }
    }

    /// Total number of warnings raised, including suppressed ones.
    pub fn warning_count(&self) -> usize {
        self.warnings.len() + self.suppressed_warnings
    }
}
