// Collection Report - core/aggregate.rs
//
// Per-collection aggregation of marker counts.
//
// Core layer: all file access goes through the `LogSource` trait so the
// aggregation can be exercised without a real filesystem. The production
// implementation lives in platform::fs.
//
// Error containment:
//   - A folder that no longer exists is a FolderNotFound warning; the
//     collection is omitted.
//   - A folder that cannot be listed is a LogReadError warning; the
//     collection is omitted.
//   - A file that cannot be read is a LogReadError warning; the collection's
//     row is still produced from its other files.
//   - A marker line without a usable count is a MarkerParseError warning.
//   - Nothing here returns Err; the caller always gets a report.

use crate::core::marker;
use crate::core::model::{
    AggregationOutcome, CollectionFolder, CollectionReportRow, Marker, Report, RowOrder,
};
use crate::util::error::AggregationWarning;
use std::collections::{BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// Read-only access to the log files of a collection folder.
pub trait LogSource {
    /// List the log files directly inside `folder`.
    fn list_logs(&self, folder: &Path) -> io::Result<Vec<PathBuf>>;

    /// Read the full text of one log file.
    fn read_log(&self, path: &Path) -> io::Result<String>;
}

/// Aggregate marker counts for every folder whose name is in `selected`.
///
/// Folders not in `selected` are skipped before any of their logs are listed
/// or opened. A name supplied more than once is aggregated once, from its
/// first folder. Selected names with no matching folder produce a
/// `FolderNotFound` warning and no row.
pub fn aggregate<S>(
    folders: &[CollectionFolder],
    selected: &HashSet<String>,
    order: RowOrder,
    source: &S,
) -> AggregationOutcome
where
    S: LogSource + ?Sized,
{
    let mut outcome = AggregationOutcome::default();
    let mut rows: Vec<CollectionReportRow> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    tracing::debug!(
        folders = folders.len(),
        selected = selected.len(),
        order = ?order,
        "Aggregation starting"
    );

    for folder in folders {
        if !selected.contains(&folder.name) {
            tracing::trace!(collection = %folder.name, "Not selected, skipped");
            continue;
        }
        if !seen.insert(folder.name.as_str()) {
            tracing::debug!(
                collection = %folder.name,
                path = %folder.path.display(),
                "Duplicate collection folder ignored"
            );
            continue;
        }
        if let Some(row) = aggregate_folder(folder, source, &mut outcome) {
            rows.push(row);
        }
    }

    // Sorted so the warnings come out in the same order on every run.
    let unmatched: BTreeSet<&String> = selected
        .iter()
        .filter(|name| !seen.contains(name.as_str()))
        .collect();
    for name in unmatched {
        outcome.warn(AggregationWarning::FolderNotFound {
            collection: name.clone(),
            path: None,
        });
    }

    order.apply(&mut rows);
    outcome.report = Report { rows };

    tracing::info!(
        collections = outcome.report.len(),
        processed = outcome.report.total_processed(),
        missing = outcome.report.total_missing(),
        warnings = outcome.warning_count(),
        "Aggregation complete"
    );

    outcome
}

/// Total one collection folder. Returns `None` if the folder could not be listed.
fn aggregate_folder<S>(
    folder: &CollectionFolder,
    source: &S,
    outcome: &mut AggregationOutcome,
) -> Option<CollectionReportRow>
where
    S: LogSource + ?Sized,
{
    let logs = match source.list_logs(&folder.path) {
        Ok(logs) => logs,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            outcome.warn(AggregationWarning::FolderNotFound {
                collection: folder.name.clone(),
                path: Some(folder.path.clone()),
            });
            return None;
        }
        Err(e) => {
            outcome.warn(AggregationWarning::LogReadError {
                path: folder.path.clone(),
                source: e,
            });
            return None;
        }
    };

    let mut row = CollectionReportRow::empty(folder.name.clone());

    for path in &logs {
        let content = match source.read_log(path) {
            Ok(c) => c,
            Err(e) => {
                outcome.warn(AggregationWarning::LogReadError {
                    path: path.clone(),
                    source: e,
                });
                continue;
            }
        };

        let tally = marker::count_markers(&content);
        row.add(Marker::Processed, tally.processed);
        row.add(Marker::Missing, tally.missing);

        for failure in tally.failures {
            outcome.warn(AggregationWarning::MarkerParseError {
                path: path.clone(),
                line_number: failure.line_number,
                marker: failure.marker.text(),
                token: failure.token,
            });
        }

        tracing::debug!(
            collection = %folder.name,
            file = %path.display(),
            processed = tally.processed,
            missing = tally.missing,
            "Log file scanned"
        );
    }

    Some(row)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory log tree that records every folder listed and file read.
    #[derive(Default)]
    struct MemorySource {
        folders: HashMap<PathBuf, Vec<(PathBuf, Option<String>)>>,
        listed: RefCell<Vec<PathBuf>>,
        opened: RefCell<Vec<PathBuf>>,
    }

    impl MemorySource {
        /// Add a folder; a `None` body makes that file unreadable.
        fn folder(mut self, name: &str, files: &[(&str, Option<&str>)]) -> Self {
            let dir = PathBuf::from("/logs").join(name);
            let entries = files
                .iter()
                .map(|(f, body)| (dir.join(f), body.map(str::to_string)))
                .collect();
            self.folders.insert(dir, entries);
            self
        }
    }

    impl LogSource for MemorySource {
        fn list_logs(&self, folder: &Path) -> io::Result<Vec<PathBuf>> {
            self.listed.borrow_mut().push(folder.to_path_buf());
            self.folders
                .get(folder)
                .map(|files| files.iter().map(|(p, _)| p.clone()).collect())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such folder"))
        }

        fn read_log(&self, path: &Path) -> io::Result<String> {
            self.opened.borrow_mut().push(path.to_path_buf());
            self.folders
                .values()
                .flatten()
                .find(|(p, _)| p == path)
                .and_then(|(_, body)| body.clone())
                .ok_or_else(|| io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn folders(names: &[&str]) -> Vec<CollectionFolder> {
        names
            .iter()
            .map(|n| CollectionFolder::new(*n, PathBuf::from("/logs").join(n)))
            .collect()
    }

    fn selection(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_collection_counts() {
        let source = MemorySource::default().folder(
            "Marvel",
            &[("meta.log", Some("12 Movies Processed\n3 Movies Missing\n"))],
        );
        let outcome = aggregate(
            &folders(&["Marvel"]),
            &selection(&["Marvel"]),
            RowOrder::Listing,
            &source,
        );
        assert_eq!(
            outcome.report.rows,
            vec![CollectionReportRow {
                collection: "Marvel".to_string(),
                processed: 12,
                missing: 3,
            }]
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_sums_across_files() {
        let source = MemorySource::default().folder(
            "Pixar",
            &[
                ("a.log", Some("5 Movies Processed\n")),
                ("b.log", Some("7 Movies Processed\n1 Movies Missing\n")),
            ],
        );
        let outcome = aggregate(
            &folders(&["Pixar"]),
            &selection(&["Pixar"]),
            RowOrder::Listing,
            &source,
        );
        let row = outcome.report.row("Pixar").unwrap();
        assert_eq!(row.processed, 12);
        assert_eq!(row.missing, 1);
    }

    #[test]
    fn test_unselected_folders_are_never_touched() {
        let source = MemorySource::default()
            .folder("Keep", &[("k.log", Some("1 Movies Processed\n"))])
            .folder("Skip", &[("s.log", Some("9 Movies Processed\n"))]);
        let outcome = aggregate(
            &folders(&["Keep", "Skip"]),
            &selection(&["Keep"]),
            RowOrder::Listing,
            &source,
        );

        assert_eq!(outcome.report.len(), 1);
        assert!(outcome.report.row("Skip").is_none());
        assert_eq!(*source.listed.borrow(), vec![PathBuf::from("/logs/Keep")]);
        assert_eq!(*source.opened.borrow(), vec![PathBuf::from("/logs/Keep/k.log")]);
    }

    #[test]
    fn test_folder_without_logs_yields_zero_row() {
        let source = MemorySource::default().folder("Empty", &[]);
        let outcome = aggregate(
            &folders(&["Empty"]),
            &selection(&["Empty"]),
            RowOrder::Listing,
            &source,
        );
        assert_eq!(outcome.report.rows, vec![CollectionReportRow::empty("Empty")]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_unreadable_file_is_skipped_with_warning() {
        let source = MemorySource::default().folder(
            "Mixed",
            &[
                ("bad.log", None),
                ("good.log", Some("4 Movies Processed\n")),
            ],
        );
        let outcome = aggregate(
            &folders(&["Mixed"]),
            &selection(&["Mixed"]),
            RowOrder::Listing,
            &source,
        );
        assert_eq!(outcome.report.row("Mixed").unwrap().processed, 4);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(
            &outcome.warnings[0],
            AggregationWarning::LogReadError { path, .. } if path.ends_with("bad.log")
        ));
    }

    #[test]
    fn test_bad_token_is_skipped_with_warning() {
        let source = MemorySource::default().folder(
            "Tokens",
            &[("t.log", Some("abc Movies Processed\n6 Movies Processed\n"))],
        );
        let outcome = aggregate(
            &folders(&["Tokens"]),
            &selection(&["Tokens"]),
            RowOrder::Listing,
            &source,
        );
        assert_eq!(outcome.report.row("Tokens").unwrap().processed, 6);
        assert!(matches!(
            &outcome.warnings[0],
            AggregationWarning::MarkerParseError { line_number: 1, token: Some(t), .. } if t == "abc"
        ));
    }

    #[test]
    fn test_selected_name_without_folder_warns() {
        let source = MemorySource::default().folder("Real", &[]);
        let outcome = aggregate(
            &folders(&["Real"]),
            &selection(&["Real", "Ghost"]),
            RowOrder::Listing,
            &source,
        );
        assert_eq!(outcome.report.len(), 1);
        assert!(matches!(
            &outcome.warnings[0],
            AggregationWarning::FolderNotFound { collection, path: None } if collection == "Ghost"
        ));
    }

    #[test]
    fn test_vanished_folder_is_omitted() {
        let source = MemorySource::default();
        let outcome = aggregate(
            &folders(&["Gone"]),
            &selection(&["Gone"]),
            RowOrder::Listing,
            &source,
        );
        assert!(outcome.report.is_empty());
        assert!(matches!(
            &outcome.warnings[0],
            AggregationWarning::FolderNotFound { path: Some(_), .. }
        ));
    }

    #[test]
    fn test_duplicate_folder_names_yield_one_row() {
        let source = MemorySource::default().folder("Dup", &[("d.log", Some("2 Movies Missing\n"))]);
        let outcome = aggregate(
            &folders(&["Dup", "Dup"]),
            &selection(&["Dup"]),
            RowOrder::Listing,
            &source,
        );
        assert_eq!(outcome.report.len(), 1);
        assert_eq!(outcome.report.row("Dup").unwrap().missing, 2);
    }

    #[test]
    fn test_row_order_policies() {
        let source = MemorySource::default()
            .folder("b", &[])
            .folder("C", &[])
            .folder("a", &[]);
        let names = ["b", "C", "a"];

        let listing = aggregate(&folders(&names), &selection(&names), RowOrder::Listing, &source);
        let got: Vec<_> = listing.report.rows.iter().map(|r| r.collection.as_str()).collect();
        assert_eq!(got, vec!["b", "C", "a"]);

        let alpha = aggregate(
            &folders(&names),
            &selection(&names),
            RowOrder::Alphabetical,
            &source,
        );
        let got: Vec<_> = alpha.report.rows.iter().map(|r| r.collection.as_str()).collect();
        assert_eq!(got, vec!["a", "b", "C"]);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let source = MemorySource::default().folder(
            "Same",
            &[("s.log", Some("8 Movies Processed\n2 Movies Missing\n"))],
        );
        let run = || {
            aggregate(
                &folders(&["Same"]),
                &selection(&["Same"]),
                RowOrder::Listing,
                &source,
            )
            .report
        };
        assert_eq!(run(), run());
    }
}
