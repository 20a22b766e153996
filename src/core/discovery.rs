// Collection Report - core/discovery.rs
//
// Listing collection folders under a logs root and the `*.log` files inside
// a collection folder.
//
// Architecture note: this module uses `walkdir` for directory listing as an
// OS abstraction (similar to using std::path::Path). It reads only directory
// entries, never file *contents* -- that boundary is owned by the
// `LogSource` implementation in platform::fs.
//
// Both listings are one level deep and sorted by file name so repeated runs
// over an unchanged tree see the same order on every platform. Names
// beginning with `.` are skipped, as are hidden files in a shell glob.

use crate::core::model::CollectionFolder;
use crate::util::constants;
use crate::util::error::DiscoveryError;
use glob::{MatchOptions, Pattern};
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Glob options for log filename matching: case-sensitive, and a leading dot
/// must be matched literally so `.hidden.log` is not a log file.
const LOG_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

fn log_pattern() -> &'static Pattern {
    static LOG_PATTERN: OnceLock<Pattern> = OnceLock::new();
    LOG_PATTERN.get_or_init(|| {
        Pattern::new(constants::LOG_FILE_PATTERN).expect("log_pattern: invalid glob")
    })
}

/// Returns true if `file_name` names a collection log file.
pub fn is_log_file_name(file_name: &str) -> bool {
    log_pattern().matches_with(file_name, LOG_MATCH_OPTIONS)
}

/// Returns true if the final component of `path` names a collection log file.
///
/// Non-UTF-8 names cannot go through the glob, so they are matched on the
/// raw extension with the same leading-dot rule.
pub fn is_log_path(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    match name.to_str() {
        Some(n) => is_log_file_name(n),
        None => {
            !name.to_string_lossy().starts_with('.')
                && path.extension() == Some(OsStr::new("log"))
        }
    }
}

// =============================================================================
// Collection folders
// =============================================================================

/// List the collection folders directly inside `root`.
///
/// # Non-fatal errors
/// Entries that cannot be read, or whose names are not valid UTF-8, are
/// recorded as human-readable strings in the returned warnings vector.
///
/// # Fatal errors
/// Returns `Err` only if `root` itself is unusable (`RootNotFound`,
/// `NotADirectory`, `PermissionDenied`, or a traversal error on the root).
pub fn list_collections(
    root: &Path,
) -> Result<(Vec<CollectionFolder>, Vec<String>), DiscoveryError> {
    // --- Pre-flight validation ---
    // `fs::metadata()` rather than `Path::is_dir()` so PermissionDenied is
    // distinguishable from a path that does not exist.
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            })
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(DiscoveryError::PermissionDenied {
                path: root.to_path_buf(),
                source: e,
            })
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            })
        }
    }

    tracing::debug!(root = %root.display(), "Listing collection folders");

    let mut folders: Vec<CollectionFolder> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let walker = walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                // Failure reading the root itself is fatal; anything else is
                // a single unreadable entry.
                if e.depth() == 0 {
                    return Err(DiscoveryError::Traversal {
                        path: root.to_path_buf(),
                        source: e,
                    });
                }
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = match entry.file_name().to_str() {
            Some(n) => n,
            None => {
                warnings.push(format!(
                    "Skipping '{}': non-UTF-8 folder name",
                    entry.path().display()
                ));
                continue;
            }
        };

        if name.starts_with('.') {
            tracing::trace!(folder = name, "Hidden folder skipped");
            continue;
        }

        folders.push(CollectionFolder::new(name, entry.path()));
    }

    tracing::debug!(
        collections = folders.len(),
        warnings = warnings.len(),
        "Collection listing complete"
    );

    Ok((folders, warnings))
}

// =============================================================================
// Log files
// =============================================================================

/// List the `*.log` files directly inside `folder`, sorted by file name.
///
/// Subdirectories are never descended into. Only a failure to read `folder`
/// itself is returned as `Err`. An entry that cannot be inspected (e.g. a
/// dangling symlink) is still listed if its name is a log name, so the
/// caller's read of it fails and is reported for that file alone; other
/// unreadable entries are ignored.
pub fn list_log_files(folder: &Path) -> io::Result<Vec<PathBuf>> {
    let walker = walkdir::WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut logs = Vec::new();
    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => return Err(io::Error::from(e)),
            Err(e) => {
                match e.path() {
                    Some(path) if is_log_path(path) => {
                        tracing::debug!(
                            file = %path.display(),
                            error = %e,
                            "Uninspectable log entry kept for reading"
                        );
                        logs.push(path.to_path_buf());
                    }
                    _ => tracing::trace!(error = %e, "Uninspectable entry skipped"),
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if is_log_path(entry.path()) {
            logs.push(entry.into_path());
        }
    }

    tracing::trace!(folder = %folder.display(), logs = logs.len(), "Log files listed");
    Ok(logs)
}

// =============================================================================
// Tests
// =============================================================================
