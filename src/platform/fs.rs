// Collection Report - platform/fs.rs
//
// Real filesystem access for the aggregator, and the file-manager reveal
// used after a report is written.

use crate::core::aggregate::LogSource;
use crate::core::discovery;
use std::io;
use std::path::{Path, PathBuf};

/// `LogSource` backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskLogSource;

impl LogSource for DiskLogSource {
    fn list_logs(&self, folder: &Path) -> io::Result<Vec<PathBuf>> {
        discovery::list_log_files(folder)
    }

    fn read_log(&self, path: &Path) -> io::Result<String> {
        read_file_lossy(path)
    }
}

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion so one stray byte
/// does not discard a whole log.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            tracing::debug!(path = %path.display(), "Invalid UTF-8 replaced while reading log");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Open the system file manager and highlight `path` within it.
///
/// Platform behaviour:
/// - **Windows**: `explorer.exe /select,"<path>"`.
/// - **macOS**: `open -R "<path>"`.
/// - **Linux**: `xdg-open "<parent>"` (no standard per-file selection).
///
/// The subprocess is spawned detached; any launch failure is logged at WARN
/// level but never propagated.
pub fn reveal_in_file_manager(path: &Path) {
    #[cfg(target_os = "windows")]
    {
        // `/select,<path>` must be a single argument.
        let arg = format!("/select,{}", path.display());
        if let Err(e) = std::process::Command::new("explorer").arg(arg).spawn() {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to reveal report in Explorer"
            );
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Err(e) = std::process::Command::new("open")
            .arg("-R")
            .arg(path)
            .spawn()
        {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to reveal report in Finder"
            );
        }
    }
    #[cfg(target_os = "linux")]
    {
        let parent = path.parent().unwrap_or(path);
        if let Err(e) = std::process::Command::new("xdg-open").arg(parent).spawn() {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to open report folder in file manager"
            );
        }
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        tracing::debug!(path = %path.display(), "No file manager reveal on this platform");
    }
}
