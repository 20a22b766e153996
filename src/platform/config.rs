// Collection Report - platform/config.rs
//
// Platform-specific config directory resolution and config.toml loading
// with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance. Config is read-only: nothing is ever written
// back, so the user's selection is only remembered if they put it here.

use crate::core::export::ReportFormat;
use crate::core::model::RowOrder;
use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/collectionreport/ or %APPDATA%\CollectionReport\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Full path of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[report]` section.
    pub report: ReportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[report]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Root folder holding one subfolder per collection.
    pub logs_folder: Option<String>,
    /// Collection names selected when none are given on the command line.
    pub collections: Option<Vec<String>>,
    /// "listing" or "alphabetical".
    pub order: Option<String>,
    /// "csv" or "json".
    pub format: Option<String>,
    /// Directory for generated reports (default: the logs folder).
    pub output_dir: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub logs_folder: Option<PathBuf>,
    pub collections: Vec<String>,
    pub order: RowOrder,
    pub format: ReportFormat,
    pub output_dir: Option<PathBuf>,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unparseable, returns defaults with a warning; the run
/// still proceeds but the user is told why their settings were ignored.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    tracing::debug!(path = %config_path.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Report: logs_folder --
    if let Some(folder) = raw.report.logs_folder {
        if !folder.trim().is_empty() {
            config.logs_folder = Some(PathBuf::from(folder));
        }
    }

    // -- Report: collections --
    if let Some(names) = raw.report.collections {
        let before = names.len();
        config.collections = names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if config.collections.len() != before {
            warnings.push(format!(
                "[report] collections contains {} empty name(s); they were ignored.",
                before - config.collections.len()
            ));
        }
    }

    // -- Report: order --
    if let Some(ref order) = raw.report.order {
        match RowOrder::from_name(order) {
            Some(o) => config.order = o,
            None => warnings.push(format!(
                "[report] order = \"{order}\" is not recognised. \
                 Expected \"listing\" or \"alphabetical\". Using default (listing).",
            )),
        }
    }

    // -- Report: format --
    if let Some(ref format) = raw.report.format {
        match ReportFormat::from_name(format) {
            Some(f) => config.format = f,
            None => warnings.push(format!(
                "[report] format = \"{format}\" is not recognised. \
                 Expected \"csv\" or \"json\". Using default (csv).",
            )),
        }
    }

    // -- Report: output_dir --
    if let Some(dir) = raw.report.output_dir {
        if !dir.trim().is_empty() {
            config.output_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(body: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE_NAME);
        fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_file_yields_defaults_silently() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert!(config.logs_folder.is_none());
        assert!(config.collections.is_empty());
        assert_eq!(config.order, RowOrder::Listing);
        assert_eq!(config.format, ReportFormat::Csv);
    }

    #[test]
    fn test_full_config_is_applied() {
        let (_dir, path) = write_config(
            r#"
            [report]
            logs_folder = "/srv/pmm/logs"
            collections = ["Marvel", "Pixar"]
            order = "Alphabetical"
            format = "json"
            output_dir = "/srv/reports"

            [logging]
            level = "DEBUG"
            "#,
        );
        let (config, warnings) = load_config(&path);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.logs_folder, Some(PathBuf::from("/srv/pmm/logs")));
        assert_eq!(config.collections, vec!["Marvel", "Pixar"]);
        assert_eq!(config.order, RowOrder::Alphabetical);
        assert_eq!(config.format, ReportFormat::Json);
        assert_eq!(config.output_dir, Some(PathBuf::from("/srv/reports")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_fall_back_with_warnings() {
        let (_dir, path) = write_config(
            r#"
            [report]
            order = "random"
            format = "xlsx"
            collections = ["Marvel", "  "]

            [logging]
            level = "loud"
            "#,
        );
        let (config, warnings) = load_config(&path);
        assert_eq!(warnings.len(), 4, "warnings: {warnings:?}");
        assert_eq!(config.order, RowOrder::Listing);
        assert_eq!(config.format, ReportFormat::Csv);
        assert_eq!(config.collections, vec!["Marvel"]);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unparseable_file_yields_defaults_with_warning() {
        let (_dir, path) = write_config("[report\nlogs_folder = ");
        let (config, warnings) = load_config(&path);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Failed to parse config file"));
        assert!(config.logs_folder.is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (_dir, path) = write_config(
            r#"
            [report]
            logs_folder = "/logs"
            colour = "blue"

            [future]
            enabled = true
            "#,
        );
        let (config, warnings) = load_config(&path);
        assert!(warnings.is_empty());
        assert_eq!(config.logs_folder, Some(PathBuf::from("/logs")));
    }
}
