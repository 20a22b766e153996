// Collection Report - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Merging CLI arguments over config values into a ReportRequest
// 4. Printing the report table and any warnings

use clap::Parser;
use collection_report::app::report::{self, OutputTarget, ReportRequest, Selection};
use collection_report::core::discovery;
use collection_report::core::export::ReportFormat;
use collection_report::core::model::{Report, RowOrder};
use collection_report::platform::config::{self, AppConfig, PlatformPaths};
use collection_report::platform::fs::{self, DiskLogSource};
use collection_report::util::constants;
use collection_report::util::error::{CollectionReportError, Result};
use collection_report::util::logging;
use std::path::PathBuf;

/// Collection Report - processed/missing counts per collection.
///
/// Scans each collection folder's `*.log` files for "Movies Processed" and
/// "Movies Missing" lines and writes the totals to a CSV report.
#[derive(Parser, Debug)]
#[command(name = "collection-report", version, about)]
struct Cli {
    /// Folder holding one subfolder of logs per collection.
    logs_folder: Option<PathBuf>,

    /// Collection to include (repeatable). Defaults to [report] collections.
    #[arg(short = 'c', long = "collection", value_name = "NAME")]
    collections: Vec<String>,

    /// Include every collection folder found.
    #[arg(short = 'a', long = "all", conflicts_with = "collections")]
    all: bool,

    /// List the collection folders found and exit.
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Report file to write (default: timestamped name in the logs folder).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Row order: "listing" or "alphabetical".
    #[arg(long = "order", value_parser = parse_order)]
    order: Option<RowOrder>,

    /// Output format: "csv" or "json".
    #[arg(long = "format", value_parser = parse_format)]
    format: Option<ReportFormat>,

    /// Show the written report in the system file manager.
    #[arg(long = "reveal")]
    reveal: bool,

    /// Config file to use instead of the platform default.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn parse_order(s: &str) -> std::result::Result<RowOrder, String> {
    RowOrder::from_name(s).ok_or_else(|| format!("expected 'listing' or 'alphabetical', got '{s}'"))
}

fn parse_format(s: &str) -> std::result::Result<ReportFormat, String> {
    ReportFormat::from_name(s).ok_or_else(|| format!("expected 'csv' or 'json', got '{s}'"))
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (app_config, config_warnings) = config::load_config(&config_path);

    logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "Collection Report starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if let Err(e) = run(&cli, &app_config) {
        tracing::error!(error = %e, "Collection Report failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, app_config: &AppConfig) -> Result<()> {
    let logs_root = cli
        .logs_folder
        .clone()
        .or_else(|| app_config.logs_folder.clone())
        .ok_or(CollectionReportError::NoLogsFolder)?;

    if cli.list {
        let (folders, warnings) = discovery::list_collections(&logs_root)?;
        for warning in &warnings {
            eprintln!("Warning: {warning}");
        }
        for folder in &folders {
            println!("{}", folder.name);
        }
        return Ok(());
    }

    let selection = if cli.all {
        Selection::All
    } else if !cli.collections.is_empty() {
        Selection::Named(cli.collections.clone())
    } else {
        Selection::Named(app_config.collections.clone())
    };

    let output = match &cli.output {
        Some(path) => OutputTarget::File(path.clone()),
        None => OutputTarget::Directory(
            app_config
                .output_dir
                .clone()
                .unwrap_or_else(|| logs_root.clone()),
        ),
    };

    let request = ReportRequest {
        logs_root,
        selection,
        order: cli.order.unwrap_or(app_config.order),
        format: cli.format.unwrap_or(app_config.format),
        output,
    };

    let outcome = report::generate_report(
        &request,
        &DiskLogSource,
        chrono::Local::now().naive_local(),
    )?;

    print_report(&outcome.report);

    for warning in &outcome.discovery_warnings {
        eprintln!("Warning: {warning}");
    }
    for warning in &outcome.warnings {
        eprintln!("Warning: {warning}");
    }
    if outcome.suppressed_warnings > 0 {
        eprintln!(
            "Warning: {} further warnings not shown",
            outcome.suppressed_warnings
        );
    }

    println!("Report saved as: {}", outcome.output_path.display());

    if cli.reveal {
        fs::reveal_in_file_manager(&outcome.output_path);
    }

    Ok(())
}

/// Print the report as an aligned table on stdout.
fn print_report(report: &Report) {
    let name_width = report
        .rows
        .iter()
        .map(|r| r.collection.chars().count())
        .chain(std::iter::once(constants::CSV_COLUMN_COLLECTION.len()))
        .max()
        .unwrap_or(0);
    let processed_width = constants::CSV_COLUMN_PROCESSED.len();
    let missing_width = constants::CSV_COLUMN_MISSING.len();

    println!(
        "{:<name_width$}  {:>processed_width$}  {:>missing_width$}",
        constants::CSV_COLUMN_COLLECTION,
        constants::CSV_COLUMN_PROCESSED,
        constants::CSV_COLUMN_MISSING,
    );
    for row in &report.rows {
        println!(
            "{:<name_width$}  {:>processed_width$}  {:>missing_width$}",
            row.collection, row.processed, row.missing,
        );
    }
    println!(
        "{:<name_width$}  {:>processed_width$}  {:>missing_width$}",
        "Total",
        report.total_processed(),
        report.total_missing(),
    );
}
