//! procreport - procurement order analytics
//!
//! A CLI tool that loads procurement orders, applies the report filter
//! and renders order totals with a ranked per-item breakdown.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, unreadable orders, etc.)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod store;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{Report, ReportMetadata};
use std::path::Path;
use std::time::Instant;
use store::{OrderStore, ScanConfig};
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Configuration decides the default verbosity, so load it first
    let loaded = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(log_level(&args, &loaded.config));

    info!("procreport v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    for note in &loaded.notes {
        info!("{}", note);
    }
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }

    if let Err(e) = run_report(args, loaded.config) {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .procreport.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the order source, default filters and report options.");
    Ok(())
}

/// Effective log level: `-q` wins, then `-v` or `verbose = true` in config.
fn log_level(args: &Args, config: &Config) -> tracing::Level {
    if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    }
}

/// Initialize logging. `RUST_LOG` overrides the level chosen on the command line.
///
/// Logs go to stderr so a report written to stdout stays clean.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the report workflow: load, filter, aggregate, render, write.
fn run_report(args: Args, mut config: Config) -> Result<()> {
    let start_time = Instant::now();

    config.merge_with_args(&args);
    config.validate()?;

    // Step 1: Load orders
    let store = open_store(&config)?;
    info!("Order source: {} ({} orders)", store.source(), store.len());

    // Step 2: Filter
    let filter = config.order_filter(args.search.as_deref());
    let orders = filter.apply(store.orders());
    if filter.is_empty() {
        debug!("No filters active");
    } else {
        info!(
            "{} of {} orders match: {}",
            orders.len(),
            store.len(),
            filter.describe().join("; ")
        );
    }

    // Step 3: Aggregate
    let summary = analysis::summarize(&orders);
    let mut rows = analysis::report_rows(&summary);
    if config.report.top_items > 0 {
        rows.truncate(config.report.top_items);
    }
    let vendors = analysis::vendor_totals(&orders);

    let metadata = ReportMetadata {
        source: store.source().to_string(),
        generated_at: Utc::now(),
        orders_loaded: store.len(),
        orders_matched: orders.len(),
        filters: filter.describe(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let report = Report {
        metadata,
        summary,
        rows,
        vendors,
        orders,
    };

    // Step 4: Render and write
    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => {
            let options = report::RenderOptions::from(&config.report);
            report::generate_markdown_report(&report, &options)
        }
    };

    match config.general.output.as_deref().filter(|p| !p.is_empty()) {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path))?;
            info!(
                "Report saved to {} ({} orders, {} items, {})",
                path,
                report.summary.total_orders,
                report.summary.items.len(),
                report::generator::format_amount(
                    report.summary.total_amount,
                    &config.report.currency
                )
            );
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Open the configured order source, or the sample when none is set.
fn open_store(config: &Config) -> Result<OrderStore> {
    match config.source.orders.as_deref() {
        Some(path) => {
            let scan_config = ScanConfig::from(&config.source);
            let store = OrderStore::open(Path::new(path), &scan_config)
                .with_context(|| format!("Failed to load orders from {}", path))?;
            if store.is_empty() {
                warn!("Order source {} contains no orders", path);
            }
            Ok(store)
        }
        None => {
            debug!("No order source configured, using built-in sample");
            Ok(OrderStore::sample())
        }
    }
}

/// Configuration plus what was learned while loading it, logged once
/// logging is up.
struct LoadedConfig {
    config: Config,
    notes: Vec<String>,
    warnings: Vec<String>,
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<LoadedConfig> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Ok(LoadedConfig {
            config: Config::load(config_path)?,
            notes: vec![format!("Loaded config from: {}", config_path.display())],
            warnings: vec![],
        });
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(LoadedConfig {
            config,
            notes: vec![format!("Loaded default config from {}", CONFIG_FILE_NAME)],
            warnings: vec![],
        }),
        Ok(None) => Ok(LoadedConfig {
            config: Config::default(),
            notes: vec![],
            warnings: vec![],
        }),
        Err(e) => Ok(LoadedConfig {
            config: Config::default(),
            notes: vec![],
            warnings: vec![format!("Failed to load config: {:#}", e)],
        }),
    }
}
