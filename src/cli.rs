//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::OrderStatus;
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// procreport - procurement order analytics
///
/// Summarize procurement orders into totals and a ranked per-item
/// breakdown. Markdown/JSON reports.
///
/// Examples:
///   procreport
///   procreport --orders data/orders --from 2024-11-01 --to 2024-11-30
///   procreport --orders orders.json --status sent,requested --format json -o report.json
///   procreport --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Order file or directory of JSON order files
    ///
    /// If not specified, uses [source].orders from the config file,
    /// falling back to the built-in sample orders.
    #[arg(long, value_name = "PATH", env = "PROCREPORT_ORDERS")]
    pub orders: Option<PathBuf>,

    /// Use the built-in sample orders, ignoring any configured source
    #[arg(long, conflicts_with = "orders")]
    pub sample: bool,

    /// Earliest order creation date (YYYY-MM-DD), inclusive
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Latest order creation date (YYYY-MM-DD), inclusive
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Order statuses to include (comma-separated)
    ///
    /// Example: --status sent,requested
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub status: Option<Vec<OrderStatus>>,

    /// Property regions to include (comma-separated)
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub region: Option<Vec<String>>,

    /// Vendor name to include
    #[arg(long, value_name = "NAME")]
    pub vendor: Option<String>,

    /// Quick search over order id, property name/code and vendor
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path for the report
    ///
    /// If not specified, the report is written to stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum number of item rows in the report (0 = all)
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Currency prefix for amounts
    #[arg(long, value_name = "PREFIX")]
    pub currency: Option<String>,

    /// Leave the order table out of the report
    #[arg(long)]
    pub no_order_table: bool,

    /// Add the line items of every order to the report
    #[arg(long)]
    pub order_lines: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .procreport.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .procreport.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate date range
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(format!(
                    "--from ({}) must not be after --to ({})",
                    from, to
                ));
            }
        }

        // Validate order source if provided
        if let Some(ref orders) = self.orders {
            if !orders.exists() {
                return Err(format!("Order source does not exist: {}", orders.display()));
            }
        }

        if let Some(ref currency) = self.currency {
            if currency.trim().is_empty() {
                return Err("Currency prefix must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            orders: None,
            sample: false,
            from: None,
            to: None,
            status: None,
            region: None,
            vendor: None,
            search: None,
            format: None,
            output: None,
            top: None,
            currency: None,
            no_order_table: false,
            order_lines: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_filters() {
        let args = Args::try_parse_from([
            "procreport",
            "--from",
            "2024-11-01",
            "--status",
            "sent,cancelled",
            "--region",
            "Bali (Denpasar),Jawa Barat (Bandung)",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 11, 1));
        assert_eq!(
            args.status,
            Some(vec![OrderStatus::Sent, OrderStatus::Cancelled])
        );
        assert_eq!(
            args.region,
            Some(vec![
                "Bali (Denpasar)".to_string(),
                "Jawa Barat (Bandung)".to_string()
            ])
        );
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        let result = Args::try_parse_from(["procreport", "--status", "approved"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_date_range() {
        let mut args = make_args();
        args.from = NaiveDate::from_ymd_opt(2024, 11, 30);
        args.to = NaiveDate::from_ymd_opt(2024, 11, 1);
        assert!(args.validate().is_err());

        args.to = args.from;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_orders() {
        let mut args = make_args();
        args.orders = Some(PathBuf::from("/definitely/not/here/orders.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_currency() {
        let mut args = make_args();
        args.currency = Some("  ".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
