//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.procreport.toml` files.

use crate::analysis::OrderFilter;
use crate::cli::OutputFormat;
use crate::models::OrderStatus;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".procreport.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Order source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Default order filter.
    #[serde(default)]
    pub filters: FilterConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output file. Empty means stdout.
    #[serde(default)]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Order source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Order file or directory. Unset means the built-in sample.
    #[serde(default)]
    pub orders: Option<String>,

    /// Names to skip when scanning an order directory.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,

    /// Maximum order file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            orders: None,
            excludes: default_excludes(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_excludes() -> Vec<String> {
    vec!["node_modules", "target", "archive"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

/// Default order filter settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Earliest creation date (`YYYY-MM-DD`), inclusive.
    #[serde(default)]
    pub from: Option<NaiveDate>,

    /// Latest creation date (`YYYY-MM-DD`), inclusive.
    #[serde(default)]
    pub to: Option<NaiveDate>,

    /// Statuses to include. Empty means all.
    #[serde(default)]
    pub statuses: Vec<OrderStatus>,

    /// Property regions to include. Empty means all.
    #[serde(default)]
    pub regions: Vec<String>,

    /// Vendor to include.
    #[serde(default)]
    pub vendor: Option<String>,
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Currency prefix for amounts.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Maximum item rows in the item table. Zero shows all.
    #[serde(default)]
    pub top_items: usize,

    /// Include the order table section.
    #[serde(default = "default_true")]
    pub include_order_table: bool,

    /// Include the line items of every order.
    #[serde(default)]
    pub include_order_lines: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            currency: default_currency(),
            top_items: 0,
            include_order_table: true,
            include_order_lines: false,
        }
    }
}

fn default_title() -> String {
    "Order Report".to_string()
}

fn default_currency() -> String {
    "Rp".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings and only
    /// override values they explicitly provide.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if args.sample {
            self.source.orders = None;
        } else if let Some(ref orders) = args.orders {
            self.source.orders = Some(orders.display().to_string());
        }

        if args.from.is_some() {
            self.filters.from = args.from;
        }
        if args.to.is_some() {
            self.filters.to = args.to;
        }
        if let Some(ref statuses) = args.status {
            self.filters.statuses = statuses.clone();
        }
        if let Some(ref regions) = args.region {
            self.filters.regions = regions.clone();
        }
        if let Some(ref vendor) = args.vendor {
            self.filters.vendor = Some(vendor.clone());
        }

        if let Some(top) = args.top {
            self.report.top_items = top;
        }
        if let Some(ref currency) = args.currency {
            self.report.currency = currency.clone();
        }
        if args.no_order_table {
            self.report.include_order_table = false;
        }
        if args.order_lines {
            self.report.include_order_lines = true;
        }
    }

    /// Validate the effective settings after CLI arguments are merged.
    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.filters.from, self.filters.to) {
            if from > to {
                bail!(
                    "Filter date range is inverted: from {} is after to {}",
                    from,
                    to
                );
            }
        }

        if self.report.currency.trim().is_empty() {
            bail!("Currency prefix must not be empty");
        }

        Ok(())
    }

    /// Build the order filter from config plus the CLI-only quick search.
    pub fn order_filter(&self, search: Option<&str>) -> OrderFilter {
        OrderFilter {
            from: self.filters.from,
            to: self.filters.to,
            statuses: self.filters.statuses.clone(),
            regions: self.filters.regions.clone(),
            vendor: self.filters.vendor.clone(),
            search: search.map(String::from),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
