//! Order store.
//!
//! Owns the orders a report is built from. Orders come from the built-in
//! sample, a single JSON file, or a directory of JSON files.

pub mod sample;
pub mod scanner;

use crate::models::Order;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub use scanner::{FileScanner, ScanConfig};

/// Errors raised while loading orders.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("order source not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse orders in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to scan {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("no order files found under {}", .0.display())]
    Empty(PathBuf),
}

/// Where a store's orders came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderSource {
    Sample,
    File(PathBuf),
    Directory { path: PathBuf, files: usize },
}

impl fmt::Display for OrderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSource::Sample => write!(f, "built-in sample"),
            OrderSource::File(path) => write!(f, "{}", path.display()),
            OrderSource::Directory { path, files } => {
                write!(f, "{} ({} files)", path.display(), files)
            }
        }
    }
}

/// Accepted shapes of an order file.
#[derive(Deserialize)]
#[serde(untagged)]
enum OrderFile {
    List(Vec<Order>),
    Wrapped { orders: Vec<Order> },
}

impl From<OrderFile> for Vec<Order> {
    fn from(file: OrderFile) -> Self {
        match file {
            OrderFile::List(orders) | OrderFile::Wrapped { orders } => orders,
        }
    }
}

/// In-memory collection of orders owned by the caller.
#[derive(Debug, Clone)]
pub struct OrderStore {
    source: OrderSource,
    orders: Vec<Order>,
}

impl OrderStore {
    /// Create a store from orders already in memory.
    pub fn new(source: OrderSource, orders: Vec<Order>) -> Self {
        Self { source, orders }
    }

    /// The built-in sample dataset.
    pub fn sample() -> Self {
        Self::new(OrderSource::Sample, sample::orders())
    }

    /// Load orders from a file or directory.
    pub fn open(path: &Path, scan_config: &ScanConfig) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }

        if path.is_dir() {
            Self::load_dir(path, scan_config)
        } else {
            Self::load(path)
        }
    }

    /// Load orders from a single JSON file.
    ///
    /// The file holds either an array of orders or an object with an
    /// `orders` array.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let orders = read_order_file(path)?;
        info!("Loaded {} orders from {}", orders.len(), path.display());
        Ok(Self::new(OrderSource::File(path.to_path_buf()), orders))
    }

    /// Load and concatenate every order file under a directory, in path order.
    pub fn load_dir(path: &Path, scan_config: &ScanConfig) -> Result<Self, StoreError> {
        let files = FileScanner::new(path.to_path_buf(), scan_config.clone())
            .scan()
            .map_err(|source| StoreError::Scan {
                path: path.to_path_buf(),
                source,
            })?;

        if files.is_empty() {
            return Err(StoreError::Empty(path.to_path_buf()));
        }

        let mut orders = Vec::new();
        for file in &files {
            let loaded = read_order_file(&file.path)?;
            debug!(
                "{}: {} orders ({} bytes)",
                file.relative,
                loaded.len(),
                file.size
            );
            orders.extend(loaded);
        }

        info!(
            "Loaded {} orders from {} files under {}",
            orders.len(),
            files.len(),
            path.display()
        );

        Ok(Self::new(
            OrderSource::Directory {
                path: path.to_path_buf(),
                files: files.len(),
            },
            orders,
        ))
    }

    pub fn source(&self) -> &OrderSource {
        &self.source
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

fn read_order_file(path: &Path) -> Result<Vec<Order>, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file: OrderFile = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(file.into())
}
