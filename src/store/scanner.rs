//! Order file discovery.
//!
//! Walks an order directory and picks out the JSON files to load,
//! respecting configured excludes and a file size limit.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Configuration for order file scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include (without dot).
    pub extensions: Vec<String>,
    /// Directory or file names to skip.
    pub excludes: Vec<String>,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["json".to_string()],
            excludes: vec!["node_modules".to_string(), "target".to_string()],
            max_file_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl From<&crate::config::SourceConfig> for ScanConfig {
    fn from(config: &crate::config::SourceConfig) -> Self {
        Self {
            excludes: config.excludes.clone(),
            max_file_size: config.max_file_size,
            ..Self::default()
        }
    }
}

/// An order file found during a scan.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// Path relative to the scan root, for logging.
    pub relative: String,
    /// File size in bytes.
    pub size: u64,
}

/// Scanner for order files under a directory.
pub struct FileScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl FileScanner {
    /// Create a new file scanner.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// Scan for all matching files, sorted by path.
    pub fn scan(&self) -> Result<Vec<ScannedFile>, walkdir::Error> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }

            let size = entry.metadata()?.len();
            if size > self.config.max_file_size {
                debug!("Skipping {} ({} bytes)", entry.path().display(), size);
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .to_string();

            files.push(ScannedFile {
                path: entry.path().to_path_buf(),
                relative,
                size,
            });
        }

        Ok(files)
    }

    /// Check if a file has one of the configured extensions.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.config
            .extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }

    /// Hidden entries and explicit excludes are skipped.
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();

        if name.starts_with('.') {
            return true;
        }

        self.config.excludes.iter().any(|pattern| name == pattern.as_str())
    }
}
