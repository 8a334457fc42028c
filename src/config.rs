//! Configuration module.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `FOLIO_` and use double underscores
//! to separate nested levels:
//! - `FOLIO_INDEXING__DOCUMENT_WORKERS=4` sets `indexing.document_workers`
//! - `FOLIO_SEARCH__MAX_RESULTS=50` sets `search.max_results`
//! - `FOLIO_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".folio";
const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "FOLIO_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Path to the binary index file
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// File name of the path cache, stored next to the index
    #[serde(default = "default_path_cache_filename")]
    pub path_cache_filename: String,

    /// Index build settings
    #[serde(default)]
    pub indexing: IndexingConfig,

    /// Query engine settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Ad-hoc scan settings (search without an index)
    #[serde(default)]
    pub scan: ScanConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IndexingConfig {
    /// Documents extracted at the same time. Each document may be expensive.
    #[serde(default = "default_document_workers")]
    pub document_workers: usize,

    /// Page workers per document (default: CPU count)
    #[serde(default = "default_page_workers")]
    pub page_workers: usize,

    /// Accepted document extensions, without the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Channel capacity for discovered paths (DISCOVER -> EXTRACT)
    #[serde(default = "default_path_channel_size")]
    pub path_channel_size: usize,

    /// Channel capacity for page records (EXTRACT -> ASSEMBLE)
    #[serde(default = "default_record_channel_size")]
    pub record_channel_size: usize,

    /// Show a progress bar while building
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// Fixed size of the scoring pool
    #[serde(default = "default_scoring_workers")]
    pub scoring_workers: usize,

    /// Maximum matches returned by a query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Upper bound on the accepted edit distance
    #[serde(default = "default_distance_cap")]
    pub distance_cap: usize,

    /// Lines taken on each side of a matched line for its snippet
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Divisor applied to exact-match scores
    #[serde(default = "default_exact_score_divisor")]
    pub exact_score_divisor: f32,

    /// Per-line pattern for index entries such as `Malaria, 112`.
    /// Pages dominated by such lines are skipped.
    /// Empty disables the check.
    #[serde(default = "default_toc_pattern")]
    pub toc_pattern: String,

    /// Fewest lines matching `toc_pattern` before a page counts as a table of contents
    #[serde(default = "default_toc_min_lines")]
    pub toc_min_lines: usize,

    /// Share of a page's non-empty lines that must match `toc_pattern`
    #[serde(default = "default_toc_min_ratio")]
    pub toc_min_ratio: f32,

    /// Language code for stop-word removal
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScanConfig {
    /// Files, and pages within a file, processed at once
    #[serde(default = "default_scan_concurrency")]
    pub max_concurrency: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `pipeline = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 { 1 }
fn default_index_path() -> PathBuf { PathBuf::from(".folio/index.bin") }
fn default_path_cache_filename() -> String { crate::storage::PATH_CACHE_FILENAME.to_string() }
fn default_document_workers() -> usize { 2 }
fn default_page_workers() -> usize { num_cpus::get() }
fn default_extensions() -> Vec<String> { vec!["txt".to_string()] }
fn default_path_channel_size() -> usize { 256 }
fn default_record_channel_size() -> usize { 1024 }
fn default_true() -> bool { true }
fn default_scoring_workers() -> usize { 10 }
fn default_max_results() -> usize { 200 }
fn default_distance_cap() -> usize { 10 }
fn default_context_lines() -> usize { 5 }
fn default_exact_score_divisor() -> f32 { 100.0 }
fn default_toc_pattern() -> String { crate::search::DEFAULT_TOC_PATTERN.to_string() }
fn default_toc_min_lines() -> usize { crate::search::DEFAULT_TOC_MIN_LINES }
fn default_toc_min_ratio() -> f32 { crate::search::DEFAULT_TOC_MIN_RATIO }
fn default_language() -> String { "en".to_string() }
fn default_scan_concurrency() -> usize { 10 }
fn default_log_level() -> String { "warn".to_string() }

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            index_path: default_index_path(),
            path_cache_filename: default_path_cache_filename(),
            indexing: IndexingConfig::default(),
            search: SearchConfig::default(),
            scan: ScanConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            document_workers: default_document_workers(),
            page_workers: default_page_workers(),
            extensions: default_extensions(),
            path_channel_size: default_path_channel_size(),
            record_channel_size: default_record_channel_size(),
            show_progress: true,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            scoring_workers: default_scoring_workers(),
            max_results: default_max_results(),
            distance_cap: default_distance_cap(),
            context_lines: default_context_lines(),
            exact_score_divisor: default_exact_score_divisor(),
            toc_pattern: default_toc_pattern(),
            toc_min_lines: default_toc_min_lines(),
            toc_min_ratio: default_toc_min_ratio(),
            language: default_language(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_scan_concurrency(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config().unwrap_or_else(Self::default_config_path);
        Self::load_from(config_path)
    }

    /// `.folio/settings.toml` relative to the current directory
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            // Double underscore separates nested levels; single underscores stay in field names
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Find the settings file by looking for a .folio directory
    /// from the current directory up to the filesystem root
    pub fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(config_dir.join(CONFIG_FILE));
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file under `.folio/` in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = Self::default_config_path();

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }

    /// Build the persistence manager described by these settings
    pub fn persistence(&self) -> crate::storage::IndexPersistence {
        crate::storage::IndexPersistence::new(&self.index_path)
            .with_path_cache_filename(&self.path_cache_filename)
    }
}
