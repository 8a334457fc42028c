//! Pipeline configuration
//!
//! Controls worker counts and channel sizes for the build pipeline.
//! Reads from Settings (.folio/settings.toml).

use crate::Settings;

/// Configuration for the index build pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Documents extracted concurrently (default: 2)
    pub document_workers: usize,

    /// Page workers per open document (default: CPU count)
    pub page_workers: usize,

    /// Accepted document extensions
    pub extensions: Vec<String>,

    /// Channel capacity for document jobs (DISCOVER -> EXTRACT)
    pub path_channel_size: usize,

    /// Channel capacity for page records (EXTRACT -> ASSEMBLE)
    pub record_channel_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            document_workers: 2,
            page_workers: num_cpus::get().max(1),
            extensions: vec!["txt".to_string()],
            path_channel_size: 256,
            record_channel_size: 1024,
        }
    }
}

impl PipelineConfig {
    /// Create config from Settings.
    ///
    /// Reads from .folio/settings.toml:
    /// - `indexing.document_workers` -> document_workers
    /// - `indexing.page_workers` -> page_workers
    /// - `indexing.extensions` -> extensions
    /// - `indexing.path_channel_size` / `indexing.record_channel_size`
    pub fn from_settings(settings: &Settings) -> Self {
        let indexing = &settings.indexing;
        Self {
            document_workers: indexing.document_workers.max(1),
            page_workers: indexing.page_workers.max(1),
            extensions: indexing.extensions.clone(),
            path_channel_size: indexing.path_channel_size.max(1),
            record_channel_size: indexing.record_channel_size.max(1),
        }
    }

    /// Set document worker count
    pub fn with_document_workers(mut self, workers: usize) -> Self {
        self.document_workers = workers.max(1);
        self
    }

    /// Set page worker count
    pub fn with_page_workers(mut self, workers: usize) -> Self {
        self.page_workers = workers.max(1);
        self
    }

    /// Set accepted extensions
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.document_workers, 2);
        assert!(config.page_workers >= 1);
        assert_eq!(config.extensions, vec!["txt"]);
    }

    #[test]
    fn test_config_builder() {
        let config = PipelineConfig::default()
            .with_document_workers(0)
            .with_page_workers(8)
            .with_extensions(["pdf"]);

        assert_eq!(config.document_workers, 1);
        assert_eq!(config.page_workers, 8);
        assert_eq!(config.extensions, vec!["pdf"]);
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.indexing.document_workers = 3;
        settings.indexing.page_workers = 0;
        let config = PipelineConfig::from_settings(&settings);

        assert_eq!(config.document_workers, 3);
        assert_eq!(config.page_workers, 1);
        assert_eq!(config.record_channel_size, settings.indexing.record_channel_size);
    }
}
