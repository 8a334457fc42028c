//! Table-of-contents page detection.
//!
//! A page is skipped only when index-like lines dominate it. A single
//! `Chapter 3` heading or running header does not make a page an index.

use crate::search::{SearchError, SearchResult};
use regex::Regex;

/// A line holding a single label followed by a comma or whitespace and a
/// number, e.g. `Malaria, 112` or `Anemia 45`. Matched one line at a time.
pub const DEFAULT_TOC_PATTERN: &str = r"^[ \t]*\p{L}[\p{L}'\-]*(?:,[ \t]*|[ \t]+)\d+[ \t]*\r?$";

/// Fewest index-like lines a page needs before it can be skipped.
pub const DEFAULT_TOC_MIN_LINES: usize = 3;

/// Share of non-empty lines that must look index-like.
pub const DEFAULT_TOC_MIN_RATIO: f32 = 0.5;

/// Flags pages that look like a table of contents or a back-of-book index.
#[derive(Debug, Clone)]
pub struct TocDetector {
    pattern: Option<Regex>,
    min_lines: usize,
    min_ratio: f32,
}

impl TocDetector {
    /// Compile `pattern` with the default density. An empty pattern disables
    /// detection.
    pub fn new(pattern: &str) -> SearchResult<Self> {
        if pattern.trim().is_empty() {
            return Ok(Self::disabled());
        }
        let regex = Regex::new(pattern).map_err(|e| SearchError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern: Some(regex),
            min_lines: DEFAULT_TOC_MIN_LINES,
            min_ratio: DEFAULT_TOC_MIN_RATIO,
        })
    }

    pub fn disabled() -> Self {
        Self {
            pattern: None,
            min_lines: DEFAULT_TOC_MIN_LINES,
            min_ratio: DEFAULT_TOC_MIN_RATIO,
        }
    }

    /// Require at least `min_lines` matching lines making up at least
    /// `min_ratio` of the page's non-empty lines.
    pub fn with_density(mut self, min_lines: usize, min_ratio: f32) -> Self {
        self.min_lines = min_lines.max(1);
        self.min_ratio = min_ratio.clamp(0.0, 1.0);
        self
    }

    pub fn is_toc_page(&self, text: &str) -> bool {
        let Some(re) = &self.pattern else {
            return false;
        };

        let mut lines = 0usize;
        let mut hits = 0usize;
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            lines += 1;
            if re.is_match(line) {
                hits += 1;
            }
        }

        hits >= self.min_lines && hits as f32 >= self.min_ratio * lines as f32
    }
}

impl Default for TocDetector {
    fn default() -> Self {
        Self::new(DEFAULT_TOC_PATTERN).unwrap_or_else(|e| {
            tracing::error!(target: "search", "Default TOC pattern failed to compile: {e}");
            Self::disabled()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_detects_index_pages() {
        let toc = TocDetector::default();
        assert!(toc.is_toc_page("Index\nAnemia, 45\nFever, 12\nMalaria, 112\n"));
        assert!(toc.is_toc_page("Contents\nIntroduction 1\nHistory 9\nTreatment 40"));
        assert!(toc.is_toc_page("Malaria, 112\r\nAnemia, 45\r\nQuinine, 130\r\n"));
    }

    #[test]
    fn test_default_ignores_prose() {
        let toc = TocDetector::default();
        assert!(!toc.is_toc_page("The cause of Malaria is a parasite."));
        assert!(!toc.is_toc_page("In 1897 Ross showed the mosquito cycle."));
        assert!(!toc.is_toc_page("Patients aged over 65 are at risk"));
    }

    #[test]
    fn test_single_heading_does_not_make_an_index() {
        let toc = TocDetector::default();
        assert!(!toc.is_toc_page("Chapter 3\nThe malaria parasite lives in the blood."));
        assert!(!toc.is_toc_page(
            "Malaria 45\nFigure 2\nThe parasite enters the liver.\nIt then infects red cells.\n\
             Fever follows."
        ));
    }

    #[test]
    fn test_density_is_configurable() {
        let page = "Chapter 3\nThe malaria parasite lives in the blood.";
        let strict = TocDetector::default().with_density(1, 0.5);
        assert!(strict.is_toc_page(page));

        let index = "Anemia, 45\nFever, 12\nMalaria, 112\nSee also the glossary.";
        assert!(TocDetector::default().is_toc_page(index));
        assert!(!TocDetector::default().with_density(3, 0.9).is_toc_page(index));
    }

    #[test]
    fn test_empty_pattern_disables() {
        let toc = TocDetector::new("").unwrap();
        assert!(!toc.is_toc_page("Malaria, 112\nAnemia, 45\nFever, 12"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = TocDetector::new("(unclosed").unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern { .. }));
    }
}
