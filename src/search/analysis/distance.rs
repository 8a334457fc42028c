use super::{EditDistance, StopwordFilter};
use std::sync::Arc;

/// Levenshtein distance over characters.
///
/// With a stop-word filter both inputs are cleaned first, so the distance is
/// measured between lowercase content words only.
#[derive(Clone)]
pub struct Levenshtein {
    stopwords: Option<Arc<dyn StopwordFilter>>,
}

impl Levenshtein {
    /// Compare strings as given.
    pub fn plain() -> Self {
        Self { stopwords: None }
    }

    /// Clean both strings with `stopwords` before comparing.
    pub fn cleaned(stopwords: Arc<dyn StopwordFilter>) -> Self {
        Self {
            stopwords: Some(stopwords),
        }
    }
}

impl EditDistance for Levenshtein {
    fn distance(&self, line: &str, query: &str) -> usize {
        match &self.stopwords {
            Some(filter) => strsim::levenshtein(&filter.clean(line), &filter.clean(query)),
            None => strsim::levenshtein(line, query),
        }
    }
}
