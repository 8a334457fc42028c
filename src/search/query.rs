//! Per-call query analysis.

use crate::search::SearchResult;
use crate::search::analysis::{StopwordFilter, Tokenizer};

/// Lowest score a non-exact line can get. Exact scores stay strictly below it.
pub const FUZZY_SCORE_FLOOR: f32 = 1.0;

/// Upper bound on exact scores, for very long lines or a small divisor.
const EXACT_SCORE_CEILING: f32 = 0.99;

/// Analysis of one query, built once per search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    /// The query as the caller wrote it.
    pub original: String,
    /// Stop words removed, lowercased. Used for the exact-match test and the
    /// distance threshold.
    pub normalized: String,
    /// Keywords joined by spaces, or `normalized` when analysis found none.
    /// Lines are measured against this string.
    pub comparison: String,
    /// Noun, verb and adjective tokens, first occurrence order, no repeats.
    pub keywords: Vec<String>,
    /// The noun subset of `keywords`.
    pub nouns: Vec<String>,
}

impl QueryContext {
    /// Normalize and tag `query`.
    ///
    /// Fails only if the tokenizer fails.
    pub fn analyze(
        query: &str,
        stopwords: &dyn StopwordFilter,
        tokenizer: &dyn Tokenizer,
    ) -> SearchResult<Self> {
        let normalized = stopwords.clean(query).to_lowercase();
        let tokens = tokenizer.analyze(&normalized)?;

        let mut keywords: Vec<String> = Vec::new();
        let mut nouns: Vec<String> = Vec::new();
        for token in tokens {
            if token.tag.is_noun() && !nouns.contains(&token.text) {
                nouns.push(token.text.clone());
            }
            if token.tag.is_keyword() && !keywords.contains(&token.text) {
                keywords.push(token.text);
            }
        }

        let comparison = if keywords.is_empty() {
            if !normalized.is_empty() {
                keywords.push(normalized.clone());
            }
            normalized.clone()
        } else {
            keywords.join(" ")
        };

        tracing::debug!(
            target: "search",
            "Query {:?}: normalized={:?} keywords={:?} nouns={:?}",
            query,
            normalized,
            keywords,
            nouns
        );

        Ok(Self {
            original: query.to_string(),
            normalized,
            comparison,
            keywords,
            nouns,
        })
    }

    /// Whether nothing searchable is left after normalization.
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// A line is considered only if it contains a keyword and a noun.
    ///
    /// Both tests are case-sensitive against the raw line while the tokens
    /// are lowercase, so a capitalized occurrence alone does not qualify.
    pub fn is_candidate(&self, line: &str) -> bool {
        self.keywords.iter().any(|k| line.contains(k.as_str()))
            && self.nouns.iter().any(|n| line.contains(n.as_str()))
    }

    /// Whether the lowercased line contains the whole normalized query.
    pub fn is_exact(&self, line: &str) -> bool {
        line.to_lowercase().contains(&self.normalized)
    }

    /// Largest distance (exclusive) still accepted, in characters.
    pub fn threshold(&self, cap: usize) -> usize {
        self.normalized.chars().count().min(cap)
    }

    /// Score of an exact match: `(query chars + line chars) / divisor`,
    /// capped below [`FUZZY_SCORE_FLOOR`].
    pub fn exact_score(&self, line: &str, divisor: f32) -> f32 {
        let raw = (self.normalized.chars().count() + line.chars().count()) as f32 / divisor;
        raw.min(EXACT_SCORE_CEILING)
    }

    /// Score of a line accepted on edit distance.
    ///
    /// Distances are measured on stop-word-cleaned text, so a non-exact line
    /// can clean down to the query itself. Such a line still ranks after
    /// every exact match.
    pub fn fuzzy_score(distance: usize) -> f32 {
        (distance as f32).max(FUZZY_SCORE_FLOOR)
    }
}
