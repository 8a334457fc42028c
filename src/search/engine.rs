//! Index-wide query engine.
//!
//! One producer walks the index and sends in-scope pages to a fixed pool of
//! scoring workers over a bounded channel. Workers send matches to a result
//! channel drained by the calling thread. The job channel closes when the
//! producer finishes; the result channel closes only once every worker has
//! dropped its sender, so the drain never ends while pages are still being
//! scored.
//!
//! No cancellation: once started a query runs to completion.

use crate::config::SearchConfig;
use crate::search::analysis::{
    EditDistance, EnglishStopwords, Levenshtein, RuleTagger, StopwordFilter, Tokenizer,
};
use crate::search::context::line_context;
use crate::search::query::QueryContext;
use crate::search::rank::aggregate;
use crate::search::toc::TocDetector;
use crate::search::{SearchError, SearchResult};
use crate::types::{DocumentId, IndexKey, Match, SearchIndex};
use crossbeam_channel::bounded;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

/// Tunables for [`SearchEngine`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub scoring_workers: usize,
    pub max_results: usize,
    pub distance_cap: usize,
    pub context_lines: usize,
    pub exact_score_divisor: f32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            scoring_workers: 10,
            max_results: 200,
            distance_cap: 10,
            context_lines: 5,
            exact_score_divisor: 100.0,
        }
    }
}

impl SearchOptions {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            scoring_workers: config.scoring_workers.max(1),
            max_results: config.max_results,
            distance_cap: config.distance_cap,
            context_lines: config.context_lines,
            exact_score_divisor: if config.exact_score_divisor > 0.0 {
                config.exact_score_divisor
            } else {
                100.0
            },
        }
    }
}

/// Fuzzy, part-of-speech guided search over a [`SearchIndex`].
///
/// Holds no per-query state and can be shared between threads.
#[derive(Clone)]
pub struct SearchEngine {
    options: SearchOptions,
    tokenizer: Arc<dyn Tokenizer>,
    stopwords: Arc<dyn StopwordFilter>,
    distance: Arc<dyn EditDistance>,
    toc: TocDetector,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

impl SearchEngine {
    /// Engine with the bundled English collaborators.
    pub fn new(options: SearchOptions) -> Self {
        let stopwords: Arc<dyn StopwordFilter> = Arc::new(EnglishStopwords::new());
        Self {
            options,
            tokenizer: Arc::new(RuleTagger::new()),
            distance: Arc::new(Levenshtein::cleaned(Arc::clone(&stopwords))),
            stopwords,
            toc: TocDetector::default(),
        }
    }

    /// Engine configured from `[search]` settings.
    ///
    /// Fails on an unsupported language or an invalid TOC pattern.
    pub fn from_config(config: &SearchConfig) -> SearchResult<Self> {
        let stopwords = EnglishStopwords::for_language(&config.language).ok_or_else(|| {
            SearchError::Analysis(format!("unsupported language: {}", config.language))
        })?;
        let stopwords: Arc<dyn StopwordFilter> = Arc::new(stopwords);

        Ok(Self {
            options: SearchOptions::from_config(config),
            tokenizer: Arc::new(RuleTagger::new()),
            distance: Arc::new(Levenshtein::cleaned(Arc::clone(&stopwords))),
            stopwords,
            toc: TocDetector::new(&config.toc_pattern)?
                .with_density(config.toc_min_lines, config.toc_min_ratio),
        })
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Replace the stop-word filter used for both normalization and the
    /// cleaned edit distance. A custom distance set earlier is replaced too;
    /// call [`with_distance`](Self::with_distance) afterwards to keep one.
    pub fn with_stopwords(mut self, stopwords: Arc<dyn StopwordFilter>) -> Self {
        self.distance = Arc::new(Levenshtein::cleaned(Arc::clone(&stopwords)));
        self.stopwords = stopwords;
        self
    }

    pub fn with_distance(mut self, distance: Arc<dyn EditDistance>) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_toc_detector(mut self, toc: TocDetector) -> Self {
        self.toc = toc;
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Analyze a query without running it.
    pub fn analyze(&self, query: &str) -> SearchResult<QueryContext> {
        QueryContext::analyze(query, self.stopwords.as_ref(), self.tokenizer.as_ref())
    }

    /// Search `index` for `query`.
    ///
    /// A non-empty `documents` list restricts the search to those document
    /// ids. Results are deduplicated by line text, sorted ascending by score
    /// and capped at `max_results`.
    pub fn search(
        &self,
        query: &str,
        index: &SearchIndex,
        documents: &[DocumentId],
    ) -> SearchResult<Vec<Match>> {
        let ctx = self.analyze(query)?;
        crate::debug_event!(
            "search",
            "query analyzed",
            "keywords={:?} nouns={:?}",
            ctx.keywords,
            ctx.nouns
        );
        if ctx.is_empty() {
            tracing::debug!(target: "search", "Query {query:?} is empty after normalization");
            return Ok(Vec::new());
        }

        let scope: HashSet<DocumentId> = documents.iter().copied().collect();
        let workers = self.options.scoring_workers.max(1);
        let (job_tx, job_rx) = bounded::<(usize, &IndexKey, &str)>(workers * 4);
        let (result_tx, result_rx) = bounded::<(usize, Vec<Match>)>(workers * 4);

        let mut collected: Vec<(usize, Vec<Match>)> = thread::scope(|s| {
            let producer = s.spawn(move || {
                let mut sent = 0usize;
                for (ordinal, (key, text)) in index.iter().enumerate() {
                    if !scope.is_empty() && !scope.contains(&key.document_id()) {
                        continue;
                    }
                    if job_tx.send((ordinal, key, text)).is_err() {
                        break;
                    }
                    sent += 1;
                }
                sent
            });

            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let ctx = &ctx;
                s.spawn(move || {
                    for (ordinal, key, text) in job_rx {
                        let matches = self.score_page(ctx, key, text);
                        if !matches.is_empty() && result_tx.send((ordinal, matches)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(result_tx);

            let collected: Vec<_> = result_rx.iter().collect();
            match producer.join() {
                Ok(pages) => tracing::debug!(target: "search", "Scored {pages} pages for {query:?}"),
                Err(_) => tracing::warn!(target: "search", "Page producer panicked; results are partial"),
            }
            collected
        });

        // Index order gives "first seen" a meaning independent of scheduling
        collected.sort_by_key(|(ordinal, _)| *ordinal);
        let matches: Vec<Match> = collected.into_iter().flat_map(|(_, m)| m).collect();
        let total = matches.len();
        let results = aggregate(matches, self.options.max_results);

        tracing::info!(
            target: "search",
            "Query {:?}: {} candidate lines, {} results",
            query,
            total,
            results.len()
        );
        Ok(results)
    }

    /// Score every line of one page.
    fn score_page(&self, ctx: &QueryContext, key: &IndexKey, text: &str) -> Vec<Match> {
        if self.toc.is_toc_page(text) {
            tracing::trace!(
                target: "search",
                "Skipping index-like page {} of {}",
                key.page_num,
                key.filename.display()
            );
            return Vec::new();
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let threshold = ctx.threshold(self.options.distance_cap);
        let mut matches = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if !ctx.is_candidate(line) {
                continue;
            }

            let exact = ctx.is_exact(line);
            let distance = self.distance.distance(line, &ctx.comparison);
            if !exact && distance >= threshold {
                continue;
            }

            let score = if exact {
                ctx.exact_score(line, self.options.exact_score_divisor)
            } else {
                QueryContext::fuzzy_score(distance)
            };
            let context = line_context(&lines, i, self.options.context_lines);
            matches.push(Match::new(&key.filename, key.page_num, *line, context, score));
        }

        matches
    }
}

/// Search with the default engine.
pub fn search(query: &str, index: &SearchIndex, documents: &[DocumentId]) -> SearchResult<Vec<Match>> {
    SearchEngine::default().search(query, index, documents)
}
