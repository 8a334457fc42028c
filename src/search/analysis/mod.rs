//! Linguistic collaborators used by the query engine.
//!
//! The engine only talks to three narrow traits so that a different tagger,
//! stop-word list or distance metric can be plugged in without touching the
//! search loop:
//!
//! - [`Tokenizer`]: text to an ordered sequence of `(token, tag)` pairs
//! - [`StopwordFilter`]: stop-word removal and normalization
//! - [`EditDistance`]: distance between a line and the query
//!
//! The bundled implementations are English only.

mod distance;
mod stopwords;
mod tagger;

pub use distance::Levenshtein;
pub use stopwords::EnglishStopwords;
pub use tagger::RuleTagger;

use crate::search::SearchResult;
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

/// Grammatical category of a token, named after Penn Treebank tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    /// NN
    Noun,
    /// NNS
    PluralNoun,
    /// VB
    Verb,
    /// VBZ
    VerbThirdPerson,
    /// VBD
    VerbPast,
    /// VBG
    Gerund,
    /// JJ
    Adjective,
    /// RB
    Adverb,
    /// CD
    Number,
    /// DT
    Determiner,
    /// IN
    Preposition,
    /// PRP
    Pronoun,
    /// CC
    Conjunction,
    Other,
}

impl PosTag {
    /// Penn Treebank spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            PosTag::Noun => "NN",
            PosTag::PluralNoun => "NNS",
            PosTag::Verb => "VB",
            PosTag::VerbThirdPerson => "VBZ",
            PosTag::VerbPast => "VBD",
            PosTag::Gerund => "VBG",
            PosTag::Adjective => "JJ",
            PosTag::Adverb => "RB",
            PosTag::Number => "CD",
            PosTag::Determiner => "DT",
            PosTag::Preposition => "IN",
            PosTag::Pronoun => "PRP",
            PosTag::Conjunction => "CC",
            PosTag::Other => "X",
        }
    }

    /// Tags whose tokens become query keywords.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            PosTag::Noun
                | PosTag::PluralNoun
                | PosTag::Verb
                | PosTag::VerbThirdPerson
                | PosTag::Adjective
        )
    }

    pub fn is_noun(&self) -> bool {
        matches!(self, PosTag::Noun | PosTag::PluralNoun)
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token with its grammatical tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub tag: PosTag,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, tag: PosTag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }
}

/// Tokenizes and part-of-speech tags text.
pub trait Tokenizer: Send + Sync {
    /// Tokens in input order. Failure aborts the query that asked for it.
    fn analyze(&self, text: &str) -> SearchResult<Vec<TaggedToken>>;
}

/// Stop-word removal for one language.
pub trait StopwordFilter: Send + Sync {
    /// Language code, e.g. `"en"`.
    fn language(&self) -> &str;

    /// Whether the lowercase `word` is a stop word.
    fn is_stopword(&self, word: &str) -> bool;

    /// Lowercase `text`, split it into words, drop stop words and punctuation,
    /// and join what is left with single spaces.
    fn clean(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let mut out = String::with_capacity(lower.len());
        for word in lower.unicode_words().filter(|w| !self.is_stopword(w)) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }
}

/// Distance between a page line and the comparison query.
pub trait EditDistance: Send + Sync {
    fn distance(&self, line: &str, query: &str) -> usize;
}
