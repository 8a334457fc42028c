//! Lexicon and suffix based part-of-speech tagger.
//!
//! Queries reach the tagger after stop-word removal, so most closed-class
//! words are already gone and the remaining tokens are overwhelmingly content
//! words. Unknown words default to singular nouns.

use super::{PosTag, TaggedToken, Tokenizer};
use crate::search::SearchResult;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

#[rustfmt::skip]
const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "some",
    "any", "no", "all", "both", "either", "neither",
];

#[rustfmt::skip]
const PREPOSITIONS: &[&str] = &[
    "about", "above", "across", "after", "against", "along", "among", "around",
    "at", "before", "behind", "below", "beneath", "beside", "between", "beyond",
    "by", "despite", "down", "during", "for", "from", "in", "inside", "into",
    "like", "near", "of", "off", "on", "onto", "out", "over", "per", "since",
    "through", "to", "toward", "towards", "under", "until", "up", "upon", "via",
    "with", "within", "without",
];

#[rustfmt::skip]
const PRONOUNS: &[&str] = &[
    "i", "me", "my", "mine", "you", "your", "yours", "he", "him", "his", "she",
    "her", "hers", "it", "its", "we", "us", "our", "ours", "they", "them",
    "their", "theirs", "who", "whom", "whose", "what", "which",
];

#[rustfmt::skip]
const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "so", "yet", "if", "because", "although",
    "though", "while", "whereas", "unless",
];

#[rustfmt::skip]
const VERBS: &[&str] = &[
    "be", "have", "do", "go", "get", "make", "take", "give", "find", "know",
    "see", "show", "become", "begin", "bind", "bring", "build", "cure",
    "contain", "develop", "diagnose", "eat", "explain", "affect", "apply",
    "identify", "increase", "infect", "inhibit", "kill", "lead", "occur",
    "prevent", "produce", "protect", "reduce", "release", "remove", "require",
    "spread", "stop", "transmit", "treat", "write", "read",
];

#[rustfmt::skip]
const ADJECTIVES: &[&str] = &[
    "acute", "bad", "big", "black", "blue", "chronic", "common", "deep", "early",
    "fast", "good", "great", "green", "high", "hot", "large", "late", "long",
    "low", "mild", "new", "normal", "old", "primary", "rare", "red", "severe",
    "short", "slow", "small", "strong", "weak", "white", "young",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ical", "ish"];

/// Default English tagger.
#[derive(Debug, Clone)]
pub struct RuleTagger {
    determiners: HashSet<&'static str>,
    prepositions: HashSet<&'static str>,
    pronouns: HashSet<&'static str>,
    conjunctions: HashSet<&'static str>,
    verbs: HashSet<&'static str>,
    adjectives: HashSet<&'static str>,
}

impl RuleTagger {
    pub fn new() -> Self {
        let set = |words: &[&'static str]| words.iter().copied().collect::<HashSet<_>>();
        Self {
            determiners: set(DETERMINERS),
            prepositions: set(PREPOSITIONS),
            pronouns: set(PRONOUNS),
            conjunctions: set(CONJUNCTIONS),
            verbs: set(VERBS),
            adjectives: set(ADJECTIVES),
        }
    }

    /// Tag a single word.
    pub fn tag(&self, word: &str) -> PosTag {
        let lower = word.to_lowercase();
        let w = lower.as_str();
        let len = w.chars().count();

        if w.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return PosTag::Number;
        }
        if self.determiners.contains(w) {
            return PosTag::Determiner;
        }
        if self.prepositions.contains(w) {
            return PosTag::Preposition;
        }
        if self.pronouns.contains(w) {
            return PosTag::Pronoun;
        }
        if self.conjunctions.contains(w) {
            return PosTag::Conjunction;
        }
        if self.verbs.contains(w) {
            return PosTag::Verb;
        }
        if self.is_third_person(w) {
            return PosTag::VerbThirdPerson;
        }
        if self.adjectives.contains(w) {
            return PosTag::Adjective;
        }

        if len > 4 && w.ends_with("ly") {
            return PosTag::Adverb;
        }
        if len > 5 && w.ends_with("ing") {
            return PosTag::Gerund;
        }
        if len > 4 && w.ends_with("ed") {
            return PosTag::VerbPast;
        }
        if ADJECTIVE_SUFFIXES
            .iter()
            .any(|suffix| len > suffix.len() + 2 && w.ends_with(suffix))
        {
            return PosTag::Adjective;
        }
        if is_plural(w, len) {
            return PosTag::PluralNoun;
        }

        PosTag::Noun
    }

    fn is_third_person(&self, w: &str) -> bool {
        if let Some(stem) = w.strip_suffix("ies") {
            return self.verbs.contains(format!("{stem}y").as_str());
        }
        if let Some(stem) = w.strip_suffix("es")
            && self.verbs.contains(stem)
        {
            return true;
        }
        w.strip_suffix('s')
            .is_some_and(|stem| self.verbs.contains(stem))
    }
}

impl Default for RuleTagger {
    fn default() -> Self {
        Self::new()
    }
}

fn is_plural(w: &str, len: usize) -> bool {
    len > 3
        && w.ends_with('s')
        && !["ss", "us", "is", "ous"].iter().any(|end| w.ends_with(end))
}

impl Tokenizer for RuleTagger {
    fn analyze(&self, text: &str) -> SearchResult<Vec<TaggedToken>> {
        Ok(text
            .unicode_words()
            .map(|word| TaggedToken::new(word, self.tag(word)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(text: &str) -> Vec<(String, &'static str)> {
        RuleTagger::new()
            .analyze(text)
            .unwrap()
            .into_iter()
            .map(|t| (t.text, t.tag.as_str()))
            .collect()
    }

    #[test]
    fn test_content_words() {
        assert_eq!(
            tags("malaria parasite"),
            vec![("malaria".to_string(), "NN"), ("parasite".to_string(), "NN")]
        );
        assert_eq!(tags("mosquitoes")[0].1, "NNS");
        assert_eq!(tags("severe")[0].1, "JJ");
        assert_eq!(tags("infectious")[0].1, "JJ");
    }

    #[test]
    fn test_verbs() {
        let tagger = RuleTagger::new();
        assert_eq!(tagger.tag("transmit"), PosTag::Verb);
        assert_eq!(tagger.tag("transmits"), PosTag::VerbThirdPerson);
        assert_eq!(tagger.tag("reduces"), PosTag::VerbThirdPerson);
        assert_eq!(tagger.tag("applies"), PosTag::VerbThirdPerson);
        assert_eq!(tagger.tag("transmitted"), PosTag::VerbPast);
        assert_eq!(tagger.tag("spreading"), PosTag::Gerund);
    }

    #[test]
    fn test_closed_class_and_numbers() {
        let tagger = RuleTagger::new();
        assert_eq!(tagger.tag("The"), PosTag::Determiner);
        assert_eq!(tagger.tag("between"), PosTag::Preposition);
        assert_eq!(tagger.tag("they"), PosTag::Pronoun);
        assert_eq!(tagger.tag("and"), PosTag::Conjunction);
        assert_eq!(tagger.tag("1984"), PosTag::Number);
        assert_eq!(tagger.tag("quickly"), PosTag::Adverb);
    }

    #[test]
    fn test_singular_endings_are_not_plural() {
        let tagger = RuleTagger::new();
        assert_eq!(tagger.tag("glass"), PosTag::Noun);
        assert_eq!(tagger.tag("virus"), PosTag::Noun);
        assert_eq!(tagger.tag("diagnosis"), PosTag::Noun);
        assert_eq!(tagger.tag("bus"), PosTag::Noun);
    }

    #[test]
    fn test_punctuation_is_dropped() {
        assert_eq!(tags("parasite, host!").len(), 2);
    }
}
