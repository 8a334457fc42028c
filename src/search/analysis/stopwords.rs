use super::StopwordFilter;
use std::collections::HashSet;

#[rustfmt::skip]
const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
    "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being",
    "below", "between", "both", "but", "by", "can", "cannot", "could", "couldn't",
    "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down", "during",
    "each", "few", "for", "from", "further", "had", "hadn't", "has", "hasn't",
    "have", "haven't", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "isn't", "it", "it's",
    "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "ought", "our",
    "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "shouldn't", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we",
    "were", "weren't", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "won't", "would", "wouldn't", "you", "your", "yours",
    "yourself", "yourselves",
];

/// English stop words.
#[derive(Debug, Clone)]
pub struct EnglishStopwords {
    words: HashSet<&'static str>,
}

impl EnglishStopwords {
    pub fn new() -> Self {
        Self {
            words: ENGLISH.iter().copied().collect(),
        }
    }

    /// Filter for a language code. Only English is bundled.
    pub fn for_language(language: &str) -> Option<Self> {
        match language.to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Self::new()),
            _ => None,
        }
    }
}

impl Default for EnglishStopwords {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwordFilter for EnglishStopwords {
    fn language(&self) -> &str {
        "en"
    }

    fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_words_are_stopwords() {
        let filter = EnglishStopwords::new();
        for word in ["the", "of", "is", "a", "what", "don't"] {
            assert!(filter.is_stopword(word), "{word} should be a stop word");
        }
        for word in ["malaria", "cause", "parasite", "treatment"] {
            assert!(!filter.is_stopword(word), "{word} should be kept");
        }
    }

    #[test]
    fn test_for_language() {
        assert!(EnglishStopwords::for_language("EN").is_some());
        assert!(EnglishStopwords::for_language("fr").is_none());
    }

    #[test]
    fn test_clean_keeps_word_order() {
        let filter = EnglishStopwords::new();
        assert_eq!(
            filter.clean("What is the treatment of severe malaria?"),
            "treatment severe malaria"
        );
    }
}
