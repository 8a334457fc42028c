//! Result aggregation: deduplicate, order, cap.

use crate::types::Match;
use std::collections::HashSet;

/// Keep the first match for each distinct line text, stable-sort ascending by
/// score and keep at most `limit` entries.
pub fn aggregate(matches: Vec<Match>, limit: usize) -> Vec<Match> {
    let mut seen: HashSet<String> = HashSet::with_capacity(matches.len());
    let mut unique: Vec<Match> = matches
        .into_iter()
        .filter(|m| seen.insert(m.text.clone()))
        .collect();

    // sort_by is stable: equal scores keep first-seen order
    unique.sort_by(|a, b| a.score.total_cmp(&b.score));
    unique.truncate(limit);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn m(file: &str, text: &str, score: f32) -> Match {
        Match::new(Path::new(file), 0, text, text, score)
    }

    #[test]
    fn test_dedup_keeps_first_seen() {
        let out = aggregate(
            vec![m("/a.txt", "same line", 3.0), m("/b.txt", "same line", 1.0)],
            200,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].base_name, "a.txt");
        assert_eq!(out[0].score, 3.0);
    }

    #[test]
    fn test_sort_is_stable() {
        let out = aggregate(
            vec![
                m("/a.txt", "first", 2.0),
                m("/a.txt", "second", 1.0),
                m("/a.txt", "third", 2.0),
                m("/a.txt", "fourth", 0.5),
            ],
            200,
        );
        let texts: Vec<_> = out.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["fourth", "second", "first", "third"]);
    }

    #[test]
    fn test_truncates_after_sorting() {
        let input: Vec<_> = (0..250)
            .map(|i| m("/a.txt", &format!("line {i}"), (250 - i) as f32))
            .collect();
        let out = aggregate(input, 200);

        assert_eq!(out.len(), 200);
        assert_eq!(out[0].text, "line 249");
        assert!(out.windows(2).all(|w| w[0].score <= w[1].score));
    }
}
