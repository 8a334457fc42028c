//! Snippet construction around matched lines.

/// Build the snippet for the line at `index`.
///
/// Takes up to `radius` lines on each side, clipped to the page, joins them
/// with spaces and drops everything before the first uppercase letter so the
/// snippet tends to start at a sentence. Without any uppercase letter the
/// joined text is returned as is.
pub fn line_context(lines: &[&str], index: usize, radius: usize) -> String {
    if lines.is_empty() {
        return String::new();
    }

    let index = index.min(lines.len() - 1);
    let start = index.saturating_sub(radius);
    let end = index.saturating_add(radius).min(lines.len() - 1);
    let joined = lines[start..=end].join(" ");

    match joined.char_indices().find(|(_, c)| c.is_uppercase()) {
        Some((pos, _)) => joined[pos..].to_string(),
        None => joined,
    }
}
