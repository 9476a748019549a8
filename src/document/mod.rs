use serde::{Deserialize, Serialize};

/// Suffix that marks a file as a markdown document
pub const MARKDOWN_SUFFIX: &str = ".md";

/// Characters of context kept on each side of a match
const EXCERPT_CONTEXT: usize = 100;
/// Length of the excerpt when the query cannot be located
const EXCERPT_FALLBACK_LEN: usize = 200;
const ELLIPSIS: &str = "...";

/// Represents a document fetched from the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub path: String,
    pub title: String,
    pub url: String,
    pub content: String,
}

/// A document that contains the searched keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub path: String,
    pub title: String,
    pub excerpt: String,
    pub url: String,
}

/// Outcome of a keyword search, matches in discovery order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub query: String,
    pub matches: Vec<SearchMatch>,
    pub total_matches: usize,
}

impl SearchResult {
    pub fn new(query: &str, matches: Vec<SearchMatch>) -> Self {
        Self {
            query: query.to_string(),
            total_matches: matches.len(),
            matches,
        }
    }
}

/// Check if a file name or path denotes a markdown document
pub fn is_markdown(name: &str) -> bool {
    name.ends_with(MARKDOWN_SUFFIX)
}

/// Derive a human readable title from a path.
///
/// `doc/Meeting-Notes_2024.md` becomes `Meeting Notes 2024`.
pub fn derive_title(path: &str) -> String {
    let filename = path.rsplit('/').next().unwrap_or(path);
    let stem = filename.strip_suffix(MARKDOWN_SUFFIX).unwrap_or(filename);
    stem.replace(['-', '_'], " ")
}

/// Find the first case-insensitive occurrence of `needle` in `haystack`.
///
/// Returns the index in chars (not bytes) of `haystack`. Characters are
/// compared through their lowercase expansion, so the index always points
/// into the original text even when lowercasing changes its length.
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Some(0);
    }

    let folded: Vec<(usize, char)> = haystack
        .chars()
        .enumerate()
        .flat_map(|(index, c)| c.to_lowercase().map(move |lower| (index, lower)))
        .collect();

    folded
        .windows(needle.len())
        .enumerate()
        .find(|(position, window)| {
            // a match has to begin on a whole character
            let aligned = *position == 0 || folded[position - 1].0 != window[0].0;
            aligned && window.iter().map(|(_, c)| *c).eq(needle.iter().copied())
        })
        .map(|(_, window)| window[0].0)
}

/// Case-insensitive substring test
pub fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    find_case_insensitive(haystack, needle).is_some()
}

/// Build a bounded excerpt around the first occurrence of `query`.
///
/// The window spans up to 100 characters on each side of the match and is
/// marked with `...` where it was cut. If the query is absent the first 200
/// characters are returned instead.
pub fn build_excerpt(content: &str, query: &str) -> String {
    let chars: Vec<char> = content.chars().collect();

    let Some(index) = find_case_insensitive(content, query) else {
        let mut excerpt: String = chars.iter().take(EXCERPT_FALLBACK_LEN).collect();
        if chars.len() > EXCERPT_FALLBACK_LEN {
            excerpt.push_str(ELLIPSIS);
        }
        return excerpt;
    };

    let start = index.saturating_sub(EXCERPT_CONTEXT);
    let end = (index + query.chars().count() + EXCERPT_CONTEXT).min(chars.len());

    let mut excerpt = String::new();
    if start > 0 {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt.extend(&chars[start..end]);
    if end < chars.len() {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt
}
