use guideline_docs_mcp::config::DocsConfig;
use guideline_docs_mcp::document::{
    build_excerpt, contains_case_insensitive, derive_title, find_case_insensitive, is_markdown, SearchResult,
};

#[test]
fn test_derive_title() {
    assert_eq!(derive_title("doc/Meeting-Notes_2024.md"), "Meeting Notes 2024");
    assert_eq!(derive_title("a.md"), "a");
    assert_eq!(derive_title("nested/dir/plain"), "plain");
    assert_eq!(derive_title("doc/archive.md.bak"), "archive.md.bak");
}

#[test]
fn test_is_markdown() {
    assert!(is_markdown("README.md"));
    assert!(is_markdown("doc/guide.md"));
    assert!(!is_markdown("doc/guide.mdx"));
    assert!(!is_markdown("doc/guide.MD"));
}

#[test]
fn test_find_case_insensitive_returns_char_index() {
    assert_eq!(find_case_insensitive("Hello World", "world"), Some(6));
    assert_eq!(find_case_insensitive("Grüße aus Zürich", "ZÜRICH"), Some(10));
    assert_eq!(find_case_insensitive("abc", "d"), None);
    assert_eq!(find_case_insensitive("", "a"), None);
}

#[test]
fn test_contains_case_insensitive() {
    assert!(contains_case_insensitive("Onion Architecture", "onion"));
    assert!(!contains_case_insensitive("Onion Architecture", "hexagonal"));
}

#[test]
fn test_excerpt_short_content_is_whole() {
    assert_eq!(build_excerpt("hello world", "hello"), "hello world");
}

#[test]
fn test_excerpt_marks_cut_at_start_only() {
    let content = format!("{}match tail", "x".repeat(150));

    let excerpt = build_excerpt(&content, "match");

    assert_eq!(excerpt, format!("...{}match tail", "x".repeat(100)));
}

#[test]
fn test_excerpt_marks_cut_at_end_only() {
    let content = format!("match{}", "y".repeat(150));

    let excerpt = build_excerpt(&content, "MATCH");

    assert_eq!(excerpt, format!("match{}...", "y".repeat(100)));
}

#[test]
fn test_excerpt_window_is_bounded_and_contains_query() {
    let content = format!("{} Clean Code {}", "left ".repeat(60), "right ".repeat(60));
    let query = "clean code";

    let excerpt = build_excerpt(&content, query);
    let body = excerpt.trim_start_matches("...").trim_end_matches("...");

    assert!(body.chars().count() <= 200 + query.chars().count());
    assert!(contains_case_insensitive(body, query));
}

#[test]
fn test_excerpt_counts_characters_not_bytes() {
    let content = format!("{}needle", "ä".repeat(120));

    let excerpt = build_excerpt(&content, "needle");

    assert_eq!(excerpt, format!("...{}needle", "ä".repeat(100)));
}

#[test]
fn test_excerpt_falls_back_to_prefix_when_query_absent() {
    assert_eq!(build_excerpt("short text", "missing"), "short text");

    let long = "z".repeat(250);
    assert_eq!(build_excerpt(&long, "missing"), format!("{}...", "z".repeat(200)));
}

#[test]
fn test_search_result_serializes_total_matches() {
    let result = SearchResult::new("anything", Vec::new());

    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value, serde_json::json!({ "query": "anything", "matches": [], "totalMatches": 0 }));
}

#[test]
fn test_document_url_shape() {
    let config = DocsConfig::default();

    assert_eq!(
        config.document_url("doc/a.md"),
        "https://github.com/mariusreusch/stammtisch-logik/blob/main/doc/a.md"
    );
    assert_eq!(config.full_name(), "mariusreusch/stammtisch-logik");
}
