use futures::stream::{self, StreamExt};
use std::sync::Arc;

use crate::config::DocsConfig;
use crate::document::{self, Document, SearchMatch, SearchResult};
use crate::error::{RetrievalError, SearchError};
use crate::github::ContentSource;

/// Glob used to discover every markdown document in the repository
const MARKDOWN_PATTERN: &str = "*.md";

/// Document listing and keyword search over the configured repository.
///
/// Holds no state besides the content source handle, so every call sees the
/// current remote content.
#[derive(Clone)]
pub struct DocumentSearchService {
    source: Arc<dyn ContentSource>,
    config: DocsConfig,
}

impl DocumentSearchService {
    pub fn new(source: Arc<dyn ContentSource>, config: DocsConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    /// File names of the markdown documents in the guidelines directory.
    ///
    /// A failed listing is logged and yields an empty list.
    pub async fn list_guideline_documents(&self) -> Vec<String> {
        match self
            .source
            .list_directory(&self.config.guidelines_dir, &self.config.branch)
            .await
        {
            Ok(entries) => entries
                .into_iter()
                .filter(|entry| document::is_markdown(&entry.name))
                .map(|entry| entry.name)
                .collect(),
            Err(e) => {
                tracing::error!("Failed to list guideline documents: {}", e);
                Vec::new()
            }
        }
    }

    /// Content of the document at `path`, decoded as UTF-8
    pub async fn get_document_content(&self, path: &str) -> Result<String, RetrievalError> {
        let bytes = self
            .source
            .get_file_content(path, &self.config.branch)
            .await?;

        String::from_utf8(bytes).map_err(|e| RetrievalError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Fetch a document with its derived title and link
    pub async fn get_document(&self, path: &str) -> Result<Document, RetrievalError> {
        let content = self.get_document_content(path).await?;
        Ok(self.to_document(path, content))
    }

    /// Repository-relative paths of every markdown file, in host order
    pub async fn search_all_markdown_files(&self) -> Vec<String> {
        self.source
            .search_by_filename_pattern(MARKDOWN_PATTERN)
            .await
            .into_iter()
            .filter(|path| document::is_markdown(path))
            .collect()
    }

    /// Every markdown document of the repository with its content.
    ///
    /// Documents that cannot be fetched are skipped.
    pub async fn get_all_documents(&self) -> Vec<Document> {
        let paths = self.search_all_markdown_files().await;
        tracing::info!("Gathering {} markdown documents", paths.len());

        self.fetch_all(paths)
            .await
            .into_iter()
            .map(|(path, content)| self.to_document(&path, content))
            .collect()
    }

    /// Case-insensitive keyword search over every markdown document.
    ///
    /// Only an empty or blank query is reported as an error; documents that
    /// fail to load are skipped. Matches keep the order in which the host
    /// returned the paths.
    pub async fn search_documents(&self, query: &str) -> Result<SearchResult, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let paths = self.search_all_markdown_files().await;
        tracing::info!("Searching {} markdown documents for {:?}", paths.len(), query);

        let matches: Vec<SearchMatch> = self
            .fetch_all(paths)
            .await
            .into_iter()
            .filter(|(_, content)| document::contains_case_insensitive(content, query))
            .map(|(path, content)| SearchMatch {
                title: document::derive_title(&path),
                excerpt: document::build_excerpt(&content, query),
                url: self.config.document_url(&path),
                path,
            })
            .collect();

        tracing::info!("Found {} documents matching {:?}", matches.len(), query);
        Ok(SearchResult::new(query, matches))
    }

    /// Fetch the content of every path with bounded concurrency.
    ///
    /// Results come back in the order of `paths`; failed fetches are dropped.
    async fn fetch_all(&self, paths: Vec<String>) -> Vec<(String, String)> {
        let concurrency = self.config.max_concurrent_requests.max(1);

        stream::iter(paths)
            .map(|path| async move {
                match self.get_document_content(&path).await {
                    Ok(content) => Some((path, content)),
                    Err(e) => {
                        tracing::warn!("Skipping document {}: {}", path, e);
                        None
                    }
                }
            })
            .buffered(concurrency)
            .filter_map(|fetched| async move { fetched })
            .collect()
            .await
    }

    fn to_document(&self, path: &str, content: String) -> Document {
        Document {
            path: path.to_string(),
            title: document::derive_title(path),
            url: self.config.document_url(path),
            content,
        }
    }
}
