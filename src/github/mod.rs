use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use octocrab::models::Code;
use octocrab::models::repos::ContentItems;
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout, Duration};

use crate::config::DocsConfig;
use crate::error::RetrievalError;

/// Upper bound of the delay between two attempts
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    pub is_file: bool,
}

/// Read-only access to the host that stores the documents.
///
/// Implementations perform mechanical list/fetch/search calls only and keep
/// no state between calls.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// List the entries of `path` at `git_ref`. An empty directory is not an error.
    async fn list_directory(&self, path: &str, git_ref: &str) -> Result<Vec<DirectoryEntry>, RetrievalError>;

    /// Raw bytes of the file at `path` and `git_ref`
    async fn get_file_content(&self, path: &str, git_ref: &str) -> Result<Vec<u8>, RetrievalError>;

    /// Repository-wide search by filename glob. Failures degrade to an empty list.
    async fn search_by_filename_pattern(&self, pattern: &str) -> Vec<String>;
}

/// GitHub repository connector that handles authentication and repository operations
#[derive(Clone)]
pub struct GitHubConnector {
    client: Arc<Octocrab>,
    owner: String,
    pub repo: String,
    // Semaphore to limit concurrent requests to GitHub API
    request_semaphore: Arc<Semaphore>,
    // Counter for API requests to track rate limiting
    request_count: Arc<AtomicUsize>,
    fetch_timeout: Duration,
    max_retries: u32,
}

impl GitHubConnector {
    pub fn new(config: &DocsConfig, token: Option<&str>) -> Result<Self> {
        // Validate parameters
        if config.owner.trim().is_empty() {
            anyhow::bail!("Owner cannot be empty");
        }
        if config.repo.trim().is_empty() {
            anyhow::bail!("Repository name cannot be empty");
        }
        if config.max_concurrent_requests == 0 {
            anyhow::bail!("At least one concurrent request must be allowed");
        }
        if config.fetch_timeout.is_zero() {
            anyhow::bail!("Fetch timeout must be greater than zero");
        }

        // Retries are handled by `call`, which knows which failures are transient
        let mut builder = Octocrab::builder().add_retry_config(RetryConfig::None);

        if let Some(api_base_url) = &config.api_base_url {
            builder = builder.base_uri(api_base_url.as_str())?;
        }

        // Set personal access token if provided
        if let Some(token) = token {
            if token.trim().is_empty() {
                anyhow::bail!("Personal access token cannot be empty");
            }
            tracing::info!("Using personal access token for GitHub API");
            builder = builder.personal_token(token.to_string());
        }

        let client = builder.build()?;

        Ok(Self {
            client: Arc::new(client),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            request_semaphore: Arc::new(Semaphore::new(config.max_concurrent_requests)),
            request_count: Arc::new(AtomicUsize::new(0)),
            fetch_timeout: config.fetch_timeout,
            max_retries: config.max_retries,
        })
    }

    /// Number of requests issued so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Contents API call shared by directory listings and file fetches
    async fn fetch_content(&self, path: &str, git_ref: &str) -> Result<ContentItems, RetrievalError> {
        self.call(path, move || async move {
            self.client
                .repos(&self.owner, &self.repo)
                .get_content()
                .path(path)
                .r#ref(git_ref)
                .send()
                .await
                .map_err(|e| classify(path, e))
        })
        .await
    }

    /// Run one remote call under the concurrency limit, with a timeout per
    /// attempt and exponential backoff on transient failures
    async fn call<T, F, Fut>(&self, target: &str, op: F) -> Result<T, RetrievalError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, RetrievalError>>,
    {
        // Acquire a permit from the semaphore to limit concurrent requests
        let _permit = self.request_semaphore.acquire().await.map_err(|e| RetrievalError::Transport {
            path: target.to_string(),
            reason: e.to_string(),
        })?;

        let mut retry_count = 0;
        let mut delay = Duration::from_millis(100);

        loop {
            let request_number = self.request_count.fetch_add(1, Ordering::SeqCst);
            tracing::debug!("GitHub request #{} for {}", request_number, target);

            let outcome = match timeout(self.fetch_timeout, op()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(RetrievalError::Timeout(target.to_string())),
            };

            match outcome {
                Err(e) if e.is_transient() && retry_count < self.max_retries => {
                    retry_count += 1;
                    tracing::warn!("Retry {}/{} for {}: {}", retry_count, self.max_retries, target, e);
                    sleep(delay).await;
                    // Exponential backoff: double the delay for each retry
                    delay = (delay * 2).min(MAX_BACKOFF);
                }
                other => return other,
            }
        }
    }
}

/// Map an octocrab failure onto the retrieval taxonomy.
///
/// Client errors other than request timeout (408) and rate limiting (429)
/// are permanent; server errors and network faults are worth retrying.
fn classify(path: &str, error: octocrab::Error) -> RetrievalError {
    if let octocrab::Error::GitHub { source, .. } = &error {
        match source.status_code.as_u16() {
            404 => return RetrievalError::NotFound(path.to_string()),
            408 | 429 => {}
            status @ 400..=499 => {
                return RetrievalError::Rejected {
                    path: path.to_string(),
                    status,
                }
            }
            _ => {}
        }
    }

    RetrievalError::Transport {
        path: path.to_string(),
        reason: error.to_string(),
    }
}

#[async_trait]
impl ContentSource for GitHubConnector {
    async fn list_directory(&self, path: &str, git_ref: &str) -> Result<Vec<DirectoryEntry>, RetrievalError> {
        let content = self.fetch_content(path, git_ref).await?;

        Ok(content
            .items
            .into_iter()
            .map(|item| DirectoryEntry {
                is_file: item.r#type == "file",
                name: item.name,
                path: item.path,
            })
            .collect())
    }

    async fn get_file_content(&self, path: &str, git_ref: &str) -> Result<Vec<u8>, RetrievalError> {
        let content = self.fetch_content(path, git_ref).await?;

        // A directory path yields a listing rather than a single file
        let mut items = content.items;
        if items.len() != 1 || items[0].r#type != "file" {
            return Err(RetrievalError::NotFound(path.to_string()));
        }
        let file = items.remove(0);

        // Files over 1 MB come back with an empty body and encoding "none"
        if file.encoding.as_deref() != Some("base64") {
            return Err(RetrievalError::Decode {
                path: path.to_string(),
                reason: format!("unsupported encoding {:?}", file.encoding.as_deref().unwrap_or("none")),
            });
        }

        let encoded = file.content.ok_or_else(|| RetrievalError::Decode {
            path: path.to_string(),
            reason: "no inline content returned".to_string(),
        })?;

        STANDARD
            .decode(encoded.replace('\n', ""))
            .map_err(|e| RetrievalError::Decode {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    async fn search_by_filename_pattern(&self, pattern: &str) -> Vec<String> {
        let query = format!("repo:{}/{} filename:{}", self.owner, self.repo, pattern);
        let query = query.as_str();

        let first = self
            .call(query, move || async move {
                self.client
                    .search()
                    .code(query)
                    .per_page(100)
                    .send()
                    .await
                    .map_err(|e| classify(query, e))
            })
            .await;

        let mut page = match first {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to search files matching {}: {}", pattern, e);
                return Vec::new();
            }
        };

        let mut paths = Vec::new();
        loop {
            paths.extend(std::mem::take(&mut page.items).into_iter().map(|code| code.path));

            let next_uri = &page.next;
            let next = self
                .call(query, move || async move {
                    self.client
                        .get_page::<Code>(next_uri)
                        .await
                        .map_err(|e| classify(query, e))
                })
                .await;

            match next {
                Ok(Some(next_page)) => page = next_page,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Failed to search files matching {}: {}", pattern, e);
                    return Vec::new();
                }
            }
        }

        tracing::info!("Found {} files matching {} in repository", paths.len(), pattern);
        paths
    }
}
