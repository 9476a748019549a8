use std::time::Duration;

const DEFAULT_OWNER: &str = "mariusreusch";
const DEFAULT_REPO: &str = "stammtisch-logik";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_GUIDELINES_DIR: &str = "doc";

/// The single document source the server operates against.
///
/// Built once at startup and shared read-only by the connector and the
/// search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    pub owner: String,
    pub repo: String,
    /// Ref used for every listing and fetch
    pub branch: String,
    /// Directory holding the guideline documents
    pub guidelines_dir: String,
    /// Base of the web links, `https://github.com/{owner}/{repo}` unless overridden
    pub web_base_url: String,
    /// REST API root, `https://api.github.com` when unset
    pub api_base_url: Option<String>,
    pub max_concurrent_requests: usize,
    pub fetch_timeout: Duration,
    pub max_retries: u32,
}

impl DocsConfig {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            guidelines_dir: DEFAULT_GUIDELINES_DIR.to_string(),
            web_base_url: format!("https://github.com/{}/{}", owner, repo),
            api_base_url: None,
            max_concurrent_requests: 5,
            fetch_timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }

    pub fn with_branch(mut self, branch: &str) -> Self {
        self.branch = branch.to_string();
        self
    }

    pub fn with_guidelines_dir(mut self, dir: &str) -> Self {
        self.guidelines_dir = dir.trim_matches('/').to_string();
        self
    }

    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = Some(url.to_string());
        self
    }

    /// `owner/repo`, the form GitHub search qualifiers expect
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Web link of a repository-relative path at the configured branch
    pub fn document_url(&self, path: &str) -> String {
        format!("{}/blob/{}/{}", self.web_base_url, self.branch, path)
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OWNER, DEFAULT_REPO)
    }
}
