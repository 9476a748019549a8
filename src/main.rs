use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use rmcp::{ServiceExt, transport::stdio};
use guideline_docs_mcp::config::DocsConfig;
use guideline_docs_mcp::github::GitHubConnector;
use guideline_docs_mcp::search::DocumentSearchService;
use guideline_docs_mcp::server::Documents;
use clap::Parser;

#[cfg(feature = "trace")]
use tracing_subscriber::{EnvFilter};

#[derive(Parser)]
struct Cli {
    /// A github repository holding the documentation
    #[clap(long, default_value = "stammtisch-logik")]
    github_repo: String,
    /// The owner of the github repository
    #[clap(long, default_value = "mariusreusch")]
    github_owner: String,
    /// The branch every document is read from
    #[clap(long, default_value = "main")]
    branch: String,
    /// The directory holding the guideline documents
    #[clap(long, default_value = "doc")]
    guidelines_dir: String,
    /// Root of the GitHub REST API, for GitHub Enterprise (optional)
    #[clap(long)]
    github_api_url: Option<String>,
    /// A github personal access token to use for authentication (optional)
    #[clap(long)]
    github_pat: Option<String>,
    /// Maximum number of GitHub requests in flight
    #[clap(long, default_value_t = 5)]
    max_concurrent_requests: usize,
    /// Timeout in seconds for a single GitHub request
    #[clap(long, default_value_t = 30)]
    fetch_timeout_secs: u64,
    /// Number of retries for transient GitHub failures
    #[clap(long, default_value_t = 3)]
    max_retries: u32,
    /// File receiving the server logs, stdout is reserved for the MCP transport
    #[clap(long, default_value = "server.log")]
    log_file: String,
}

impl Cli {
    fn docs_config(&self) -> DocsConfig {
        let mut config = DocsConfig::new(&self.github_owner, &self.github_repo)
            .with_branch(&self.branch)
            .with_guidelines_dir(&self.guidelines_dir);
        config.api_base_url = self.github_api_url.clone();
        config.max_concurrent_requests = self.max_concurrent_requests;
        config.fetch_timeout = Duration::from_secs(self.fetch_timeout_secs);
        config.max_retries = self.max_retries;
        config
    }
}

/// You can inspect the server using the Model Context Protocol Inspector.
/// npx @modelcontextprotocol/inspector cargo run -p guideline-docs-mcp

#[tokio::main]
async fn main() -> Result<()> {
    // Get command line arguments
    let args = Cli::parse();

    // Initialize the tracing subscriber with file logging
    #[cfg(feature = "trace")]
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_writer(std::fs::File::create(&args.log_file)?)
        .with_ansi(false)
        .init();

    tracing::info!("Starting MCP server");

    let config = args.docs_config();

    // Setup Github connector
    let connector = GitHubConnector::new(&config, args.github_pat.as_deref())?;
    tracing::info!(
        "Reading documents from {} at branch {}, guidelines in {}",
        config.full_name(),
        config.branch,
        config.guidelines_dir
    );

    let search = DocumentSearchService::new(Arc::new(connector), config);

    let service = Documents::new(search)
        .serve(stdio()).await.inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}
