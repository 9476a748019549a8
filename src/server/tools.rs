use rmcp::model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use serde::Deserialize;
use serde_json::json;

use rmcp::{Error as McpError, ServerHandler, schemars, tool};

use crate::search::DocumentSearchService;

/// Text returned in place of a document that could not be retrieved
pub const RETRIEVAL_ERROR_TEXT: &str = "Error: Could not retrieve document content";

const SERVICE_NAME: &str = "MCP Guidelines Reader";

#[derive(Clone)]
pub struct Documents {
    pub service: DocumentSearchService,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDocumentRequest {
    #[schemars(description = "the repository-relative path of the document to retrieve")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchDocumentsRequest {
    #[schemars(description = "the keyword to search for, matched case-insensitively")]
    pub query: String,
}

#[tool(tool_box)]
impl Documents {

    pub fn new(service: DocumentSearchService) -> Self {
        Self {
            service,
        }
    }

    #[tool(description = "List the markdown guideline documents of the repository")]
    async fn list_guideline_documents(&self) -> Result<CallToolResult, McpError> {
        let documents = self.service.list_guideline_documents().await;
        tracing::info!("Listed {} guideline documents", documents.len());

        let response = json!({
            "directory": self.service.config().guidelines_dir,
            "total": documents.len(),
            "documents": documents,
        });

        Ok(CallToolResult::success(vec![Content::text(
            response.to_string(),
        )]))
    }

    #[tool(description = "Get the content of a document by its repository path")]
    async fn get_document(
        &self,
        #[tool(aggr)] GetDocumentRequest { path }: GetDocumentRequest,
    ) -> Result<CallToolResult, McpError> {
        match self.service.get_document(&path).await {
            Ok(doc) => {
                // body first as plain text, metadata after it
                let metadata = json!({
                    "path": doc.path,
                    "title": doc.title,
                    "url": doc.url,
                });
                Ok(CallToolResult::success(vec![
                    Content::text(doc.content),
                    Content::text(metadata.to_string()),
                ]))
            }
            Err(e) => {
                tracing::error!("Failed to get document content for path {}: {}", path, e);
                Ok(CallToolResult::error(vec![Content::text(RETRIEVAL_ERROR_TEXT)]))
            }
        }
    }

    #[tool(description = "Search all markdown documents for a keyword and return matching excerpts")]
    async fn search_documents(
        &self,
        #[tool(aggr)] SearchDocumentsRequest { query }: SearchDocumentsRequest,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Received search query: {}", query);

        match self.service.search_documents(&query).await {
            Ok(result) => {
                let response = serde_json::to_string(&result)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(response)]))
            }
            Err(e) => {
                let response = json!({
                    "error": e.to_string(),
                    "query": query,
                    "matches": [],
                    "totalMatches": 0,
                });
                Ok(CallToolResult::error(vec![Content::text(response.to_string())]))
            }
        }
    }

    #[tool(description = "List the paths of all markdown files in the repository")]
    async fn list_all_markdown_files(&self) -> Result<CallToolResult, McpError> {
        let paths = self.service.search_all_markdown_files().await;

        let response = json!({
            "total": paths.len(),
            "paths": paths,
        });

        Ok(CallToolResult::success(vec![Content::text(
            response.to_string(),
        )]))
    }

    #[tool(description = "Get every markdown document of the repository with its content, as context for the conversation")]
    async fn get_context(&self) -> Result<CallToolResult, McpError> {
        let config = self.service.config();
        let docs = self.service.get_all_documents().await;

        let records: Vec<_> = docs
            .iter()
            .map(|doc| {
                json!({
                    "path": doc.path,
                    "title": doc.title,
                    "url": doc.url,
                    "content": doc.content,
                })
            })
            .collect();

        let response = json!({
            "project": config.repo,
            "repository": config.full_name(),
            "branch": config.branch,
            "documents": records,
        });

        Ok(CallToolResult::success(vec![Content::text(
            response.to_string(),
        )]))
    }

    #[tool(description = "Report which repository and branch the server reads from")]
    async fn status(&self) -> Result<CallToolResult, McpError> {
        let config = self.service.config();
        let response = json!({
            "status": "connected",
            "repository": config.full_name(),
            "branch": config.branch,
            "service": SERVICE_NAME,
        });

        Ok(CallToolResult::success(vec![Content::text(
            response.to_string(),
        )]))
    }
}


#[tool(tool_box)]
impl ServerHandler for Documents {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some("This server provides tools to read the guideline documentation of a GitHub repository. Use 'list_guideline_documents' to see the guideline files, 'get_document' to fetch a document by path, 'search_documents' to find documents containing a keyword, 'list_all_markdown_files' to list every markdown path, or 'get_context' to load all documents at once.".to_string()),
        }
    }
}
