//! # Guideline Docs MCP Server
//!
//! A Model-Context-Protocol (MCP) server that exposes the markdown documentation
//! of a GitHub repository to tool-calling agents.
//!
//! ## Features
//!
//! - List the guideline documents of a fixed directory
//! - Fetch the content of any document in the repository
//! - Search every markdown file for a keyword and return bounded excerpts
//!
//! Nothing is cached: every call goes back to GitHub.
//!
//! ## Modules
//!
//! - `config`: repository identity and fan-out settings
//! - `error`: retrieval and input errors
//! - `document`: document types, title and excerpt derivation
//! - `github`: GitHub API integration for listing and fetching files
//! - `search`: document listing and keyword search over the repository
//! - `server`: MCP server implementation and tools

/// Repository identity and fan-out settings
pub mod config;
/// Retrieval and input errors
pub mod error;
/// Document types and text helpers
pub mod document;
/// GitHub API integration
pub mod github;
/// Document listing and keyword search
pub mod search;
/// Server implementation and MCP tools
pub mod server;
