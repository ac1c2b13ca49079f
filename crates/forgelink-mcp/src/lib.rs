//! MCP (Model Context Protocol) servers for forgelink.
//!
//! This crate implements the MCP servers that expose Bitbucket and JIRA
//! operations as tools to AI assistants.

pub mod bitbucket;
pub mod dispatch;
pub mod jira;
pub mod protocol;
pub mod server;
pub mod transport;

pub use bitbucket::BitbucketTools;
pub use dispatch::ToolSet;
pub use jira::JiraTools;
pub use server::McpServer;
