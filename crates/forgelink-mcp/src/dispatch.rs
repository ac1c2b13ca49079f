//! Tool dispatch layer shared by the Bitbucket and JIRA servers.
//!
//! A [`ToolSet`] owns the tool table for one remote service: the
//! definitions advertised via tools/list and the routing from tool name
//! to client call. The server stays provider-agnostic and only talks to
//! this trait.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::protocol::ToolDefinition;

/// A required tool argument was missing or had the wrong type.
///
/// This is the only tool failure surfaced as a protocol error; remote
/// and domain failures are reported as text inside a successful result.
#[derive(Debug)]
pub struct ArgumentError(pub String);

impl std::fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ArgumentError {}

/// A named collection of tools backed by one remote service.
#[async_trait]
pub trait ToolSet: Send + Sync {
    /// Server name reported during initialization.
    fn server_name(&self) -> &'static str;

    /// Definitions advertised via tools/list.
    fn tool_definitions(&self) -> Vec<ToolDefinition>;

    /// Execute a tool and render its outcome as text.
    ///
    /// An unknown tool name answers with `Unknown tool: {name}` and a
    /// failed remote call with `Error: {message}`, both as `Ok` text.
    async fn dispatch(&self, name: &str, arguments: Value) -> Result<String, ArgumentError>;
}

/// Deserialize tool arguments into a typed record.
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ArgumentError> {
    serde_json::from_value(arguments).map_err(|e| ArgumentError(e.to_string()))
}

/// Render a client call outcome as the tool's text payload.
pub(crate) fn render(result: forgelink_core::Result<Value>) -> String {
    match result {
        Ok(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|e| format!("Error: {}", e))
        }
        Err(e) => format!("Error: {}", e),
    }
}
