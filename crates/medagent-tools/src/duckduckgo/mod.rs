//! DuckDuckGo toolkit: web search and news search
//!
//! The two tools share one [`SearchConfig`] and one HTTP client. Agents that
//! want DuckDuckGo take [`DuckDuckGo::handles`], and the runtime registers
//! [`DuckDuckGo::tools`].

mod news;
mod search;

pub use news::DuckDuckGoNewsTool;
pub use search::DuckDuckGoTool;

use crate::Tool;
use medagent_core::{Error, Result, ToolHandle};
use medagent_llm::tools::schema::{self, ObjectSchema};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_SEARCH_BASE: &str = "https://api.duckduckgo.com";
const DEFAULT_NEWS_BASE: &str = "https://duckduckgo.com";

/// Settings shared by the DuckDuckGo tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Instant Answer API base URL
    pub base_url: String,
    /// Base URL of the site serving the news endpoint
    pub news_base_url: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
    /// Result count used when the model does not ask for one
    pub default_max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_BASE.to_string(),
            news_base_url: DEFAULT_NEWS_BASE.to_string(),
            timeout_secs: 30,
            default_max_results: 5,
        }
    }
}

/// The DuckDuckGo toolkit
pub struct DuckDuckGo;

impl DuckDuckGo {
    /// Handles of every tool in the toolkit, search first
    pub fn handles() -> Vec<ToolHandle> {
        vec![DuckDuckGoTool::handle(), DuckDuckGoNewsTool::handle()]
    }

    /// Instantiate every tool in the toolkit over one shared client
    pub fn tools(config: &SearchConfig) -> Result<Vec<Arc<dyn Tool>>> {
        let client = http_client(config)?;
        Ok(vec![
            Arc::new(DuckDuckGoTool::with_client(client.clone(), config.clone())),
            Arc::new(DuckDuckGoNewsTool::with_client(client, config.clone())),
        ])
    }
}

fn http_client(config: &SearchConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("medagent/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::InitializationFailed(format!("search client: {e}")))
}

/// Send `request` on behalf of `tool`, rejecting non-success responses
async fn send(tool: &str, request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::tool(tool, format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::tool(tool, format!("HTTP {status}")));
    }
    Ok(response)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    max_results: Option<usize>,
}

/// Validated query and result cap
fn parse_params(tool: &str, params: Value, default_max_results: usize) -> Result<(String, usize)> {
    let params: SearchParams = serde_json::from_value(params)
        .map_err(|e| Error::tool(tool, format!("Invalid parameters: {e}")))?;

    let query = params.query.trim();
    if query.is_empty() {
        return Err(Error::tool(
            tool,
            "Invalid parameters: query must not be empty",
        ));
    }

    let max_results = params.max_results.unwrap_or(default_max_results).max(1);
    Ok((query.to_string(), max_results))
}

fn input_schema(query: &str) -> Value {
    ObjectSchema::new()
        .required("query", schema::string(query))
        .optional(
            "max_results",
            schema::integer("Maximum number of results to return (default 5)"),
        )
        .build()
}

const NO_RESULTS_NOTE: &str = "No results found. Try a shorter or more general query.";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toolkit_handles_match_tools() {
        let tools = DuckDuckGo::tools(&SearchConfig::default()).unwrap();
        let names: Vec<&str> = tools.iter().map(|tool| tool.name()).collect();
        assert_eq!(names, ["duckduckgo_search", "duckduckgo_news"]);

        let handles: Vec<String> = DuckDuckGo::handles()
            .iter()
            .map(|handle| handle.name().to_string())
            .collect();
        assert_eq!(handles, names);
    }

    #[test]
    fn test_params() {
        assert_eq!(
            parse_params("t", json!({"query": "  rash "}), 5).unwrap(),
            ("rash".to_string(), 5)
        );
        assert_eq!(
            parse_params("t", json!({"query": "rash", "max_results": 0}), 5).unwrap().1,
            1
        );

        let err = parse_params("t", json!({"query": "   "}), 5).unwrap_err();
        assert!(matches!(err, Error::Tool { ref name, .. } if name == "t"));

        let err = parse_params("t", json!({"max_results": 2}), 5).unwrap_err();
        assert!(err.to_string().contains("Invalid parameters"));
    }
}
