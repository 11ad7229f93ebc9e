//! News search through DuckDuckGo's news endpoint
//!
//! The endpoint needs a per-query `vqd` token, which is scraped from the
//! regular results page before the news request is made.

use super::{NO_RESULTS_NOTE, SearchConfig, http_client, input_schema, parse_params, send};
use crate::Tool;
use async_trait::async_trait;
use medagent_core::{Error, Result, ToolHandle};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Region sent with news queries; `wt-wt` means no region
const REGION: &str = "wt-wt";
/// Moderate safe search
const SAFE_SEARCH: &str = "-1";

/// Tool that searches recent news articles with DuckDuckGo
pub struct DuckDuckGoNewsTool {
    client: Client,
    config: SearchConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NewsResponse {
    results: Vec<NewsArticle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NewsArticle {
    /// Unix timestamp
    date: Option<i64>,
    title: String,
    excerpt: String,
    url: String,
    source: String,
}

impl DuckDuckGoNewsTool {
    /// Registry name of the tool
    pub const NAME: &'static str = "duckduckgo_news";

    /// Create the tool with its own HTTP client
    pub fn new(config: SearchConfig) -> Result<Self> {
        Ok(Self::with_client(http_client(&config)?, config))
    }

    pub(super) fn with_client(client: Client, config: SearchConfig) -> Self {
        Self { client, config }
    }

    /// Capability handle agent configurations use to refer to this tool
    pub fn handle() -> ToolHandle {
        ToolHandle::new(Self::NAME)
    }

    #[instrument(skip(self), fields(tool = "duckduckgo_news"))]
    async fn news(&self, query: &str, max_results: usize) -> Result<Value> {
        let base = self.config.news_base_url.trim_end_matches('/');

        let page = send(
            Self::NAME,
            self.client.get(format!("{base}/")).query(&[("q", query)]),
        )
        .await?
        .text()
        .await
        .map_err(|e| Error::tool(Self::NAME, format!("unreadable response: {e}")))?;
        let vqd = extract_vqd(&page)?;

        let request = self.client.get(format!("{base}/news.js")).query(&[
            ("l", REGION),
            ("o", "json"),
            ("noamp", "1"),
            ("q", query),
            ("vqd", vqd.as_str()),
            ("p", SAFE_SEARCH),
        ]);
        let news: NewsResponse = send(Self::NAME, request)
            .await?
            .json()
            .await
            .map_err(|e| Error::tool(Self::NAME, format!("unreadable response: {e}")))?;

        let markup = Regex::new(r"<[^>]*>")
            .map_err(|e| Error::tool(Self::NAME, format!("invalid markup pattern: {e}")))?;
        let mut seen = HashSet::new();
        let results: Vec<Value> = news
            .results
            .into_iter()
            .filter(|article| !article.url.is_empty() && seen.insert(article.url.clone()))
            .take(max_results)
            .map(|article| {
                json!({
                    "title": markup.replace_all(&article.title, ""),
                    "snippet": markup.replace_all(&article.excerpt, ""),
                    "url": article.url,
                    "source": article.source,
                    "date": article.date,
                })
            })
            .collect();
        debug!(results = results.len(), "News search finished");

        let nothing_found = results.is_empty();
        let mut output = json!({
            "query": query,
            "result_count": results.len(),
            "results": results,
        });
        if nothing_found {
            output["note"] = json!(NO_RESULTS_NOTE);
        }
        Ok(output)
    }
}

/// Pull the `vqd` token out of a DuckDuckGo results page
fn extract_vqd(page: &str) -> Result<String> {
    let pattern = Regex::new(r#"vqd=["']?([0-9-]+)"#)
        .map_err(|e| Error::tool(DuckDuckGoNewsTool::NAME, format!("invalid vqd pattern: {e}")))?;
    pattern
        .captures(page)
        .map(|captures| captures[1].to_string())
        .ok_or_else(|| {
            Error::tool(
                DuckDuckGoNewsTool::NAME,
                "no search token in the DuckDuckGo response",
            )
        })
}

#[async_trait]
impl Tool for DuckDuckGoNewsTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let (query, max_results) =
            parse_params(Self::NAME, params, self.config.default_max_results)?;
        self.news(&query, max_results).await
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Search recent news articles with DuckDuckGo. Returns titles, short \
         excerpts, sources, publication dates and URLs."
    }

    fn input_schema(&self) -> Value {
        input_schema("The news search query")
    }
}
