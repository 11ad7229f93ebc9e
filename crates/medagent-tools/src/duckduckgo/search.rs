//! Web search through the DuckDuckGo Instant Answer API

use super::{NO_RESULTS_NOTE, SearchConfig, http_client, input_schema, parse_params, send};
use crate::Tool;
use async_trait::async_trait;
use medagent_core::{Error, Result, ToolHandle};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// Tool that searches the web with DuckDuckGo
pub struct DuckDuckGoTool {
    client: Client,
    config: SearchConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstantAnswer {
    #[serde(rename = "Heading")]
    heading: String,
    #[serde(rename = "AbstractText")]
    abstract_text: String,
    #[serde(rename = "AbstractSource")]
    abstract_source: String,
    #[serde(rename = "AbstractURL")]
    abstract_url: String,
    #[serde(rename = "RelatedTopics")]
    related_topics: Vec<RelatedTopic>,
}

/// Either a single result or a named group of results
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RelatedTopic {
    #[serde(rename = "Text")]
    text: Option<String>,
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
    #[serde(rename = "Topics")]
    topics: Vec<RelatedTopic>,
}

impl RelatedTopic {
    fn collect_into(self, out: &mut Vec<Value>, limit: usize) {
        if out.len() >= limit {
            return;
        }
        if let (Some(text), Some(url)) = (self.text, self.first_url) {
            let title = text.split(" - ").next().unwrap_or(&text).to_string();
            out.push(json!({ "title": title, "snippet": text, "url": url }));
        }
        for topic in self.topics {
            topic.collect_into(out, limit);
        }
    }
}

impl DuckDuckGoTool {
    /// Registry name of the tool
    pub const NAME: &'static str = "duckduckgo_search";

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

    #[instrument(skip(self), fields(tool = "duckduckgo_search"))]
    async fn search(&self, query: &str, max_results: usize) -> Result<Value> {
        let url = format!("{}/", self.config.base_url.trim_end_matches('/'));
        let request = self.client.get(url).query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ]);
        let answer: InstantAnswer = send(Self::NAME, request)
            .await?
            .json()
            .await
            .map_err(|e| Error::tool(Self::NAME, format!("unreadable response: {e}")))?;

        let mut results = Vec::new();
        for topic in answer.related_topics {
            topic.collect_into(&mut results, max_results);
        }
        debug!(results = results.len(), "Search finished");

        let summary = (!answer.abstract_text.is_empty()).then(|| {
            json!({
                "heading": answer.heading,
                "text": answer.abstract_text,
                "source": answer.abstract_source,
                "url": answer.abstract_url,
            })
        });

        let nothing_found = summary.is_none() && results.is_empty();
        let mut output = json!({
            "query": query,
            "abstract": summary,
            "result_count": results.len(),
            "results": results,
        });
        if nothing_found {
            output["note"] = json!(NO_RESULTS_NOTE);
        }
        Ok(output)
    }
}

#[async_trait]
impl Tool for DuckDuckGoTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let (query, max_results) =
            parse_params(Self::NAME, params, self.config.default_max_results)?;
        self.search(&query, max_results).await
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Search the web with DuckDuckGo. Returns a short abstract when one is \
         available and a list of related results with titles and URLs."
    }

    fn input_schema(&self) -> Value {
        input_schema("The search query")
    }
}
