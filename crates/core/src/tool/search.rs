//! Web search tool
//!
//! Backed by the Google Custom Search JSON API. Each hit is reduced to
//! `{id, link, title, snippet}` and the whole list is returned to the
//! assistant as compact JSON.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SearchApiConfig;
use crate::error::Error;
use crate::Result;

use super::{ParameterSpec, Tool};

const SEARCH_ENDPOINT: &str = "https://customsearch.googleapis.com/customsearch/v1";

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

/// One search hit as returned to the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: String,
    pub link: String,
    pub title: String,
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "cacheId", default)]
    cache_id: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

/// Search tool instance holding its credentials and HTTP client.
pub struct SearchTool {
    config: SearchApiConfig,
    http: reqwest::Client,
}

impl SearchTool {
    pub fn new(config: SearchApiConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let response = self
            .http
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("cx", self.config.engine_id.as_str()),
                ("q", query),
            ])
            .send()
            .await
            .map_err(|e| Error::execution_failed(format!("search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::execution_failed(format!(
                "search API returned HTTP {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::execution_failed(format!("invalid search response: {}", e)))?;

        Ok(body
            .items
            .into_iter()
            .map(|item| SearchResult {
                id: item.cache_id,
                link: item.link,
                title: item.title,
                snippet: item.snippet,
            })
            .collect())
    }

    /// Serialize results as compact JSON. The compact form has no space
    /// after the key separator, which consumers of this tool rely on.
    fn stringify(results: &[SearchResult]) -> Result<String> {
        Ok(serde_json::to_string(results)?)
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &'static str {
        "web-search"
    }

    fn description(&self) -> &'static str {
        "Searches the web for a query and returns a list of results. \
         Each result contains id, link, title and snippet."
    }

    fn parameters(&self) -> BTreeMap<&'static str, ParameterSpec> {
        BTreeMap::from([(
            "query",
            ParameterSpec {
                kind: "string",
                description: "The search term to look up. It is a required field.",
            },
        )])
    }

    fn required(&self) -> Vec<&'static str> {
        vec!["query"]
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        // The mock short-circuits everything, including argument parsing.
        if let Some(mock) = &self.config.mock_response {
            return Ok(mock.clone());
        }

        let args: SearchArgs =
            serde_json::from_str(arguments).map_err(|e| Error::malformed_input(e.to_string()))?;

        debug!(query = %args.query, "executing web search");
        let results = self.search(&args.query).await?;
        Self::stringify(&results)
    }
}
