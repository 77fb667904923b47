//! Page fetch tool
//!
//! Issues a single GET and hands the raw body back to the assistant.
//! The HTTP status is not inspected; error page bodies are returned as
//! content like any other response.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::Result;

use super::{ParameterSpec, Tool};

#[derive(Debug, Deserialize)]
struct FetchArgs {
    url: String,
}

/// Fetch tool instance holding its HTTP client.
pub struct FetchTool {
    http: reqwest::Client,
}

impl FetchTool {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::execution_failed(format!("fetch failed: {}", e)))?;

        response
            .text()
            .await
            .map_err(|e| Error::execution_failed(format!("failed to read response body: {}", e)))
    }
}

#[async_trait]
impl Tool for FetchTool {
    fn name(&self) -> &'static str {
        "web-fetch"
    }

    fn description(&self) -> &'static str {
        "Fetches a website. It takes a URL as input, opens the page and \
         returns the raw HTML content."
    }

    fn parameters(&self) -> BTreeMap<&'static str, ParameterSpec> {
        BTreeMap::from([(
            "url",
            ParameterSpec {
                kind: "string",
                description: "URL of the website to fetch. It is a required field.",
            },
        )])
    }

    fn required(&self) -> Vec<&'static str> {
        vec!["url"]
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: FetchArgs =
            serde_json::from_str(arguments).map_err(|e| Error::malformed_input(e.to_string()))?;

        debug!(url = %args.url, "fetching page");
        self.fetch(&args.url).await
    }
}
