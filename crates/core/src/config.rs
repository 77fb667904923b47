//! Process configuration
//!
//! All settings are read once at startup and handed to the session and
//! tools by value. Nothing here is global or mutable afterwards.

use crate::error::Error;
use crate::Result;

/// Default base URL for the remote chat API.
pub const DEFAULT_CHAT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Settings for the remote run-based chat API.
#[derive(Debug, Clone)]
pub struct ChatApiConfig {
    /// API credential, sent as a bearer token.
    pub api_key: String,

    /// Base URL of the API, overridable for self-hosted gateways.
    pub base_url: String,

    /// Pre-existing assistant to connect to.
    pub assistant_id: Option<String>,

    /// Pre-existing thread to connect to.
    pub thread_id: Option<String>,
}

/// Settings for the remote search API used by the search tool.
#[derive(Debug, Clone)]
pub struct SearchApiConfig {
    /// Search API credential.
    pub api_key: String,

    /// Search engine identifier.
    pub engine_id: String,

    /// When set, the search tool returns this string verbatim and never
    /// touches the network. Offline/test escape hatch.
    pub mock_response: Option<String>,
}

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub chat_api: ChatApiConfig,
    pub search: SearchApiConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| {
                    Error::InvalidConfig(format!("missing required environment variable {}", name))
                })
        };
        let optional = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Ok(Self {
            chat_api: ChatApiConfig {
                api_key: required("CHAT_API_KEY")?,
                base_url: optional("CHAT_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_CHAT_API_BASE_URL.to_string()),
                assistant_id: optional("CHAT_API_ASSISTANT_ID"),
                thread_id: optional("CHAT_API_THREAD_ID"),
            },
            search: SearchApiConfig {
                api_key: required("SEARCH_API_KEY")?,
                engine_id: required("SEARCH_ENGINE_ID")?,
                mock_response: optional("SEARCH_MOCK_RESPONSE"),
            },
        })
    }
}
