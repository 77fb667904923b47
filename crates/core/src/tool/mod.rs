//! Tool plugin contract
//!
//! A tool is a stateless adapter the remote assistant can call by name
//! while a run is in progress. Tools describe their own JSON input
//! contract so the schema declared to the chat API and the parsing done
//! in `execute` cannot drift apart.

mod fetch;
mod registry;
mod search;

pub use fetch::FetchTool;
pub use registry::ToolRegistry;
pub use search::{SearchResult, SearchTool};

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::Result;

/// Declared type and description of a single tool parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
}

/// A callable capability surfaced to the remote assistant.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable unique identifier used for dispatch.
    fn name(&self) -> &'static str;

    /// Natural-language capability description used for tool selection.
    fn description(&self) -> &'static str;

    /// Input contract, parameter name to spec. Ordering is stable.
    fn parameters(&self) -> BTreeMap<&'static str, ParameterSpec>;

    /// Parameters that must be present in the arguments.
    fn required(&self) -> Vec<&'static str>;

    /// Run the tool against the raw JSON argument string emitted by the
    /// assistant. Returns the output to submit back to the run.
    async fn execute(&self, arguments: &str) -> Result<String>;

    /// JSON-schema-shaped parameter object declared to the chat API.
    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": self.parameters(),
            "required": self.required(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echoes its input."
        }

        fn parameters(&self) -> BTreeMap<&'static str, ParameterSpec> {
            BTreeMap::from([(
                "text",
                ParameterSpec {
                    kind: "string",
                    description: "Text to echo back.",
                },
            )])
        }

        fn required(&self) -> Vec<&'static str> {
            vec!["text"]
        }

        async fn execute(&self, arguments: &str) -> Result<String> {
            Ok(arguments.to_string())
        }
    }

    #[test]
    fn test_schema_shape() {
        let schema = EchoTool.schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["text"]["type"], "string");
        assert_eq!(schema["required"][0], "text");
    }
}
