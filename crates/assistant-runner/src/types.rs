//! Wire types for the remote run-based chat API
//!
//! These mirror the subset of the API the session consumes: assistants,
//! threads, messages, runs and the tool-call plumbing a run exposes
//! while it waits for tool outputs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remote assistant definition. Immutable for the session's lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    pub model: String,
}

/// Remote conversation thread. The session holds only its id.
#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub created_at: i64,
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message on a thread. Append-only, ordered by creation time.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<ContentPart>,
    #[serde(default)]
    pub created_at: i64,
}

impl Message {
    /// Concatenated text of all textual content parts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| part.text.as_ref())
            .map(|text| text.value.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Creation time as a UTC timestamp.
    pub fn created(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.created_at, 0).unwrap_or_default()
    }
}

/// One part of a message body.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub value: String,
}

/// Status lifecycle of a remote run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
}

impl RunStatus {
    /// Check if the status represents a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Cancelled | Self::Incomplete | Self::Expired
        )
    }

    /// Terminal states other than `Completed` are fatal to the caller.
    pub fn is_failure(&self) -> bool {
        self.is_terminal() && *self != Self::Completed
    }
}

/// A remote run bound to one thread and one assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    pub assistant_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
}

impl Run {
    /// Tool calls pending submission, in the order the upstream returned
    /// them. Empty unless the run is in `requires_action`.
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        self.required_action
            .as_ref()
            .map(|action| action.submit_tool_outputs.tool_calls.as_slice())
            .unwrap_or(&[])
    }
}

/// Action a run is blocked on.
#[derive(Debug, Clone, Deserialize)]
pub struct RequiredAction {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitToolOutputs {
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

/// A request to invoke one local tool, emitted by a blocked run.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// Result of one tool call, keyed by the call id it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

/// Request body for declaring a new assistant.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAssistantRequest {
    pub name: String,
    pub instructions: String,
    pub model: String,
    pub tools: Vec<AssistantToolDef>,
}

/// One declared tool in an assistant definition.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantToolDef {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionDef,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_with_required_action() {
        let run: Run = serde_json::from_str(
            r#"{
                "id": "run_1",
                "thread_id": "thread_1",
                "assistant_id": "asst_1",
                "status": "requires_action",
                "required_action": {
                    "type": "submit_tool_outputs",
                    "submit_tool_outputs": {
                        "tool_calls": [
                            {"id": "call_a", "function": {"name": "web-search", "arguments": "{\"query\":\"x\"}"}},
                            {"id": "call_b", "function": {"name": "web-fetch", "arguments": "{\"url\":\"y\"}"}}
                        ]
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(run.status, RunStatus::RequiresAction);
        let calls = run.pending_tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id, "call_a");
        assert_eq!(calls[0].function.name, "web-search");
        assert_eq!(calls[1].id, "call_b");
    }

    #[test]
    fn test_run_without_required_action() {
        let run: Run = serde_json::from_str(
            r#"{"id":"run_1","thread_id":"t","assistant_id":"a","status":"in_progress"}"#,
        )
        .unwrap();

        assert_eq!(run.status, RunStatus::InProgress);
        assert!(run.pending_tool_calls().is_empty());
    }

    #[test]
    fn test_status_lifecycle() {
        assert!(RunStatus::Completed.is_terminal());
        assert!(!RunStatus::Completed.is_failure());
        assert!(RunStatus::Failed.is_failure());
        assert!(RunStatus::Expired.is_failure());
        assert!(!RunStatus::Queued.is_terminal());
        assert!(!RunStatus::RequiresAction.is_terminal());
    }

    #[test]
    fn test_message_text_concatenates_parts() {
        let message: Message = serde_json::from_str(
            r#"{
                "id": "msg_1",
                "role": "assistant",
                "created_at": 1700000000,
                "content": [
                    {"type": "text", "text": {"value": "first"}},
                    {"type": "image_file"},
                    {"type": "text", "text": {"value": "second"}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(message.text(), "first\nsecond");
        assert_eq!(message.created().timestamp(), 1700000000);
        assert_eq!(message.role.to_string(), "assistant");
    }
}
