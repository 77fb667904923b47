//! Assistant Runner - drives remote assistant runs with local tool dispatch
//!
//! This crate binds a remote assistant and conversation thread into a
//! session, starts runs for user messages, and bridges the remote run
//! lifecycle to local tool execution through a poll/dispatch loop.

mod client;
mod driver;
mod error;
mod session;
mod types;

pub use client::{AssistantApi, AssistantClient};
pub use driver::{DriveOptions, RunDriver};
pub use error::{Result, SessionError};
pub use session::{AssistantProfile, AssistantSession};
pub use types::{
    Assistant, AssistantToolDef, ContentPart, CreateAssistantRequest, FunctionCall, FunctionDef,
    Message, MessageRole, RequiredAction, Run, RunStatus, SubmitToolOutputs, TextContent, Thread,
    ToolCall, ToolOutput,
};
