//! Assistant session
//!
//! Binds one remote assistant and one remote thread and exposes the
//! high-level operations over them: post a user message, start a run,
//! and drive the run to completion with local tool dispatch.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use relay_core::tool::ToolRegistry;

use crate::client::AssistantApi;
use crate::driver::{DriveOptions, RunDriver};
use crate::error::{Result, SessionError};
use crate::types::{
    Assistant, AssistantToolDef, CreateAssistantRequest, FunctionDef, Message, Run, Thread,
};

/// Identity given to a newly declared assistant.
#[derive(Debug, Clone)]
pub struct AssistantProfile {
    pub name: String,
    pub instructions: String,
    pub model: String,
}

impl Default for AssistantProfile {
    fn default() -> Self {
        Self {
            name: "web-research-assistant".to_string(),
            instructions: "You answer user questions. When a question needs current or \
                           specific information, search the web for it, pick trustworthy \
                           results, and fetch pages directly when a URL looks relevant. \
                           Refine the search query and try again if the first results do \
                           not answer the question. Cite the sources you used."
                .to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// A session bound to one remote assistant and one remote thread.
pub struct AssistantSession {
    /// Local session id, used for log correlation only.
    pub id: Uuid,
    api: Arc<dyn AssistantApi>,
    tools: Arc<ToolRegistry>,
    options: DriveOptions,
    assistant: Option<Assistant>,
    thread: Option<Thread>,
}

impl AssistantSession {
    pub fn new(api: Arc<dyn AssistantApi>, tools: Arc<ToolRegistry>, options: DriveOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            api,
            tools,
            options,
            assistant: None,
            thread: None,
        }
    }

    /// The bound assistant, if the session is connected.
    pub fn assistant(&self) -> Option<&Assistant> {
        self.assistant.as_ref()
    }

    /// The bound thread, if the session is connected.
    pub fn thread(&self) -> Option<&Thread> {
        self.thread.as_ref()
    }

    fn require_assistant(&self) -> Result<&Assistant> {
        self.assistant.as_ref().ok_or(SessionError::NotConnected)
    }

    fn require_thread(&self) -> Result<&Thread> {
        self.thread.as_ref().ok_or(SessionError::NotConnected)
    }

    /// Bind the session to an existing assistant and thread.
    pub async fn connect(&mut self, assistant_id: &str, thread_id: &str) -> Result<()> {
        let assistant = self.api.retrieve_assistant(assistant_id).await?;
        let thread = self.api.retrieve_thread(thread_id).await?;

        info!(
            session = %self.id,
            assistant = %assistant.id,
            thread = %thread.id,
            "connected to existing assistant and thread"
        );
        self.assistant = Some(assistant);
        self.thread = Some(thread);
        Ok(())
    }

    /// Declare a new assistant from the registered tools and create a
    /// fresh thread for it.
    ///
    /// The resulting ids are logged so they can be carried over into the
    /// configuration and reused with [`connect`](Self::connect).
    pub async fn create_from_scratch(&mut self, profile: &AssistantProfile) -> Result<()> {
        let tools = self
            .tools
            .iter()
            .map(|tool| AssistantToolDef {
                kind: "function",
                function: FunctionDef {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    parameters: tool.schema(),
                },
            })
            .collect();

        let request = CreateAssistantRequest {
            name: profile.name.clone(),
            instructions: profile.instructions.clone(),
            model: profile.model.clone(),
            tools,
        };

        let assistant = self.api.create_assistant(&request).await?;
        let thread = self.api.create_thread().await?;

        info!(
            session = %self.id,
            assistant = %assistant.id,
            thread = %thread.id,
            "created new assistant and thread"
        );
        self.assistant = Some(assistant);
        self.thread = Some(thread);
        Ok(())
    }

    /// Append a user message to the thread and start a run for it.
    ///
    /// The text is passed through unchanged; validation is left to the
    /// upstream service.
    pub async fn send_message_and_run(&self, text: &str) -> Result<Run> {
        let assistant = self.require_assistant()?;
        let thread = self.require_thread()?;

        self.api.create_message(&thread.id, text).await?;
        let run = self.api.create_run(&thread.id, &assistant.id).await?;

        info!(session = %self.id, run = %run.id, "run started");
        Ok(run)
    }

    /// Drive the run to completion and return the full thread transcript
    /// in ascending creation order.
    pub async fn await_completion(
        &self,
        run: &Run,
        cancel: &CancellationToken,
    ) -> Result<Vec<Message>> {
        let thread = self.require_thread()?;

        let driver = RunDriver::new(
            Arc::clone(&self.api),
            Arc::clone(&self.tools),
            self.options.clone(),
        );
        driver.drive(&thread.id, &run.id, cancel).await?;

        self.api.list_messages(&thread.id).await
    }
}
