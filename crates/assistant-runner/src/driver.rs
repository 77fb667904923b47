//! Run driver
//!
//! The poll/dispatch loop that bridges a remote asynchronous run to local
//! tool execution: poll the run status at a fixed interval, execute any
//! requested tool calls in order, submit the outputs as one batch, and
//! stop on a terminal status, timeout or cancellation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use relay_core::tool::ToolRegistry;

use crate::client::AssistantApi;
use crate::error::{Result, SessionError};
use crate::types::{Run, RunStatus, ToolCall, ToolOutput};

/// Tuning knobs for the poll loop.
#[derive(Debug, Clone)]
pub struct DriveOptions {
    /// Delay between consecutive status polls.
    pub poll_interval: Duration,
    /// Upper bound on the total wait for one run.
    pub max_wait: Duration,
}

impl Default for DriveOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_wait: Duration::from_secs(300),
        }
    }
}

/// Drives one remote run to completion.
pub struct RunDriver {
    api: Arc<dyn AssistantApi>,
    tools: Arc<ToolRegistry>,
    options: DriveOptions,
}

impl RunDriver {
    pub fn new(api: Arc<dyn AssistantApi>, tools: Arc<ToolRegistry>, options: DriveOptions) -> Self {
        Self {
            api,
            tools,
            options,
        }
    }

    /// Poll the run until it completes.
    ///
    /// A required action dispatches every pending tool call in upstream
    /// order; the first lookup or execution failure aborts the drive and
    /// nothing is submitted for that batch. Terminal failure statuses,
    /// an exceeded wait budget and cancellation all surface as distinct
    /// errors.
    pub async fn drive(
        &self,
        thread_id: &str,
        run_id: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let started = Instant::now();

        loop {
            if cancel.is_cancelled() {
                return Err(SessionError::Cancelled);
            }

            let mut run = self.api.retrieve_run(thread_id, run_id).await?;
            info!(run_id = %run.id, status = ?run.status, "run status");

            if run.status == RunStatus::RequiresAction {
                let outputs = self.execute_tool_calls(run.pending_tool_calls(), cancel).await?;
                run = self
                    .api
                    .submit_tool_outputs(thread_id, &run.id, outputs)
                    .await?;
            }

            if run.status == RunStatus::Completed {
                return Ok(());
            }
            if run.status.is_failure() {
                return Err(SessionError::RunFailed {
                    run_id: run.id,
                    status: run.status,
                });
            }

            if started.elapsed() >= self.options.max_wait {
                return Err(SessionError::Timeout {
                    seconds: self.options.max_wait.as_secs(),
                });
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(SessionError::Cancelled),
                _ = tokio::time::sleep(self.options.poll_interval) => {}
            }
        }
    }

    /// Execute the pending tool calls in order and collect their outputs.
    async fn execute_tool_calls(
        &self,
        calls: &[ToolCall],
        cancel: &CancellationToken,
    ) -> Result<Vec<ToolOutput>> {
        let mut outputs = Vec::with_capacity(calls.len());

        for call in calls {
            if cancel.is_cancelled() {
                return Err(SessionError::Cancelled);
            }

            info!(
                tool = %call.function.name,
                arguments = %call.function.arguments,
                "tool required"
            );
            let tool = self.tools.find_by_name(&call.function.name)?;
            let output = tool.execute(&call.function.arguments).await?;
            debug!(tool = %call.function.name, bytes = output.len(), "tool output collected");

            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                output,
            });
        }

        Ok(outputs)
    }
}
