//! Error types for assistant-runner

use thiserror::Error;

use crate::types::RunStatus;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur while driving a run
#[derive(Debug, Error)]
pub enum SessionError {
    /// A remote API call failed in transport or returned non-success
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// A remote entity lookup returned nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Session used before `connect` or creation succeeded
    #[error("Session is not connected to an assistant and thread")]
    NotConnected,

    /// Tool lookup or execution failed
    #[error("Tool error: {0}")]
    Tool(#[from] relay_core::Error),

    /// The run entered a terminal status other than completed
    #[error("Run {run_id} ended in status {status:?}")]
    RunFailed { run_id: String, status: RunStatus },

    /// The poll loop exceeded its configured wait budget
    #[error("Run did not complete within {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Caller-requested abort
    #[error("Cancelled")]
    Cancelled,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SessionError {
    /// Create an Upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }
}
