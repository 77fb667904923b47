//! HTTP client for the remote run-based chat API
//!
//! The session talks to the API through the [`AssistantApi`] trait so the
//! poll/dispatch loop can be exercised against a scripted upstream in
//! tests. [`AssistantClient`] is the real reqwest-backed implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SessionError};
use crate::types::{
    Assistant, CreateAssistantRequest, Message, Run, Thread, ToolOutput,
};

/// Beta opt-in header required by the assistants API surface.
const BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");

/// Operations the session consumes from the remote chat API.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant>;

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread>;

    async fn create_assistant(&self, request: &CreateAssistantRequest) -> Result<Assistant>;

    async fn create_thread(&self) -> Result<Thread>;

    async fn create_message(&self, thread_id: &str, text: &str) -> Result<Message>;

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run>;

    /// List all messages on a thread in ascending creation order.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>>;
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Serialize)]
struct SubmitToolOutputsRequest {
    tool_outputs: Vec<ToolOutput>,
}

#[derive(Deserialize)]
struct MessageList {
    #[serde(default)]
    data: Vec<Message>,
}

/// Reqwest-backed chat API client.
pub struct AssistantClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AssistantClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http,
            base_url,
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        debug!(%path, "chat API GET");
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER.0, BETA_HEADER.1)
            .send()
            .await
            .map_err(|e| SessionError::upstream(format!("request to {} failed: {}", path, e)))?;
        Self::decode(response, what).await
    }

    async fn post_json<T, B>(&self, path: &str, body: &B, what: &str) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!(%path, "chat API POST");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER.0, BETA_HEADER.1)
            .json(body)
            .send()
            .await
            .map_err(|e| SessionError::upstream(format!("request to {} failed: {}", path, e)))?;
        Self::decode(response, what).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SessionError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::upstream(format!(
                "{}: HTTP {}: {}",
                what, status, body
            )));
        }
        response
            .json()
            .await
            .map_err(|e| SessionError::upstream(format!("{}: invalid response: {}", what, e)))
    }
}

#[async_trait]
impl AssistantApi for AssistantClient {
    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant> {
        self.get_json(
            &format!("/assistants/{}", assistant_id),
            &format!("assistant {}", assistant_id),
        )
        .await
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread> {
        self.get_json(
            &format!("/threads/{}", thread_id),
            &format!("thread {}", thread_id),
        )
        .await
    }

    async fn create_assistant(&self, request: &CreateAssistantRequest) -> Result<Assistant> {
        self.post_json("/assistants", request, "create assistant").await
    }

    async fn create_thread(&self) -> Result<Thread> {
        self.post_json("/threads", &serde_json::json!({}), "create thread")
            .await
    }

    async fn create_message(&self, thread_id: &str, text: &str) -> Result<Message> {
        self.post_json(
            &format!("/threads/{}/messages", thread_id),
            &CreateMessageRequest {
                role: "user",
                content: text,
            },
            "create message",
        )
        .await
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        self.post_json(
            &format!("/threads/{}/runs", thread_id),
            &CreateRunRequest { assistant_id },
            "create run",
        )
        .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.get_json(
            &format!("/threads/{}/runs/{}", thread_id, run_id),
            &format!("run {}", run_id),
        )
        .await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run> {
        self.post_json(
            &format!("/threads/{}/runs/{}/submit_tool_outputs", thread_id, run_id),
            &SubmitToolOutputsRequest {
                tool_outputs: outputs,
            },
            "submit tool outputs",
        )
        .await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>> {
        let list: MessageList = self
            .get_json(
                &format!("/threads/{}/messages?order=asc", thread_id),
                "list messages",
            )
            .await?;
        Ok(list.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RunStatus;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    /// Serve one canned HTTP response; the raw request is captured for
    /// later inspection.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, Arc<Mutex<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let captured = Arc::new(Mutex::new(String::new()));
        let captured_clone = Arc::clone(&captured);

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let needed = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|value| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + needed {
                        break;
                    }
                }
            }
            *captured_clone.lock().await = String::from_utf8_lossy(&request).to_string();

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
        });

        (format!("http://{}", addr), captured)
    }

    fn client(base_url: &str) -> AssistantClient {
        // Proxies must not intercept loopback traffic in tests.
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        AssistantClient::new(http, base_url, "test-key")
    }

    #[tokio::test]
    async fn test_retrieve_run() {
        let (url, captured) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"id":"run_1","thread_id":"t1","assistant_id":"a1","status":"in_progress"}"#,
        )
        .await;

        let run = client(&url).retrieve_run("t1", "run_1").await.unwrap();
        assert_eq!(run.id, "run_1");
        assert_eq!(run.status, RunStatus::InProgress);

        let request = captured.lock().await;
        assert!(request.starts_with("GET /threads/t1/runs/run_1 "));
        assert!(request.contains("authorization: Bearer test-key")
            || request.contains("Authorization: Bearer test-key"));
        assert!(request.to_lowercase().contains("openai-beta: assistants=v2"));
    }

    #[tokio::test]
    async fn test_missing_assistant_maps_to_not_found() {
        let (url, _) = serve_once("HTTP/1.1 404 Not Found", r#"{"error":"no such assistant"}"#).await;

        let err = client(&url).retrieve_assistant("asst_x").await.unwrap_err();
        match err {
            SessionError::NotFound(what) => assert_eq!(what, "assistant asst_x"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_maps_to_upstream() {
        let (url, _) = serve_once("HTTP/1.1 500 Internal Server Error", "boom").await;

        let err = client(&url).retrieve_thread("t1").await.unwrap_err();
        match err {
            SessionError::Upstream { message } => {
                assert!(message.contains("500"));
                assert!(message.contains("boom"));
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_tool_outputs_body() {
        let (url, captured) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"id":"run_1","thread_id":"t1","assistant_id":"a1","status":"queued"}"#,
        )
        .await;

        let outputs = vec![ToolOutput {
            tool_call_id: "call_a".to_string(),
            output: "result".to_string(),
        }];
        let run = client(&url)
            .submit_tool_outputs("t1", "run_1", outputs)
            .await
            .unwrap();
        assert_eq!(run.status, RunStatus::Queued);

        let request = captured.lock().await;
        assert!(request.starts_with("POST /threads/t1/runs/run_1/submit_tool_outputs "));
        assert!(request.contains(r#""tool_call_id":"call_a""#));
        assert!(request.contains(r#""output":"result""#));
    }

    #[tokio::test]
    async fn test_list_messages_requests_ascending_order() {
        let (url, captured) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"data":[{"id":"msg_1","role":"user","created_at":1,"content":[{"type":"text","text":{"value":"hi"}}]}]}"#,
        )
        .await;

        let messages = client(&url).list_messages("t1").await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text(), "hi");

        let request = captured.lock().await;
        assert!(request.starts_with("GET /threads/t1/messages?order=asc "));
    }
}
