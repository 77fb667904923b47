//! Command-line entry point for Assistant Relay
//!
//! Reads configuration from the environment, connects (or creates) an
//! assistant session, relays one question through it and prints the
//! resulting thread transcript. Ctrl-C cancels the in-flight run wait;
//! the remote run itself is left to finish on its own.

use std::sync::Arc;

use anyhow::{bail, Context};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assistant_runner::{AssistantClient, AssistantProfile, AssistantSession, DriveOptions};
use relay_core::tool::{FetchTool, SearchTool, ToolRegistry};
use relay_core::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_cli=info,assistant_runner=info,relay_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let question = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if question.is_empty() {
        bail!("usage: relay <question>");
    }

    let config = Config::from_env().context("loading configuration")?;

    // One outbound client, shared by the tools and the chat API client.
    let http = reqwest::Client::new();

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(SearchTool::new(config.search.clone(), http.clone())));
    tools.register(Arc::new(FetchTool::new(http.clone())));

    let client = AssistantClient::new(
        http,
        config.chat_api.base_url.clone(),
        config.chat_api.api_key.clone(),
    );
    let mut session = AssistantSession::new(
        Arc::new(client),
        Arc::new(tools),
        DriveOptions::default(),
    );

    match (&config.chat_api.assistant_id, &config.chat_api.thread_id) {
        (Some(assistant_id), Some(thread_id)) => {
            session
                .connect(assistant_id, thread_id)
                .await
                .context("connecting to existing assistant and thread")?;
        }
        _ => {
            session
                .create_from_scratch(&AssistantProfile::default())
                .await
                .context("creating assistant and thread")?;
        }
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested");
                cancel.cancel();
            }
        });
    }

    let run = session
        .send_message_and_run(&question)
        .await
        .context("starting run")?;
    let messages = session
        .await_completion(&run, &cancel)
        .await
        .context("waiting for run completion")?;

    for message in &messages {
        println!(
            "{} ({}): {}",
            message.role,
            message.created().to_rfc3339(),
            message.text()
        );
    }

    Ok(())
}
