use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use quita_assistant::{OpenAIAssistantClient, WhisperTranscriber};
use quita_persist::MongoThreadStore;
use quita_tools::{Ledger, ToolDispatcher};

use crate::config::Settings;
use crate::orchestrator::{Orchestrator, OrchestratorConfig};

/// Wire the production collaborators into an [`Orchestrator`].
///
/// The ledger implementation is injected by the caller; its HTTP/OAuth
/// mechanics live outside this crate.
pub async fn build_orchestrator(
    settings: &Settings,
    ledger: Arc<dyn Ledger>,
) -> Result<Orchestrator> {
    let store = MongoThreadStore::connect(
        &settings.mongodb_uri,
        &settings.store.database,
        &settings.store.collection,
    )
    .await?;

    let mut assistant = OpenAIAssistantClient::new(
        &settings.openai_api_key,
        &settings.assistant.assistant_id,
    )?
    .with_poll_interval(Duration::from_millis(settings.assistant.poll_interval_ms));
    if let Some(base_url) = &settings.assistant.base_url {
        assistant = assistant.with_base_url(base_url);
    }

    let mut transcriber = WhisperTranscriber::new(&settings.openai_api_key);
    if let (Some(sid), Some(token)) = (
        &settings.channel_account_sid,
        &settings.channel_auth_token,
    ) {
        transcriber = transcriber.with_media_auth(sid, token);
    }

    let dispatcher = ToolDispatcher::new(ledger)
        .with_timeout(Duration::from_secs(settings.tools.timeout_seconds));

    let config = OrchestratorConfig::default()
        .with_run_max_wait(Duration::from_secs(settings.runtime.run_max_wait_seconds))
        .with_max_tool_cycles(settings.runtime.max_tool_cycles);

    Ok(
        Orchestrator::new(Arc::new(store), Arc::new(assistant), Arc::new(dispatcher))
            .with_transcriber(Arc::new(transcriber))
            .with_config(config),
    )
}
