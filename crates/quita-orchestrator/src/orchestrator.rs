use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use quita_assistant::{
    AssistantBackend, RunOutcome, ToolInvocation, ToolResult, Transcriber,
};
use quita_persist::ThreadStore;
use quita_tools::ToolDispatcher;

use crate::error::{OrchestrationError, Result};

/// Fixed reply when a turn carries no usable content at all.
pub const REPLY_NOTHING_TO_PROCESS: &str =
    "Desculpe, não recebi nenhum conteúdo para processar.";

/// Fixed reply when the assistant finished a run without producing text.
pub const REPLY_NO_ANSWER: &str = "Desculpe, não consegui gerar uma resposta.";

/// Fixed reply the transport adapter sends for any orchestration failure.
pub const REPLY_GENERIC_FAILURE: &str =
    "Desculpe, ocorreu um erro ao processar sua mensagem. Por favor, tente novamente em alguns instantes.";

/// Substituted for the transcript when audio transcription fails.
const AUDIO_PLACEHOLDER: &str = "[Não foi possível transcrever o áudio recebido]";

const DEFAULT_RUN_MAX_WAIT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_TOOL_CYCLES: usize = 5;

/// Tunables for one orchestrator instance.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Wall-clock budget for each run's polling loop.
    pub run_max_wait: Duration,
    /// Hard cap on dispatch-and-rerun cycles per turn. A buggy or
    /// adversarial assistant could otherwise request tools forever.
    pub max_tool_cycles: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            run_max_wait: DEFAULT_RUN_MAX_WAIT,
            max_tool_cycles: DEFAULT_MAX_TOOL_CYCLES,
        }
    }
}

impl OrchestratorConfig {
    pub fn with_run_max_wait(mut self, max_wait: Duration) -> Self {
        self.run_max_wait = max_wait;
        self
    }

    pub fn with_max_tool_cycles(mut self, cycles: usize) -> Self {
        self.max_tool_cycles = cycles;
        self
    }
}

/// Combine typed text and transcribed audio into one message body.
///
/// Both present: labeled sections so the assistant can tell spoken from
/// typed content. One present: that one, byte-for-byte. Neither (or only
/// whitespace): empty, which callers treat as "nothing to process".
/// Whitespace is only inspected to decide emptiness, never stripped from
/// the output.
pub fn combine_content(text: &str, transcript: &str) -> String {
    match (text.trim().is_empty(), transcript.trim().is_empty()) {
        (false, false) => format!(
            "[Texto digitado]\n{}\n\n[Transcrição do áudio]\n{}",
            text, transcript
        ),
        (false, true) => text.to_string(),
        (true, false) => transcript.to_string(),
        (true, true) => String::new(),
    }
}

/// Top-level state machine for one conversation turn.
///
/// All collaborators are injected; the orchestrator owns no I/O of its own
/// and holds no per-turn state, so one instance serves concurrent requests.
pub struct Orchestrator {
    store: Arc<dyn ThreadStore>,
    assistant: Arc<dyn AssistantBackend>,
    dispatcher: Arc<ToolDispatcher>,
    transcriber: Option<Arc<dyn Transcriber>>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn ThreadStore>,
        assistant: Arc<dyn AssistantBackend>,
        dispatcher: Arc<ToolDispatcher>,
    ) -> Self {
        Self {
            store,
            assistant,
            dispatcher,
            transcriber: None,
            config: OrchestratorConfig::default(),
        }
    }

    /// Without a transcriber, audio turns degrade to the placeholder text.
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Process one inbound message and return the reply text.
    ///
    /// The transport adapter maps `Err` to [`REPLY_GENERIC_FAILURE`]; the
    /// two designed degradations (failed transcription, failed individual
    /// tool call) are absorbed before this boundary and never surface as
    /// errors.
    pub async fn handle_incoming_message(
        &self,
        participant_id: &str,
        text: &str,
        media_url: Option<&str>,
        media_type: Option<&str>,
    ) -> Result<String> {
        let turn_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "turn",
            turn = %turn_id,
            participant = participant_id,
        );
        self.process_turn(participant_id, text, media_url, media_type)
            .instrument(span)
            .await
    }

    async fn process_turn(
        &self,
        participant_id: &str,
        text: &str,
        media_url: Option<&str>,
        media_type: Option<&str>,
    ) -> Result<String> {
        let transcript = self.reduce_media(media_url, media_type).await;
        let content = combine_content(text, &transcript);
        if content.is_empty() {
            tracing::info!("empty turn, nothing to process");
            return Ok(REPLY_NOTHING_TO_PROCESS.to_string());
        }

        let thread_id = self.resolve_thread(participant_id).await?;
        self.assistant.add_message(&thread_id, &content).await?;

        let mut outcome = self
            .assistant
            .run(&thread_id, self.config.run_max_wait)
            .await?;

        let mut cycles = 0usize;
        loop {
            match outcome {
                RunOutcome::Completed { run_id } => {
                    tracing::debug!(run = %run_id, cycles, "run completed");
                    break;
                }
                RunOutcome::RequiresAction { run_id, invocations } => {
                    cycles += 1;
                    if cycles > self.config.max_tool_cycles {
                        return Err(OrchestrationError::ToolCycleLimit {
                            run_id,
                            limit: self.config.max_tool_cycles,
                        });
                    }
                    tracing::info!(
                        run = %run_id,
                        cycle = cycles,
                        pending = invocations.len(),
                        "dispatching tool calls"
                    );
                    let results = self.dispatch_all(&invocations).await;
                    self.assistant
                        .submit_tool_results(&thread_id, &run_id, &results)
                        .await?;
                    // Submitting outputs resumes the backend; we drive a
                    // fresh run to its next decision point.
                    outcome = self
                        .assistant
                        .run(&thread_id, self.config.run_max_wait)
                        .await?;
                }
            }
        }

        self.extract_reply(&thread_id).await
    }

    /// Turn an optional media reference into transcript text.
    ///
    /// Only audio media is considered. Any transcription failure degrades
    /// to the placeholder rather than aborting the turn.
    async fn reduce_media(&self, media_url: Option<&str>, media_type: Option<&str>) -> String {
        let Some(url) = media_url else {
            return String::new();
        };
        let is_audio = media_type.is_some_and(|t| t.starts_with("audio/"));
        if !is_audio {
            tracing::debug!(media_type, "ignoring non-audio media");
            return String::new();
        }

        match &self.transcriber {
            Some(transcriber) => match transcriber.transcribe(url).await {
                Ok(transcript) => transcript,
                Err(error) => {
                    tracing::warn!(%error, "transcription failed, using placeholder");
                    AUDIO_PLACEHOLDER.to_string()
                }
            },
            None => {
                tracing::warn!("audio received but no transcriber configured");
                AUDIO_PLACEHOLDER.to_string()
            }
        }
    }

    /// Get the participant's thread, creating and binding one on first
    /// contact.
    ///
    /// Two racing first messages can both create a thread; the store's
    /// last-write-wins put decides and the loser's thread is simply
    /// orphaned on the backend.
    pub async fn resolve_thread(&self, participant_id: &str) -> Result<String> {
        if let Some(thread_id) = self.store.get(participant_id).await? {
            tracing::debug!(thread = %thread_id, "reusing bound thread");
            return Ok(thread_id);
        }

        let thread_id = self.assistant.create_thread().await?;
        self.store.put(participant_id, &thread_id).await?;
        tracing::info!(thread = %thread_id, "bound new thread");
        Ok(thread_id)
    }

    /// Execute every invocation, producing exactly one result per call.
    ///
    /// Failures are captured as structured error payloads, never
    /// propagated; one bad call must not abort the batch.
    async fn dispatch_all(&self, invocations: &[ToolInvocation]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(invocations.len());
        for invocation in invocations {
            results.push(self.dispatch_one(invocation).await);
        }
        results
    }

    async fn dispatch_one(&self, invocation: &ToolInvocation) -> ToolResult {
        let arguments: serde_json::Value = match serde_json::from_str(&invocation.arguments) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(
                    tool = %invocation.name,
                    call = %invocation.id,
                    %error,
                    "undecodable tool arguments"
                );
                return ToolResult::error(
                    &invocation.id,
                    "Argumentos inválidos",
                    error.to_string(),
                );
            }
        };

        match self.dispatcher.execute(&invocation.name, &arguments).await {
            Ok(output) => ToolResult::ok(&invocation.id, output),
            Err(error) => {
                tracing::warn!(
                    tool = %invocation.name,
                    call = %invocation.id,
                    %error,
                    "tool execution failed"
                );
                ToolResult::error(&invocation.id, "Erro na execução", error.to_string())
            }
        }
    }

    /// Read back the newest message and return its text if the assistant
    /// authored it; anything else falls back to the fixed no-answer reply.
    async fn extract_reply(&self, thread_id: &str) -> Result<String> {
        let messages = self.assistant.latest_messages(thread_id, 1).await?;
        match messages.first() {
            Some(message) if message.is_assistant() && !message.text.is_empty() => {
                Ok(message.text.clone())
            }
            _ => {
                tracing::warn!("completed run produced no assistant text");
                Ok(REPLY_NO_ANSWER.to_string())
            }
        }
    }
}
