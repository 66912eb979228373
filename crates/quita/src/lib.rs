//! # Quita
//!
//! Conversational expense assistant core for WhatsApp: bridges an inbound
//! message webhook, an OpenAI Assistants thread/run loop, a spreadsheet
//! expense ledger and a durable participant → thread store.
//!
//! ## Overview
//!
//! One inbound message is one turn. The orchestrator:
//!
//! - **Reduces media**: audio voice notes are transcribed (Whisper); a
//!   failed transcription degrades to a placeholder, never an error
//! - **Resolves the thread**: each participant owns at most one assistant
//!   thread, persisted in MongoDB
//! - **Drives runs**: polls the Assistants API until completion, dispatching
//!   requested tool calls (add expense / read history) against the ledger
//! - **Extracts the reply**: the newest assistant message, with fixed
//!   Portuguese fallbacks for empty turns and silent runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quita::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!
//!     // Inject a ledger implementation (in-memory here; a spreadsheet
//!     // service client in production).
//!     let ledger: Arc<dyn Ledger> = Arc::new(MemoryLedger::new());
//!
//!     let orchestrator = build_orchestrator(&settings, ledger).await?;
//!
//!     let reply = orchestrator
//!         .handle_incoming_message(
//!             "whatsapp:+5511999999999",
//!             "almocei por 25 reais",
//!             None,
//!             None,
//!         )
//!         .await?;
//!     println!("{}", reply);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Quita is organized into focused crates:
//!
//! - **`quita-orchestrator`**: per-turn state machine, config and bootstrap
//! - **`quita-assistant`**: Assistants API run driver and Whisper transcriber
//! - **`quita-tools`**: closed tool set dispatched against the ledger
//! - **`quita-persist`**: participant → thread binding store (MongoDB)

pub mod prelude;

pub use quita_orchestrator::{
    build_orchestrator, combine_content, OrchestrationError, Orchestrator, OrchestratorConfig,
    Settings, REPLY_GENERIC_FAILURE, REPLY_NO_ANSWER, REPLY_NOTHING_TO_PROCESS,
};

pub use quita_assistant::{
    AssistantBackend, AssistantError, Message, MessageRole, OpenAIAssistantClient, RunOutcome,
    RunStatus, ToolInvocation, ToolResult, Transcriber, WhisperTranscriber,
};

pub use quita_tools::{
    ExpenseRow, Ledger, LedgerError, MemoryLedger, ToolDispatcher, ToolError, ToolKind,
};

pub use quita_persist::{
    InMemoryThreadStore, MongoThreadStore, StoreError, ThreadBinding, ThreadStore,
};
