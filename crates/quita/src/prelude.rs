//! Prelude module for convenient imports
//!
//! Import everything you need with:
//! ```rust
//! use quita::prelude::*;
//! ```

pub use crate::{
    build_orchestrator, Orchestrator, OrchestratorConfig, OrchestrationError, Settings,
    AssistantBackend, OpenAIAssistantClient, Transcriber, WhisperTranscriber,
    Message, MessageRole, RunOutcome, RunStatus, ToolInvocation, ToolResult,
    Ledger, MemoryLedger, ExpenseRow, ToolDispatcher, ToolKind,
    ThreadStore, MongoThreadStore, InMemoryThreadStore,
};
