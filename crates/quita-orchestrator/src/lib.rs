//! Conversation orchestration for the expense assistant.
//!
//! One inbound message is one turn: reduce any audio to text, combine it
//! with typed text, resolve the participant's thread, run the assistant,
//! dispatch whatever tools it requests (bounded by a hard cycle cap) and
//! extract the final reply. Every collaborator comes in through a trait,
//! so the whole flow is testable with in-memory fakes.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod orchestrator;

pub use bootstrap::build_orchestrator;
pub use config::Settings;
pub use error::{OrchestrationError, Result};
pub use orchestrator::{
    combine_content, Orchestrator, OrchestratorConfig, REPLY_GENERIC_FAILURE, REPLY_NO_ANSWER,
    REPLY_NOTHING_TO_PROCESS,
};
