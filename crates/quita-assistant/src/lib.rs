//! Assistant run driver for the Quita conversational core.
//!
//! Talks to the OpenAI Assistants API (HTTP direct, no SDK): creates
//! conversation threads, appends user messages, drives runs by polling at a
//! fixed interval, resubmits tool results and fetches the latest messages.
//! The `AssistantBackend` trait is the seam the orchestrator depends on;
//! `OpenAIAssistantClient` is the production implementation.

pub mod audio;
pub mod error;
pub mod openai;
pub mod traits;
pub mod types;

pub use audio::{Transcriber, WhisperTranscriber};
pub use error::{AssistantError, Result};
pub use openai::OpenAIAssistantClient;
pub use traits::AssistantBackend;
pub use types::{Message, MessageRole, RunOutcome, RunStatus, ToolInvocation, ToolResult};
