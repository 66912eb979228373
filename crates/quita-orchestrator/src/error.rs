use thiserror::Error;

use quita_assistant::AssistantError;
use quita_persist::StoreError;
use quita_tools::ToolError;

/// Single failure taxonomy at the orchestrator boundary.
///
/// Lower layers keep their own error types; everything collapses here so
/// the transport adapter has one thing to log and one decision to make
/// (which fixed user-safe reply to send). Internal detail never reaches
/// the end user.
#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("Thread store error: {0}")]
    Store(#[from] StoreError),

    #[error("Assistant backend error: {0}")]
    Assistant(#[from] AssistantError),

    #[error("Tool dispatch error: {0}")]
    Tool(#[from] ToolError),

    #[error("Run {run_id} exceeded the tool dispatch cycle limit ({limit})")]
    ToolCycleLimit { run_id: String, limit: usize },
}

pub type Result<T> = std::result::Result<T, OrchestrationError>;
