use serde::{Deserialize, Serialize};
use serde_json::json;

/// Lifecycle status of an assistant run, as reported by the backend.
///
/// Anything the backend adds in the future deserializes to `Unknown` and is
/// treated as still-in-progress by the polling loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Completed,
    Failed,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Terminal statuses that will never change on further polling.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

/// Reduced result of driving one run to a decision point.
///
/// `failed`/`cancelled`/`expired` never appear here; the driver surfaces
/// those as `AssistantError::RunFailed`.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed {
        run_id: String,
    },
    RequiresAction {
        run_id: String,
        invocations: Vec<ToolInvocation>,
    },
}

impl RunOutcome {
    pub fn run_id(&self) -> &str {
        match self {
            RunOutcome::Completed { run_id } => run_id,
            RunOutcome::RequiresAction { run_id, .. } => run_id,
        }
    }
}

/// One tool call requested by a run in `requires_action` state.
///
/// `arguments` is the raw JSON string exactly as delivered by the backend;
/// the caller decodes it before dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// Output for one tool invocation, correlated by `tool_call_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub output: String,
}

impl ToolResult {
    pub fn ok(tool_call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            output: output.into(),
        }
    }

    /// Structured error payload sent back to the assistant in place of a
    /// real result, so one bad call never aborts the batch.
    pub fn error(
        tool_call_id: impl Into<String>,
        error: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            output: json!({
                "error": error.into(),
                "message": message.into(),
            })
            .to_string(),
        }
    }
}
