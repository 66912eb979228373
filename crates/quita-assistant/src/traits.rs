use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Message, RunOutcome, ToolResult};

/// Trait for the assistant backend the orchestrator drives.
///
/// Implementations create threads, append user messages, run the assistant
/// over a thread and read back messages. Every operation maps backend
/// faults to `AssistantError`.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Allocate a new conversation thread, returning its opaque id.
    async fn create_thread(&self) -> Result<String>;

    /// Append a user-authored message to the thread.
    async fn add_message(&self, thread_id: &str, text: &str) -> Result<()>;

    /// Start a run over the thread and poll until it completes, requests
    /// tool execution, fails terminally or `max_wait` elapses.
    ///
    /// On timeout the underlying run is left in whatever state the backend
    /// reports; no cancellation is attempted.
    async fn run(&self, thread_id: &str, max_wait: Duration) -> Result<RunOutcome>;

    /// Resubmit all pending tool results for a run in one batched call.
    async fn submit_tool_results(
        &self,
        thread_id: &str,
        run_id: &str,
        results: &[ToolResult],
    ) -> Result<()>;

    /// Fetch the latest messages of a thread, most recent first.
    async fn latest_messages(&self, thread_id: &str, limit: u32) -> Result<Vec<Message>>;
}
