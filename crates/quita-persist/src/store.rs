use async_trait::async_trait;

use crate::error::Result;

/// Trait for the participant → thread mapping store.
///
/// Callers rely on three guarantees: `get` never fails just because a
/// binding is missing, `put` is an idempotent create-or-overwrite, and
/// `delete` is a no-op on absent keys.
#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// Return the bound thread id, or `None` when no binding exists.
    async fn get(&self, participant_id: &str) -> Result<Option<String>>;

    /// Create or overwrite the binding. Last write wins.
    async fn put(&self, participant_id: &str, thread_id: &str) -> Result<()>;

    /// Remove the binding if present. Missing keys are not an error.
    async fn delete(&self, participant_id: &str) -> Result<()>;
}
