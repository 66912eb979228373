use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One participant → thread binding.
///
/// Immutable once created; `put` overwrites the whole document
/// (last write wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadBinding {
    pub participant_id: String,
    pub thread_id: String,
    pub created_at: DateTime<Utc>,
}

impl ThreadBinding {
    pub fn new(participant_id: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            thread_id: thread_id.into(),
            created_at: Utc::now(),
        }
    }
}
