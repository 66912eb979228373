use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Assistants API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("Response deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run {run_id} ended with terminal status: {status}")]
    RunFailed { run_id: String, status: String },

    #[error("Run {run_id} not finished after {waited:?}")]
    Timeout { run_id: String, waited: Duration },

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, AssistantError>;
