//! Audio transcription boundary.
//!
//! WhatsApp voice notes arrive as a media URL on the webhook. The
//! orchestrator only needs "media reference in, text out"; the Whisper
//! implementation downloads the file (the channel provider protects media
//! URLs with HTTP Basic auth) and uploads it to the transcription endpoint.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::{AssistantError, Result};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const WHISPER_MODEL: &str = "whisper-1";

/// Trait for turning a media reference into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, media_url: &str) -> Result<String>;
}

/// Whisper-backed transcriber.
pub struct WhisperTranscriber {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    media_auth: Option<(String, String)>,
}

impl WhisperTranscriber {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: OPENAI_API_BASE.to_string(),
            media_auth: None,
        }
    }

    /// Credentials for downloading media from the messaging provider.
    pub fn with_media_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.media_auth = Some((username.into(), password.into()));
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn download_media(&self, media_url: &str) -> Result<Vec<u8>> {
        let mut request = self.http_client.get(media_url);
        if let Some((username, password)) = &self.media_auth {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Transcription(format!(
                "media download failed with status {}",
                status
            )));
        }

        let bytes = response.bytes().await?;
        tracing::debug!(size = bytes.len(), "downloaded audio media");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, media_url: &str) -> Result<String> {
        let audio = self.download_media(media_url).await?;

        // WhatsApp voice notes are OGG/Opus; Whisper sniffs the format from
        // the file name.
        let part = Part::bytes(audio)
            .file_name("audio.ogg")
            .mime_str("audio/ogg")
            .map_err(|e| AssistantError::Transcription(e.to_string()))?;
        let form = Form::new().text("model", WHISPER_MODEL).part("file", part);

        let response = self
            .http_client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let transcription: TranscriptionResponse = response.json().await?;
        tracing::info!(chars = transcription.text.len(), "audio transcribed");
        Ok(transcription.text)
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}
