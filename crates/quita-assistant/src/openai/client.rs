// OpenAI Assistants API client (HTTP direct, no SDK)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tokio::time::Instant;

use crate::error::{AssistantError, Result};
use crate::traits::AssistantBackend;
use crate::types::message::MessageList;
use crate::types::{Message, RunOutcome, RunStatus, ToolInvocation, ToolResult};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Assistants API driver.
///
/// Runs are driven by polling at a fixed interval rather than exponential
/// backoff: run durations are typically single-digit seconds, so a constant
/// short sleep keeps reply latency low at negligible request cost.
pub struct OpenAIAssistantClient {
    http_client: reqwest::Client,
    base_url: String,
    assistant_id: String,
    poll_interval: Duration,
}

impl OpenAIAssistantClient {
    /// Create a new client bound to one assistant.
    pub fn new(api_key: impl Into<String>, assistant_id: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let assistant_id = assistant_id.into();

        if assistant_id.is_empty() {
            return Err(AssistantError::Configuration(
                "assistant_id must not be empty".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| AssistantError::Configuration("invalid API key format".to_string()))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
            assistant_id,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Override the API base URL (local proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the fixed sleep between run-status checks.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl AssistantBackend for OpenAIAssistantClient {
    async fn create_thread(&self) -> Result<String> {
        let thread: ObjectRef = self.post_json("/threads", &json!({})).await?;
        tracing::info!(thread_id = %thread.id, "created assistant thread");
        Ok(thread.id)
    }

    async fn add_message(&self, thread_id: &str, text: &str) -> Result<()> {
        let _: ObjectRef = self
            .post_json(
                &format!("/threads/{}/messages", thread_id),
                &json!({ "role": "user", "content": text }),
            )
            .await?;
        tracing::debug!(thread_id, "appended user message");
        Ok(())
    }

    async fn run(&self, thread_id: &str, max_wait: Duration) -> Result<RunOutcome> {
        let mut run: RunObject = self
            .post_json(
                &format!("/threads/{}/runs", thread_id),
                &json!({ "assistant_id": self.assistant_id }),
            )
            .await?;
        tracing::info!(thread_id, run_id = %run.id, "run started");

        let started = Instant::now();
        loop {
            tracing::debug!(run_id = %run.id, status = run.status.as_str(), "polled run status");

            match run.status {
                RunStatus::Completed => {
                    return Ok(RunOutcome::Completed { run_id: run.id });
                }
                RunStatus::RequiresAction => {
                    let invocations = run
                        .required_action
                        .map(RequiredAction::into_invocations)
                        .unwrap_or_default();
                    return Ok(RunOutcome::RequiresAction {
                        run_id: run.id,
                        invocations,
                    });
                }
                status if status.is_terminal() => {
                    return Err(AssistantError::RunFailed {
                        run_id: run.id,
                        status: status.as_str().to_string(),
                    });
                }
                _ => {}
            }

            if started.elapsed() >= max_wait {
                return Err(AssistantError::Timeout {
                    run_id: run.id,
                    waited: started.elapsed(),
                });
            }

            tokio::time::sleep(self.poll_interval).await;
            run = self
                .get_json(&format!("/threads/{}/runs/{}", thread_id, run.id))
                .await?;
        }
    }

    async fn submit_tool_results(
        &self,
        thread_id: &str,
        run_id: &str,
        results: &[ToolResult],
    ) -> Result<()> {
        let _: RunObject = self
            .post_json(
                &format!("/threads/{}/runs/{}/submit_tool_outputs", thread_id, run_id),
                &json!({ "tool_outputs": results }),
            )
            .await?;
        tracing::info!(run_id, outputs = results.len(), "submitted tool outputs");
        Ok(())
    }

    async fn latest_messages(&self, thread_id: &str, limit: u32) -> Result<Vec<Message>> {
        let list: MessageList = self
            .get_json(&format!(
                "/threads/{}/messages?limit={}&order=desc",
                thread_id, limit
            ))
            .await?;
        Ok(list.data.into_iter().map(|m| m.into_message()).collect())
    }
}

// ============================================================================
// WIRE TYPES (Assistants API run objects)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ObjectRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunObject {
    id: String,
    status: RunStatus,
    #[serde(default)]
    required_action: Option<RequiredAction>,
}

#[derive(Debug, Deserialize)]
struct RequiredAction {
    submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Debug, Deserialize)]
struct SubmitToolOutputs {
    tool_calls: Vec<ToolCallObject>,
}

#[derive(Debug, Deserialize)]
struct ToolCallObject {
    id: String,
    function: FunctionCallObject,
}

#[derive(Debug, Deserialize)]
struct FunctionCallObject {
    name: String,
    arguments: String,
}

impl RequiredAction {
    fn into_invocations(self) -> Vec<ToolInvocation> {
        self.submit_tool_outputs
            .tool_calls
            .into_iter()
            .map(|call| ToolInvocation {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect()
    }
}
