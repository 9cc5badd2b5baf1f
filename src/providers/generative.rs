//! Generative backend seam.
//!
//! The engine hands the backend a rendered instruction, the name of the
//! output schema, and a budget; the backend returns a JSON value or fails.
//! Fragment typing happens on the engine side
//! ([`Fragment::parse`](crate::payload::Fragment::parse)), so backends stay
//! schema-agnostic.
//!
//! [`OpenAiCompatBackend`] targets any OpenAI-compatible chat-completions
//! endpoint in JSON mode with temperature 0 and no retries: one attempt
//! per task, bounded by the task's budget.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

use crate::error::BackendError;

/// One bounded generation call.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    /// Rendered instruction (see [`crate::catalog::render`]).
    pub instruction: String,
    /// Name of the JSON schema the output must match; included in the
    /// system message so JSON-mode backends shape their output.
    pub schema: &'static str,
    pub max_tokens: u32,
    pub timeout: Duration,
}

/// External generative backend: rendered instruction in, typed-JSON
/// fragment out.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, BackendError>;
}

/// Direct chat-completions client for OpenAI-compatible endpoints.
#[derive(Clone, Debug)]
pub struct OpenAiCompatBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompatBackend {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }
}

#[async_trait]
impl GenerativeBackend for OpenAiCompatBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, BackendError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": format!(
                        "You are a linguistic analysis assistant. Respond with a single JSON object matching the {} schema.",
                        request.schema
                    )
                },
                {"role": "user", "content": request.instruction}
            ],
            "temperature": 0,
            "max_tokens": request.max_tokens,
            "response_format": {"type": "json_object"}
        });

        let mut call = self
            .client
            .post(&url)
            .timeout(request.timeout)
            .json(&body);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        let response = call
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let content = envelope["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(BackendError::Empty)?;

        serde_json::from_str(content).map_err(|e| BackendError::NonJson(e.to_string()))
    }
}
