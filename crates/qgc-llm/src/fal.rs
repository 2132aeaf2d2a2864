//! fal.ai `any-llm` provider
//!
//! HTTP integration with fal.ai's model-agnostic completion endpoint. The
//! endpoint routes a single prompt to the model named in the request and
//! answers in an OpenAI-style `choices` envelope.
//!
//! There is deliberately no retry loop here: the analysis pipeline treats a
//! failed or empty call as fatal at the operation boundary and surfaces it
//! to the caller, so transport-level retries would only hide that signal.

use crate::LlmError;
use async_trait::async_trait;
use qgc_domain::{GenerationRequest, TextGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default fal.ai any-llm endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://fal.run/fal-ai/any-llm";

/// Default timeout for one generation call (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// fal.ai API provider.
///
/// # Examples
///
/// ```no_run
/// use qgc_llm::FalClient;
///
/// let provider = FalClient::new(std::env::var("FAL_KEY").unwrap());
/// ```
pub struct FalClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
}

#[derive(Serialize)]
struct AnyLlmRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize, Default)]
struct AnyLlmResponse {
    #[serde(default)]
    choices: Vec<AnyLlmChoice>,
}

#[derive(Deserialize, Default)]
struct AnyLlmChoice {
    #[serde(default)]
    message: AnyLlmMessage,
}

#[derive(Deserialize, Default)]
struct AnyLlmMessage {
    #[serde(default)]
    content: String,
}

impl FalClient {
    /// Create a provider against the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key)
    }

    /// Create a provider against a custom endpoint (e.g. a proxy).
    pub fn with_endpoint(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TextGenerator for FalClient {
    type Error = LlmError;

    /// Issue one completion call.
    ///
    /// A response with no choices, or a choice with no message content,
    /// yields an empty string; the pipeline decides whether that is fatal
    /// for the operation at hand.
    async fn generate(&self, request: GenerationRequest) -> Result<String, Self::Error> {
        let body = AnyLlmRequest {
            model: &request.model,
            prompt: &request.prompt,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Key {}", self.api_key))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(request.model));
        }
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, detail)));
        }

        let envelope: AnyLlmResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to decode response: {}", e)))?;

        Ok(envelope
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
