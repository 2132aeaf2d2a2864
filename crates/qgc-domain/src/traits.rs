//! Trait definitions for external interactions
//!
//! These traits define the boundary between the analysis pipeline and the
//! generative text service. Provider implementations live in `qgc-llm`.

use async_trait::async_trait;

/// One request to the generative text service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier understood by the provider (e.g. `openai/gpt-4o`).
    pub model: String,

    /// Full prompt text.
    pub prompt: String,

    /// Sampling temperature. The pipeline runs at 0.1 to favor
    /// deterministic, extraction-friendly output.
    pub temperature: f32,

    /// Maximum output token budget for this call.
    pub max_tokens: u32,
}

/// The single call contract the analysis pipeline depends on.
///
/// A successful call yields the content of the service's first choice,
/// which may legitimately be empty; callers decide whether an empty body is
/// an error for their operation. Calls are synchronous request/response
/// from the pipeline's point of view and are never issued concurrently.
#[async_trait]
pub trait TextGenerator {
    /// Error type for provider failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a completion for the given request.
    async fn generate(&self, request: GenerationRequest) -> Result<String, Self::Error>;
}
