//! Core analyzer handle and the shared service call path

use crate::config::AnalyzerConfig;
use qgc_domain::{GenerationRequest, TextGenerator};
use std::fmt;
use tracing::debug;

/// The analysis pipeline over one generative service provider.
///
/// All operations run on a single logical thread of control: chunk
/// extractions, consolidation batches and the comparison call each block on
/// their service round trip before the next begins. Nothing here fans out,
/// so the only mutable state of a run (the accumulating record list) needs
/// no locking.
pub struct Analyzer<G: TextGenerator> {
    pub(crate) service: G,
    pub(crate) config: AnalyzerConfig,
}

/// Why a service round trip produced nothing usable.
pub(crate) enum CallFailure {
    /// The provider call itself failed.
    Service(String),
    /// The call succeeded but the content string was empty.
    EmptyResponse,
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallFailure::Service(cause) => f.write_str(cause),
            CallFailure::EmptyResponse => f.write_str("a resposta da IA estava vazia"),
        }
    }
}

impl<G> Analyzer<G>
where
    G: TextGenerator + Send + Sync,
{
    /// Create an analyzer over the given provider.
    pub fn new(service: G, config: AnalyzerConfig) -> Self {
        Self { service, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// One generation round trip at the pipeline's temperature.
    ///
    /// An empty content string counts as a failure here; the operations
    /// that can tolerate one (consolidation) catch it and degrade.
    pub(crate) async fn call(&self, prompt: String, max_tokens: u32) -> Result<String, CallFailure> {
        let request = GenerationRequest {
            model: self.config.model_id.clone(),
            prompt,
            temperature: self.config.temperature,
            max_tokens,
        };

        let content = self
            .service
            .generate(request)
            .await
            .map_err(|e| CallFailure::Service(e.to_string()))?;

        if content.is_empty() {
            return Err(CallFailure::EmptyResponse);
        }

        debug!("AI response length: {} characters", content.len());
        Ok(content)
    }
}
