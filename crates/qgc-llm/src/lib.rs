//! QGC Generative Service Providers
//!
//! Implementations of the `TextGenerator` trait from `qgc-domain`.
//!
//! # Providers
//!
//! - `MockGenerator`: deterministic scripted provider for testing
//! - `FalClient`: fal.ai `any-llm` HTTP integration
//!
//! # Examples
//!
//! ```
//! use qgc_llm::MockGenerator;
//! use qgc_domain::{GenerationRequest, TextGenerator};
//!
//! # tokio_test::block_on(async {
//! let provider = MockGenerator::new("[]");
//! let request = GenerationRequest {
//!     model: "openai/gpt-4o".to_string(),
//!     prompt: "test prompt".to_string(),
//!     temperature: 0.1,
//!     max_tokens: 4000,
//! };
//! assert_eq!(provider.generate(request).await.unwrap(), "[]");
//! # });
//! ```

#![warn(missing_docs)]

pub mod fal;

use async_trait::async_trait;
use qgc_domain::{GenerationRequest, TextGenerator};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use fal::FalClient;

/// Errors that can occur while talking to a generative service.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("communication error: {0}")]
    Communication(String),

    /// The service answered with something the provider cannot decode
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The requested model is not available at the endpoint
    #[error("model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic provider error
    #[error("llm error: {0}")]
    Other(String),
}

enum Scripted {
    Response(String),
    Error(String),
}

/// Scripted generative service for deterministic testing.
///
/// Responses are served from a FIFO queue so multi-call pipelines (one call
/// per chunk, then consolidation batches and folds) can be scripted in
/// order; once the queue is drained every call yields the default response.
/// Every request is recorded for later inspection.
///
/// # Examples
///
/// ```
/// use qgc_llm::MockGenerator;
/// use qgc_domain::{GenerationRequest, TextGenerator};
///
/// # tokio_test::block_on(async {
/// let provider = MockGenerator::new("[]");
/// provider.push_response(r#"[{"nome": "Banco X"}]"#);
///
/// # let request = |p: &str| GenerationRequest {
/// #     model: "m".into(), prompt: p.into(), temperature: 0.1, max_tokens: 100,
/// # };
/// assert_eq!(
///     provider.generate(request("first")).await.unwrap(),
///     r#"[{"nome": "Banco X"}]"#
/// );
/// assert_eq!(provider.generate(request("second")).await.unwrap(), "[]");
/// assert_eq!(provider.call_count(), 2);
/// # });
/// ```
pub struct MockGenerator {
    default_response: String,
    queue: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerator {
    /// Create a mock that answers every call with `response` unless a
    /// scripted entry is queued.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response for the next unscripted call.
    pub fn push_response(&self, response: impl Into<String>) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Scripted::Response(response.into()));
    }

    /// Queue a failure for the next unscripted call.
    pub fn push_error(&self, message: impl Into<String>) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Scripted::Error(message.into()));
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// All requests made so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The prompts of all requests made so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl Clone for MockGenerator {
    fn clone(&self) -> Self {
        Self {
            default_response: self.default_response.clone(),
            queue: Arc::clone(&self.queue),
            requests: Arc::clone(&self.requests),
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    type Error = LlmError;

    async fn generate(&self, request: GenerationRequest) -> Result<String, Self::Error> {
        self.requests.lock().unwrap().push(request);

        let scripted = self.queue.lock().unwrap().pop_front();
        match scripted {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Error(message)) => Err(LlmError::Other(message)),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            model: "openai/gpt-4o".to_string(),
            prompt: prompt.to_string(),
            temperature: 0.1,
            max_tokens: 4000,
        }
    }

    #[tokio::test]
    async fn test_mock_default_response() {
        let provider = MockGenerator::new("fixed");
        assert_eq!(provider.generate(request("a")).await.unwrap(), "fixed");
        assert_eq!(provider.generate(request("b")).await.unwrap(), "fixed");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_queue_order() {
        let provider = MockGenerator::new("default");
        provider.push_response("first");
        provider.push_response("second");

        assert_eq!(provider.generate(request("1")).await.unwrap(), "first");
        assert_eq!(provider.generate(request("2")).await.unwrap(), "second");
        assert_eq!(provider.generate(request("3")).await.unwrap(), "default");
    }

    #[tokio::test]
    async fn test_mock_scripted_error() {
        let provider = MockGenerator::default();
        provider.push_error("boom");

        let result = provider.generate(request("x")).await;
        assert!(matches!(result, Err(LlmError::Other(_))));

        // Errors consume their queue slot like responses do.
        assert_eq!(provider.generate(request("y")).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let provider = MockGenerator::default();
        provider.generate(request("hello")).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "hello");
        assert_eq!(requests[0].temperature, 0.1);
        assert_eq!(provider.prompts(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_clone_shares_state() {
        let provider1 = MockGenerator::default();
        let provider2 = provider1.clone();

        provider1.generate(request("a")).await.unwrap();
        assert_eq!(provider2.call_count(), 1);
    }
}
