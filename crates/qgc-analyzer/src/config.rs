//! Configuration for the analysis pipeline

use serde::{Deserialize, Serialize};

/// Tunable limits and budgets for one `Analyzer`.
///
/// The defaults mirror the service limits the pipeline was calibrated
/// against: request-size caps on embedded text, per-operation output token
/// budgets, and the record counts the service can compare reliably in a
/// single consolidation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Model identifier passed to the generative service.
    pub model_id: String,

    /// Sampling temperature for all calls. Low values favor consistent,
    /// extraction-friendly output.
    pub temperature: f32,

    /// Output token budget for one extraction call.
    pub extraction_max_tokens: u32,

    /// Output token budget for one consolidation batch call.
    pub consolidation_max_tokens: u32,

    /// Output token budget for the comparison call.
    pub comparison_max_tokens: u32,

    /// Maximum characters of document text embedded in an extraction
    /// prompt. Text beyond the cap is silently omitted.
    pub extraction_text_limit: usize,

    /// Maximum characters of serialized records embedded per list in the
    /// comparison prompt. Also a lossy boundary on very large lists.
    pub comparison_list_limit: usize,

    /// Record count up to which consolidation runs as a single batch call.
    pub consolidation_direct_limit: usize,

    /// Batch size for consolidating larger record sets.
    pub consolidation_batch_size: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model_id: "openai/gpt-4o".to_string(),
            temperature: 0.1,
            extraction_max_tokens: 4000,
            consolidation_max_tokens: 8000,
            comparison_max_tokens: 6000,
            extraction_text_limit: 8000,
            comparison_list_limit: 4000,
            consolidation_direct_limit: 150,
            consolidation_batch_size: 100,
        }
    }
}

impl AnalyzerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.model_id.trim().is_empty() {
            return Err("model_id must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.extraction_text_limit == 0 {
            return Err("extraction_text_limit must be greater than 0".to_string());
        }
        if self.comparison_list_limit == 0 {
            return Err("comparison_list_limit must be greater than 0".to_string());
        }
        if self.consolidation_batch_size == 0 {
            return Err("consolidation_batch_size must be greater than 0".to_string());
        }
        if self.consolidation_batch_size > self.consolidation_direct_limit {
            return Err("consolidation_batch_size cannot exceed consolidation_direct_limit".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string. Missing fields take their
    /// default values.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("failed to serialize to TOML: {}", e))
    }
}
