//! Error types for the analysis pipeline

use thiserror::Error;

/// Fatal failures of a pipeline operation.
///
/// These surface only when the generative service call itself failed or
/// came back with an empty body; everything downstream of a successful call
/// (unparseable content, implausible consolidation output) degrades locally
/// instead of erroring. Display strings keep the operator-facing Portuguese
/// labels the rest of the tooling expects.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Single-text extraction failed.
    #[error("Erro na análise com IA: {0}")]
    Extraction(String),

    /// Chunked extraction failed.
    #[error("Erro na extração em blocos: {0}")]
    ChunkedExtraction(String),

    /// Comparison of two record lists failed.
    #[error("Erro na comparação com IA: {0}")]
    Comparison(String),
}
