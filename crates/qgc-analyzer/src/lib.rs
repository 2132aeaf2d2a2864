//! QGC Analysis Pipeline
//!
//! Converts unstructured QGC (Quadro Geral de Credores) document text into
//! structured creditor records through a generative text service, then
//! reconciles two versions of a creditor list into a classified diff.
//!
//! # Architecture
//!
//! ```text
//! page texts → chunking → extraction (per chunk) → consolidation → records
//!                                                       │
//!                              records (old) ──┐        │
//!                              records (new) ──┴→ comparison → diff
//! ```
//!
//! Every judgment call (which fields a document supports, whether two
//! records describe the same creditor, what changed between versions) is
//! delegated to the generative service through a single call contract. The
//! service is unreliable by nature, so every delegation is paired with a
//! non-destructive fallback: parse failures degrade to empty results,
//! consolidation failures return the untouched input, and only top-level
//! extraction/comparison call failures are surfaced to the caller.
//!
//! # Example
//!
//! ```no_run
//! use qgc_analyzer::{chunking, Analyzer, AnalyzerConfig};
//! use qgc_llm::FalClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = FalClient::new(std::env::var("FAL_KEY")?);
//! let analyzer = Analyzer::new(provider, AnalyzerConfig::default());
//!
//! let pages = vec!["página 1...".to_string(), "página 2...".to_string()];
//! let chunks = chunking::chunk_pages(&pages, chunking::DEFAULT_PAGES_PER_CHUNK);
//!
//! let (records, total_seen) = analyzer
//!     .extract_from_chunks(&chunks, "QGC 2024", |_| {})
//!     .await?;
//!
//! println!("{} credores ({} antes da consolidação)", records.len(), total_seen);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
pub mod chunking;
mod comparator;
mod config;
mod consolidator;
mod error;
mod extractor;
mod parser;
mod prompt;


pub use analyzer::Analyzer;
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use extractor::ChunkProgress;
