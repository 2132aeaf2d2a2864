//! QGC Domain Layer
//!
//! Core domain model for the QGC (Quadro Geral de Credores) analyzer.
//! Defines the record, chunk and comparison value objects that all other
//! layers exchange, plus the trait boundary to the generative text service.
//!
//! ## Key Concepts
//!
//! - **CreditorRecord**: an open-ended field map rather than a fixed
//!   struct; the extraction service decides which fields it can populate
//!   per document
//! - **DocumentChunk**: a page-bounded slice of extracted document text
//! - **ComparisonResult**: the classified diff between two creditor lists
//! - **TextGenerator**: the single call contract to the generative service
//!
//! Infrastructure implementations (HTTP providers, the analysis pipeline,
//! the CLI) live in other crates and depend on this one.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod comparison;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use chunk::DocumentChunk;
pub use comparison::{ComparisonResult, ComparisonSummary, ModifiedEntry};
pub use record::{CreditorRecord, FieldMap, SOURCE_PAGES_FIELD};
pub use traits::{GenerationRequest, TextGenerator};
