//! Creditor extraction from document text

use crate::analyzer::Analyzer;
use crate::error::AnalyzerError;
use crate::{parser, prompt};
use qgc_domain::{CreditorRecord, DocumentChunk, TextGenerator};
use tracing::info;

/// Synchronous progress notification for chunked extraction.
///
/// Delivered once per chunk, in chunk order, from the run's own execution
/// context before the chunk's service call starts. This is an observer, not
/// a concurrency primitive: chunk processing is strictly sequential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkProgress {
    /// Zero-based index of the chunk about to be processed.
    pub index: usize,
    /// Total chunk count for this document.
    pub total: usize,
    /// First page of the chunk (1-based).
    pub start_page: usize,
    /// Last page of the chunk (inclusive).
    pub end_page: usize,
}

impl<G> Analyzer<G>
where
    G: TextGenerator + Send + Sync,
{
    /// Extract creditor records from one block of document text.
    ///
    /// Only a bounded prefix of the text is embedded in the prompt (see
    /// `AnalyzerConfig::extraction_text_limit`). Fails when the service
    /// call errors or answers with an empty body; an answer that merely
    /// cannot be parsed degrades to an empty list instead.
    pub async fn extract_from_text(
        &self,
        text: &str,
        document_label: &str,
    ) -> Result<(Vec<CreditorRecord>, usize), AnalyzerError> {
        let prompt =
            prompt::extraction_prompt(text, document_label, self.config.extraction_text_limit);

        let response = self
            .call(prompt, self.config.extraction_max_tokens)
            .await
            .map_err(|failure| AnalyzerError::Extraction(failure.to_string()))?;

        let records = parser::parse_record_array(&response);
        info!("extracted {} creditors from {}", records.len(), document_label);

        let count = records.len();
        Ok((records, count))
    }

    /// Extract creditor records from a chunked document and consolidate
    /// them into one duplicate-free list.
    ///
    /// Chunks are processed strictly in order; `on_progress` is invoked
    /// exactly once per chunk with its index and page range. Every record
    /// is tagged with its source page range while accumulating, and the
    /// returned pair carries the consolidated list plus the record count
    /// seen before consolidation.
    pub async fn extract_from_chunks(
        &self,
        chunks: &[DocumentChunk],
        document_label: &str,
        mut on_progress: impl FnMut(ChunkProgress),
    ) -> Result<(Vec<CreditorRecord>, usize), AnalyzerError> {
        let mut all_records = Vec::new();

        for (index, chunk) in chunks.iter().enumerate() {
            info!(
                "processing chunk {}/{} (pages {}-{})",
                index + 1,
                chunks.len(),
                chunk.start_page,
                chunk.end_page
            );

            on_progress(ChunkProgress {
                index,
                total: chunks.len(),
                start_page: chunk.start_page,
                end_page: chunk.end_page,
            });

            let label = format!(
                "{} - Páginas {} a {} de {}",
                document_label, chunk.start_page, chunk.end_page, chunk.total_pages
            );

            let (mut records, count) = self
                .extract_from_text(&chunk.text, &label)
                .await
                .map_err(|e| AnalyzerError::ChunkedExtraction(e.to_string()))?;

            for record in &mut records {
                record.set_source_pages(chunk.start_page, chunk.end_page);
            }

            info!("extracted {} creditors from chunk {}", count, index + 1);
            all_records.extend(records);
        }

        let pre_consolidation_count = all_records.len();
        if pre_consolidation_count == 0 {
            return Ok((all_records, 0));
        }

        let consolidated = self.consolidate(all_records, document_label).await;
        info!(
            "consolidated to {} unique creditors from {} total extractions",
            consolidated.len(),
            pre_consolidation_count
        );
        Ok((consolidated, pre_consolidation_count))
    }
}
