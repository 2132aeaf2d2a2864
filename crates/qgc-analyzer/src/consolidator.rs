//! Deduplication of records accumulated across chunks
//!
//! Whether two records describe the same creditor is a fuzzy judgment, so
//! it is delegated to the generative service like the extraction itself.
//! The service's effective context window bounds how many records one call
//! can compare reliably, hence the batch-and-fold strategy for large sets.
//!
//! The safety rule throughout: never trust silence. An empty answer for a
//! non-empty batch is treated as a service failure and the original batch
//! is kept, residual duplicates and all. Over-reporting beats losing a
//! unique creditor.

use crate::analyzer::Analyzer;
use crate::{parser, prompt};
use qgc_domain::{CreditorRecord, TextGenerator};
use tracing::{info, warn};

/// Strip provenance tags from every record.
pub(crate) fn strip_provenance(mut records: Vec<CreditorRecord>) -> Vec<CreditorRecord> {
    for record in &mut records {
        record.strip_source_pages();
    }
    records
}

impl<G> Analyzer<G>
where
    G: TextGenerator + Send + Sync,
{
    /// Merge duplicate creditors into one duplicate-free list.
    ///
    /// Record sets up to the direct limit go through a single batch call.
    /// Larger sets are split into batches in original order; each batch is
    /// consolidated on its own, then folded into the running total by
    /// re-consolidating the concatenation, which re-exposes cross-batch
    /// duplicates to the service at every step.
    ///
    /// Never fails: any service misbehavior degrades to the affected input
    /// batch with provenance stripped.
    pub async fn consolidate(
        &self,
        records: Vec<CreditorRecord>,
        document_label: &str,
    ) -> Vec<CreditorRecord> {
        if records.len() <= self.config.consolidation_direct_limit {
            return self.consolidate_batch(records, document_label).await;
        }

        let total = records.len();
        let batch_size = self.config.consolidation_batch_size;
        info!("consolidating {} creditors in batches of {}", total, batch_size);

        let mut consolidated: Vec<CreditorRecord> = Vec::new();
        for (batch_index, batch) in split_into_batches(records, batch_size).into_iter().enumerate() {
            info!("processing batch {} with {} creditors", batch_index + 1, batch.len());

            let label = format!("{} - Lote {}", document_label, batch_index + 1);
            let batch_consolidated = self.consolidate_batch(batch, &label).await;

            if consolidated.is_empty() {
                consolidated = batch_consolidated;
            } else {
                // Fold: re-consolidate the concatenation so duplicates that
                // straddle batch boundaries meet in one call.
                consolidated.extend(batch_consolidated);
                let combined = std::mem::take(&mut consolidated);
                consolidated = self.consolidate_batch(combined, document_label).await;
            }
        }

        info!(
            "final consolidation: {} unique creditors from {} total",
            consolidated.len(),
            total
        );
        consolidated
    }

    /// Consolidate one batch through a single service call.
    pub(crate) async fn consolidate_batch(
        &self,
        batch: Vec<CreditorRecord>,
        document_label: &str,
    ) -> Vec<CreditorRecord> {
        if batch.is_empty() {
            return batch;
        }

        let batch_json = match serde_json::to_string_pretty(&batch) {
            Ok(json) => json,
            Err(e) => {
                warn!("batch serialization failed ({}), using original batch", e);
                return strip_provenance(batch);
            }
        };

        let prompt = prompt::consolidation_prompt(&batch_json, batch.len(), document_label);
        let response = match self.call(prompt, self.config.consolidation_max_tokens).await {
            Ok(response) => response,
            Err(failure) => {
                warn!("batch consolidation failed ({}), using original batch", failure);
                return strip_provenance(batch);
            }
        };

        let consolidated = parser::parse_record_array(&response);
        if consolidated.is_empty() {
            // An empty result for a non-empty batch signals service
            // failure, not a legitimate full deduplication.
            warn!("batch consolidation returned empty, using original batch");
            return strip_provenance(batch);
        }

        // The prompt instructs the service to drop the provenance field;
        // the pipeline guarantees it.
        strip_provenance(consolidated)
    }
}

fn split_into_batches(
    records: Vec<CreditorRecord>,
    batch_size: usize,
) -> Vec<Vec<CreditorRecord>> {
    let mut batches = Vec::new();
    let mut current = Vec::with_capacity(batch_size);

    for record in records {
        current.push(record);
        if current.len() == batch_size {
            batches.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(nome: &str) -> CreditorRecord {
        serde_json::from_value(json!({"nome": nome})).unwrap()
    }

    #[test]
    fn test_split_into_batches() {
        let records: Vec<_> = (0..7).map(|i| record(&format!("c{}", i))).collect();
        let batches = split_into_batches(records, 3);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 3);
        assert_eq!(batches[1].len(), 3);
        assert_eq!(batches[2].len(), 1);
        // Original order preserved.
        assert_eq!(batches[0][0].nome(), Some("c0"));
        assert_eq!(batches[2][0].nome(), Some("c6"));
    }

    #[test]
    fn test_strip_provenance() {
        let mut tagged = record("Banco X");
        tagged.set_source_pages(1, 20);

        let stripped = strip_provenance(vec![tagged, record("Loja Y")]);
        assert_eq!(stripped.len(), 2);
        assert!(stripped.iter().all(|r| r.source_pages().is_none()));
    }
}
