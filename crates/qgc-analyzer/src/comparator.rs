//! Reconciliation of two creditor list versions

use crate::analyzer::Analyzer;
use crate::error::AnalyzerError;
use crate::{parser, prompt};
use qgc_domain::{
    ComparisonResult, ComparisonSummary, CreditorRecord, TextGenerator, SOURCE_PAGES_FIELD,
};
use std::collections::HashSet;
use tracing::warn;

impl<G> Analyzer<G>
where
    G: TextGenerator + Send + Sync,
{
    /// Compare two versions of a creditor list into a classified diff.
    ///
    /// One prompt embeds both lists (each truncated to the comparison list
    /// limit) and one call classifies every creditor as new, removed,
    /// modified or unchanged. A failed or empty call is fatal; an answer
    /// that cannot be parsed degrades to the all-zero default result.
    ///
    /// The service's partition is validated and repaired before returning:
    /// cross-bucket duplicates are dropped, input records the service
    /// omitted are restored, confidence scores are clamped to [0, 1] and
    /// the summary is recomputed from the actual bucket sizes.
    pub async fn compare(
        &self,
        old_records: &[CreditorRecord],
        new_records: &[CreditorRecord],
    ) -> Result<ComparisonResult, AnalyzerError> {
        let old_json = serde_json::to_string_pretty(old_records)
            .map_err(|e| AnalyzerError::Comparison(e.to_string()))?;
        let new_json = serde_json::to_string_pretty(new_records)
            .map_err(|e| AnalyzerError::Comparison(e.to_string()))?;

        let prompt =
            prompt::comparison_prompt(&old_json, &new_json, self.config.comparison_list_limit);

        let response = self
            .call(prompt, self.config.comparison_max_tokens)
            .await
            .map_err(|failure| AnalyzerError::Comparison(failure.to_string()))?;

        let Some(mut result) = parser::try_parse_comparison(&response) else {
            // "No comparison performed" beats crashing the caller.
            return Ok(ComparisonResult::default());
        };

        normalize_partition(&mut result, old_records, new_records);
        Ok(result)
    }
}

/// Enforce the partition invariant: every input record lands in exactly one
/// bucket, buckets carry no provenance, and the summary reflects reality.
fn normalize_partition(
    result: &mut ComparisonResult,
    old_records: &[CreditorRecord],
    new_records: &[CreditorRecord],
) {
    scrub_buckets(result);
    dedupe_buckets(result);
    restore_missing(result, old_records, new_records);

    result.summary = ComparisonSummary {
        total_old: old_records.len(),
        total_new: new_records.len(),
        new_count: result.new_creditors.len(),
        removed_count: result.removed_creditors.len(),
        modified_count: result.modified_creditors.len(),
        unchanged_count: result.unchanged_creditors.len(),
    };
}

fn scrub_buckets(result: &mut ComparisonResult) {
    for record in result
        .new_creditors
        .iter_mut()
        .chain(result.removed_creditors.iter_mut())
        .chain(result.unchanged_creditors.iter_mut())
    {
        record.strip_source_pages();
    }

    for entry in &mut result.modified_creditors {
        entry.creditor.strip_source_pages();
        entry.old_values.remove(SOURCE_PAGES_FIELD);
        entry.confidence_score = entry.confidence_score.clamp(0.0, 1.0);
    }
}

/// Drop structural duplicates across buckets, keeping modified over
/// unchanged over new. Unchanged wins over new because an unchanged
/// classification also accounts for the record's previous-version
/// occurrence. The same coverage rule applies on the old side: a removed
/// entry already accounted for by an unchanged record or a modified entry's
/// reconstructed old is dropped.
fn dedupe_buckets(result: &mut ComparisonResult) {
    let before = result.new_creditors.len()
        + result.modified_creditors.len()
        + result.unchanged_creditors.len()
        + result.removed_creditors.len();

    let mut claimed = HashSet::new();
    result
        .modified_creditors
        .retain(|entry| claimed.insert(entry.creditor.canonical_key()));
    result
        .unchanged_creditors
        .retain(|record| claimed.insert(record.canonical_key()));
    result
        .new_creditors
        .retain(|record| claimed.insert(record.canonical_key()));

    let mut old_side = KeyIndex::default();
    for record in &result.unchanged_creditors {
        old_side.add(record);
    }
    for entry in &result.modified_creditors {
        old_side.add(&entry.reconstructed_old());
    }

    let mut seen_removed = HashSet::new();
    result.removed_creditors.retain(|record| {
        seen_removed.insert(record.canonical_key()) && !old_side.contains(record)
    });

    let after = result.new_creditors.len()
        + result.modified_creditors.len()
        + result.unchanged_creditors.len()
        + result.removed_creditors.len();
    if after < before {
        warn!("comparison placed {} creditors in more than one bucket", before - after);
    }
}

/// Re-add input records the service silently dropped: current-version
/// records become new, previous-version records become removed.
fn restore_missing(
    result: &mut ComparisonResult,
    old_records: &[CreditorRecord],
    new_records: &[CreditorRecord],
) {
    let mut covered = KeyIndex::default();
    for record in &result.new_creditors {
        covered.add(record);
    }
    for entry in &result.modified_creditors {
        covered.add(&entry.creditor);
    }
    for record in &result.unchanged_creditors {
        covered.add(record);
    }
    for record in new_records {
        if !covered.contains(record) {
            warn!(
                "comparison dropped a current-version creditor, reclassifying as new: {}",
                record.nome().unwrap_or("<sem nome>")
            );
            let mut restored = record.clone();
            restored.strip_source_pages();
            covered.add(&restored);
            result.new_creditors.push(restored);
        }
    }

    let mut covered = KeyIndex::default();
    for record in &result.removed_creditors {
        covered.add(record);
    }
    for record in &result.unchanged_creditors {
        covered.add(record);
    }
    for entry in &result.modified_creditors {
        covered.add(&entry.reconstructed_old());
    }
    for record in old_records {
        if !covered.contains(record) {
            warn!(
                "comparison dropped a previous-version creditor, reclassifying as removed: {}",
                record.nome().unwrap_or("<sem nome>")
            );
            let mut restored = record.clone();
            restored.strip_source_pages();
            covered.add(&restored);
            result.removed_creditors.push(restored);
        }
    }
}

/// Membership index over canonical serialization plus a lowercased name
/// key, so records the service echoed with reformatted fields still count
/// as covered.
#[derive(Default)]
struct KeyIndex {
    keys: HashSet<String>,
}

impl KeyIndex {
    fn add(&mut self, record: &CreditorRecord) {
        self.keys.insert(record.canonical_key());
        if let Some(name) = name_key(record) {
            self.keys.insert(name);
        }
    }

    fn contains(&self, record: &CreditorRecord) -> bool {
        self.keys.contains(&record.canonical_key())
            || name_key(record).is_some_and(|name| self.keys.contains(&name))
    }
}

fn name_key(record: &CreditorRecord) -> Option<String> {
    record
        .nome()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| format!("nome:{}", name.to_lowercase()))
}
