//! Classified diffs between two creditor lists

use crate::record::{CreditorRecord, FieldMap};
use serde::{Deserialize, Serialize};

/// Result of reconciling two versions of a creditor list.
///
/// The four classifications are disjoint: every record from either input
/// list lands in exactly one bucket. `Default` is the canonical all-empty,
/// all-zero value the pipeline degrades to when the service response cannot
/// be interpreted at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Creditors present only in the current version.
    #[serde(default)]
    pub new_creditors: Vec<CreditorRecord>,

    /// Creditors present only in the previous version.
    #[serde(default)]
    pub removed_creditors: Vec<CreditorRecord>,

    /// Creditors present in both versions with field-level changes.
    #[serde(default)]
    pub modified_creditors: Vec<ModifiedEntry>,

    /// Creditors present in both versions without significant changes.
    #[serde(default)]
    pub unchanged_creditors: Vec<CreditorRecord>,

    /// Aggregate counts over the four buckets.
    #[serde(default)]
    pub summary: ComparisonSummary,
}

/// A creditor whose disclosed information changed between versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifiedEntry {
    /// The record as it appears in the current version.
    #[serde(default)]
    pub creditor: CreditorRecord,

    /// Changed fields mapped to their previous values.
    #[serde(default)]
    pub old_values: FieldMap,

    /// Human-readable description of what changed.
    #[serde(default)]
    pub changes: String,

    /// Match confidence reported by the service, in [0.0, 1.0].
    #[serde(default)]
    pub confidence_score: f64,
}

impl ModifiedEntry {
    /// Reconstruct the previous version of this creditor by overlaying the
    /// changed fields back onto the current record.
    pub fn reconstructed_old(&self) -> CreditorRecord {
        let mut old = self.creditor.clone();
        for (field, value) in &self.old_values {
            old.insert(field.clone(), value.clone());
        }
        old.strip_source_pages();
        old
    }
}

/// Counts summarizing a comparison run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Creditors in the previous version.
    #[serde(default)]
    pub total_old: usize,

    /// Creditors in the current version.
    #[serde(default)]
    pub total_new: usize,

    /// Size of the new bucket.
    #[serde(default)]
    pub new_count: usize,

    /// Size of the removed bucket.
    #[serde(default)]
    pub removed_count: usize,

    /// Size of the modified bucket.
    #[serde(default)]
    pub modified_count: usize,

    /// Size of the unchanged bucket.
    #[serde(default)]
    pub unchanged_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_all_zero() {
        let result = ComparisonResult::default();
        assert!(result.new_creditors.is_empty());
        assert!(result.removed_creditors.is_empty());
        assert!(result.modified_creditors.is_empty());
        assert!(result.unchanged_creditors.is_empty());
        assert_eq!(result.summary, ComparisonSummary::default());
    }

    #[test]
    fn test_deserialize_with_missing_buckets() {
        let result: ComparisonResult = serde_json::from_value(json!({
            "new_creditors": [{"nome": "Banco X"}]
        }))
        .unwrap();

        assert_eq!(result.new_creditors.len(), 1);
        assert!(result.removed_creditors.is_empty());
        assert_eq!(result.summary.new_count, 0);
    }

    #[test]
    fn test_reconstructed_old() {
        let entry: ModifiedEntry = serde_json::from_value(json!({
            "creditor": {"nome": "A", "valor": "20"},
            "old_values": {"valor": "10"},
            "changes": "valor alterado de 10 para 20",
            "confidence_score": 0.95
        }))
        .unwrap();

        let old = entry.reconstructed_old();
        assert_eq!(old.get("valor"), Some(&json!("10")));
        assert_eq!(old.get("nome"), Some(&json!("A")));
        // The current record is untouched.
        assert_eq!(entry.creditor.get("valor"), Some(&json!("20")));
    }
}
