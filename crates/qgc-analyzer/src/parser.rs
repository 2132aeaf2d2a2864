//! Defensive parsing of generative service output
//!
//! The service is instructed to answer with pure JSON but is not
//! contractually guaranteed to: answers arrive wrapped in prose, code
//! fences, or both. Parsing therefore runs a chain of fallback strategies,
//! each attempted only when the previous one failed:
//!
//! 1. the whole string as JSON
//! 2. the inside of a fenced code block (optionally tagged `json`)
//! 3. the greedy first-to-last bracket span (`[..]` or `{..}`)
//! 4. the string with leading/trailing fences and a `json` tag stripped
//!
//! A strategy only succeeds when it yields the JSON shape the caller
//! expects, so a stray object where an array was requested falls through to
//! the next strategy instead of poisoning the result. When everything
//! fails, callers degrade to an empty list or the all-zero comparison
//! result; the offending text is logged as a bounded preview, never whole.

use qgc_domain::{ComparisonResult, CreditorRecord};
use serde_json::Value;
use tracing::warn;

const PREVIEW_CHARS: usize = 200;

#[derive(Clone, Copy)]
enum Shape {
    Array,
    Object,
}

/// Parse a response expected to contain a JSON array of creditor records.
///
/// Non-object array elements are skipped with a warning. Total failure
/// returns an empty list.
pub(crate) fn parse_record_array(response: &str) -> Vec<CreditorRecord> {
    let Some(value) = parse_with_strategies(response, Shape::Array) else {
        warn!("failed to parse AI response: {}...", preview(response));
        return Vec::new();
    };

    let Value::Array(items) = value else {
        // parse_with_strategies only returns the requested shape
        return Vec::new();
    };

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(fields) => records.push(CreditorRecord::from_fields(fields)),
            other => {
                let rendered = other.to_string();
                warn!("skipping non-object entry {} in record array: {}", idx, preview(&rendered));
            }
        }
    }
    records
}

/// Parse a response expected to contain a comparison result object.
///
/// Returns `None` when no strategy finds a JSON object, or when the object
/// found cannot be deserialized; callers degrade to
/// `ComparisonResult::default()`.
pub(crate) fn try_parse_comparison(response: &str) -> Option<ComparisonResult> {
    let value = parse_with_strategies(response, Shape::Object).or_else(|| {
        warn!("failed to parse comparison response: {}...", preview(response));
        None
    })?;

    match serde_json::from_value(value) {
        Ok(result) => Some(result),
        Err(e) => {
            warn!(
                "comparison response had unexpected structure ({}): {}...",
                e,
                preview(response)
            );
            None
        }
    }
}

fn parse_with_strategies(response: &str, shape: Shape) -> Option<Value> {
    // Strategy 1: the whole string.
    if let Some(value) = try_parse(response, shape) {
        return Some(value);
    }

    // Strategy 2: a fenced code block.
    if let Some(inner) = fenced_block(response) {
        if let Some(value) = try_parse(inner, shape) {
            return Some(value);
        }
    }

    // Strategy 3: the greedy first-to-last bracket span.
    if let Some(span) = bracket_span(response, shape) {
        if let Some(value) = try_parse(span, shape) {
            return Some(value);
        }
    }

    // Strategy 4: strip surrounding fences and an optional "json" tag.
    try_parse(strip_fences(response), shape)
}

fn try_parse(text: &str, shape: Shape) -> Option<Value> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    match (shape, &value) {
        (Shape::Array, Value::Array(_)) | (Shape::Object, Value::Object(_)) => Some(value),
        _ => None,
    }
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let rest = &text[start + 3..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

fn bracket_span(text: &str, shape: Shape) -> Option<&str> {
    let (open, close) = match shape {
        Shape::Array => ('[', ']'),
        Shape::Object => ('{', '}'),
    };
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (start < end).then(|| &text[start..=end])
}

fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|t| t.strip_suffix("```"))
    else {
        return trimmed;
    };
    let inner = inner.trim();
    inner.strip_prefix("json").map(str::trim).unwrap_or(inner)
}

/// Bounded, char-boundary-safe prefix for log messages.
fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RECORDS: &str = r#"[{"nome": "Banco X", "valor": "100"}, {"nome": "Loja Y", "valor": "50"}]"#;

    fn nomes(records: &[CreditorRecord]) -> Vec<&str> {
        records.iter().filter_map(CreditorRecord::nome).collect()
    }

    #[test]
    fn test_plain_array() {
        let records = parse_record_array(RECORDS);
        assert_eq!(nomes(&records), vec!["Banco X", "Loja Y"]);
    }

    #[test]
    fn test_fenced_array_with_tag() {
        let response = format!("```json\n{}\n```", RECORDS);
        assert_eq!(parse_record_array(&response).len(), 2);
    }

    #[test]
    fn test_fenced_array_without_tag() {
        let response = format!("```\n{}\n```", RECORDS);
        assert_eq!(parse_record_array(&response).len(), 2);
    }

    #[test]
    fn test_array_wrapped_in_prose() {
        let response = format!("Aqui estão os credores extraídos:\n{}\nEspero ter ajudado!", RECORDS);
        assert_eq!(parse_record_array(&response).len(), 2);
    }

    #[test]
    fn test_nested_fences() {
        let response = format!("```\n```json\n{}\n```\n```", RECORDS);
        assert_eq!(parse_record_array(&response).len(), 2);
    }

    #[test]
    fn test_unparseable_returns_empty() {
        assert!(parse_record_array("desculpe, não encontrei credores").is_empty());
        assert!(parse_record_array("").is_empty());
    }

    #[test]
    fn test_object_where_array_expected_returns_empty() {
        assert!(parse_record_array(r#"{"nome": "Banco X"}"#).is_empty());
    }

    #[test]
    fn test_non_object_elements_skipped() {
        let records = parse_record_array(r#"[{"nome": "Banco X"}, "texto solto", 42]"#);
        assert_eq!(nomes(&records), vec!["Banco X"]);
    }

    #[test]
    fn test_array_with_bracketed_strings() {
        // Greedy span must still cover the whole array.
        let response = r#"resultado: [{"nome": "Fundo [A]"}, {"nome": "Fundo [B]"}] fim"#;
        assert_eq!(parse_record_array(response).len(), 2);
    }

    #[test]
    fn test_comparison_plain_object() {
        let response = json!({
            "new_creditors": [{"nome": "Banco X"}],
            "removed_creditors": [],
            "modified_creditors": [],
            "unchanged_creditors": [],
            "summary": {"total_old": 0, "total_new": 1, "new_count": 1,
                        "removed_count": 0, "modified_count": 0, "unchanged_count": 0}
        })
        .to_string();

        let result = try_parse_comparison(&response).unwrap();
        assert_eq!(result.new_creditors.len(), 1);
        assert_eq!(result.summary.new_count, 1);
    }

    #[test]
    fn test_comparison_fenced_object() {
        let response = "```json\n{\"new_creditors\": [{\"nome\": \"Banco X\"}]}\n```";
        let result = try_parse_comparison(response).unwrap();
        assert_eq!(result.new_creditors.len(), 1);
        assert!(result.removed_creditors.is_empty());
    }

    #[test]
    fn test_comparison_object_in_prose() {
        let response = "Segue a comparação: {\"unchanged_creditors\": [{\"nome\": \"A\"}]} pronto.";
        let result = try_parse_comparison(response).unwrap();
        assert_eq!(result.unchanged_creditors.len(), 1);
    }

    #[test]
    fn test_comparison_unparseable_degrades_to_default() {
        assert!(try_parse_comparison("sem json aqui").is_none());
        assert_eq!(
            try_parse_comparison("sem json aqui").unwrap_or_default(),
            ComparisonResult::default()
        );
    }

    #[test]
    fn test_comparison_array_is_not_an_object() {
        assert!(try_parse_comparison(RECORDS).is_none());
    }

    #[test]
    fn test_preview_is_char_boundary_safe() {
        let text = "á".repeat(PREVIEW_CHARS + 50);
        assert_eq!(preview(&text).chars().count(), PREVIEW_CHARS);
    }
}
