//! Creditor records extracted from QGC documents

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The ordered field mapping underlying a creditor record.
pub type FieldMap = Map<String, Value>;

/// Transient field recording which page range contributed a record during
/// chunked extraction. Provenance metadata, never identity; stripped before
/// a record is considered final.
pub const SOURCE_PAGES_FIELD: &str = "_source_pages";

/// One creditor as disclosed in a QGC document.
///
/// There is no fixed schema: the extraction service populates whatever
/// fields the source document supports. Conventional fields are `nome`,
/// `documento`, `valor`, `categoria`, `classificacao`, `garantia` and
/// `observacoes`, with `null` for anything unavailable. Monetary values are
/// kept as strings to preserve the document's original formatting.
///
/// Identity is semantic (the same real-world creditor), never structural;
/// the source documents guarantee no stable primary key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditorRecord(pub FieldMap);

impl CreditorRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(FieldMap::new())
    }

    /// Wrap an existing field map.
    pub fn from_fields(fields: FieldMap) -> Self {
        Self(fields)
    }

    /// Look up a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Insert or replace a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Number of populated fields, provenance included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the record carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The creditor's name, when the extraction produced one.
    ///
    /// Accepts the conventional Portuguese `nome` field with `name` as a
    /// fallback for responses that drifted into English.
    pub fn nome(&self) -> Option<&str> {
        self.0
            .get("nome")
            .or_else(|| self.0.get("name"))
            .and_then(Value::as_str)
    }

    /// Tag the record with the page range it was extracted from.
    pub fn set_source_pages(&mut self, start_page: usize, end_page: usize) {
        self.0.insert(
            SOURCE_PAGES_FIELD.to_string(),
            Value::String(format!("{}-{}", start_page, end_page)),
        );
    }

    /// The provenance tag, if still present.
    pub fn source_pages(&self) -> Option<&str> {
        self.0.get(SOURCE_PAGES_FIELD).and_then(Value::as_str)
    }

    /// Remove the provenance tag.
    pub fn strip_source_pages(&mut self) {
        self.0.remove(SOURCE_PAGES_FIELD);
    }

    /// Canonical serialized form with provenance ignored.
    ///
    /// Used for structural membership checks; semantic identity stays the
    /// generative service's judgment.
    pub fn canonical_key(&self) -> String {
        let mut fields = self.0.clone();
        fields.remove(SOURCE_PAGES_FIELD);
        Value::Object(fields).to_string()
    }
}

impl From<FieldMap> for CreditorRecord {
    fn from(fields: FieldMap) -> Self {
        Self(fields)
    }
}
