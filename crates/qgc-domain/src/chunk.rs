//! Page-bounded slices of extracted document text

use serde::{Deserialize, Serialize};

/// One extraction unit of a large document.
///
/// Produced by the chunking collaborator, consumed exactly once by the
/// extraction pipeline, then discarded. Page numbers are 1-based and
/// inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Extracted text for this page range.
    pub text: String,

    /// First page covered by this chunk (1-based).
    pub start_page: usize,

    /// Last page covered by this chunk (inclusive).
    pub end_page: usize,

    /// Total page count of the source document.
    pub total_pages: usize,
}

impl DocumentChunk {
    /// The page range as recorded in a record's provenance tag.
    pub fn page_range(&self) -> String {
        format!("{}-{}", self.start_page, self.end_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_range() {
        let chunk = DocumentChunk {
            text: "texto".to_string(),
            start_page: 21,
            end_page: 40,
            total_pages: 57,
        };
        assert_eq!(chunk.page_range(), "21-40");
    }
}
