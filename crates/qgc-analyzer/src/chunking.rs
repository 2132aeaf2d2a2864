//! Chunking of page-indexed document text
//!
//! The PDF-to-text step itself lives outside this crate; whatever extractor
//! is used must yield one text entry per page, in page order. This module
//! turns that page sequence into the page-ranged chunks the extraction
//! pipeline consumes.

use qgc_domain::DocumentChunk;

/// Default page count per chunk.
pub const DEFAULT_PAGES_PER_CHUNK: usize = 20;

/// Split page texts into ordered, page-ranged chunks.
///
/// Pages whose extraction yielded no text contribute nothing; a chunk whose
/// pages are all empty is dropped entirely. Page numbers are 1-based and
/// inclusive. A `pages_per_chunk` of zero yields no chunks.
pub fn chunk_pages(pages: &[String], pages_per_chunk: usize) -> Vec<DocumentChunk> {
    if pages_per_chunk == 0 {
        return Vec::new();
    }

    let total_pages = pages.len();
    let mut chunks = Vec::new();

    for (group_index, group) in pages.chunks(pages_per_chunk).enumerate() {
        let start_page = group_index * pages_per_chunk + 1;
        let end_page = start_page + group.len() - 1;

        let mut text = String::new();
        for page in group {
            if !page.trim().is_empty() {
                text.push_str(page);
                text.push('\n');
            }
        }

        if !text.trim().is_empty() {
            chunks.push(DocumentChunk {
                text,
                start_page,
                end_page,
                total_pages,
            });
        }
    }

    chunks
}

/// Normalize extracted text: drop NUL characters and collapse whitespace.
pub fn clean_text(text: &str) -> String {
    text.replace('\0', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_chunk_pages_ranges() {
        let pages = pages(&["p1", "p2", "p3", "p4", "p5"]);
        let chunks = chunk_pages(&pages, 2);

        assert_eq!(chunks.len(), 3);
        assert_eq!((chunks[0].start_page, chunks[0].end_page), (1, 2));
        assert_eq!((chunks[1].start_page, chunks[1].end_page), (3, 4));
        assert_eq!((chunks[2].start_page, chunks[2].end_page), (5, 5));
        assert!(chunks.iter().all(|c| c.total_pages == 5));
    }

    #[test]
    fn test_empty_pages_contribute_nothing() {
        let pages = pages(&["p1", "", "  ", "p4"]);
        let chunks = chunk_pages(&pages, 4);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "p1\np4\n");
        assert_eq!((chunks[0].start_page, chunks[0].end_page), (1, 4));
    }

    #[test]
    fn test_all_empty_chunk_dropped() {
        let pages = pages(&["p1", "p2", "", ""]);
        let chunks = chunk_pages(&pages, 2);

        assert_eq!(chunks.len(), 1);
        assert_eq!((chunks[0].start_page, chunks[0].end_page), (1, 2));
    }

    #[test]
    fn test_zero_pages_per_chunk() {
        assert!(chunk_pages(&pages(&["p1"]), 0).is_empty());
    }

    #[test]
    fn test_no_pages() {
        assert!(chunk_pages(&[], 20).is_empty());
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("a\0b   c\n\nd"), "ab c d");
        assert_eq!(clean_text("  credor \t 123  "), "credor 123");
    }
}
