//! Documents entering the ingestion pipeline and the keys their chunks are stored under

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Prefix for every stored chunk key
pub const STORAGE_KEY_PREFIX: &str = "documents";

/// Raw document handed to the ingestion pipeline. Never persisted as a whole.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Whether the document has nothing worth indexing
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Number of characters in the content
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Build a document from raw file bytes, see [`decode_text`]
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Self {
        Self::new(name, decode_text(data))
    }
}

/// Decode file bytes as UTF-8, dropping invalid byte sequences and NUL characters
pub fn decode_text(data: &[u8]) -> String {
    let mut text = String::with_capacity(data.len());
    for chunk in data.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text.retain(|c| c != '\0');
    text
}

/// Whether a file name refers to a PDF, whose text cannot be extracted here
pub fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Encode a document name so it can be embedded in a storage key.
///
/// Spaces become `+`. ASCII letters, digits and `_.-~` are kept, every
/// other byte is percent-encoded.
pub fn safe_document_name(name: &str) -> String {
    // form encoding keeps `*` and escapes `~`; a literal `%` is always
    // emitted as `%25`, so `%7E` can only come from `~`
    form_urlencoded::byte_serialize(name.as_bytes())
        .collect::<String>()
        .replace('*', "%2A")
        .replace("%7E", "~")
}

/// Build the storage key for a chunk: `documents/{safe_name}_{index}`
pub fn chunk_storage_key(safe_name: &str, index: usize) -> String {
    format!("{}/{}_{}", STORAGE_KEY_PREFIX, safe_name, index)
}

/// Outcome of indexing one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    pub chunks_indexed: usize,
    pub total_chars: usize,
}

impl IngestionReport {
    pub fn new(chunks_indexed: usize, total_chars: usize) -> Self {
        Self {
            chunks_indexed,
            total_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_name_plain() {
        assert_eq!(safe_document_name("a.txt"), "a.txt");
    }

    #[test]
    fn test_safe_name_encodes_reserved() {
        assert_eq!(safe_document_name("my report.pdf"), "my+report.pdf");
        assert_eq!(safe_document_name("a/b?c&d"), "a%2Fb%3Fc%26d");
        assert_eq!(safe_document_name("å.md"), "%C3%A5.md");
        assert_eq!(safe_document_name("a*b~c.txt"), "a%2Ab~c.txt");
        assert_eq!(safe_document_name("%7E~"), "%257E~");
        assert_eq!(safe_document_name("x_y-z.v1"), "x_y-z.v1");
    }

    #[test]
    fn test_chunk_storage_key() {
        assert_eq!(chunk_storage_key("a.txt", 0), "documents/a.txt_0");
        assert_eq!(chunk_storage_key("my+report.pdf", 12), "documents/my+report.pdf_12");
    }

    #[test]
    fn test_blank_document() {
        assert!(Document::new("x", "  \n\t ").is_blank());
        assert!(!Document::new("x", " hi ").is_blank());
    }

    #[test]
    fn test_decode_text_drops_invalid_bytes_and_nul() {
        assert_eq!(decode_text(b"abc\0def"), "abcdef");
        assert_eq!(decode_text(b"ok\xff\xfe!"), "ok!");
        assert_eq!(decode_text("blåbær".as_bytes()), "blåbær");
        assert_eq!(Document::from_bytes("f", b"a\0b").content, "ab");
    }

    #[test]
    fn test_is_pdf_name() {
        assert!(is_pdf_name("report.pdf"));
        assert!(is_pdf_name("SCAN.PDF"));
        assert!(!is_pdf_name("notes.pdf.txt"));
        assert!(!is_pdf_name("pdf"));
    }

    #[test]
    fn test_char_count() {
        assert_eq!(Document::new("x", "hello world").char_count(), 11);
        assert_eq!(Document::new("x", "smørrebrød").char_count(), 10);
    }
}
