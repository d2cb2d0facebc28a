//! Paragraph-based chunking strategy

use crate::domain::ingestion::{Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy};
use crate::domain::DomainError;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Chunking strategy that packs paragraphs into chunks of at most `max_size`
/// characters, seeding each new chunk with the tail of the previous one.
///
/// Paragraphs are never split: a single paragraph longer than `max_size` ends
/// up as one oversized chunk.
#[derive(Debug, Clone, Default)]
pub struct ParagraphChunker;

impl ParagraphChunker {
    /// Create a new paragraph chunker
    pub fn new() -> Self {
        Self
    }

    /// Whether a paragraph longer than `max_size` is broken up
    pub const fn splits_single_paragraph() -> bool {
        false
    }

    fn pack(content: &str, config: &ChunkingConfig) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut buffer = String::new();
        let mut buffer_chars = 0usize;

        for paragraph in content.split(PARAGRAPH_SEPARATOR) {
            let paragraph_chars = paragraph.chars().count();

            if !buffer.is_empty() && buffer_chars + paragraph_chars > config.max_size {
                push_trimmed(&mut chunks, &buffer);

                let tail = tail_chars(&buffer, config.overlap);
                let tail_len = tail.chars().count();
                let mut next = String::with_capacity(tail.len() + paragraph.len());
                next.push_str(tail);
                next.push_str(paragraph);

                buffer = next;
                buffer_chars = tail_len + paragraph_chars;
            } else if buffer.is_empty() {
                buffer.push_str(paragraph);
                buffer_chars = paragraph_chars;
            } else {
                buffer.push_str(PARAGRAPH_SEPARATOR);
                buffer.push_str(paragraph);
                buffer_chars += 2 + paragraph_chars;
            }
        }

        if !buffer.is_empty() {
            push_trimmed(&mut chunks, &buffer);
        }

        chunks
    }
}

fn push_trimmed(chunks: &mut Vec<String>, buffer: &str) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Last `n` characters of `s` (all of it when shorter)
fn tail_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

impl ChunkingStrategy for ParagraphChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let pieces = Self::pack(content, config);
        let total = pieces.len();

        Ok(pieces
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(text, ChunkMetadata::new(i, total)))
            .collect())
    }

    fn name(&self) -> &'static str {
        "paragraph"
    }
}
