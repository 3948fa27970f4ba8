//! Splitting documents into overlapping fixed-size chunks
//!
//! Sizes are measured in characters, never bytes, so multi-byte text is never
//! cut inside a code point. Adjacent chunks of one document share exactly
//! `chunk_overlap` characters; only the final chunk of a document may be shorter
//! than `chunk_size`.

use tracing::debug;

use crate::errors::DocRagError;
use crate::errors::Result;
use crate::models::Chunk;
use crate::models::Document;

/// Sliding-window character splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a splitter
    ///
    /// # Errors
    /// - `InvalidArgument` if `chunk_size` is zero or `chunk_overlap >= chunk_size`
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DocRagError::InvalidArgument(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(DocRagError::InvalidArgument(format!(
                "chunk overlap ({chunk_overlap}) must be smaller than chunk size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub const fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split text into `(start_char, segment)` pairs. Always yields at least one segment.
    pub fn split_text(&self, text: &str) -> Vec<(usize, String)> {
        // Byte offset of every char boundary, plus the end of the string
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = boundaries.len() - 1;

        if char_count <= self.chunk_size {
            return vec![(0, text.to_string())];
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut segments = Vec::with_capacity(char_count / step + 1);
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(char_count);
            segments.push((start, text[boundaries[start]..boundaries[end]].to_string()));
            if end == char_count {
                break;
            }
            start += step;
        }

        segments
    }

    /// Split documents into chunks, preserving document order and metadata
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.content)
                    .into_iter()
                    .enumerate()
                    .map(|(chunk_index, (start_char, content))| Chunk {
                        content,
                        metadata: doc.metadata.clone(),
                        chunk_index,
                        start_char,
                    })
            })
            .collect();

        debug!(
            "Split {} documents into {} chunks (size={}, overlap={})",
            documents.len(),
            chunks.len(),
            self.chunk_size,
            self.chunk_overlap
        );
        chunks
    }
}
