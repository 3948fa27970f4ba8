//! Context assembly from retrieved chunks

use crate::models::Chunk;

/// Joins retrieved chunks into the context block of the prompt
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    separator: String,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new("\n")
    }
}

impl ContextAssembler {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    /// Chunk texts in retrieval order
    #[must_use]
    pub fn assemble(&self, chunks: &[Chunk]) -> String {
        chunks
            .iter()
            .map(|chunk| chunk.content.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}
