use serde::Deserialize;
use serde::Serialize;

/// Where a piece of text came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Path of the source file, as discovered under the documents directory
    pub source: String,
    /// Zero-based page number within the source file
    pub page: u32,
}

/// Text of one page of a source file. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<String>, page: u32) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                source: source.into(),
                page,
            },
        }
    }

    /// Length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Bounded segment of a document's text, the unit of retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: DocumentMetadata,
    /// Position of this chunk within its parent document
    pub chunk_index: usize,
    /// Character offset of the chunk start within the parent document
    pub start_char: usize,
}

/// Token accounting reported by the completion service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Build usage from prompt and completion counts; the total is always their sum
    #[must_use]
    pub const fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Answer to one question, built fresh per query
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub response: String,
    pub source_chunks: Vec<Chunk>,
    pub tokens_used: TokenUsage,
    /// Estimated cost in USD
    pub cost: f64,
}

/// Safely truncate a string at character boundary (not byte boundary)
///
/// # Arguments
/// * `s` - The string to truncate
/// * `max_chars` - Maximum number of characters (not bytes)
///
/// # Returns
/// Truncated string with "..." suffix if truncated, otherwise the original string
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Characters of chunk text shown in a source preview
pub const SOURCE_PREVIEW_CHARS: usize = 200;

/// Short view of a source chunk for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePreview {
    /// First 200 characters, with "..." appended when cut
    pub content: String,
    pub source: String,
    pub page: u32,
}

impl SourcePreview {
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            content: truncate_str(&chunk.content, SOURCE_PREVIEW_CHARS),
            source: chunk.metadata.source.clone(),
            page: chunk.metadata.page,
        }
    }
}

impl QueryResult {
    pub fn source_previews(&self) -> Vec<SourcePreview> {
        self.source_chunks.iter().map(SourcePreview::from_chunk).collect()
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Uninitialized,
    Loaded,
    Indexed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Loaded => "loaded",
            Self::Indexed => "indexed",
        };
        f.write_str(name)
    }
}
