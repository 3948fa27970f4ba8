use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use sha2::Digest;
use sha2::Sha256;

use crate::errors::Result;

/// SHA-256 over everything that determines index contents: each source file's
/// path, size and modification time, the chunking parameters and the embedding model
pub fn corpus_fingerprint(
    files: &[PathBuf],
    chunk_size: usize,
    chunk_overlap: usize,
    embedding_model: &str,
) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(format!("chunk_size={chunk_size};overlap={chunk_overlap};"));
    hasher.update(format!("model={embedding_model};"));

    for path in files {
        let metadata = std::fs::metadata(path)?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_nanos());

        hasher.update(path.to_string_lossy().as_bytes());
        hasher.update([0_u8]);
        hasher.update(metadata.len().to_le_bytes());
        hasher.update(modified.to_le_bytes());
    }

    Ok(hex::encode(hasher.finalize()))
}
