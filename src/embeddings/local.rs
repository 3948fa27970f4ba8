//! Offline embedder based on hashed character n-grams
//!
//! Lowercased text is broken into overlapping character trigrams, each trigram
//! is hashed (FNV-1a, stable across builds) into one of `dimension` buckets and
//! the bucket counts are L2-normalised. Lexically similar texts land close in
//! cosine space, which is enough to run the pipeline without a hosted API.

use async_trait::async_trait;

use super::Embedder;
use crate::errors::Result;

const NGRAM: usize = 3;
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

#[derive(Debug, Clone)]
pub struct NgramEmbedder {
    dimension: usize,
    model: String,
}

impl NgramEmbedder {
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model: format!("local-ngram-{dimension}"),
        }
    }

    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed synchronously; the async trait methods delegate here
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        let normalized: Vec<char> = text
            .split_whitespace()
            .flat_map(|word| word.chars().chain(std::iter::once(' ')))
            .flat_map(char::to_lowercase)
            .collect();

        if normalized.is_empty() {
            return vector;
        }

        if normalized.len() < NGRAM {
            vector[self.bucket(&normalized)] += 1.0;
        } else {
            for gram in normalized.windows(NGRAM) {
                vector[self.bucket(gram)] += 1.0;
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }

    fn bucket(&self, gram: &[char]) -> usize {
        let mut hash = FNV_OFFSET;
        for ch in gram {
            let mut buf = [0_u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(FNV_PRIME);
            }
        }
        (hash % self.dimension as u64) as usize
    }
}

#[async_trait]
impl Embedder for NgramEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
