//! Vector index over document chunks
//!
//! - `store`: the in-memory index and nearest-neighbour search
//! - `persist`: the on-disk copy under the persist directory and the
//!   single-writer handle that swaps indexes in after a successful build
//! - `fingerprint`: corpus identity used to decide whether a persisted index
//!   can be reused

pub mod fingerprint;
pub mod persist;
pub mod store;

pub use fingerprint::corpus_fingerprint;
pub use persist::IndexStore;
pub use store::IndexEntry;
pub use store::ScoredChunk;
pub use store::VectorIndex;
