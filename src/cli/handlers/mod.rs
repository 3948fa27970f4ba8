//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - serve: API server
//! - ask: interactive question loop
//! - query: one-shot questions
//! - ingest: document indexing
//! - check: environment check
//! - info: configuration display

pub mod ask;
pub mod check;
pub mod info;
pub mod ingest;
pub mod query;
pub mod serve;

// Re-export all public handlers
pub use ask::*;
pub use check::*;
pub use info::*;
pub use ingest::*;
pub use query::*;
pub use serve::*;
