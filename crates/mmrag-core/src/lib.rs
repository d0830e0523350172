//! mmrag-core
//!
//! Shared vocabulary of the workspace: the error taxonomy, domain types, the
//! collaborator traits (embedders, extractor, completion API), configuration
//! loading, word-window chunking and the directory document extractor.

pub mod chunker;
pub mod config;
pub mod error;
pub mod extract;
pub mod traits;
pub mod types;

pub use chunker::{chunk, Chunker, ChunkingConfig};
pub use error::{Error, Result};
