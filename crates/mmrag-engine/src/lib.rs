//! mmrag-engine
//!
//! Ties the pieces together: [`RetrievalEngine`] ingests a document into the
//! text and image indices and runs dual-space queries; [`Session`] adds the
//! extractor and the generator and exposes `answer_query` to the host.

pub mod retrieval;
pub mod session;

pub use retrieval::{IngestReport, RetrievalEngine, IMAGE_NOT_FOUND, TEXT_NOT_FOUND};
pub use session::Session;
