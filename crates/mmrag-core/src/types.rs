//! Domain types shared by the index, engine and generator crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Position of a vector inside one modality index. Dense, 0-based, never reused.
pub type EntryId = usize;

/// The two content kinds. Each has its own embedding space and index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Modality {
    Text,
    Image,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modality::Text => f.write_str("text"),
            Modality::Image => f.write_str("image"),
        }
    }
}

/// A window of words cut from the extracted text.
///
/// - `ordinal`: position of the chunk in the ingestion pass
/// - `content`: the words of the window joined by single spaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub ordinal: usize,
    pub content: String,
}

/// An image pulled out of a document, stored on disk at `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResource {
    pub path: PathBuf,
    /// Page the image was found on (0-based).
    pub page: usize,
    /// Order of appearance among the document's images.
    pub sequence: usize,
}

/// What the extractor hands to ingestion.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub text: String,
    pub images: Vec<ImageResource>,
}

/// Registry payload for the image modality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub image_id: usize,
    pub path: String,
}

/// A single nearest-neighbour hit. Lower `distance` is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: EntryId,
    pub distance: f32,
}

/// Ranked content for both modalities, best first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retrieval {
    pub text: Vec<String>,
    pub image_paths: Vec<String>,
}

/// What the host gets back for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub relevant_text: Vec<String>,
    pub relevant_image_paths: Vec<String>,
}
