//! Directory-backed document extraction.
//!
//! A "directory document" is a folder holding the already-extracted pages of a
//! document: `.txt`/`.md` files become pages of text, `.png`/`.jpg`/`.jpeg`
//! files become image resources. Files are visited in path order.
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::traits::DocumentExtractor;
use crate::types::{ExtractedDocument, ImageResource};

const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug, Clone, Default)]
pub struct DirectoryExtractor;

impl DirectoryExtractor {
    pub fn new() -> Self { Self }

    fn read_page(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    /// Every file under `root`, symlinks followed, sorted. The first
    /// unreadable entry or dangling link aborts the walk.
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root).follow_links(true) {
            let entry = entry.with_context(|| format!("cannot walk {}", root.display()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

fn extension_in(path: &Path, set: &[&str]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| set.iter().any(|candidate| ext.eq_ignore_ascii_case(candidate)))
        .unwrap_or(false)
}

impl DocumentExtractor for DirectoryExtractor {
    fn extract(&self, document: &Path) -> Result<ExtractedDocument> {
        if !document.is_dir() {
            return Err(anyhow!("{} is not a document directory", document.display()));
        }
        let mut extracted = ExtractedDocument::default();
        let mut pages = 0usize;
        for path in self.list_files(document)? {
            if extension_in(&path, TEXT_EXTENSIONS) {
                extracted.text.push_str(&self.read_page(&path)?);
                extracted.text.push('\n');
                pages += 1;
            } else if extension_in(&path, IMAGE_EXTENSIONS) {
                let sequence = extracted.images.len();
                extracted.images.push(ImageResource { path, page: pages.saturating_sub(1), sequence });
            }
        }
        tracing::info!(
            "📄 Extracted {} page(s) and {} image(s) from {}",
            pages,
            extracted.images.len(),
            document.display()
        );
        Ok(extracted)
    }
}
