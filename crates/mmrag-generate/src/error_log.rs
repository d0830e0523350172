//! Where terminal generation failures get written down.
use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub trait ErrorLog: Send + Sync {
    fn record(&self, entry: &str) -> Result<()>;
}

/// Appends one timestamped line per entry.
#[derive(Debug, Clone)]
pub struct FileErrorLog { path: PathBuf }

impl FileErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
    pub fn path(&self) -> &Path { &self.path }
}

impl ErrorLog for FileErrorLog {
    fn record(&self, entry: &str) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{} ERROR {}", chrono::Utc::now().to_rfc3339(), entry.replace('\n', " "))?;
        Ok(())
    }
}

/// Keeps entries in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryErrorLog { entries: Arc<Mutex<Vec<String>>> }

impl MemoryErrorLog {
    pub fn new() -> Self { Self::default() }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl ErrorLog for MemoryErrorLog {
    fn record(&self, entry: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("error log buffer poisoned"))?
            .push(entry.to_string());
        Ok(())
    }
}
