use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::error::StoreError;
use super::models::{LogCollection, LogEntry};

/// Whole-collection persistence for log entries
///
/// Implementations read and replace the entire collection in one unit; there
/// is no incremental append.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Read the full collection, newest first.
    ///
    /// A missing backing resource is an empty collection. Unreadable data is
    /// also reported as empty (and logged), so callers never see a read error.
    async fn load(&self) -> LogCollection;

    /// Replace the stored collection with `entries`
    async fn save(&self, entries: &[LogEntry]) -> Result<(), StoreError>;

    /// Short human-readable description for logs and health output
    fn describe(&self) -> String;
}

/// JSON-file-backed store
///
/// The file holds a pretty-printed JSON array. Writes go to a `.tmp` sibling
/// which is renamed over the target, so readers only ever observe complete
/// files.
#[derive(Debug, Clone)]
pub struct FileLogStore {
    path: PathBuf,
}

impl FileLogStore {
    /// Locate the backing file. Nothing is created until the first save.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        info!(path = %path.display(), exists = path.exists(), "Opening log store");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl LogStore for FileLogStore {
    async fn load(&self) -> LogCollection {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No log file yet, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "Failed to read log file, treating as empty");
                return Vec::new();
            }
        };

        // Unparseable contents are dropped; the next save overwrites them.
        match serde_json::from_slice::<LogCollection>(&data) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    error = %e,
                    path = %self.path.display(),
                    bytes = data.len(),
                    "Log file is malformed, discarding its contents"
                );
                Vec::new()
            }
        }
    }

    async fn save(&self, entries: &[LogEntry]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(entries)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.tmp_path();
        if let Err(e) = tokio::fs::write(&tmp, &json).await {
            warn!(error = %e, path = %tmp.display(), "Failed to write temporary log file");
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            warn!(error = %e, path = %self.path.display(), "Failed to replace log file");
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(path = %self.path.display(), entries = entries.len(), bytes = json.len(), "Saved log collection");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// In-memory store for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    entries: Mutex<LogCollection>,
    fail_saves: Mutex<bool>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail until reset with `false`
    pub fn set_fail_saves(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_saves.lock() {
            *flag = fail;
        }
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn load(&self) -> LogCollection {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    async fn save(&self, entries: &[LogEntry]) -> Result<(), StoreError> {
        let failing = self.fail_saves.lock().map(|flag| *flag).unwrap_or(false);
        if failing {
            return Err(StoreError::Unavailable("memory store rejects writes".into()));
        }

        let mut stored = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        *stored = entries.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
