//! File-backed durable document store.
//!
//! The durable-storage analog of the original browser deployment: one key
//! holds the serialized chart document, a second the timestamp of the last
//! successful save. Here the keys are two files in the application data
//! directory, with the document written atomically.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use gantt_core::document::model::Document;
use gantt_core::document::repository::DocumentStore;
use gantt_core::error::{GanttError, Result};

use crate::paths::GanttPaths;
use crate::storage::AtomicJsonFile;

const DOCUMENT_FILE: &str = "chart.json";
const LAST_SAVE_FILE: &str = "last_save";

/// A [`DocumentStore`] persisting to two files in one directory.
///
/// Blocking filesystem work runs on the blocking thread pool so callers in
/// async contexts never stall an executor thread.
pub struct FileDocumentStore {
    document: Arc<AtomicJsonFile<Document>>,
    last_save_path: PathBuf,
}

impl FileDocumentStore {
    /// Creates a store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            document: Arc::new(AtomicJsonFile::new(dir.join(DOCUMENT_FILE))),
            last_save_path: dir.join(LAST_SAVE_FILE),
        }
    }

    /// Creates a store rooted at the platform data directory.
    pub fn from_default_location() -> Result<Self> {
        let dir = GanttPaths::data_dir().map_err(|e| GanttError::storage(e.to_string()))?;
        Ok(Self::new(dir))
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn load(&self) -> Result<Option<String>> {
        let document = self.document.clone();
        tokio::task::spawn_blocking(move || document.load_raw())
            .await
            .map_err(|e| GanttError::internal(format!("failed to join load task: {e}")))?
            .map_err(|e| GanttError::storage(e.to_string()))
    }

    async fn save(&self, document: &Document) -> Result<()> {
        let file = self.document.clone();
        let last_save_path = self.last_save_path.clone();
        let document = document.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            file.save(&document)
                .map_err(|e| GanttError::storage(e.to_string()))?;
            fs::write(&last_save_path, Utc::now().to_rfc3339())
                .map_err(|e| GanttError::storage(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|e| GanttError::internal(format!("failed to join save task: {e}")))?
    }

    async fn clear(&self) -> Result<()> {
        let file = self.document.clone();
        let last_save_path = self.last_save_path.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            file.remove()
                .map_err(|e| GanttError::storage(e.to_string()))?;
            match fs::remove_file(&last_save_path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(GanttError::storage(e.to_string())),
            }
        })
        .await
        .map_err(|e| GanttError::internal(format!("failed to join clear task: {e}")))?
    }

    async fn last_saved_at(&self) -> Result<Option<DateTime<Utc>>> {
        let last_save_path = self.last_save_path.clone();

        let content = tokio::task::spawn_blocking(move || match fs::read_to_string(&last_save_path) {
            Ok(content) => Some(content),
            Err(_) => None,
        })
        .await
        .map_err(|e| GanttError::internal(format!("failed to join read task: {e}")))?;

        let Some(content) = content else {
            return Ok(None);
        };
        match DateTime::parse_from_rfc3339(content.trim()) {
            Ok(stamp) => Ok(Some(stamp.with_timezone(&Utc))),
            Err(e) => {
                debug!("unreadable last-save timestamp: {e}");
                Ok(None)
            }
        }
    }
}
