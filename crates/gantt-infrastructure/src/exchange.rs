//! Chart file exchange.
//!
//! Export writes the serialized document as a timestamped JSON file the
//! user can share; import reads the raw bytes of a user-selected file for
//! the store to parse and validate. The OS file dialogs themselves are the
//! shell's concern — this layer only moves bytes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use gantt_core::document::model::Document;
use gantt_core::error::{GanttError, Result};

use crate::paths::GanttPaths;
use crate::storage::AtomicJsonFile;

/// Exports and imports chart document files.
pub struct FileExchange {
    export_dir: PathBuf,
}

impl FileExchange {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    /// An exchange targeting the platform download directory.
    pub fn from_default_location() -> Result<Self> {
        let dir = GanttPaths::export_dir().map_err(|e| GanttError::io(e.to_string()))?;
        Ok(Self::new(dir))
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Writes the document as `gantt-chart-<timestamp>.json` into the
    /// export directory and returns the created path.
    pub async fn export(&self, document: &Document) -> Result<PathBuf> {
        let filename = format!("gantt-chart-{}.json", Utc::now().format("%Y%m%d-%H%M%S"));
        let path = self.export_dir.join(filename);

        let file = Arc::new(AtomicJsonFile::<Document>::new(path.clone()));
        let document = document.clone();
        tokio::task::spawn_blocking(move || file.save(&document))
            .await
            .map_err(|e| GanttError::internal(format!("failed to join export task: {e}")))??;

        info!("exported chart document to {}", path.display());
        Ok(path)
    }

    /// Reads a user-selected file's content for the store to parse.
    pub async fn read_import(path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GanttError::io(format!("cannot read '{}': {e}", path.display())))
    }
}
