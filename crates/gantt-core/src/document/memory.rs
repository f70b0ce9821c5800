//! In-memory document store.
//!
//! Used by tests and headless embeddings that don't want filesystem
//! persistence; behaves like the file-backed store minus durability.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::document::codec;
use crate::document::model::Document;
use crate::document::repository::DocumentStore;
use crate::error::{GanttError, Result};

#[derive(Default)]
struct MemoryInner {
    raw: Option<String>,
    last_saved: Option<DateTime<Utc>>,
}

/// A [`DocumentStore`] holding the serialized document in memory.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with raw text, exactly as durable storage would
    /// hold it — including garbage, for corrupt-storage scenarios.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                raw: Some(raw.into()),
                last_saved: None,
            }),
        }
    }

    /// The raw stored text, if any.
    pub fn raw(&self) -> Option<String> {
        self.inner.lock().expect("memory store lock").raw.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.inner.lock().expect("memory store lock").raw.clone())
    }

    async fn save(&self, document: &Document) -> Result<()> {
        let raw = codec::serialize(document)
            .map_err(|e| GanttError::storage(format!("serialize document: {e}")))?;
        let mut inner = self.inner.lock().expect("memory store lock");
        inner.raw = Some(raw);
        inner.last_saved = Some(Utc::now());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.lock().expect("memory store lock");
        inner.raw = None;
        inner.last_saved = None;
        Ok(())
    }

    async fn last_saved_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.inner.lock().expect("memory store lock").last_saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::model::{ChartSettings, ChartState, ViewConfig};

    #[tokio::test]
    async fn test_save_load_clear() {
        let store = MemoryDocumentStore::new();
        assert!(store.load().await.unwrap().is_none());
        assert!(store.last_saved_at().await.unwrap().is_none());

        let document =
            Document::from_state(&ChartState::default(), &ChartSettings::default(), &ViewConfig::default());
        store.save(&document).await.unwrap();

        let raw = store.load().await.unwrap().unwrap();
        assert_eq!(codec::parse(&raw).unwrap(), document);
        assert!(store.last_saved_at().await.unwrap().is_some());

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        assert!(store.last_saved_at().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_with_raw_keeps_garbage_verbatim() {
        let store = MemoryDocumentStore::with_raw("{not json");
        assert_eq!(store.load().await.unwrap().as_deref(), Some("{not json"));
    }
}
