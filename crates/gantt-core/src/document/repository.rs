//! Durable document store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::document::model::Document;
use crate::error::Result;

/// Durable storage for the persistent chart document.
///
/// The store holds at most one document plus the timestamp of the last
/// successful save. Implementations load the raw serialized text so the
/// caller can route parse failures through its own corrupt-data handling.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads the stored document's raw text, or `None` when nothing is
    /// stored.
    async fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored document and stamps the last-save timestamp.
    async fn save(&self, document: &Document) -> Result<()>;

    /// Removes the stored document and the last-save timestamp.
    async fn clear(&self) -> Result<()>;

    /// Timestamp of the last successful save, when known.
    async fn last_saved_at(&self) -> Result<Option<DateTime<Utc>>>;
}
