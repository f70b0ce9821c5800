//! Autosave scheduler.
//!
//! A background task that persists the store's persistent side on a fixed
//! interval. The write is the same idempotent whole-document replace the
//! commit path performs, so overlapping with an in-flight commit is
//! harmless.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};

use gantt_core::store::ChartStore;

/// Handle to a running autosave task; aborts it on [`stop`](Self::stop) or
/// drop.
pub struct AutosaveHandle {
    handle: JoinHandle<()>,
}

impl AutosaveHandle {
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Starts the autosave loop.
///
/// Every `interval_secs` the store is persisted unconditionally, once it
/// has been initialized. Storage errors are logged and swallowed — the
/// next tick simply tries again.
pub fn start(store: Arc<ChartStore>, interval_secs: u64) -> AutosaveHandle {
    let handle = tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(interval_secs));
        // The first tick completes immediately; skip it so the first save
        // happens one full interval after startup.
        ticker.tick().await;
        info!(target: "autosave", "scheduler started ({interval_secs}s interval)");

        loop {
            ticker.tick().await;
            if !store.is_initialized() {
                continue;
            }
            match store.persist().await {
                Ok(()) => debug!(target: "autosave", "chart document saved"),
                Err(e) => warn!(target: "autosave", "save failed: {e}"),
            }
        }
    });
    AutosaveHandle { handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantt_core::document::MemoryDocumentStore;

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_persists_after_interval() {
        let storage = Arc::new(MemoryDocumentStore::new());
        let store = Arc::new(ChartStore::new(storage.clone()));
        store.init().await.unwrap();

        let _handle = start(store, 300);
        settle().await;
        assert!(storage.raw().is_none());

        tokio::time::advance(Duration::from_secs(301)).await;
        settle().await;

        assert!(storage.raw().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_waits_for_initialization() {
        let storage = Arc::new(MemoryDocumentStore::new());
        let store = Arc::new(ChartStore::new(storage.clone()));

        let _handle = start(store.clone(), 300);
        settle().await;

        tokio::time::advance(Duration::from_secs(301)).await;
        settle().await;
        assert!(storage.raw().is_none());

        store.init().await.unwrap();
        tokio::time::advance(Duration::from_secs(300)).await;
        settle().await;
        assert!(storage.raw().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_the_loop() {
        let storage = Arc::new(MemoryDocumentStore::new());
        let store = Arc::new(ChartStore::new(storage.clone()));
        store.init().await.unwrap();

        let handle = start(store, 300);
        settle().await;
        handle.stop();

        tokio::time::advance(Duration::from_secs(900)).await;
        settle().await;
        assert!(storage.raw().is_none());
    }
}
