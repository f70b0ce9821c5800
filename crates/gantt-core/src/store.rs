//! The reconciliation store.
//!
//! Owns the authoritative (persistent) chart state and the ephemeral
//! (session) state, and the rules for how operations on one affect the
//! other. The persistent side is the only state ever written to durable
//! storage or exported files; the session side is the working copy the
//! edit surface mutates, always starts empty at application startup, and
//! is synchronized from the persistent side only on explicit load/sync
//! events.
//!
//! In-memory state lives behind one `RwLock`. Guards are never held across
//! an await point: async operations copy what they need, release the lock,
//! then perform I/O — so the two sides are never observed half-updated.

use std::sync::{Arc, RwLock};

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::chart::model::{ChartSettings, ChartState, Headers, Task, ViewConfig, ViewMode};
use crate::document::model::Document;
use crate::document::repository::DocumentStore;
use crate::document::codec;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
struct PersistentSide {
    chart: ChartState,
    settings: ChartSettings,
    view: ViewConfig,
}

#[derive(Debug, Clone, Default)]
struct SessionSide {
    chart: ChartState,
    has_changes: bool,
}

#[derive(Debug, Default)]
struct StoreState {
    persistent: PersistentSide,
    session: SessionSide,
    initialized: bool,
}

/// The state-owning object constructed once at startup and passed to
/// collaborators as an `Arc` handle.
pub struct ChartStore {
    state: RwLock<StoreState>,
    storage: Arc<dyn DocumentStore>,
}

impl ChartStore {
    /// Creates a store with default (empty) state around the given durable
    /// storage. The view window defaults to a three-month span around the
    /// current month; call [`init`](Self::init) before use.
    pub fn new(storage: Arc<dyn DocumentStore>) -> Self {
        Self::with_today(storage, Local::now().date_naive())
    }

    /// Like [`new`](Self::new) with an explicit "today" for the default
    /// view window.
    pub fn with_today(storage: Arc<dyn DocumentStore>, today: NaiveDate) -> Self {
        let state = StoreState {
            persistent: PersistentSide {
                view: ViewConfig::month_window(today),
                ..PersistentSide::default()
            },
            ..StoreState::default()
        };
        Self {
            state: RwLock::new(state),
            storage,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Restores the persistent side from durable storage when it holds a
    /// usable document: one that parses, passes the version gate, and has
    /// at least one task with a non-blank project name.
    ///
    /// A stored document failing any of those checks is deleted so an
    /// empty or corrupt document cannot stick around across startups. The
    /// session side is **always** initialized empty, independent of what
    /// was restored — the working draft never silently resumes a previous
    /// session.
    ///
    /// Never fails the caller; returns whether a document was restored.
    pub async fn init(&self) -> Result<bool> {
        let raw = match self.storage.load().await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no stored document, starting clean");
                self.mark_initialized();
                return Ok(false);
            }
            Err(e) => {
                warn!("failed to read durable storage, starting clean: {e}");
                self.mark_initialized();
                return Ok(false);
            }
        };

        match Self::restore_candidate(&raw) {
            Ok(document) => {
                let restored_tasks = document.tasks.len();
                {
                    let mut state = self.state.write().unwrap();
                    Self::apply_document(&mut state, &document);
                    state.session = SessionSide::default();
                    state.initialized = true;
                }
                info!("restored {restored_tasks} tasks from durable storage");
                Ok(true)
            }
            Err(e) => {
                info!("stored document unusable ({e}), clearing storage");
                if let Err(clear_err) = self.storage.clear().await {
                    warn!("failed to clear corrupt storage: {clear_err}");
                }
                self.mark_initialized();
                Ok(false)
            }
        }
    }

    /// Whether [`init`](Self::init) has run.
    pub fn is_initialized(&self) -> bool {
        self.state.read().unwrap().initialized
    }

    fn mark_initialized(&self) {
        self.state.write().unwrap().initialized = true;
    }

    fn restore_candidate(raw: &str) -> Result<Document> {
        let document = codec::parse(raw)?;
        codec::check_version(&document)?;
        if !document.has_meaningful_tasks() {
            return Err(crate::error::GanttError::validation(
                "stored document has no tasks with a project name",
            ));
        }
        Ok(document)
    }

    // ========================================================================
    // Session synchronization protocol
    // ========================================================================

    /// Records a temporary draft change: value-copies the given tasks and
    /// headers into the session side and marks it dirty.
    ///
    /// Never touches the persistent side or durable storage — this is the
    /// "autosave the draft into memory, not disk" path, called on every
    /// draft mutation.
    pub fn notify_temporary_change(&self, tasks: &[Task], headers: &Headers) {
        let mut state = self.state.write().unwrap();
        state.session.chart = ChartState::new(tasks.to_vec(), headers.clone());
        state.session.has_changes = true;
    }

    /// Promotes a validated draft: value-copies it into both sides (the
    /// session is now in sync, so its dirty flag clears) and persists the
    /// persistent side.
    ///
    /// Persistence is best-effort — a storage failure is logged, not
    /// returned; the in-memory state remains the source of truth.
    pub async fn commit_draft(&self, tasks: Vec<Task>, headers: Headers) -> Result<()> {
        {
            let mut state = self.state.write().unwrap();
            state.session.chart = ChartState::new(tasks.clone(), headers.clone());
            state.session.has_changes = false;
            state.persistent.chart = ChartState::new(tasks, headers);
        }
        self.persist_best_effort().await;
        Ok(())
    }

    /// Replaces the persistent side from a serialized document and resyncs
    /// the session from it, discarding any unsaved draft.
    ///
    /// The document must parse, validate structurally, and pass the version
    /// gate; on any failure the state is untouched and the error is
    /// returned. On success the new state is persisted (best-effort).
    pub async fn load_document(&self, raw: &str) -> Result<()> {
        let document = codec::parse(raw)?;
        codec::check_version(&document)?;

        {
            let mut state = self.state.write().unwrap();
            Self::apply_document(&mut state, &document);
            state.session.chart = state.persistent.chart.clone();
            state.session.has_changes = false;
        }
        self.persist_best_effort().await;
        Ok(())
    }

    /// Value-copies the persistent side into the session and clears the
    /// session dirty flag.
    pub fn sync_session_with_persistent(&self) {
        let mut state = self.state.write().unwrap();
        state.session.chart = state.persistent.chart.clone();
        state.session.has_changes = false;
    }

    /// Explicit "abandon the draft" entry point.
    pub fn discard_session_changes(&self) {
        self.sync_session_with_persistent();
    }

    // ========================================================================
    // Persistence and export
    // ========================================================================

    /// Builds the versioned document from the persistent side — exports
    /// always reflect the last committed state, never an uncommitted draft.
    pub fn export_document(&self) -> Document {
        let state = self.state.read().unwrap();
        Document::from_state(
            &state.persistent.chart,
            &state.persistent.settings,
            &state.persistent.view,
        )
    }

    /// Writes the persistent side to durable storage as one whole-document
    /// replace. Both the commit path and the autosave timer funnel through
    /// this, so overlapping triggers are idempotent overwrites.
    pub async fn persist(&self) -> Result<()> {
        let document = self.export_document();
        self.storage.save(&document).await
    }

    async fn persist_best_effort(&self) {
        if let Err(e) = self.persist().await {
            warn!("failed to persist chart document: {e}");
        }
    }

    // ========================================================================
    // Display configuration
    // ========================================================================

    /// Switches the view mode; a sprint start date only sticks when
    /// switching to sprint view.
    pub fn set_view_mode(&self, mode: ViewMode, sprint_start: Option<NaiveDate>) {
        let mut state = self.state.write().unwrap();
        state.persistent.view.mode = mode;
        if mode == ViewMode::Sprint {
            if let Some(start) = sprint_start {
                state.persistent.view.sprint_start = Some(start);
            }
        }
    }

    /// Replaces the display settings.
    pub fn update_settings(&self, settings: ChartSettings) {
        self.state.write().unwrap().persistent.settings = settings;
    }

    // ========================================================================
    // Accessors (value copies)
    // ========================================================================

    pub fn persistent_state(&self) -> ChartState {
        self.state.read().unwrap().persistent.chart.clone()
    }

    pub fn session_state(&self) -> ChartState {
        self.state.read().unwrap().session.chart.clone()
    }

    pub fn session_has_changes(&self) -> bool {
        self.state.read().unwrap().session.has_changes
    }

    pub fn settings(&self) -> ChartSettings {
        self.state.read().unwrap().persistent.settings.clone()
    }

    pub fn view(&self) -> ViewConfig {
        self.state.read().unwrap().persistent.view.clone()
    }

    fn apply_document(state: &mut StoreState, document: &Document) {
        state.persistent.chart = document.to_chart_state();
        state.persistent.settings = document.settings.clone();

        // A document without view bounds keeps the current window.
        let mut view = document.view.clone();
        if view.start_date.is_none() {
            view.start_date = state.persistent.view.start_date;
        }
        if view.end_date.is_none() {
            view.end_date = state.persistent.view.end_date;
        }
        state.persistent.view = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::MemoryDocumentStore;
    use crate::error::GanttError;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    fn task(id: &str, project: &str) -> Task {
        Task {
            id: id.to_string(),
            project: project.to_string(),
            name: format!("{id} name"),
            start_date: "2025-01-01".to_string(),
            end_date: "2025-01-05".to_string(),
            color: "#FF0000".to_string(),
        }
    }

    fn stored_doc(tasks: &[Task]) -> String {
        let state = ChartState::new(tasks.to_vec(), Headers::default());
        let document =
            Document::from_state(&state, &ChartSettings::default(), &ViewConfig::default());
        codec::serialize(&document).unwrap()
    }

    fn store_with(raw: Option<&str>) -> (ChartStore, Arc<MemoryDocumentStore>) {
        let storage = Arc::new(match raw {
            Some(raw) => MemoryDocumentStore::with_raw(raw),
            None => MemoryDocumentStore::new(),
        });
        (ChartStore::new(storage.clone()), storage)
    }

    /// Storage whose writes always fail, for best-effort persistence tests.
    struct BrokenStorage;

    #[async_trait]
    impl DocumentStore for BrokenStorage {
        async fn load(&self) -> crate::error::Result<Option<String>> {
            Err(GanttError::storage("backend offline"))
        }
        async fn save(&self, _document: &Document) -> crate::error::Result<()> {
            Err(GanttError::storage("backend offline"))
        }
        async fn clear(&self) -> crate::error::Result<()> {
            Err(GanttError::storage("backend offline"))
        }
        async fn last_saved_at(&self) -> crate::error::Result<Option<DateTime<Utc>>> {
            Ok(None)
        }
    }

    // ------------------------------------------------------------------
    // Startup restore
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_init_restores_valid_document_with_empty_session() {
        let raw = stored_doc(&[task("t1", "Alpha")]);
        let (store, _) = store_with(Some(&raw));

        assert!(store.init().await.unwrap());
        assert_eq!(store.persistent_state().tasks.len(), 1);
        // The session always starts empty, independent of storage.
        assert!(store.session_state().tasks.is_empty());
        assert!(!store.session_has_changes());
        assert!(store.is_initialized());
    }

    #[tokio::test]
    async fn test_init_with_empty_storage_starts_clean() {
        let (store, _) = store_with(None);
        assert!(!store.init().await.unwrap());
        assert!(store.persistent_state().tasks.is_empty());
        assert!(store.is_initialized());
    }

    #[tokio::test]
    async fn test_init_garbage_storage_clears_and_starts_clean() {
        let (store, storage) = store_with(Some("{not json"));

        assert!(!store.init().await.unwrap());
        assert!(store.persistent_state().tasks.is_empty());
        assert!(storage.raw().is_none());
    }

    #[tokio::test]
    async fn test_init_all_blank_projects_treated_invalid() {
        let raw = stored_doc(&[task("t1", ""), task("t2", "   ")]);
        let (store, storage) = store_with(Some(&raw));

        assert!(!store.init().await.unwrap());
        assert!(store.persistent_state().tasks.is_empty());
        assert!(storage.raw().is_none());
    }

    #[tokio::test]
    async fn test_init_version_mismatch_treated_corrupt() {
        let raw = stored_doc(&[task("t1", "Alpha")]).replace("\"1.0.0\"", "\"0.0.1\"");
        let (store, storage) = store_with(Some(&raw));

        assert!(!store.init().await.unwrap());
        assert!(store.persistent_state().tasks.is_empty());
        assert!(storage.raw().is_none());
    }

    #[tokio::test]
    async fn test_init_swallows_storage_read_errors() {
        let store = ChartStore::new(Arc::new(BrokenStorage));
        assert!(!store.init().await.unwrap());
        assert!(store.is_initialized());
    }

    // ------------------------------------------------------------------
    // Session synchronization
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_temporary_changes_never_touch_persistent() {
        let (store, storage) = store_with(None);
        store.init().await.unwrap();

        store.notify_temporary_change(&[task("t1", "Alpha")], &Headers::default());
        store.notify_temporary_change(
            &[task("t1", "Alpha"), task("t2", "Beta")],
            &Headers::default(),
        );

        assert_eq!(store.session_state().tasks.len(), 2);
        assert!(store.session_has_changes());
        assert!(store.persistent_state().tasks.is_empty());
        assert!(storage.raw().is_none());
    }

    #[tokio::test]
    async fn test_temporary_change_is_a_value_copy() {
        let (store, _) = store_with(None);
        let mut tasks = vec![task("t1", "Alpha")];
        store.notify_temporary_change(&tasks, &Headers::default());

        // Mutating the caller's list afterwards must not reach the session.
        tasks[0].name = "mutated".to_string();
        tasks.push(task("t2", "Beta"));

        let session = store.session_state();
        assert_eq!(session.tasks.len(), 1);
        assert_eq!(session.tasks[0].name, "t1 name");
    }

    #[tokio::test]
    async fn test_commit_draft_promotes_and_persists() {
        let (store, storage) = store_with(None);
        store.init().await.unwrap();

        store
            .commit_draft(vec![task("t1", "Alpha")], Headers::default())
            .await
            .unwrap();

        assert_eq!(store.persistent_state().tasks.len(), 1);
        assert_eq!(store.session_state(), store.persistent_state());
        assert!(!store.session_has_changes());

        let raw = storage.raw().expect("document persisted");
        let document = codec::parse(&raw).unwrap();
        assert_eq!(document.tasks.len(), 1);
        assert_eq!(document.tasks[0].project, "Alpha");
    }

    #[tokio::test]
    async fn test_commit_draft_survives_storage_failure() {
        let store = ChartStore::new(Arc::new(BrokenStorage));
        store
            .commit_draft(vec![task("t1", "Alpha")], Headers::default())
            .await
            .unwrap();
        assert_eq!(store.persistent_state().tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_discard_restores_session_from_persistent() {
        let (store, _) = store_with(None);
        store
            .commit_draft(vec![task("t1", "Alpha")], Headers::default())
            .await
            .unwrap();

        store.notify_temporary_change(&[task("t9", "Scratch")], &Headers::default());
        assert!(store.session_has_changes());

        store.discard_session_changes();
        assert_eq!(store.session_state(), store.persistent_state());
        assert!(!store.session_has_changes());
    }

    // ------------------------------------------------------------------
    // Document load
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_load_document_replaces_and_resyncs() {
        let (store, storage) = store_with(None);
        store.init().await.unwrap();
        store.notify_temporary_change(&[task("draft", "Scratch")], &Headers::default());

        let raw = stored_doc(&[task("t1", "Alpha"), task("t2", "Beta")]);
        store.load_document(&raw).await.unwrap();

        assert_eq!(store.persistent_state().tasks.len(), 2);
        // Loading discards the unsaved draft.
        assert_eq!(store.session_state(), store.persistent_state());
        assert!(!store.session_has_changes());
        assert!(storage.raw().is_some());
    }

    #[tokio::test]
    async fn test_load_document_version_gate() {
        let (store, _) = store_with(None);
        store
            .commit_draft(vec![task("t1", "Alpha")], Headers::default())
            .await
            .unwrap();
        let before = store.persistent_state();

        let raw = stored_doc(&[task("t2", "Beta")]).replace("\"1.0.0\"", "\"0.0.1\"");
        let err = store.load_document(&raw).await.unwrap_err();

        assert!(err.is_version_mismatch());
        assert_eq!(store.persistent_state(), before);
    }

    #[tokio::test]
    async fn test_load_document_parse_failure_leaves_state_unchanged() {
        let (store, _) = store_with(None);
        store
            .commit_draft(vec![task("t1", "Alpha")], Headers::default())
            .await
            .unwrap();
        store.notify_temporary_change(&[task("draft", "Scratch")], &Headers::default());

        let err = store.load_document("{not json").await.unwrap_err();
        assert!(err.is_parse());
        assert_eq!(store.persistent_state().tasks[0].id, "t1");
        // The failed load must not have discarded the draft either.
        assert!(store.session_has_changes());
        assert_eq!(store.session_state().tasks[0].id, "draft");
    }

    #[tokio::test]
    async fn test_load_document_invalid_task_rejected_wholesale() {
        let (store, _) = store_with(None);
        let raw = r##"{"version": "1.0.0", "tasks": [
            {"id": "t1", "proyecto": "Alpha", "tarea": "Ok",
             "fechaInicio": "2025-01-01", "fechaFin": "2025-01-05", "color": "#FF0000"},
            {"id": "t2", "proyecto": "Alpha", "tarea": "Bad date",
             "fechaInicio": "01/02/2025", "fechaFin": "2025-01-05", "color": "#FF0000"}
        ]}"##;

        let err = store.load_document(raw).await.unwrap_err();
        assert!(err.is_validation());
        assert!(store.persistent_state().tasks.is_empty());
    }

    #[tokio::test]
    async fn test_load_document_defaults_headers_when_absent() {
        let (store, _) = store_with(None);
        let raw = r##"{"version": "1.0.0", "tasks": [
            {"id": "t1", "proyecto": "Alpha", "tarea": "Design",
             "fechaInicio": "2025-01-01", "fechaFin": "2025-01-05", "color": "#FF0000"}
        ]}"##;
        store.load_document(raw).await.unwrap();
        assert_eq!(store.persistent_state().headers, Headers::default());
    }

    #[tokio::test]
    async fn test_load_document_without_view_keeps_current_window() {
        let storage = Arc::new(MemoryDocumentStore::new());
        let today = NaiveDate::from_ymd_opt(2025, 8, 14).unwrap();
        let store = ChartStore::with_today(storage, today);

        let raw = r##"{"version": "1.0.0", "tasks": [
            {"id": "t1", "proyecto": "Alpha", "tarea": "Design",
             "fechaInicio": "2025-01-01", "fechaFin": "2025-01-05", "color": "#FF0000"}
        ]}"##;
        store.load_document(raw).await.unwrap();

        let view = store.view();
        assert_eq!(view.start_date, NaiveDate::from_ymd_opt(2025, 8, 1));
        assert_eq!(view.end_date, NaiveDate::from_ymd_opt(2025, 10, 31));
    }

    // ------------------------------------------------------------------
    // Export and display configuration
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_export_reflects_persistent_not_session() {
        let (store, _) = store_with(None);
        store
            .commit_draft(vec![task("t1", "Alpha")], Headers::default())
            .await
            .unwrap();
        store.notify_temporary_change(&[task("t9", "Scratch")], &Headers::default());

        let document = store.export_document();
        assert_eq!(document.version, crate::document::APP_VERSION);
        assert_eq!(document.tasks.len(), 1);
        assert_eq!(document.tasks[0].id, "t1");
    }

    #[tokio::test]
    async fn test_set_view_mode_sprint_start_only_in_sprint_mode() {
        let (store, _) = store_with(None);
        let sprint_start = NaiveDate::from_ymd_opt(2025, 3, 3);

        store.set_view_mode(ViewMode::Weekly, sprint_start);
        assert_eq!(store.view().mode, ViewMode::Weekly);
        assert!(store.view().sprint_start.is_none());

        store.set_view_mode(ViewMode::Sprint, sprint_start);
        assert_eq!(store.view().sprint_start, sprint_start);
    }
}
