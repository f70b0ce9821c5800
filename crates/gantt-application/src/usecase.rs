//! Chart use case implementation.
//!
//! `ChartUseCase` orchestrates the draft editor, the reconciliation store,
//! the file exchange, and the rendering surface: every UI event enters the
//! core through one of its methods. It owns the wiring the original edit
//! surface callbacks provided — in particular, every draft mutation is
//! forwarded to the store as a temporary session change.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use gantt_core::chart::RenderSurface;
use gantt_core::chart::model::{HeaderKind, Task};
use gantt_core::config::DraftConfig;
use gantt_core::draft::{DraftChangeListener, DraftEditor, TaskField};
use gantt_core::error::Result;
use gantt_core::store::ChartStore;
use gantt_infrastructure::FileExchange;

/// Forwards every draft mutation to the store as a temporary change.
struct StoreForwarder {
    store: Arc<ChartStore>,
}

impl DraftChangeListener for StoreForwarder {
    fn on_draft_changed(&self, tasks: &[Task], headers: &gantt_core::chart::model::Headers) {
        self.store.notify_temporary_change(tasks, headers);
    }
}

/// Use case wiring the draft editor to the reconciliation store.
pub struct ChartUseCase {
    store: Arc<ChartStore>,
    editor: Mutex<DraftEditor>,
    exchange: Arc<FileExchange>,
    render_surface: Mutex<Option<Arc<dyn RenderSurface>>>,
}

impl ChartUseCase {
    pub fn new(
        store: Arc<ChartStore>,
        exchange: Arc<FileExchange>,
        draft_config: DraftConfig,
    ) -> Self {
        let mut editor = DraftEditor::new(draft_config);
        editor.add_listener(Arc::new(StoreForwarder {
            store: store.clone(),
        }));
        Self {
            store,
            editor: Mutex::new(editor),
            exchange,
            render_surface: Mutex::new(None),
        }
    }

    /// Attaches the rendering surface invoked after commits and loads.
    pub fn set_render_surface(&self, surface: Arc<dyn RenderSurface>) {
        *self.render_surface.lock().unwrap() = Some(surface);
    }

    pub fn store(&self) -> Arc<ChartStore> {
        self.store.clone()
    }

    // ========================================================================
    // Edit surface events
    // ========================================================================

    /// Opens the edit surface: seeds the draft from the session side so
    /// temporary changes from an earlier opening are still there.
    pub fn open_editor(&self) {
        let session = self.store.session_state();
        let mut editor = self.editor.lock().unwrap();
        editor.open(&session.tasks, &session.headers);
        debug!(
            "editor opened with {} session tasks",
            session.tasks.len()
        );
    }

    pub fn add_task(&self) -> Result<Task> {
        self.editor.lock().unwrap().add_task()
    }

    pub fn update_task(&self, id: &str, field: TaskField, value: &str) {
        self.editor.lock().unwrap().update_task(id, field, value);
    }

    pub fn delete_task(&self, id: &str) {
        self.editor.lock().unwrap().delete_task(id);
    }

    pub fn update_header(&self, kind: HeaderKind, value: &str) {
        self.editor.lock().unwrap().update_header(kind, value);
    }

    /// Whether the draft differs from what the editor was opened with.
    /// Drives the "discard changes?" confirmation, nothing else.
    pub fn has_unsaved_draft(&self) -> bool {
        self.editor.lock().unwrap().has_real_changes()
    }

    /// Per-task validation messages for live error flags.
    pub fn draft_errors(&self) -> std::collections::HashMap<String, Vec<String>> {
        self.editor.lock().unwrap().validation_errors().clone()
    }

    /// Commits the draft: validates it, promotes it to the persistent
    /// side, and redraws the chart.
    pub async fn generate_chart(&self) -> Result<()> {
        let data = {
            let mut editor = self.editor.lock().unwrap();
            editor.commit()?
        };
        let task_count = data.tasks.len();
        self.store.commit_draft(data.tasks, data.headers).await?;
        self.redraw();
        info!("chart generated with {task_count} tasks");
        Ok(())
    }

    /// Cancels the edit surface. Temporary changes stay in the session for
    /// the next opening; nothing is promoted or discarded here.
    pub fn cancel_editor(&self) {
        debug!("editor cancelled, session keeps temporary changes");
    }

    /// Explicitly abandons the draft, restoring the session from the
    /// persistent side.
    pub fn discard_changes(&self) {
        self.store.discard_session_changes();
    }

    // ========================================================================
    // File exchange events
    // ========================================================================

    /// Exports the last committed state as a downloadable file and
    /// refreshes durable storage.
    pub async fn save_chart(&self) -> Result<PathBuf> {
        let document = self.store.export_document();
        let path = self.exchange.export(&document).await?;
        if let Err(e) = self.store.persist().await {
            warn!("durable save after export failed: {e}");
        }
        Ok(path)
    }

    /// Loads a chart document from a user-selected file.
    pub async fn load_chart_file(&self, path: &Path) -> Result<()> {
        let raw = FileExchange::read_import(path).await?;
        self.load_chart(&raw).await
    }

    /// Loads a chart document from raw text and redraws on success.
    pub async fn load_chart(&self, raw: &str) -> Result<()> {
        self.store.load_document(raw).await?;
        self.redraw();
        Ok(())
    }

    fn redraw(&self) {
        let surface = self.render_surface.lock().unwrap().clone();
        if let Some(surface) = surface {
            let state = self.store.persistent_state();
            surface.render(
                &state.tasks,
                &state.headers,
                &self.store.view(),
                &self.store.settings(),
            );
        }
    }
}
