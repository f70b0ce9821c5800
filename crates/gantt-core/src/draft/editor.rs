//! The draft editor.
//!
//! Owns the in-progress (session) task list and header labels while the
//! edit surface is open. Every mutation marks the draft modified and
//! notifies registered listeners with the full current tasks and headers;
//! the application layer forwards those notifications to the
//! reconciliation store as temporary changes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chart::model::{Headers, HeaderKind, Task};
use crate::chart::validate::validate_task_semantics;
use crate::config::DraftConfig;
use crate::error::{GanttError, Result};

/// The editable fields of a task row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    Project,
    Name,
    StartDate,
    EndDate,
    Color,
}

/// A value copy of the draft's tasks and headers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftData {
    pub tasks: Vec<Task>,
    pub headers: Headers,
}

/// Observer of draft mutations.
///
/// Invoked after every add/update/delete/header change with the full
/// current state. Implementations must not call back into the editor.
pub trait DraftChangeListener: Send + Sync {
    fn on_draft_changed(&self, tasks: &[Task], headers: &Headers);
}

/// Owns the in-progress task list while the edit surface is open.
pub struct DraftEditor {
    tasks: Vec<Task>,
    headers: Headers,
    is_modified: bool,
    validation_errors: HashMap<String, Vec<String>>,
    /// Snapshot taken when the draft was opened, for change detection.
    initial: DraftData,
    config: DraftConfig,
    listeners: Vec<Arc<dyn DraftChangeListener>>,
}

impl DraftEditor {
    pub fn new(config: DraftConfig) -> Self {
        Self {
            tasks: Vec::new(),
            headers: Headers::default(),
            is_modified: false,
            validation_errors: HashMap::new(),
            initial: DraftData::default(),
            config,
            listeners: Vec::new(),
        }
    }

    /// Registers a mutation observer.
    pub fn add_listener(&mut self, listener: Arc<dyn DraftChangeListener>) {
        self.listeners.push(listener);
    }

    /// Seeds the draft and captures the snapshot used by
    /// [`has_real_changes`](Self::has_real_changes).
    ///
    /// Clears the modified flag and any recorded validation errors.
    pub fn open(&mut self, seed_tasks: &[Task], seed_headers: &Headers) {
        self.tasks = seed_tasks.to_vec();
        self.headers = seed_headers.clone();
        self.initial = DraftData {
            tasks: seed_tasks.to_vec(),
            headers: seed_headers.clone(),
        };
        self.is_modified = false;
        self.validation_errors.clear();
    }

    /// Appends a new task with a generated id, today's date as the start,
    /// a one-week span, and the configured default color.
    pub fn add_task(&mut self) -> Result<Task> {
        if self.tasks.len() >= self.config.max_tasks {
            return Err(GanttError::validation(format!(
                "draft is limited to {} tasks",
                self.config.max_tasks
            )));
        }

        let today = Local::now().date_naive();
        let next_week = today + Duration::days(7);
        let task = Task {
            id: format!("task_{}", Uuid::new_v4()),
            project: String::new(),
            name: String::new(),
            start_date: today.format("%Y-%m-%d").to_string(),
            end_date: next_week.format("%Y-%m-%d").to_string(),
            color: self.config.default_color.clone(),
        };

        self.tasks.push(task.clone());
        self.is_modified = true;
        self.notify_listeners();
        Ok(task)
    }

    /// Sets one field of the task with the given id.
    ///
    /// An unknown id is a silent no-op. The semantic validator re-runs for
    /// the touched task, recording or clearing its violation list.
    pub fn update_task(&mut self, id: &str, field: TaskField, value: &str) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };

        match field {
            TaskField::Project => task.project = value.to_string(),
            TaskField::Name => task.name = value.to_string(),
            TaskField::StartDate => task.start_date = value.to_string(),
            TaskField::EndDate => task.end_date = value.to_string(),
            TaskField::Color => task.color = value.to_string(),
        }
        self.is_modified = true;

        let violations = validate_task_semantics(task, self.config.validate_dates);
        if violations.is_empty() {
            self.validation_errors.remove(id);
        } else {
            self.validation_errors.insert(id.to_string(), violations);
        }

        self.notify_listeners();
    }

    /// Removes the task with the given id, if present.
    pub fn delete_task(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return;
        }
        self.validation_errors.remove(id);
        self.is_modified = true;
        self.notify_listeners();
    }

    /// Sets a header label to the trimmed value, falling back to the fixed
    /// default when the trimmed value is empty.
    pub fn update_header(&mut self, kind: HeaderKind, value: &str) {
        let trimmed = value.trim();
        let label = if trimmed.is_empty() {
            kind.default_label()
        } else {
            trimmed
        };
        self.headers.set(kind, label);
        self.is_modified = true;
        self.notify_listeners();
    }

    /// Whether the draft differs from the snapshot captured by `open`.
    ///
    /// Comparison is positional: headers, then task count, then each task's
    /// content fields against the task at the same index. Reordering two
    /// tasks therefore counts as a change even when the set is identical.
    pub fn has_real_changes(&self) -> bool {
        if self.headers != self.initial.headers {
            return true;
        }
        if self.tasks.len() != self.initial.tasks.len() {
            return true;
        }
        self.tasks
            .iter()
            .zip(self.initial.tasks.iter())
            .any(|(current, initial)| {
                current.project != initial.project
                    || current.name != initial.name
                    || current.start_date != initial.start_date
                    || current.end_date != initial.end_date
                    || current.color != initial.color
            })
    }

    /// Runs the semantic validator over every task, refreshing the error
    /// map. Returns whether any task failed.
    pub fn validate_all(&mut self) -> bool {
        self.validation_errors.clear();
        for task in &self.tasks {
            let violations = validate_task_semantics(task, self.config.validate_dates);
            if !violations.is_empty() {
                self.validation_errors.insert(task.id.clone(), violations);
            }
        }
        !self.validation_errors.is_empty()
    }

    /// Validates the whole draft and returns a value copy for promotion.
    ///
    /// Rejected when any task fails semantic validation or the draft is
    /// empty; the caller promotes the returned copy to the persistent side.
    pub fn commit(&mut self) -> Result<DraftData> {
        if self.validate_all() {
            return Err(GanttError::validation(
                "draft has tasks with validation errors",
            ));
        }
        if self.tasks.is_empty() {
            return Err(GanttError::validation("draft has no tasks"));
        }
        Ok(self.snapshot())
    }

    /// A value copy of the current tasks and headers.
    pub fn snapshot(&self) -> DraftData {
        DraftData {
            tasks: self.tasks.clone(),
            headers: self.headers.clone(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn validation_errors(&self) -> &HashMap<String, Vec<String>> {
        &self.validation_errors
    }

    fn notify_listeners(&self) {
        for listener in &self.listeners {
            listener.on_draft_changed(&self.tasks, &self.headers);
        }
    }
}
