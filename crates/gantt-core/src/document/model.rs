//! Document wire model.
//!
//! Wire records keep the original interchange field names (`proyecto`,
//! `tarea`, `fechaInicio`, `fechaFin`) so documents produced by earlier
//! releases import cleanly; the domain types use English identifiers and
//! the conversions here bridge the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::model::{
    ChartSettings, ChartState, DEFAULT_PROJECT_HEADER, DEFAULT_TASK_HEADER, Headers, Task,
    ViewConfig,
};
use crate::document::APP_VERSION;

/// One task as it appears on the wire.
///
/// Every field defaults to the empty string so an absent field and an empty
/// field fail the structural validator the same way, as `MissingField`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TaskRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "proyecto", default)]
    pub project: String,
    #[serde(rename = "tarea", default)]
    pub name: String,
    #[serde(rename = "fechaInicio", default)]
    pub start_date: String,
    #[serde(rename = "fechaFin", default)]
    pub end_date: String,
    #[serde(default)]
    pub color: String,
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            project: task.project,
            name: task.name,
            start_date: task.start_date,
            end_date: task.end_date,
            color: task.color,
        }
    }
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            project: record.project,
            name: record.name,
            start_date: record.start_date,
            end_date: record.end_date,
            color: record.color,
        }
    }
}

/// Column headers as they appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadersRecord {
    #[serde(rename = "proyecto", default = "default_project_header")]
    pub project: String,
    #[serde(rename = "tarea", default = "default_task_header")]
    pub task: String,
}

fn default_project_header() -> String {
    DEFAULT_PROJECT_HEADER.to_string()
}

fn default_task_header() -> String {
    DEFAULT_TASK_HEADER.to_string()
}

impl Default for HeadersRecord {
    fn default() -> Self {
        Self {
            project: default_project_header(),
            task: default_task_header(),
        }
    }
}

impl From<Headers> for HeadersRecord {
    fn from(headers: Headers) -> Self {
        Self {
            project: headers.project,
            task: headers.task,
        }
    }
}

impl From<HeadersRecord> for Headers {
    fn from(record: HeadersRecord) -> Self {
        Self {
            project: record.project,
            task: record.task,
        }
    }
}

/// The versioned document persisted to durable storage and exchanged as a
/// file.
///
/// Absent `tasks`/`headers`/`settings`/`view` sections deserialize to their
/// defaults; absent timestamps are stamped with the current time so lenient
/// inputs still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: String,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub headers: HeadersRecord,
    #[serde(default)]
    pub settings: ChartSettings,
    #[serde(default)]
    pub view: ViewConfig,
}

impl Document {
    /// Builds a document from the persistent side of the store, stamping
    /// both timestamps with the current time.
    pub fn from_state(state: &ChartState, settings: &ChartSettings, view: &ViewConfig) -> Self {
        let now = Utc::now();
        Self {
            version: APP_VERSION.to_string(),
            created: now,
            modified: now,
            tasks: state.tasks.iter().cloned().map(TaskRecord::from).collect(),
            headers: state.headers.clone().into(),
            settings: settings.clone(),
            view: view.clone(),
        }
    }

    /// The document's tasks and headers as domain values.
    pub fn to_chart_state(&self) -> ChartState {
        ChartState {
            tasks: self.tasks.iter().cloned().map(Task::from).collect(),
            headers: self.headers.clone().into(),
        }
    }

    /// Whether the document holds at least one task with a non-blank
    /// project name. Documents failing this are considered semantically
    /// empty and are not worth restoring.
    pub fn has_meaningful_tasks(&self) -> bool {
        self.tasks.iter().any(|t| !t.project.trim().is_empty())
    }
}
