//! Chart domain models.
//!
//! This module contains the core value types for the Gantt chart: tasks,
//! column headers, and the display-only settings and view configuration
//! carried alongside the persistent task list.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default label for the project column header.
pub const DEFAULT_PROJECT_HEADER: &str = "Project";
/// Default label for the task column header.
pub const DEFAULT_TASK_HEADER: &str = "Task";

/// One chart bar.
///
/// Date fields hold ISO `YYYY-MM-DD` strings as entered; the color is a
/// `#RRGGBB` string stored as given. Tasks are plain value types: copying
/// a task list always copies every task, so the session and persistent
/// sides of the store can never alias each other's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier, stable for the task's lifetime.
    pub id: String,
    /// Project the task belongs to.
    pub project: String,
    /// Task display name.
    pub name: String,
    /// Start date (`YYYY-MM-DD`).
    pub start_date: String,
    /// End date (`YYYY-MM-DD`), strictly after the start date when date
    /// validation is enabled.
    pub end_date: String,
    /// Bar color as a 6-hex-digit RGB string.
    pub color: String,
}

impl Task {
    /// The color normalized to uppercase for display.
    ///
    /// The stored value keeps its original casing; comparisons and display
    /// use the uppercase form.
    pub fn display_color(&self) -> String {
        self.color.to_uppercase()
    }
}

/// Which of the two editable column headers is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderKind {
    Project,
    Task,
}

impl HeaderKind {
    /// The fixed fallback label used when the header is cleared.
    pub fn default_label(&self) -> &'static str {
        match self {
            HeaderKind::Project => DEFAULT_PROJECT_HEADER,
            HeaderKind::Task => DEFAULT_TASK_HEADER,
        }
    }
}

/// Labels for the project and task columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    pub project: String,
    pub task: String,
}

impl Default for Headers {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT_HEADER.to_string(),
            task: DEFAULT_TASK_HEADER.to_string(),
        }
    }
}

impl Headers {
    pub fn get(&self, kind: HeaderKind) -> &str {
        match kind {
            HeaderKind::Project => &self.project,
            HeaderKind::Task => &self.task,
        }
    }

    pub fn set(&mut self, kind: HeaderKind, value: impl Into<String>) {
        match kind {
            HeaderKind::Project => self.project = value.into(),
            HeaderKind::Task => self.task = value.into(),
        }
    }
}

/// The unit copied between the session and persistent sides of the store:
/// an ordered task list plus its column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChartState {
    pub tasks: Vec<Task>,
    pub headers: Headers,
}

impl ChartState {
    pub fn new(tasks: Vec<Task>, headers: Headers) -> Self {
        Self { tasks, headers }
    }
}

// ============================================================================
// Display settings (opaque to the reconciliation rules)
// ============================================================================

/// Chart color settings. Wire names match the original document format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSettings {
    #[serde(rename = "fondoDiagrama", default = "default_background")]
    pub background: String,
    #[serde(rename = "encabezados", default = "default_header_color")]
    pub headers: String,
    #[serde(rename = "bordes", default = "default_border_color")]
    pub borders: String,
    #[serde(rename = "celdas", default = "default_cell_color")]
    pub cells: String,
}

fn default_background() -> String {
    "#FFFFFF".to_string()
}

fn default_header_color() -> String {
    "#2196F3".to_string()
}

fn default_border_color() -> String {
    "#E0E0E0".to_string()
}

fn default_cell_color() -> String {
    "#F5F5F5".to_string()
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            background: default_background(),
            headers: default_header_color(),
            borders: default_border_color(),
            cells: default_cell_color(),
        }
    }
}

/// A font family and size pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    #[serde(rename = "tipo", default = "default_font_family")]
    pub family: String,
    #[serde(rename = "tamaño", default = "default_body_font_size")]
    pub size: u32,
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_header_font_size() -> u32 {
    14
}

fn default_body_font_size() -> u32 {
    12
}

fn default_header_font() -> FontSpec {
    FontSpec {
        family: default_font_family(),
        size: default_header_font_size(),
    }
}

fn default_body_font() -> FontSpec {
    FontSpec {
        family: default_font_family(),
        size: default_body_font_size(),
    }
}

/// Chart font settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSettings {
    #[serde(rename = "encabezados", default = "default_header_font")]
    pub headers: FontSpec,
    #[serde(rename = "proyectos", default = "default_body_font")]
    pub projects: FontSpec,
    #[serde(rename = "tareas", default = "default_body_font")]
    pub tasks: FontSpec,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            headers: default_header_font(),
            projects: default_body_font(),
            tasks: default_body_font(),
        }
    }
}

/// Display-only chart settings. The store carries them alongside the
/// persistent task list and the codec round-trips them; the reconciliation
/// rules never inspect them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChartSettings {
    #[serde(rename = "colores", default)]
    pub colors: ColorSettings,
    #[serde(rename = "fuentes", default)]
    pub fonts: FontSettings,
}

// ============================================================================
// View configuration
// ============================================================================

/// Timeline granularity of the rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Sprint,
}

fn default_scale() -> f32 {
    1.0
}

/// View window configuration for the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    #[serde(rename = "type", default)]
    pub mode: ViewMode,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// First day of the sprint grid; only meaningful in sprint mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_start: Option<NaiveDate>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            mode: ViewMode::default(),
            scale: default_scale(),
            start_date: None,
            end_date: None,
            sprint_start: None,
        }
    }
}

impl ViewConfig {
    /// Daily view spanning the first day of `today`'s month through the
    /// last day of the month two months ahead (a three-month window).
    pub fn month_window(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        let end = start
            .checked_add_months(Months::new(3))
            .and_then(|d| d.pred_opt());
        Self {
            start_date: Some(start),
            end_date: end,
            ..Self::default()
        }
    }
}

// ============================================================================
// Derived project grouping
// ============================================================================

/// Tasks of one project together with the project's overall date span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub tasks: Vec<Task>,
}

/// Groups tasks by project, preserving first-seen project order.
///
/// The span is the minimum start and maximum end over the project's tasks;
/// ISO date strings order lexicographically, so plain string comparison
/// suffices.
pub fn project_summaries(tasks: &[Task]) -> Vec<ProjectSummary> {
    let mut summaries: Vec<ProjectSummary> = Vec::new();
    for task in tasks {
        match summaries.iter_mut().find(|s| s.name == task.project) {
            Some(summary) => {
                if task.start_date < summary.start_date {
                    summary.start_date = task.start_date.clone();
                }
                if task.end_date > summary.end_date {
                    summary.end_date = task.end_date.clone();
                }
                summary.tasks.push(task.clone());
            }
            None => summaries.push(ProjectSummary {
                name: task.project.clone(),
                start_date: task.start_date.clone(),
                end_date: task.end_date.clone(),
                tasks: vec![task.clone()],
            }),
        }
    }
    summaries
}
