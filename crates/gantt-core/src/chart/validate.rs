//! Task validators.
//!
//! Two distinct layers: [`validate_task_shape`] is the structural gate used
//! when importing documents, while [`validate_task_semantics`] produces the
//! per-task violation messages shown live while editing a draft.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::chart::model::Task;

static DATE_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

static COLOR_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"));

/// Structural violation found by [`validate_task_shape`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskShapeError {
    /// A required field is absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A date field does not match `YYYY-MM-DD`.
    #[error("invalid date format: '{0}'")]
    BadDateFormat(String),

    /// The color field does not match `#RRGGBB`.
    #[error("invalid color format: '{0}'")]
    BadColorFormat(String),
}

/// Checks a task's shape: all fields present and non-empty, dates matching
/// `YYYY-MM-DD`, color matching `#RRGGBB`.
pub fn validate_task_shape(task: &Task) -> Result<(), TaskShapeError> {
    let required: [(&'static str, &str); 6] = [
        ("id", &task.id),
        ("project", &task.project),
        ("name", &task.name),
        ("startDate", &task.start_date),
        ("endDate", &task.end_date),
        ("color", &task.color),
    ];
    for (field, value) in required {
        if value.is_empty() {
            return Err(TaskShapeError::MissingField(field));
        }
    }

    for date in [&task.start_date, &task.end_date] {
        if !DATE_FORMAT.is_match(date) {
            return Err(TaskShapeError::BadDateFormat(date.clone()));
        }
    }

    if !COLOR_FORMAT.is_match(&task.color) {
        return Err(TaskShapeError::BadColorFormat(task.color.clone()));
    }

    Ok(())
}

/// Runs the per-task semantic checks used for live editing feedback.
///
/// Returns the list of violation messages; empty means the task is valid.
/// Date ordering is only enforced when `validate_dates` is set.
pub fn validate_task_semantics(task: &Task, validate_dates: bool) -> Vec<String> {
    let mut violations = Vec::new();

    if task.project.trim().is_empty() {
        violations.push("project name is required".to_string());
    }

    if task.name.trim().is_empty() {
        violations.push("task name is required".to_string());
    }

    if validate_dates {
        match (parse_date(&task.start_date), parse_date(&task.end_date)) {
            (Some(start), Some(end)) => {
                if end <= start {
                    violations.push("end date must be after the start date".to_string());
                }
            }
            (None, _) => violations.push("start date is not a valid calendar date".to_string()),
            (_, None) => violations.push("end date is not a valid calendar date".to_string()),
        }
    }

    if !COLOR_FORMAT.is_match(&task.color) {
        violations.push("color must be a 6-digit hex code".to_string());
    }

    violations
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_task() -> Task {
        Task {
            id: "task_1".to_string(),
            project: "Alpha".to_string(),
            name: "Design".to_string(),
            start_date: "2025-01-01".to_string(),
            end_date: "2025-01-08".to_string(),
            color: "#4CAF50".to_string(),
        }
    }

    #[test]
    fn test_shape_accepts_valid_task() {
        assert_eq!(validate_task_shape(&valid_task()), Ok(()));
    }

    #[test]
    fn test_shape_rejects_empty_fields_as_missing() {
        let mut task = valid_task();
        task.project = String::new();
        assert_eq!(
            validate_task_shape(&task),
            Err(TaskShapeError::MissingField("project"))
        );
    }

    #[test]
    fn test_shape_rejects_bad_date_format() {
        let mut task = valid_task();
        task.start_date = "01/01/2025".to_string();
        assert_eq!(
            validate_task_shape(&task),
            Err(TaskShapeError::BadDateFormat("01/01/2025".to_string()))
        );
    }

    #[test]
    fn test_shape_rejects_bad_color() {
        let mut task = valid_task();
        task.color = "#12345".to_string();
        assert_eq!(
            validate_task_shape(&task),
            Err(TaskShapeError::BadColorFormat("#12345".to_string()))
        );
    }

    #[test]
    fn test_shape_accepts_lowercase_color() {
        let mut task = valid_task();
        task.color = "#a1b2c3".to_string();
        assert_eq!(validate_task_shape(&task), Ok(()));
    }

    #[test]
    fn test_semantics_accepts_valid_task() {
        assert!(validate_task_semantics(&valid_task(), true).is_empty());
    }

    #[test]
    fn test_semantics_flags_blank_names() {
        let mut task = valid_task();
        task.project = "   ".to_string();
        task.name = String::new();
        let violations = validate_task_semantics(&task, true);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_semantics_requires_end_strictly_after_start() {
        let mut task = valid_task();
        task.end_date = task.start_date.clone();
        let violations = validate_task_semantics(&task, true);
        assert_eq!(violations, vec!["end date must be after the start date"]);
    }

    #[test]
    fn test_semantics_skips_date_order_when_disabled() {
        let mut task = valid_task();
        task.end_date = "2024-12-31".to_string();
        assert!(validate_task_semantics(&task, false).is_empty());
        assert!(!validate_task_semantics(&task, true).is_empty());
    }

    #[test]
    fn test_semantics_flags_unparseable_dates() {
        let mut task = valid_task();
        task.start_date = "2025-02-30".to_string();
        let violations = validate_task_semantics(&task, true);
        assert!(
            violations
                .iter()
                .any(|v| v.contains("start date is not a valid calendar date"))
        );
    }
}
