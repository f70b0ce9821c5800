//! Import/export codec.
//!
//! Parsing is layered the way load errors are reported: malformed JSON is a
//! `Parse` error, a malformed task list is a `Validation` error with the
//! offending task's detail, and a version mismatch aborts the whole load
//! with no partial application.

use std::collections::HashSet;

use serde_json::Value;

use crate::chart::model::Task;
use crate::chart::validate::validate_task_shape;
use crate::document::model::{Document, TaskRecord};
use crate::document::APP_VERSION;
use crate::error::{GanttError, Result};

/// Exact string equality against the running application version — no
/// semver ranges, no migration path.
pub fn is_version_compatible(version: &str) -> bool {
    version == APP_VERSION
}

/// Returns an error when the document's version is not accepted.
pub fn check_version(document: &Document) -> Result<()> {
    if is_version_compatible(&document.version) {
        Ok(())
    } else {
        Err(GanttError::version_mismatch(
            APP_VERSION,
            document.version.clone(),
        ))
    }
}

/// Parses raw text into a validated [`Document`].
///
/// The text must be a JSON object; `tasks`, when present, must be an array
/// whose every element passes the structural task validator and whose ids
/// are unique. The version gate is separate — see [`check_version`].
pub fn parse(raw: &str) -> Result<Document> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| GanttError::parse(e.to_string()))?;
    if !value.is_object() {
        return Err(GanttError::parse("document root must be a JSON object"));
    }

    validate_document(&value)?;

    let document: Document = serde_json::from_value(value)?;
    Ok(document)
}

/// Structural validation of a parsed JSON document.
fn validate_document(value: &Value) -> Result<()> {
    let Some(tasks) = value.get("tasks") else {
        return Ok(());
    };
    let Some(items) = tasks.as_array() else {
        return Err(GanttError::validation("invalid task list format"));
    };

    let mut seen_ids = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        let record: TaskRecord = serde_json::from_value(item.clone())
            .map_err(|e| GanttError::validation(format!("task {index}: {e}")))?;
        let task = Task::from(record);
        validate_task_shape(&task)
            .map_err(|e| GanttError::validation(format!("task {index}: {e}")))?;
        if !seen_ids.insert(task.id.clone()) {
            return Err(GanttError::validation(format!(
                "task {index}: duplicate task id '{}'",
                task.id
            )));
        }
    }
    Ok(())
}

/// Serializes a document to the pretty-printed JSON used for storage and
/// file export.
pub fn serialize(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::model::{ChartSettings, ChartState, Headers, ViewConfig};

    fn task_json(id: &str) -> String {
        format!(
            r##"{{"id": "{id}", "proyecto": "Alpha", "tarea": "Design",
                 "fechaInicio": "2025-01-01", "fechaFin": "2025-01-05",
                 "color": "#FF0000"}}"##
        )
    }

    fn doc_json(tasks: &[String]) -> String {
        format!(
            r#"{{"version": "1.0.0", "tasks": [{}]}}"#,
            tasks.join(",")
        )
    }

    #[test]
    fn test_version_gate_is_exact() {
        assert!(is_version_compatible("1.0.0"));
        assert!(!is_version_compatible("1.0"));
        assert!(!is_version_compatible("0.0.1"));
        assert!(!is_version_compatible(""));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = parse("{not json").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_parse_rejects_non_object_root() {
        let err = parse("[1, 2, 3]").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_parse_rejects_non_array_tasks() {
        let err = parse(r#"{"version": "1.0.0", "tasks": 42}"#).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_parse_rejects_task_missing_field() {
        let raw = r#"{"version": "1.0.0", "tasks": [{"id": "t1"}]}"#;
        let err = parse(raw).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("missing required field"));
    }

    #[test]
    fn test_parse_rejects_duplicate_ids() {
        let raw = doc_json(&[task_json("t1"), task_json("t1")]);
        let err = parse(&raw).unwrap_err();
        assert!(err.to_string().contains("duplicate task id"));
    }

    #[test]
    fn test_parse_accepts_absent_tasks() {
        let doc = parse(r#"{"version": "0.9.0"}"#).unwrap();
        assert!(doc.tasks.is_empty());
        // Parsing succeeds; the version gate is a separate step.
        assert!(check_version(&doc).unwrap_err().is_version_mismatch());
    }

    #[test]
    fn test_parse_valid_document() {
        let doc = parse(&doc_json(&[task_json("t1"), task_json("t2")])).unwrap();
        assert_eq!(doc.tasks.len(), 2);
        assert_eq!(doc.tasks[0].project, "Alpha");
        assert!(check_version(&doc).is_ok());
    }

    #[test]
    fn test_round_trip_preserves_state() {
        let state = ChartState {
            tasks: vec![crate::chart::model::Task {
                id: "t1".to_string(),
                project: "Alpha".to_string(),
                name: "Design".to_string(),
                start_date: "2025-01-01".to_string(),
                end_date: "2025-01-05".to_string(),
                color: "#ff0000".to_string(),
            }],
            headers: Headers {
                project: "Workstream".to_string(),
                task: "Activity".to_string(),
            },
        };
        let settings = ChartSettings::default();
        let view = ViewConfig::default();
        let document = Document::from_state(&state, &settings, &view);

        let raw = serialize(&document).unwrap();
        let reparsed = parse(&raw).unwrap();

        assert_eq!(reparsed, document);
        assert_eq!(reparsed.to_chart_state(), state);
    }
}
