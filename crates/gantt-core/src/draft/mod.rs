//! Draft editing: the in-progress task list mutated by the edit surface.

pub mod editor;

pub use editor::{DraftChangeListener, DraftData, DraftEditor, TaskField};
