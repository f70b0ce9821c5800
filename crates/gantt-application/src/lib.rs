//! Application layer: orchestrates the draft editor, the reconciliation
//! store, persistence, and the rendering surface.

pub mod autosave;
pub mod runtime;
pub mod usecase;

pub use runtime::{Runtime, init_tracing};
pub use usecase::ChartUseCase;
