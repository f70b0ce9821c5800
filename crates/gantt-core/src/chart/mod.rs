//! Chart domain: models, validators, and the rendering seam.

pub mod model;
pub mod validate;

use model::{ChartSettings, Headers, Task, ViewConfig};

/// Interface the core needs from the rendering surface.
///
/// Given a task list, header labels, and display configuration, produces a
/// visual timeline. The core does not care how: implementations draw to a
/// canvas, a terminal, a test buffer, anything.
pub trait RenderSurface: Send + Sync {
    fn render(&self, tasks: &[Task], headers: &Headers, view: &ViewConfig, settings: &ChartSettings);
}
