//! The versioned document: wire model, codec, and the durable store seam.
//!
//! One JSON document shape serves both durable local persistence and file
//! export/import. Wire field names are fixed by the interchange format and
//! never change without a version bump.

pub mod codec;
pub mod memory;
pub mod model;
pub mod repository;

pub use memory::MemoryDocumentStore;
pub use model::{Document, HeadersRecord, TaskRecord};
pub use repository::DocumentStore;

/// The running application version. Documents are only accepted when their
/// `version` field equals this string exactly.
pub const APP_VERSION: &str = "1.0.0";
