// Read-only projection of the document and the export formats built on it.

pub mod export;
pub mod handlers;
pub mod projector;
