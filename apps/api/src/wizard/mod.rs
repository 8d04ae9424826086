// Step sequencing and the per-user editing session that owns the document.

pub mod handlers;
pub mod session;
pub mod steps;
