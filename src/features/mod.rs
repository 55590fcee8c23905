//! Feature modules - adapters around the core
//!
//! - Export: the file-save and inline-source presentation adapters

pub mod export;

// Re-export commonly used types
pub use export::{inline_source, TableExport};
