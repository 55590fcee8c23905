//! Data layer - Static tables and constants
//!
//! - LaTeX output fragments and escape table
//! - Report class tags
//! - HTML character entity table

pub mod constants;
pub mod entities;

// Re-export commonly used items
pub use constants::{
    CELL_SEPARATOR, EXPORT_FILENAME, EXPORT_MIME, HEADER_COMMAND, LATEX_ESCAPES, MAX_COL_SPAN,
    MAX_ROW_SPAN, REPORT_TAGS, ROW_END,
};
pub use entities::{decode_entities, decode_entity, HTML_ENTITIES};
