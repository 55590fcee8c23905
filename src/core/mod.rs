//! Core table export
//!
//! This module contains the extraction and rendering pipeline:
//! - `extract`: raw grid to immutable [`TableModel`]
//! - `escape` / `decorate`: cell text to LaTeX-safe, class-decorated text
//! - `markup`: [`TableModel`] to LaTeX `tabular`
//! - `delimited`: [`TableModel`] to cell-joined plain text
//!
//! # Architecture
//!
//! ```text
//! GridSource -> extract -> TableModel -> MarkupRenderer | DelimitedRenderer -> String
//! ```

pub mod decorate;
pub mod delimited;
pub mod escape;
pub mod extract;
pub mod markup;
pub mod model;

#[cfg(test)]
mod tests;

// Re-export main types and functions
pub use decorate::{augment, ClassCommands, ClassMapping, Decorator};
pub use delimited::DelimitedRenderer;
pub use escape::escape;
pub use extract::{extract, extract_with_diagnostics, GridSource, SourceCell, SourceRow};
pub use markup::{MarkupOptions, MarkupRenderer};
pub use model::{Cell, Row, TableFormat, TableModel};

/// Render a model in the given format with class names used verbatim
pub fn render(model: &TableModel, format: TableFormat) -> String {
    render_with_options(model, format, &MarkupOptions::default())
}

/// Render a model in the given format.
///
/// `options` only affects [`TableFormat::Markup`]; the delimited format has
/// no decoration.
pub fn render_with_options(
    model: &TableModel,
    format: TableFormat,
    options: &MarkupOptions,
) -> String {
    match format {
        TableFormat::Markup => MarkupRenderer::new(options).render(model),
        TableFormat::Delimited => DelimitedRenderer::new().render(model),
    }
}
