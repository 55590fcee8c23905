//! Plain cell-joined text rendering.
//!
//! Despite the name this is not CSV: cells are joined with ` & ` and carry
//! the same `\multirow`/`\multicolumn` wrappers as the LaTeX output, but no
//! escaping, decoration or header emphasis. It is meant as a quick preview.

use super::markup::wrap_spans;
use super::model::{Cell, TableModel};
use crate::data::constants::CELL_SEPARATOR;

/// Renders a [`TableModel`] as one line per row
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedRenderer;

impl DelimitedRenderer {
    pub fn new() -> Self {
        DelimitedRenderer
    }

    pub fn render(&self, model: &TableModel) -> String {
        let mut output = String::new();
        for row in model.rows() {
            let cells: Vec<String> = row.cells.iter().map(|c| self.render_cell(c)).collect();
            output.push_str(&cells.join(CELL_SEPARATOR));
            output.push('\n');
        }
        output
    }

    pub fn render_cell(&self, cell: &Cell) -> String {
        wrap_spans(cell.text.clone(), cell.row_span, cell.col_span)
    }
}
