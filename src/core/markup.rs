//! LaTeX `tabular` rendering

use std::fmt::Write;

use super::decorate::{ClassCommands, Decorator};
use super::escape::escape_cow;
use super::model::{Cell, TableModel};
use crate::data::constants::{CELL_SEPARATOR, COLUMN_SLOT, HEADER_COMMAND, ROW_END};

/// Options for LaTeX rendering
#[derive(Debug, Clone, Default)]
pub struct MarkupOptions {
    /// Explicit class-to-command table. `None` uses class names verbatim.
    pub class_commands: Option<ClassCommands>,
}

impl MarkupOptions {
    /// Class names used verbatim as command names
    pub fn verbatim() -> Self {
        Self::default()
    }

    /// Resolve class names through `commands`
    pub fn with_class_commands(commands: ClassCommands) -> Self {
        MarkupOptions {
            class_commands: Some(commands),
        }
    }

    /// Decorator configured by these options
    pub fn decorator(&self) -> Decorator {
        match &self.class_commands {
            Some(commands) => Decorator::with_commands(commands.clone()),
            None => Decorator::new(),
        }
    }
}

/// Renders a [`TableModel`] as a bordered LaTeX `tabular`
#[derive(Debug, Clone, Default)]
pub struct MarkupRenderer {
    decorator: Decorator,
}

impl MarkupRenderer {
    pub fn new(options: &MarkupOptions) -> Self {
        MarkupRenderer {
            decorator: options.decorator(),
        }
    }

    /// Render the whole table environment
    pub fn render(&self, model: &TableModel) -> String {
        let mut output = String::new();

        let _ = writeln!(
            output,
            "\\begin{{tabular}}{{|{}}}",
            COLUMN_SLOT.repeat(model.column_count())
        );
        let _ = writeln!(output, "\\hline");

        for row in model.rows() {
            let cells: Vec<String> = row.cells.iter().map(|c| self.render_cell(c)).collect();
            let _ = writeln!(output, "{}{}", cells.join(CELL_SEPARATOR), ROW_END);
        }

        let _ = writeln!(output, "\\end{{tabular}}");
        output
    }

    /// Render one cell: escape, decorate, embolden headers, then spans
    pub fn render_cell(&self, cell: &Cell) -> String {
        let mut content = self.decorator.augment(&escape_cow(&cell.text), &cell.classes);
        if cell.is_header {
            content = format!("\\{}{{{}}}", HEADER_COMMAND, content);
        }
        wrap_spans(content, cell.row_span, cell.col_span)
    }
}

/// Wrap content in `\multirow` and then `\multicolumn` as the spans require.
///
/// `\multicolumn` is always the outer wrapper.
pub fn wrap_spans(content: String, row_span: usize, col_span: usize) -> String {
    let mut content = content;
    if row_span > 1 {
        content = format!("\\multirow{{{}}}{{*}}{{{}}}", row_span, content);
    }
    if col_span > 1 {
        content = format!("\\multicolumn{{{}}}{{ c }}{{{}}}", col_span, content);
    }
    content
}
