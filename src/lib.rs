//! # tabtex
//!
//! Span-aware HTML table to LaTeX `tabular` exporter written in Rust.
//!
//! ## Features
//!
//! - **Span Aware**: `rowspan`/`colspan` become `\multirow`/`\multicolumn`
//! - **Safe Escaping**: every `\`, `~`, `&` and `_` in cell text is escaped
//! - **Class Decoration**: cell classes wrap text in LaTeX commands, optionally renamed
//! - **Forgiving Input**: malformed attributes and sloppy HTML degrade, never fail
//! - **Two Formats**: a bordered LaTeX table or a cell-joined plain text preview
//!
//! ## Usage Examples
//!
//! ### HTML Table Conversion
//!
//! ```rust
//! use tabtex::html_to_latex;
//!
//! let latex = html_to_latex(r#"
//!     <table>
//!       <tr><th rowspan="2">Name</th><td>A_B</td></tr>
//!       <tr><td colspan="3">Total</td></tr>
//!     </table>
//! "#).unwrap();
//! assert!(latex.contains(r"\multirow{2}{*}{\textbf{Name}}"));
//! assert!(latex.contains(r"A\_B"));
//! assert!(latex.contains(r"\multicolumn{3}{ c }{Total}"));
//! ```
//!
//! ### Building a Model Directly
//!
//! ```rust
//! use tabtex::{extract, render, SourceCell, SourceRow, TableFormat};
//!
//! let grid = vec![
//!     SourceRow::new(vec![SourceCell::new("a"), SourceCell::new("b")]),
//!     SourceRow::new(vec![SourceCell::new("c"), SourceCell::new("d")]),
//! ];
//! let model = extract(&grid);
//! assert_eq!(render(&model, TableFormat::Delimited), "a & b\nc & d\n");
//! ```

use std::fmt;
use std::str::FromStr;

/// Core extraction and rendering
pub mod core;

/// Data layer - static tables and constants
pub mod data;

/// Feature modules - presentation adapters
pub mod features;

/// HTML table reading
pub mod html;

/// Utility modules
pub mod utils;

// Re-export core functions and types
pub use crate::core::{
    augment, escape, extract, extract_with_diagnostics, render, render_with_options, Cell,
    ClassCommands, ClassMapping, Decorator, DelimitedRenderer, GridSource, MarkupOptions,
    MarkupRenderer, Row, SourceCell, SourceRow, TableFormat, TableModel,
};

// Re-export data modules
pub use data::constants;
pub use data::entities;

// Re-export feature modules
pub use features::export;
pub use features::{inline_source, TableExport};

// Re-export HTML reading
pub use html::{read_tables, HtmlDocument, HtmlTable};

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{ConversionError, ConversionOutput, ConversionResult, ConversionWarning};

/// Which tables of a page to convert
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TableSelection {
    /// The first table in document order
    #[default]
    First,
    /// The n-th table, 1-based
    Number(usize),
    /// The table with this `id` attribute
    Id(String),
    /// Every table, separated by a blank line
    All,
}

impl fmt::Display for TableSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSelection::First => write!(f, "first"),
            TableSelection::Number(n) => write!(f, "{}", n),
            TableSelection::Id(id) => write!(f, "#{}", id),
            TableSelection::All => write!(f, "all"),
        }
    }
}

impl FromStr for TableSelection {
    type Err = ConversionError;

    /// `first`, `all`, a 1-based number, or `#id`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "first" => return Ok(TableSelection::First),
            "all" => return Ok(TableSelection::All),
            _ => {}
        }
        if let Some(id) = s.strip_prefix('#') {
            return Ok(TableSelection::Id(id.to_string()));
        }
        match s.parse::<usize>() {
            Ok(0) => Err(ConversionError::invalid("table numbers start at 1")),
            Ok(n) => Ok(TableSelection::Number(n)),
            Err(_) => Err(ConversionError::invalid(format!(
                "expected 'first', 'all', a table number or '#id', got '{}'",
                s
            ))),
        }
    }
}

impl TableSelection {
    /// Pick tables out of a page
    pub fn select<'a>(&self, tables: &'a [HtmlTable]) -> ConversionResult<Vec<&'a HtmlTable>> {
        let picked: Vec<&HtmlTable> = match self {
            TableSelection::First => tables.first().into_iter().collect(),
            TableSelection::Number(n) => tables.get(n.saturating_sub(1)).into_iter().collect(),
            TableSelection::Id(id) => tables
                .iter()
                .filter(|t| t.id.as_deref() == Some(id.as_str()))
                .take(1)
                .collect(),
            TableSelection::All => tables.iter().collect(),
        };
        if picked.is_empty() {
            return Err(ConversionError::table_not_found(self, tables.len()));
        }
        Ok(picked)
    }
}

/// Options for converting HTML input
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// LaTeX rendering options
    pub markup: MarkupOptions,
    /// Which tables to convert
    pub table: TableSelection,
}

impl ConvertOptions {
    /// Convert every table of the page
    pub fn all_tables() -> Self {
        ConvertOptions {
            table: TableSelection::All,
            ..Default::default()
        }
    }
}

/// Read every table of an HTML page; fails only when there is none
pub fn html_tables(html: &str) -> ConversionResult<Vec<HtmlTable>> {
    let doc = read_tables(html);
    if doc.tables.is_empty() {
        return Err(ConversionError::table_not_found(TableSelection::First, 0));
    }
    Ok(doc.tables)
}

/// Convert the first table of an HTML page to LaTeX
pub fn html_to_latex(html: &str) -> ConversionResult<String> {
    convert_html(html, TableFormat::Markup, &ConvertOptions::default()).map(|out| out.content)
}

/// Convert the first table of an HTML page to cell-joined text
pub fn html_to_text(html: &str) -> ConversionResult<String> {
    convert_html(html, TableFormat::Delimited, &ConvertOptions::default()).map(|out| out.content)
}

/// One selected table of a page, rendered
#[derive(Debug, Clone)]
pub struct RenderedTable {
    /// 1-based position of the table on the page
    pub number: usize,
    /// Value of the table's `id` attribute
    pub id: Option<String>,
    /// Rendered output for this table alone
    pub content: String,
}

/// Convert the selected tables of an HTML page, one [`RenderedTable`] each.
///
/// Reader recovery and malformed attributes are reported as warnings; they
/// never change the rendered output.
pub fn convert_html_tables(
    html: &str,
    format: TableFormat,
    options: &ConvertOptions,
) -> ConversionResult<(Vec<RenderedTable>, Vec<ConversionWarning>)> {
    let HtmlDocument {
        tables,
        mut warnings,
    } = read_tables(html);
    let selected = options.table.select(&tables)?;

    let mut rendered = Vec::with_capacity(selected.len());
    for table in selected {
        let number = table.index + 1;
        let (model, diags) = extract_with_diagnostics(table);
        warnings.extend(
            diags
                .into_iter()
                .filter(|d| d.level >= diagnostics::DiagnosticLevel::Warning)
                .map(|d| ConversionWarning::from(d.with_table(number))),
        );
        rendered.push(RenderedTable {
            number,
            id: table.id.clone(),
            content: render_with_options(&model, format, &options.markup),
        });
    }

    Ok((rendered, warnings))
}

/// Convert the selected tables of an HTML page, separated by a blank line
pub fn convert_html(
    html: &str,
    format: TableFormat,
    options: &ConvertOptions,
) -> ConversionResult<ConversionOutput> {
    let (tables, warnings) = convert_html_tables(html, format, options)?;
    let content = tables
        .iter()
        .map(|t| t.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    Ok(ConversionOutput::with_warnings(content, warnings))
}

/// Load a grid from JSON: an array of rows, each an array of cell objects
/// with optional `rowspan`, `colspan`, `class`, `header` and `text` keys.
#[cfg(feature = "serde")]
pub fn grid_from_json(json: &str) -> ConversionResult<Vec<SourceRow>> {
    Ok(serde_json::from_str(json)?)
}

/// Convert a JSON grid
#[cfg(feature = "serde")]
pub fn convert_json(
    json: &str,
    format: TableFormat,
    options: &MarkupOptions,
) -> ConversionResult<ConversionOutput> {
    let grid = grid_from_json(json)?;
    let (model, diags) = extract_with_diagnostics(&grid);
    let warnings = diags
        .into_iter()
        .filter(|d| d.level >= diagnostics::DiagnosticLevel::Warning)
        .map(ConversionWarning::from)
        .collect();
    Ok(ConversionOutput::with_warnings(
        render_with_options(&model, format, options),
        warnings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div class="table-wrapper"><table id="accuracy">
          <tr><th>Tracker</th><th>Accuracy</th></tr>
          <tr><td>ncc</td><td class="first">0.61</td></tr>
        </table></div>
        <div class="table-wrapper"><table id="robustness">
          <tr><th>Tracker</th><th>Failures</th></tr>
          <tr><td>static</td><td colspan="1x">12</td></tr>
        </table></div>
    "#;

    #[test]
    fn test_html_to_latex_first_table() {
        let latex = html_to_latex(PAGE).unwrap();
        assert!(latex.contains(r"\textbf{Accuracy}"));
        assert!(latex.contains(r"\first{0.61}"));
        assert!(!latex.contains("Failures"));
    }

    #[test]
    fn test_html_to_text() {
        let text = html_to_text(PAGE).unwrap();
        assert_eq!(text, "Tracker & Accuracy\nncc & 0.61\n");
    }

    #[test]
    fn test_select_by_id() {
        let options = ConvertOptions {
            table: TableSelection::Id("robustness".to_string()),
            ..Default::default()
        };
        let out = convert_html(PAGE, TableFormat::Delimited, &options).unwrap();
        assert_eq!(out.content, "Tracker & Failures\nstatic & 12\n");
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].message.starts_with("table 2, row 2, cell 2"));
    }

    #[test]
    fn test_all_tables() {
        let out = convert_html(PAGE, TableFormat::Markup, &ConvertOptions::all_tables()).unwrap();
        assert_eq!(out.content.matches(r"\begin{tabular}").count(), 2);
        assert!(out.content.contains("\\end{tabular}\n\n\\begin{tabular}"));
    }

    #[test]
    fn test_tables_rendered_separately() {
        let (tables, warnings) =
            convert_html_tables(PAGE, TableFormat::Delimited, &ConvertOptions::all_tables())
                .unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].number, 2);
        assert_eq!(tables[1].id.as_deref(), Some("robustness"));
        assert_eq!(tables[0].content, "Tracker & Accuracy\nncc & 0.61\n");
        assert_eq!(warnings.len(), 1);

        let joined = convert_html(PAGE, TableFormat::Delimited, &ConvertOptions::all_tables())
            .unwrap()
            .content;
        assert_eq!(joined, format!("{}\n{}", tables[0].content, tables[1].content));
    }

    #[test]
    fn test_missing_table() {
        let options = ConvertOptions {
            table: TableSelection::Number(3),
            ..Default::default()
        };
        let err = convert_html(PAGE, TableFormat::Markup, &options).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::TableNotFound { available: 2, .. }
        ));
        assert!(html_to_latex("<p>none</p>").is_err());
        assert!(html_tables("<p>none</p>").is_err());
    }

    #[test]
    fn test_selection_from_str() {
        assert_eq!("all".parse::<TableSelection>().ok(), Some(TableSelection::All));
        assert_eq!("2".parse::<TableSelection>().ok(), Some(TableSelection::Number(2)));
        assert_eq!(
            "#results".parse::<TableSelection>().ok(),
            Some(TableSelection::Id("results".to_string()))
        );
        assert!("0".parse::<TableSelection>().is_err());
        assert!("second".parse::<TableSelection>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_grid() {
        let json = r#"[
            [{"header": true, "text": "Name", "rowspan": 2}, {"text": "x_y", "colspan": "2"}],
            [{"text": "a", "class": "good"}]
        ]"#;
        let out = convert_json(json, TableFormat::Markup, &MarkupOptions::default()).unwrap();
        assert!(out.content.starts_with("\\begin{tabular}{|c|c|c|}"));
        assert!(out.content.contains(r"\multirow{2}{*}{\textbf{Name}}"));
        assert!(out.content.contains(r"\multicolumn{2}{ c }{x\_y}"));
        assert!(out.content.contains(r"\good{a}"));
    }
}
