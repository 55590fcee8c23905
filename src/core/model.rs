//! Immutable table model produced by extraction and consumed by the renderers

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;

use crate::data::constants::{MAX_COL_SPAN, MAX_ROW_SPAN};
use crate::utils::error::ConversionError;

/// A single extracted cell
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Whether the source cell was a header cell (`<th>`)
    pub is_header: bool,
    /// Flattened text content, untrimmed
    pub text: String,
    /// Number of rows this cell spans (always >= 1)
    pub row_span: usize,
    /// Number of columns this cell spans (always >= 1)
    pub col_span: usize,
    /// Semantic class tags in source order, without duplicates
    pub classes: IndexSet<String>,
}

impl Cell {
    /// Create a plain data cell spanning one slot
    pub fn new(text: impl Into<String>) -> Self {
        Cell {
            is_header: false,
            text: text.into(),
            row_span: 1,
            col_span: 1,
            classes: IndexSet::new(),
        }
    }

    /// Create a header cell spanning one slot
    pub fn header(text: impl Into<String>) -> Self {
        Cell {
            is_header: true,
            ..Cell::new(text)
        }
    }

    /// Set both spans, clamped to the same range extraction produces
    pub fn with_spans(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = row_span.clamp(1, MAX_ROW_SPAN);
        self.col_span = col_span.clamp(1, MAX_COL_SPAN);
        self
    }

    /// Append class tags, keeping first-seen order
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(classes.into_iter().map(Into::into));
        self
    }
}

/// A table row: cells in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Row { cells }
    }

    /// Sum of the column spans of this row's cells
    pub fn width(&self) -> usize {
        self.cells
            .iter()
            .fold(0, |width, c| width.saturating_add(c.col_span))
    }
}

/// Extracted table, immutable once built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableModel {
    rows: Vec<Row>,
    column_count: usize,
}

impl TableModel {
    /// Build a model, deriving the column count from the widest row
    pub fn new(rows: Vec<Row>) -> Self {
        let column_count = rows.iter().map(Row::width).max().unwrap_or(0);
        TableModel { rows, column_count }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Maximum over rows of the summed column spans; 0 for an empty table
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over every cell in row-major source order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|r| r.cells.iter())
    }
}

impl FromIterator<Row> for TableModel {
    fn from_iter<T: IntoIterator<Item = Row>>(iter: T) -> Self {
        TableModel::new(iter.into_iter().collect())
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// LaTeX `tabular` environment
    #[default]
    Markup,
    /// Cell-joined plain text with span markup only
    Delimited,
}

impl TableFormat {
    /// Conventional file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Markup => "tex",
            TableFormat::Delimited => "txt",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFormat::Markup => write!(f, "latex"),
            TableFormat::Delimited => write!(f, "text"),
        }
    }
}

impl FromStr for TableFormat {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latex" | "tex" | "markup" => Ok(TableFormat::Markup),
            "text" | "txt" | "delimited" | "csv" => Ok(TableFormat::Delimited),
            other => Err(ConversionError::invalid(format!(
                "unknown table format '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_count_is_widest_row() {
        let model = TableModel::new(vec![
            Row::new(vec![Cell::new("a").with_spans(1, 2)]),
            Row::new(vec![Cell::new("b"), Cell::new("c").with_spans(1, 2)]),
        ]);
        assert_eq!(model.column_count(), 3);
    }

    #[test]
    fn test_empty_model_has_zero_columns() {
        let model = TableModel::new(Vec::new());
        assert_eq!(model.column_count(), 0);
        assert!(model.is_empty());
    }

    #[test]
    fn test_empty_rows_do_not_widen() {
        let model = TableModel::new(vec![Row::default(), Row::new(vec![Cell::new("x")])]);
        assert_eq!(model.column_count(), 1);
        assert_eq!(model.rows().len(), 2);
    }

    #[test]
    fn test_with_spans_clamps_zero() {
        let cell = Cell::new("x").with_spans(0, 0);
        assert_eq!((cell.row_span, cell.col_span), (1, 1));

        let cell = Cell::new("x").with_spans(usize::MAX, usize::MAX);
        assert_eq!((cell.row_span, cell.col_span), (MAX_ROW_SPAN, MAX_COL_SPAN));
    }

    #[test]
    fn test_width_saturates() {
        let mut wide = Cell::new("a");
        wide.col_span = usize::MAX;
        let row = Row::new(vec![wide, Cell::new("b")]);
        assert_eq!(row.width(), usize::MAX);
    }

    #[test]
    fn test_classes_keep_first_seen_order() {
        let cell = Cell::new("x").with_classes(["good", "first", "good"]);
        let classes: Vec<_> = cell.classes.iter().map(String::as_str).collect();
        assert_eq!(classes, ["good", "first"]);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("latex".parse::<TableFormat>().ok(), Some(TableFormat::Markup));
        assert_eq!("TEX".parse::<TableFormat>().ok(), Some(TableFormat::Markup));
        assert_eq!("csv".parse::<TableFormat>().ok(), Some(TableFormat::Delimited));
        assert!("pdf".parse::<TableFormat>().is_err());
    }
}
