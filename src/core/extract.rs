//! Grid extraction: raw row/cell attributes into a [`TableModel`]
//!
//! Extraction never fails. Missing or malformed span attributes resolve to 1,
//! spans above [`MAX_COL_SPAN`]/[`MAX_ROW_SPAN`] are clamped, a missing class
//! attribute gives no classes and missing text the empty string.
//! [`extract_with_diagnostics`] reports what was defaulted without changing
//! the model.

use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

use super::model::{Cell, Row, TableModel};
use crate::data::constants::{MAX_COL_SPAN, MAX_ROW_SPAN};
use crate::utils::diagnostics::{Diagnostic, DiagnosticLevel};

lazy_static! {
    /// Leading integer, read the way browsers read `colspan="2px"`
    static ref LEADING_INT: Regex = Regex::new(r"^[\t\n\x0C\r ]*\+?([0-9]+)").unwrap();
}

/// Raw attributes of one source cell, before any defaulting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SourceCell {
    /// Raw `rowspan` attribute
    #[cfg_attr(
        feature = "serde",
        serde(rename = "rowspan", deserialize_with = "attr_value")
    )]
    pub row_span: Option<String>,
    /// Raw `colspan` attribute
    #[cfg_attr(
        feature = "serde",
        serde(rename = "colspan", deserialize_with = "attr_value")
    )]
    pub col_span: Option<String>,
    /// Raw `class` attribute
    pub class: Option<String>,
    /// Whether the cell is a header cell
    #[cfg_attr(feature = "serde", serde(rename = "header"))]
    pub is_header: bool,
    /// Flattened descendant text
    pub text: Option<String>,
}

impl SourceCell {
    pub fn new(text: impl Into<String>) -> Self {
        SourceCell {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn header(text: impl Into<String>) -> Self {
        SourceCell {
            is_header: true,
            ..SourceCell::new(text)
        }
    }

    pub fn row_span(mut self, value: impl Into<String>) -> Self {
        self.row_span = Some(value.into());
        self
    }

    pub fn col_span(mut self, value: impl Into<String>) -> Self {
        self.col_span = Some(value.into());
        self
    }

    pub fn class(mut self, value: impl Into<String>) -> Self {
        self.class = Some(value.into());
        self
    }
}

/// Raw cells of one source row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SourceRow {
    pub cells: Vec<SourceCell>,
}

impl SourceRow {
    pub fn new(cells: Vec<SourceCell>) -> Self {
        SourceRow { cells }
    }
}

impl FromIterator<SourceCell> for SourceRow {
    fn from_iter<T: IntoIterator<Item = SourceCell>>(iter: T) -> Self {
        SourceRow::new(iter.into_iter().collect())
    }
}

/// A read-only snapshot of a row/cell grid
pub trait GridSource {
    /// Rows in source order
    fn rows(&self) -> &[SourceRow];
}

impl GridSource for [SourceRow] {
    fn rows(&self) -> &[SourceRow] {
        self
    }
}

impl GridSource for Vec<SourceRow> {
    fn rows(&self) -> &[SourceRow] {
        self
    }
}

/// Outcome of reading a span attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanAttr {
    /// No attribute, span is 1
    Absent,
    /// A clean positive integer
    Valid(usize),
    /// A positive integer followed by other characters (`"2px"`)
    Trailing(usize),
    /// A positive integer above the limit, span is the limit
    Clamped(usize),
    /// Not a positive integer, span is 1
    Invalid,
}

impl SpanAttr {
    /// Read a raw span attribute, clamping to `limit`
    pub fn parse(raw: Option<&str>, limit: usize) -> Self {
        let Some(raw) = raw else {
            return SpanAttr::Absent;
        };
        let Some(caps) = LEADING_INT.captures(raw) else {
            return SpanAttr::Invalid;
        };
        let digits = caps[1].trim_start_matches('0');
        if digits.is_empty() {
            return SpanAttr::Invalid;
        }
        // Too many digits for usize is still a positive integer
        let n = digits.parse::<usize>().unwrap_or(usize::MAX);
        let whole = caps.get(0).map_or(0, |m| m.end());
        if n > limit {
            SpanAttr::Clamped(limit)
        } else if raw[whole..].is_empty() {
            SpanAttr::Valid(n)
        } else {
            SpanAttr::Trailing(n)
        }
    }

    /// Effective span value
    pub fn value(&self) -> usize {
        match self {
            SpanAttr::Valid(n) | SpanAttr::Trailing(n) | SpanAttr::Clamped(n) => *n,
            SpanAttr::Absent | SpanAttr::Invalid => 1,
        }
    }
}

/// Resolve a raw `colspan` attribute to a span in `1..=MAX_COL_SPAN`
pub fn parse_col_span(raw: Option<&str>) -> usize {
    SpanAttr::parse(raw, MAX_COL_SPAN).value()
}

/// Resolve a raw `rowspan` attribute to a span in `1..=MAX_ROW_SPAN`
pub fn parse_row_span(raw: Option<&str>) -> usize {
    SpanAttr::parse(raw, MAX_ROW_SPAN).value()
}

/// Split a class attribute on whitespace into an ordered set
pub fn parse_classes(raw: Option<&str>) -> IndexSet<String> {
    raw.map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Extract the table model from a grid snapshot
pub fn extract<G: GridSource + ?Sized>(source: &G) -> TableModel {
    extract_inner(source, None)
}

/// Extract the table model and report every defaulted or suspicious input.
///
/// The model is identical to the one [`extract`] returns.
pub fn extract_with_diagnostics<G: GridSource + ?Sized>(
    source: &G,
) -> (TableModel, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let model = extract_inner(source, Some(&mut diagnostics));
    check_layout(&model, &mut diagnostics);
    (model, diagnostics)
}

fn extract_inner<G: GridSource + ?Sized>(
    source: &G,
    mut diagnostics: Option<&mut Vec<Diagnostic>>,
) -> TableModel {
    let mut rows = Vec::with_capacity(source.rows().len());

    for (row_idx, source_row) in source.rows().iter().enumerate() {
        let mut cells = Vec::with_capacity(source_row.cells.len());

        for (cell_idx, raw) in source_row.cells.iter().enumerate() {
            let row_attr = SpanAttr::parse(raw.row_span.as_deref(), MAX_ROW_SPAN);
            let col_attr = SpanAttr::parse(raw.col_span.as_deref(), MAX_COL_SPAN);

            if let Some(diags) = diagnostics.as_deref_mut() {
                report_span(diags, "rowspan", raw.row_span.as_deref(), row_attr, row_idx, cell_idx);
                report_span(diags, "colspan", raw.col_span.as_deref(), col_attr, row_idx, cell_idx);
            }

            cells.push(Cell {
                is_header: raw.is_header,
                text: raw.text.clone().unwrap_or_default(),
                row_span: row_attr.value(),
                col_span: col_attr.value(),
                classes: parse_classes(raw.class.as_deref()),
            });
        }

        rows.push(Row::new(cells));
    }

    let model = TableModel::new(rows);
    tracing::debug!(
        rows = model.rows().len(),
        columns = model.column_count(),
        "extracted table model"
    );
    model
}

fn report_span(
    diagnostics: &mut Vec<Diagnostic>,
    name: &str,
    raw: Option<&str>,
    attr: SpanAttr,
    row: usize,
    cell: usize,
) {
    let raw = raw.unwrap_or_default();
    let diagnostic = match attr {
        SpanAttr::Absent | SpanAttr::Valid(_) => return,
        SpanAttr::Trailing(n) => Diagnostic::new(
            DiagnosticLevel::Warning,
            format!("{} \"{}\" has trailing characters, read as {}", name, raw, n),
        )
        .with_suggestion(format!("write {}=\"{}\"", name, n)),
        SpanAttr::Clamped(limit) => Diagnostic::new(
            DiagnosticLevel::Warning,
            format!("{} \"{}\" is above the limit, clamped to {}", name, raw, limit),
        ),
        SpanAttr::Invalid => Diagnostic::new(
            DiagnosticLevel::Warning,
            format!("{} \"{}\" is not a positive integer, using 1", name, raw),
        ),
    };
    tracing::debug!(row = row + 1, cell = cell + 1, "{}", diagnostic.message);
    diagnostics.push(
        diagnostic
            .with_location(row + 1, cell + 1)
            .with_source(raw),
    );
}

/// Compare each row's width, including slots covered by row spans from
/// above, against the column count.
fn check_layout(model: &TableModel, diagnostics: &mut Vec<Diagnostic>) {
    let row_count = model.rows().len();
    let mut covered = vec![0usize; row_count];

    for (row_idx, row) in model.rows().iter().enumerate() {
        for (cell_idx, cell) in row.cells.iter().enumerate() {
            if cell.row_span <= 1 {
                continue;
            }
            let last = row_idx.saturating_add(cell.row_span);
            if last > row_count {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticLevel::Info,
                        format!(
                            "rowspan {} runs {} row(s) past the end of the table",
                            cell.row_span,
                            last - row_count
                        ),
                    )
                    .with_location(row_idx + 1, cell_idx + 1),
                );
            }
            for slot in covered.iter_mut().take(last.min(row_count)).skip(row_idx + 1) {
                *slot = slot.saturating_add(cell.col_span);
            }
        }
    }

    let columns = model.column_count();
    for (row_idx, row) in model.rows().iter().enumerate() {
        let effective = row.width().saturating_add(covered[row_idx]);
        if effective < columns {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticLevel::Info,
                    format!("row fills {} of {} columns", effective, columns),
                )
                .with_row(row_idx + 1),
            );
        } else if effective > columns {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticLevel::Warning,
                    format!(
                        "row spans {} columns once rowspans from above are counted, table has {}",
                        effective, columns
                    ),
                )
                .with_row(row_idx + 1)
                .with_suggestion("check for overlapping rowspan/colspan cells"),
            );
        }
    }
}

#[cfg(feature = "serde")]
fn attr_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Attr {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Attr>::deserialize(deserializer)?.map(|attr| match attr {
        Attr::Text(s) => s,
        Attr::Number(n) => n.to_string(),
    }))
}
