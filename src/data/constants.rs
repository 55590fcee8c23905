//! Constants for LaTeX table output

use phf::phf_set;

// ============================================================================
// Table Layout
// ============================================================================

/// Separator between rendered cells of a row
pub const CELL_SEPARATOR: &str = " & ";

/// Row terminator: line break followed by a full rule
pub const ROW_END: &str = r" \\\hline";

/// One bordered, centered column slot in the column specification
pub const COLUMN_SLOT: &str = "c|";

/// Command used to emphasize header cells
pub const HEADER_COMMAND: &str = "textbf";

/// Largest `colspan` honoured; larger values are clamped, as browsers do
pub const MAX_COL_SPAN: usize = 1000;

/// Largest `rowspan` honoured
pub const MAX_ROW_SPAN: usize = 65534;

// ============================================================================
// Escaping
// ============================================================================

/// Characters rewritten inside cells, backslash first
pub const LATEX_ESCAPES: [(char, &str); 4] = [
    ('\\', r"\textbackslash"),
    ('~', r"\textasciitilde"),
    ('&', r"\&"),
    ('_', r"\_"),
];

// ============================================================================
// Report Tags
// ============================================================================

/// Semantic class tags the report pages put on ranked and graded cells
pub static REPORT_TAGS: phf::Set<&'static str> = phf_set! {
    "first",
    "second",
    "third",
    "bad",
    "average",
    "good",
};

// ============================================================================
// Export
// ============================================================================

/// File name used when saving an exported table
pub const EXPORT_FILENAME: &str = "table.tex";

/// MIME type of the exported file
pub const EXPORT_MIME: &str = "text/plain";
