//! HTML table reading
//!
//! Reads every `<table>` element of an HTML page into a [`GridSource`] that
//! the extractor can consume. The reader is deliberately forgiving, since
//! report pages are hand-assembled HTML rather than strict XHTML:
//!
//! - Omitted `</td>`, `</th>` and `</tr>` are closed implicitly
//! - Unmatched end tags are ignored
//! - Section boundaries (`<thead>`, `<tbody>`, `<tfoot>`) close the open row
//! - Entity references are decoded; unknown ones are kept as written
//! - A `<` that cannot start a tag (`x < 3`) is kept as text
//! - A tokenizer error stops reading but keeps every table read so far
//!
//! Cell text is the concatenation of all descendant text, untrimmed, so a
//! nested table contributes its text to the enclosing cell as well as being
//! reported as a table of its own.

mod reader;


pub use reader::read_tables;

use crate::core::extract::{GridSource, SourceRow};
use crate::utils::error::ConversionWarning;

/// One `<table>` element read from a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    /// Position of the table among all tables of the page, in start-tag order
    pub index: usize,
    /// Value of the `id` attribute
    pub id: Option<String>,
    /// Whitespace-normalized `<caption>` text
    pub caption: Option<String>,
    /// Raw rows in source order
    pub rows: Vec<SourceRow>,
}

impl GridSource for HtmlTable {
    fn rows(&self) -> &[SourceRow] {
        &self.rows
    }
}

/// All tables of a page plus anything the reader had to recover from
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    pub tables: Vec<HtmlTable>,
    pub warnings: Vec<ConversionWarning>,
}

impl HtmlDocument {
    /// Look a table up by its `id` attribute
    pub fn table_by_id(&self, id: &str) -> Option<&HtmlTable> {
        self.tables.iter().find(|t| t.id.as_deref() == Some(id))
    }
}
