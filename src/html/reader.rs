//! Event-driven `<table>` reader built on quick-xml

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{HtmlDocument, HtmlTable};
use crate::core::extract::{SourceCell, SourceRow};
use crate::data::entities::decode_entities;
use crate::utils::error::ConversionWarning;

/// Table being read; tables nest, so these form a stack
#[derive(Debug, Default)]
struct TableBuilder {
    table: HtmlTable,
    row: Option<SourceRow>,
    cell: Option<SourceCell>,
    in_caption: bool,
}

impl TableBuilder {
    fn new(index: usize, start: &BytesStart) -> Self {
        let id = attributes(start)
            .into_iter()
            .find(|(k, _)| k == "id")
            .map(|(_, v)| v);
        TableBuilder {
            table: HtmlTable {
                index,
                id,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn open_row(&mut self) {
        self.close_row();
        self.row = Some(SourceRow::default());
    }

    fn close_row(&mut self) {
        self.close_cell();
        if let Some(row) = self.row.take() {
            self.table.rows.push(row);
        }
    }

    fn open_cell(&mut self, start: &BytesStart, is_header: bool) {
        self.close_cell();
        if self.row.is_none() {
            self.row = Some(SourceRow::default());
        }

        let mut cell = SourceCell {
            is_header,
            text: Some(String::new()),
            ..Default::default()
        };
        for (key, value) in attributes(start) {
            match key.as_str() {
                "rowspan" => cell.row_span = Some(value),
                "colspan" => cell.col_span = Some(value),
                "class" => cell.class = Some(value),
                _ => {}
            }
        }
        self.cell = Some(cell);
    }

    fn close_cell(&mut self) {
        if let Some(cell) = self.cell.take() {
            if let Some(row) = self.row.as_mut() {
                row.cells.push(cell);
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(text_buf) = self.cell.as_mut().and_then(|c| c.text.as_mut()) {
            text_buf.push_str(text);
        }
        if self.in_caption {
            self.table
                .caption
                .get_or_insert_with(String::new)
                .push_str(text);
        }
    }

    fn finish(mut self) -> HtmlTable {
        self.close_row();
        if let Some(caption) = self.table.caption.take() {
            let normalized = caption.split_whitespace().collect::<Vec<_>>().join(" ");
            self.table.caption = (!normalized.is_empty()).then_some(normalized);
        }
        self.table
    }
}

/// Reader state across events
#[derive(Debug, Default)]
struct TableReader {
    open: Vec<TableBuilder>,
    finished: Vec<HtmlTable>,
    started: usize,
}

impl TableReader {
    fn start(&mut self, start: &BytesStart) {
        let name = tag_name(start.local_name().as_ref());
        match name.as_str() {
            "table" => {
                let builder = TableBuilder::new(self.started, start);
                self.started += 1;
                self.open.push(builder);
            }
            "tr" => {
                if let Some(table) = self.open.last_mut() {
                    table.open_row();
                }
            }
            "td" | "th" => {
                if let Some(table) = self.open.last_mut() {
                    table.open_cell(start, name == "th");
                }
            }
            "thead" | "tbody" | "tfoot" => {
                if let Some(table) = self.open.last_mut() {
                    table.close_row();
                }
            }
            "caption" => {
                if let Some(table) = self.open.last_mut() {
                    table.in_caption = true;
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        let name = tag_name(name);
        match name.as_str() {
            "table" => {
                if let Some(builder) = self.open.pop() {
                    self.finished.push(builder.finish());
                }
            }
            "tr" | "thead" | "tbody" | "tfoot" => {
                if let Some(table) = self.open.last_mut() {
                    table.close_row();
                }
            }
            "td" | "th" => {
                if let Some(table) = self.open.last_mut() {
                    table.close_cell();
                }
            }
            "caption" => {
                if let Some(table) = self.open.last_mut() {
                    table.in_caption = false;
                }
            }
            _ => {}
        }
    }

    /// Text belongs to every open cell, outer tables included
    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        for table in &mut self.open {
            table.push_text(text);
        }
    }

    fn into_tables(mut self) -> Vec<HtmlTable> {
        while let Some(builder) = self.open.pop() {
            self.finished.push(builder.finish());
        }
        let mut tables = self.finished;
        tables.sort_by_key(|t| t.index);
        tables
    }
}

/// Read every `<table>` of an HTML page.
///
/// Never fails: a tokenizer error is turned into a warning and the tables
/// read up to that point are returned.
pub fn read_tables(html: &str) -> HtmlDocument {
    let prepared = escape_bare_lt(html);
    let html = &*prepared;
    let mut reader = Reader::from_str(html);
    {
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.allow_dangling_amp = true;
    }

    let mut state = TableReader::default();
    let mut warnings = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => state.start(e),
            Ok(Event::Empty(ref e)) => {
                state.start(e);
                state.end(e.local_name().as_ref());
            }
            Ok(Event::End(ref e)) => state.end(e.local_name().as_ref()),
            Ok(Event::Text(ref t)) => {
                let raw = String::from_utf8_lossy(t);
                state.text(&decode_entities(&raw));
            }
            Ok(Event::CData(ref t)) => {
                state.text(&String::from_utf8_lossy(t));
            }
            Ok(Event::GeneralRef(ref r)) => {
                let name = String::from_utf8_lossy(r);
                let reference = format!("&{};", name);
                state.text(&decode_entities(&reference));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                let offset = reader.error_position() as usize;
                let (line, column) = line_col(html, offset);
                tracing::warn!(line, column, error = %e, "stopped reading HTML");
                warnings.push(ConversionWarning {
                    message: format!(
                        "HTML could not be read past line {}, column {}: {}",
                        line, column, e
                    ),
                    line: Some(line),
                    suggestion: Some("tables after this point were not read".to_string()),
                });
                break;
            }
        }
    }

    let tables = state.into_tables();
    tracing::debug!(tables = tables.len(), "read HTML tables");
    HtmlDocument { tables, warnings }
}

/// Rewrite each `<` that cannot start markup (`x < 3`, `a<=b`) as `&lt;`.
///
/// The tokenizer would otherwise read it as the start of a tag and drop the
/// text up to the next `>`.
fn escape_bare_lt(html: &str) -> Cow<'_, str> {
    let bytes = html.as_bytes();
    let starts_markup = |at: usize| match bytes.get(at + 1) {
        Some(&b) => b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'),
        None => false,
    };

    let mut bare = html
        .match_indices('<')
        .map(|(i, _)| i)
        .filter(|&i| !starts_markup(i))
        .peekable();
    if bare.peek().is_none() {
        return Cow::Borrowed(html);
    }

    let mut out = String::with_capacity(html.len() + 8);
    let mut last = 0;
    for at in bare {
        out.push_str(&html[last..at]);
        out.push_str("&lt;");
        last = at + 1;
    }
    out.push_str(&html[last..]);
    Cow::Owned(out)
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

/// Attribute name/value pairs; names lowercased, values entity-decoded
fn attributes(start: &BytesStart) -> Vec<(String, String)> {
    start
        .html_attributes()
        .flatten()
        .map(|attr| {
            let key = tag_name(attr.key.local_name().as_ref());
            let value = decode_entities(&String::from_utf8_lossy(&attr.value)).into_owned();
            (key, value)
        })
        .collect()
}

/// 1-indexed line and column of a byte offset
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = text.as_bytes().get(..offset).unwrap_or_default();
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = before.iter().rev().take_while(|&&b| b != b'\n').count() + 1;
    (line, column)
}
