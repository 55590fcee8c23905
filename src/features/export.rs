//! Presentation adapters
//!
//! Both the file download and the in-place source view show the same LaTeX,
//! so both go through one [`render_with_options`] call.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::markup::MarkupOptions;
use crate::core::model::{TableFormat, TableModel};
use crate::core::render_with_options;
use crate::data::constants::{EXPORT_FILENAME, EXPORT_MIME};
use crate::utils::error::ConversionResult;

/// A rendered table ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableExport {
    /// Suggested file name
    pub filename: String,
    /// MIME type to save under
    pub mime: &'static str,
    /// Rendered table
    pub content: String,
}

impl TableExport {
    /// LaTeX export saved as `table.tex`
    pub fn latex(model: &TableModel, options: &MarkupOptions) -> Self {
        Self::new(model, TableFormat::Markup, options)
    }

    /// Export in any format; the file name follows the format's extension
    pub fn new(model: &TableModel, format: TableFormat, options: &MarkupOptions) -> Self {
        Self::with_content(format, render_with_options(model, format, options))
    }

    /// Export content that was already rendered in `format`
    pub fn with_content(format: TableFormat, content: String) -> Self {
        let filename = match format {
            TableFormat::Markup => EXPORT_FILENAME.to_string(),
            other => Path::new(EXPORT_FILENAME)
                .with_extension(other.extension())
                .to_string_lossy()
                .into_owned(),
        };
        TableExport {
            filename,
            mime: EXPORT_MIME,
            content,
        }
    }

    /// Suffix the file name with a 1-based table number, `table-2.tex`
    pub fn numbered(mut self, number: usize) -> Self {
        let path = Path::new(&self.filename);
        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned());
        let ext = path.extension().map(|s| s.to_string_lossy().into_owned());
        if let (Some(stem), Some(ext)) = (stem, ext) {
            self.filename = format!("{}-{}.{}", stem, number, ext);
        }
        self
    }

    /// Write the content into `dir` under [`TableExport::filename`]
    pub fn write_into(&self, dir: &Path) -> ConversionResult<PathBuf> {
        let path = dir.join(&self.filename);
        fs::write(&path, &self.content)?;
        tracing::debug!(path = %path.display(), bytes = self.content.len(), "wrote table export");
        Ok(path)
    }
}

/// LaTeX source shown in place of the rendered table
pub fn inline_source(model: &TableModel, options: &MarkupOptions) -> String {
    render_with_options(model, TableFormat::Markup, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Cell, Row};

    fn model() -> TableModel {
        TableModel::new(vec![Row::new(vec![Cell::new("a_b")])])
    }

    #[test]
    fn test_latex_export() {
        let export = TableExport::latex(&model(), &MarkupOptions::default());
        assert_eq!(export.filename, "table.tex");
        assert_eq!(export.mime, "text/plain");
        assert!(export.content.contains(r"a\_b"));
    }

    #[test]
    fn test_both_adapters_agree() {
        let options = MarkupOptions::default();
        assert_eq!(
            TableExport::latex(&model(), &options).content,
            inline_source(&model(), &options)
        );
    }

    #[test]
    fn test_text_export_name() {
        let export = TableExport::new(&model(), TableFormat::Delimited, &MarkupOptions::default());
        assert_eq!(export.filename, "table.txt");
        assert_eq!(export.content, "a_b\n");
    }

    #[test]
    fn test_with_content_matches_new() {
        let options = MarkupOptions::default();
        let rendered = render_with_options(&model(), TableFormat::Markup, &options);
        assert_eq!(
            TableExport::with_content(TableFormat::Markup, rendered),
            TableExport::latex(&model(), &options)
        );
    }

    #[test]
    fn test_numbered() {
        let export = TableExport::latex(&model(), &MarkupOptions::default()).numbered(2);
        assert_eq!(export.filename, "table-2.tex");
    }
}
