//! Table diagnostics
//!
//! Extraction never fails and never changes its output because of malformed
//! input. This module reports what was silently defaulted or looks wrong, so
//! a caller can surface it without affecting the rendered table:
//!
//! - Span attributes that are not positive integers or carry trailing text
//! - Rows narrower or wider than the table once row spans are counted
//! - Class names that will not work as LaTeX command names
//! - HTML the reader had to stop on
//!
//! ## Example
//!
//! ```rust
//! use tabtex::core::markup::MarkupOptions;
//! use tabtex::diagnostics::{check_html, DiagnosticLevel};
//!
//! let result = check_html(r#"<table><tr><td colspan="x">a</td></tr></table>"#, &MarkupOptions::default());
//! assert!(result.diagnostics.iter().any(|d| d.level == DiagnosticLevel::Warning));
//! ```

use std::fmt;

use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

use crate::core::extract::extract_with_diagnostics;
use crate::core::markup::MarkupOptions;
use crate::core::model::TableModel;
use crate::html::read_tables;
use crate::utils::error::ConversionWarning;

lazy_static! {
    /// Control-word command names: letters only
    static ref COMMAND_NAME: Regex = Regex::new(r"^[A-Za-z]+$").unwrap();
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - output is produced but may not be what was meant
    Warning,
    /// Error - nothing useful can be produced
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Table index on the page (1-indexed)
    pub table: Option<usize>,
    /// Row number (1-indexed)
    pub row: Option<usize>,
    /// Cell number within the row (1-indexed)
    pub cell: Option<usize>,
    /// Relevant source text
    pub source_text: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            table: None,
            row: None,
            cell: None,
            source_text: None,
            suggestion: None,
        }
    }

    /// Add row and cell location
    pub fn with_location(mut self, row: usize, cell: usize) -> Self {
        self.row = Some(row);
        self.cell = Some(cell);
        self
    }

    /// Add row location only
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Add table location
    pub fn with_table(mut self, table: usize) -> Self {
        self.table = Some(table);
        self
    }

    /// Add source text
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    /// Add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    fn location(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(t) = self.table {
            parts.push(format!("table {}", t));
        }
        if let Some(r) = self.row {
            parts.push(format!("row {}", r));
        }
        if let Some(c) = self.cell {
            parts.push(format!("cell {}", c));
        }
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: level: message
        //         --> table 1, row 2, cell 3
        //         |
        //         | source text
        //         = help: suggestion

        write!(f, "{}: {}", self.level, self.message)?;

        if let Some(location) = self.location() {
            write!(f, "\n  --> {}", location)?;
        }

        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

impl From<Diagnostic> for ConversionWarning {
    fn from(diag: Diagnostic) -> Self {
        let message = match diag.location() {
            Some(location) => format!("{}: {}", location, diag.message),
            None => diag.message,
        };
        ConversionWarning {
            message,
            line: None,
            suggestion: diag.suggestion,
        }
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.add(diag);
        }
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any warnings or errors
    pub fn has_warnings(&self) -> bool {
        self.warnings > 0 || self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(plural(self.errors, "error"));
        }
        if self.warnings > 0 {
            parts.push(plural(self.warnings, "warning"));
        }
        if self.infos > 0 {
            parts.push(plural(self.infos, "note"));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn plural(n: usize, word: &str) -> String {
    format!("{} {}{}", n, word, if n == 1 { "" } else { "s" })
}

/// Check every table of an HTML page
pub fn check_html(html: &str, options: &MarkupOptions) -> CheckResult {
    let mut result = CheckResult::new();
    let doc = read_tables(html);

    for warning in &doc.warnings {
        let mut diag = Diagnostic::new(DiagnosticLevel::Warning, warning.message.clone());
        if let Some(ref suggestion) = warning.suggestion {
            diag = diag.with_suggestion(suggestion.clone());
        }
        result.add(diag);
    }

    if doc.tables.is_empty() {
        result.add(
            Diagnostic::new(DiagnosticLevel::Error, "no <table> element found")
                .with_suggestion("pass a page or fragment that contains a table"),
        );
        return result;
    }

    for table in &doc.tables {
        let (model, diags) = extract_with_diagnostics(table);
        let number = table.index + 1;
        result.extend(diags.into_iter().map(|d| d.with_table(number)));
        result.extend(
            check_classes(&model, options)
                .into_iter()
                .map(|d| d.with_table(number)),
        );
    }

    result
}

/// Report class names that end up as commands LaTeX will not accept as-is
pub fn check_classes(model: &TableModel, options: &MarkupOptions) -> Vec<Diagnostic> {
    let decorator = options.decorator();

    let classes: IndexSet<&str> = model
        .cells()
        .flat_map(|c| c.classes.iter().map(String::as_str))
        .collect();

    let mut diagnostics = Vec::new();
    for class in classes {
        // Mapped commands are taken as given
        let Some(command) = decorator.command_for(class) else {
            continue;
        };
        if command != class {
            continue;
        }

        if COMMAND_NAME.is_match(class) {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticLevel::Info,
                    format!("class '{}' is emitted as \\{}{{...}}", class, class),
                )
                .with_suggestion(format!(
                    "define \\{} in the document, or map it with --class {}=COMMAND",
                    class, class
                )),
            );
        } else {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticLevel::Warning,
                    format!("class '{}' is not a valid LaTeX command name", class),
                )
                .with_source(format!("\\{}{{...}}", class))
                .with_suggestion(format!(
                    "map it with --class {}=COMMAND or drop it with --class {}=",
                    class, class
                )),
            );
        }
    }
    diagnostics
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    // Summary
    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decorate::ClassCommands;

    #[test]
    fn test_clean_table() {
        let result = check_html(
            "<table><tr><th>a</th><th>b</th></tr><tr><td>1</td><td>2</td></tr></table>",
            &MarkupOptions::default(),
        );
        assert!(result.is_empty(), "{}", format_diagnostics(&result, false));
    }

    #[test]
    fn test_no_table_is_error() {
        let result = check_html("<p>nothing</p>", &MarkupOptions::default());
        assert!(result.has_errors());
    }

    #[test]
    fn test_bad_span_located() {
        let result = check_html(
            r#"<table><tr><td>a</td></tr></table><table><tr><td rowspan="two">b</td></tr></table>"#,
            &MarkupOptions::default(),
        );
        assert_eq!(result.warnings, 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.table, Some(2));
        assert_eq!(diag.row, Some(1));
        assert_eq!(diag.source_text.as_deref(), Some("two"));
    }

    #[test]
    fn test_invalid_class_name_warns() {
        let result = check_html(
            r#"<table><tr><td class="top-3 good">a</td></tr></table>"#,
            &MarkupOptions::default(),
        );
        assert_eq!(result.warnings, 1);
        assert_eq!(result.infos, 1);
    }

    #[test]
    fn test_mapped_classes_not_reported() {
        let mut commands = ClassCommands::new();
        commands.insert("top-3", "textbf");
        commands.insert("good", "");
        let result = check_html(
            r#"<table><tr><td class="top-3 good">a</td></tr></table>"#,
            &MarkupOptions::with_class_commands(commands),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_summary_format() {
        let mut result = CheckResult::new();
        result.add(Diagnostic::new(DiagnosticLevel::Error, "test"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "test"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "test"));

        let summary = result.summary();
        assert!(summary.contains("1 error"));
        assert!(summary.contains("2 warnings"));
    }

    #[test]
    fn test_into_warning() {
        let diag = Diagnostic::new(DiagnosticLevel::Warning, "bad span")
            .with_table(2)
            .with_row(1);
        let warning = ConversionWarning::from(diag);
        assert_eq!(warning.message, "table 2, row 1: bad span");
    }

    #[test]
    fn test_display_includes_location() {
        let diag = Diagnostic::new(DiagnosticLevel::Warning, "bad span")
            .with_table(1)
            .with_location(2, 3)
            .with_suggestion("fix it");
        let text = diag.to_string();
        assert!(text.starts_with("warning: bad span"));
        assert!(text.contains("table 1, row 2, cell 3"));
        assert!(text.contains("help: fix it"));
    }
}
