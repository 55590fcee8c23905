//! Error handling for table export
//!
//! Extraction and rendering never fail. Errors only come from the adapters
//! around them: reading input, picking a table, loading a JSON grid.

use std::fmt;

/// Conversion error type
#[derive(Debug, Clone)]
pub enum ConversionError {
    /// Parse error - input could not be parsed
    ParseError {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },
    /// Invalid input
    InvalidInput { message: String },
    /// Requested table does not exist
    TableNotFound { requested: String, available: usize },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::ParseError {
                message,
                line,
                column,
            } => {
                if let (Some(l), Some(c)) = (line, column) {
                    write!(f, "Parse error at line {}, column {}: {}", l, c, message)
                } else if let Some(l) = line {
                    write!(f, "Parse error at line {}: {}", l, message)
                } else {
                    write!(f, "Parse error: {}", message)
                }
            }
            ConversionError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            ConversionError::TableNotFound {
                requested,
                available,
            } => match available {
                0 => write!(f, "No table found (looking for {})", requested),
                n => write!(
                    f,
                    "Table {} not found, input has {} table{}",
                    requested,
                    n,
                    if *n == 1 { "" } else { "s" }
                ),
            },
            ConversionError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::IoError {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ConversionError {
    fn from(err: serde_json::Error) -> Self {
        ConversionError::ParseError {
            message: err.to_string(),
            line: Some(err.line()),
            column: Some(err.column()),
        }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Conversion warnings (non-fatal issues)
#[derive(Debug, Clone)]
pub struct ConversionWarning {
    pub message: String,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(l) = self.line {
            write!(f, "Warning at line {}: {}", l, self.message)?;
        } else {
            write!(f, "Warning: {}", self.message)?;
        }
        if let Some(ref sug) = self.suggestion {
            write!(f, " ({})", sug)?;
        }
        Ok(())
    }
}

/// Conversion output with optional warnings
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The converted content
    pub content: String,
    /// Any warnings generated during conversion
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionOutput {
    pub fn new(content: String) -> Self {
        Self {
            content,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(content: String, warnings: Vec<ConversionWarning>) -> Self {
        Self { content, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// Convenience constructors for errors
impl ConversionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConversionError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn table_not_found(requested: impl fmt::Display, available: usize) -> Self {
        ConversionError::TableNotFound {
            requested: requested.to_string(),
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ConversionError::ParseError {
            message: "expected value".to_string(),
            line: Some(3),
            column: Some(7),
        };
        assert_eq!(
            err.to_string(),
            "Parse error at line 3, column 7: expected value"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.html");
        let err = ConversionError::from(io);
        assert!(matches!(err, ConversionError::IoError { .. }));
        assert!(err.to_string().contains("missing.html"));
    }

    #[test]
    fn test_table_not_found() {
        let err = ConversionError::table_not_found("#3", 2);
        assert_eq!(err.to_string(), "Table #3 not found, input has 2 tables");

        let err = ConversionError::table_not_found("#1", 0);
        assert!(err.to_string().starts_with("No table found"));
    }

    #[test]
    fn test_conversion_output() {
        let output = ConversionOutput::new("hello".to_string());
        assert!(!output.has_warnings());

        let output_with_warn = ConversionOutput::with_warnings(
            "hello".to_string(),
            vec![ConversionWarning {
                message: "test warning".to_string(),
                line: Some(1),
                suggestion: None,
            }],
        );
        assert!(output_with_warn.has_warnings());
    }

    #[test]
    fn test_warning_display() {
        let warning = ConversionWarning {
            message: "stopped early".to_string(),
            line: Some(4),
            suggestion: Some("check the markup".to_string()),
        };
        assert_eq!(
            warning.to_string(),
            "Warning at line 4: stopped early (check the markup)"
        );
    }
}
