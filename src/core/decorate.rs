//! Class-driven decoration of cell text
//!
//! Each class tag on a cell wraps the text in a LaTeX command. By default the
//! class name itself is the command name; a [`ClassCommands`] table can be
//! injected to rename or drop classes.

use std::fmt;
use std::str::FromStr;

use fxhash::FxHashMap;

use crate::data::constants::REPORT_TAGS;
use crate::utils::error::ConversionError;

/// Explicit class-name to command-name table.
///
/// A class mapped to the empty string is dropped from decoration. Classes
/// that are not in the table are used verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassCommands {
    map: FxHashMap<String, String>,
}

impl ClassCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table that drops the report ranking tags (`first`, `good`, ...)
    pub fn strip_report_tags() -> Self {
        let mut commands = Self::new();
        for tag in REPORT_TAGS.iter() {
            commands.insert(*tag, "");
        }
        commands
    }

    /// Map `class` to `command`; an empty command drops the class
    pub fn insert(&mut self, class: impl Into<String>, command: impl Into<String>) {
        self.map.insert(class.into(), command.into());
    }

    /// Add a `NAME=CMD` mapping
    pub fn push(&mut self, mapping: ClassMapping) {
        self.map.insert(mapping.class, mapping.command);
    }

    pub fn get(&self, class: &str) -> Option<&str> {
        self.map.get(class).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<ClassMapping> for ClassCommands {
    fn from_iter<T: IntoIterator<Item = ClassMapping>>(iter: T) -> Self {
        let mut commands = ClassCommands::new();
        for mapping in iter {
            commands.push(mapping);
        }
        commands
    }
}

/// One `NAME=CMD` entry, as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMapping {
    pub class: String,
    pub command: String,
}

impl FromStr for ClassMapping {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (class, command) = s.split_once('=').ok_or_else(|| {
            ConversionError::invalid(format!("expected NAME=COMMAND, got '{}'", s))
        })?;
        let class = class.trim();
        if class.is_empty() {
            return Err(ConversionError::invalid(format!(
                "empty class name in '{}'",
                s
            )));
        }
        Ok(ClassMapping {
            class: class.to_string(),
            command: command.trim().trim_start_matches('\\').to_string(),
        })
    }
}

impl fmt::Display for ClassMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.class, self.command)
    }
}

/// Wraps text in one command per class
#[derive(Debug, Clone, Default)]
pub struct Decorator {
    commands: Option<ClassCommands>,
}

impl Decorator {
    /// Decorator that uses class names verbatim
    pub fn new() -> Self {
        Self::default()
    }

    /// Decorator that resolves class names through `commands` first
    pub fn with_commands(commands: ClassCommands) -> Self {
        Decorator {
            commands: Some(commands),
        }
    }

    /// Command used for `class`, or `None` when the class is dropped
    pub fn command_for<'a>(&'a self, class: &'a str) -> Option<&'a str> {
        let command = self
            .commands
            .as_ref()
            .and_then(|c| c.get(class))
            .unwrap_or(class);
        (!command.is_empty()).then_some(command)
    }

    /// Wrap `text` in one command per class, in iteration order.
    ///
    /// The last class becomes the outermost command:
    /// classes `[c1, c2]` give `\c2{\c1{text}}`.
    pub fn augment<I, S>(&self, text: &str, classes: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = text.to_string();
        for class in classes {
            if let Some(command) = self.command_for(class.as_ref()) {
                result = format!("\\{}{{{}}}", command, result);
            }
        }
        result
    }
}

/// Decorate with class names used verbatim as command names
pub fn augment<I, S>(text: &str, classes: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Decorator::new().augment(text, classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_classes() {
        assert_eq!(augment("x", Vec::<String>::new()), "x");
    }

    #[test]
    fn test_nesting_order() {
        assert_eq!(augment("x", ["c1", "c2"]), r"\c2{\c1{x}}");
    }

    #[test]
    fn test_mapped_command() {
        let mut commands = ClassCommands::new();
        commands.insert("good", "textcolor{green}");
        let deco = Decorator::with_commands(commands);
        assert_eq!(deco.augment("9", ["good"]), r"\textcolor{green}{9}");
    }

    #[test]
    fn test_unmapped_class_is_verbatim() {
        let mut commands = ClassCommands::new();
        commands.insert("good", "textbf");
        let deco = Decorator::with_commands(commands);
        assert_eq!(deco.augment("x", ["good", "emph"]), r"\emph{\textbf{x}}");
    }

    #[test]
    fn test_empty_mapping_drops_class() {
        let mut commands = ClassCommands::new();
        commands.insert("first", "");
        let deco = Decorator::with_commands(commands);
        assert_eq!(deco.augment("x", ["first", "underline"]), r"\underline{x}");
    }

    #[test]
    fn test_strip_report_tags() {
        let deco = Decorator::with_commands(ClassCommands::strip_report_tags());
        assert_eq!(deco.augment("x", ["good", "first", "emph"]), r"\emph{x}");
    }

    #[test]
    fn test_mapping_from_str() {
        let m: ClassMapping = "good=\\textbf".parse().unwrap();
        assert_eq!(m.class, "good");
        assert_eq!(m.command, "textbf");

        let m: ClassMapping = "bad=".parse().unwrap();
        assert_eq!(m.command, "");

        assert!("good".parse::<ClassMapping>().is_err());
        assert!("=textbf".parse::<ClassMapping>().is_err());
    }
}
