//! LaTeX escaping for cell text
//!
//! Only the four characters that break a `tabular` cell in practice are
//! rewritten: `\`, `~`, `&` and `_`. Every occurrence is replaced.

use std::borrow::Cow;

use crate::data::constants::LATEX_ESCAPES;

/// Escape raw text for use inside a LaTeX table cell.
///
/// The rewrite is a single left-to-right pass, so the backslashes introduced
/// by `\&`, `\_` and `\textasciitilde` are never escaped a second time. This
/// is the same result as substituting the backslash before the other three.
///
/// ```rust
/// use tabtex::core::escape::escape;
///
/// assert_eq!(escape(r"a_b & c~d\e"), r"a\_b \& c\textasciitilde d\textbackslash e");
/// ```
pub fn escape(text: &str) -> String {
    escape_cow(text).into_owned()
}

/// Like [`escape`], but borrows when nothing needs rewriting
pub fn escape_cow(text: &str) -> Cow<'_, str> {
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match replacement(ch) {
            Some(rep) => out.push_str(rep),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Whether `ch` is rewritten by [`escape`]
pub fn needs_escape(ch: char) -> bool {
    replacement(ch).is_some()
}

fn replacement(ch: char) -> Option<&'static str> {
    LATEX_ESCAPES
        .iter()
        .find(|(c, _)| *c == ch)
        .map(|(_, rep)| *rep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(escape_cow("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_underscore() {
        assert_eq!(escape("A_B"), r"A\_B");
    }

    #[test]
    fn test_every_occurrence_is_replaced() {
        // Only the first occurrence used to be escaped
        assert_eq!(escape("a_b_c"), r"a\_b\_c");
        assert_eq!(escape("x & y & z"), r"x \& y \& z");
        assert_eq!(escape("~~"), r"\textasciitilde\textasciitilde");
        assert_eq!(escape(r"\\"), r"\textbackslash\textbackslash");
    }

    #[test]
    fn test_backslash_not_double_escaped() {
        assert_eq!(escape(r"\_"), r"\textbackslash\_");
        assert_eq!(escape(r"&\"), r"\&\textbackslash");
        assert!(!escape("&_~").contains("textbackslash"));
    }

    #[test]
    fn test_other_specials_untouched() {
        assert_eq!(escape("50% of $x$ {#}"), "50% of $x$ {#}");
    }

    #[test]
    fn test_unicode_preserved() {
        assert_eq!(escape("α_β"), r"α\_β");
    }

    #[test]
    fn test_empty() {
        assert_eq!(escape(""), "");
    }
}
