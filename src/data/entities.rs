//! HTML character entity references
//!
//! Covers the XML built-ins plus the named entities that commonly show up in
//! generated report tables. Numeric references are decoded directly.

use std::borrow::Cow;

use phf::phf_map;
use quick_xml::escape::{unescape_with, EscapeError};

/// Named entity to replacement text
pub static HTML_ENTITIES: phf::Map<&'static str, &'static str> = phf_map! {
    // XML built-ins
    "amp" => "&",
    "lt" => "<",
    "gt" => ">",
    "quot" => "\"",
    "apos" => "'",

    // Spacing and punctuation
    "nbsp" => "\u{a0}",
    "ensp" => "\u{2002}",
    "emsp" => "\u{2003}",
    "thinsp" => "\u{2009}",
    "shy" => "\u{ad}",
    "ndash" => "\u{2013}",
    "mdash" => "\u{2014}",
    "hellip" => "\u{2026}",
    "laquo" => "\u{ab}",
    "raquo" => "\u{bb}",
    "lsquo" => "\u{2018}",
    "rsquo" => "\u{2019}",
    "ldquo" => "\u{201c}",
    "rdquo" => "\u{201d}",
    "bull" => "\u{2022}",
    "middot" => "\u{b7}",
    "sect" => "\u{a7}",
    "para" => "\u{b6}",
    "copy" => "\u{a9}",
    "reg" => "\u{ae}",
    "trade" => "\u{2122}",
    "deg" => "\u{b0}",
    "tilde" => "\u{2dc}",

    // Math
    "times" => "\u{d7}",
    "divide" => "\u{f7}",
    "plusmn" => "\u{b1}",
    "minus" => "\u{2212}",
    "le" => "\u{2264}",
    "ge" => "\u{2265}",
    "ne" => "\u{2260}",
    "asymp" => "\u{2248}",
    "infin" => "\u{221e}",
    "micro" => "\u{b5}",
    "permil" => "\u{2030}",
    "sup2" => "\u{b2}",
    "sup3" => "\u{b3}",
    "frac12" => "\u{bd}",
    "frac14" => "\u{bc}",
    "frac34" => "\u{be}",
    "larr" => "\u{2190}",
    "rarr" => "\u{2192}",
    "uarr" => "\u{2191}",
    "darr" => "\u{2193}",
    "check" => "\u{2713}",
    "cross" => "\u{2717}",

    // Greek letters used in result tables
    "alpha" => "\u{3b1}",
    "beta" => "\u{3b2}",
    "gamma" => "\u{3b3}",
    "delta" => "\u{3b4}",
    "epsilon" => "\u{3b5}",
    "lambda" => "\u{3bb}",
    "mu" => "\u{3bc}",
    "pi" => "\u{3c0}",
    "sigma" => "\u{3c3}",
    "tau" => "\u{3c4}",
    "phi" => "\u{3c6}",
    "omega" => "\u{3c9}",
    "Delta" => "\u{394}",
    "Sigma" => "\u{3a3}",
    "Omega" => "\u{3a9}",

    // Currency
    "euro" => "\u{20ac}",
    "pound" => "\u{a3}",
    "yen" => "\u{a5}",
    "cent" => "\u{a2}",
};

/// Decode the body of an entity reference (the part between `&` and `;`).
///
/// Returns `None` for unknown names and invalid code points.
pub fn decode_entity(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_entity(name).map(str::to_string)
}

/// Resolve a named reference through [`HTML_ENTITIES`]
pub fn resolve_entity(name: &str) -> Option<&'static str> {
    HTML_ENTITIES.get(name).copied()
}

/// Replace every `&name;` reference in `text`.
///
/// Unknown, malformed or unterminated references are kept as written and
/// decoding carries on after them.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    match unescape_with(text, resolve_entity) {
        Ok(decoded) => decoded,
        Err(err) => Cow::Owned(decode_lenient(text, err)),
    }
}

fn decode_lenient(text: &str, first: EscapeError) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut err = first;

    loop {
        let Some(amp) = failed_reference(rest, &err) else {
            out.push_str(rest);
            return out;
        };
        // Everything before the failed reference decodes cleanly
        match unescape_with(&rest[..amp], resolve_entity) {
            Ok(decoded) => out.push_str(&decoded),
            Err(_) => out.push_str(&rest[..amp]),
        }
        out.push('&');
        rest = &rest[amp + 1..];

        match unescape_with(rest, resolve_entity) {
            Ok(decoded) => {
                out.push_str(&decoded);
                return out;
            }
            Err(next) => err = next,
        }
    }
}

/// Byte offset of the `&` that starts the reference `err` complains about
fn failed_reference(text: &str, err: &EscapeError) -> Option<usize> {
    match err {
        EscapeError::UnrecognizedEntity(range, _) | EscapeError::UnterminatedEntity(range) => {
            let end = (range.start + 1).min(text.len());
            text.as_bytes()[..end].iter().rposition(|&b| b == b'&')
        }
        // Character references carry no position; find the first one that
        // does not decode
        _ => text.match_indices("&#").map(|(i, _)| i).find(|&i| {
            let body = &text[i + 1..];
            body.find(';')
                .map_or(true, |end| decode_entity(&body[..end]).is_none())
        }),
    }
}
