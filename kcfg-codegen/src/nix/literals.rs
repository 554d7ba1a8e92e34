//! Nix literal rendering.

use kcfg_schema::{EntryType, TypedScalar};

/// Renders a Nix double-quoted string literal.
#[must_use]
pub fn string_literal(value: &str) -> String {
    let mut output = String::with_capacity(value.len() + 2);
    output.push('"');
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '$' if chars.peek() == Some(&'{') => output.push_str("\\$"),
            _ => output.push(c),
        }
    }
    output.push('"');
    output
}

/// Renders a finite double as a Nix float literal.
///
/// Nix only reads a float when the mantissa has a decimal point, so
/// exponent forms like `1e20` become `1.0e20`.
#[must_use]
pub fn float_literal(value: f64) -> String {
    let text = format!("{value:?}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{mantissa}.0e{exponent}")
        }
        _ => text,
    }
}

/// Renders a typed default as a Nix literal.
#[must_use]
pub fn scalar_literal(value: &TypedScalar) -> String {
    match value {
        TypedScalar::String(text) | TypedScalar::Enum(text) => string_literal(text),
        TypedScalar::Double(number) => float_literal(*number),
        other => other.to_string(),
    }
}

/// Returns the `lib.types` attribute name for an entry type.
#[must_use]
pub fn nix_type(entry_type: &EntryType) -> &str {
    match entry_type {
        EntryType::Double => "float",
        other => other.target_name(),
    }
}

/// Renders a list of strings as a Nix list literal.
#[must_use]
pub fn list_literal<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "[ ]".to_string();
    }
    let body: Vec<String> = items.iter().map(|s| string_literal(s.as_ref())).collect();
    format!("[ {} ]", body.join(" "))
}
