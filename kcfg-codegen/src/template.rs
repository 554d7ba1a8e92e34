//! Logic-less template engine used to stamp out module sources.
//!
//! Templates use a small mustache-like syntax evaluated against a
//! `serde_json::Value` context:
//!
//! - `{{name}}` or `{{a.b}}` inserts a scalar value verbatim
//! - `{{#name}}...{{/name}}` iterates an array, or renders once for any
//!   other truthy value with that value pushed on the context stack
//! - `{{^name}}...{{/name}}` renders when the value is falsy
//! - `{{! comment }}` is dropped
//!
//! Section and comment tags alone on a line remove the whole line.

use crate::error::CodegenError;
use serde_json::Value;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

static NULL: Value = Value::Null;

/// How references to missing data are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateMode {
    /// A reference to a missing variable is an error.
    #[default]
    Strict,
    /// A reference to a missing variable renders as empty.
    Lenient,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Variable(String),
    Section {
        name: String,
        inverted: bool,
        children: Vec<Node>,
    },
}

/// A compiled template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Compiles template source.
    ///
    /// # Errors
    /// Returns `CodegenError::Template` for unterminated tags, empty names
    /// and unbalanced sections.
    pub fn compile(source: &str) -> Result<Self, CodegenError> {
        let mut open_sections: Vec<(String, bool, Vec<Node>)> = Vec::new();
        let mut nodes = Vec::new();
        let mut text = String::new();
        let mut at_line_start = true;
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            text.push_str(&rest[..start]);
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open
                .find(CLOSE)
                .ok_or_else(|| CodegenError::template("unterminated tag"))?;
            let tag = after_open[..end].trim();
            rest = &after_open[end + CLOSE.len()..];

            let sigil = tag.chars().next();
            let mut consumed_line = false;
            if matches!(sigil, Some('#' | '^' | '/' | '!')) {
                if let Some(remaining) = strip_standalone(&mut text, at_line_start, rest) {
                    rest = remaining;
                    consumed_line = true;
                }
            }
            at_line_start = consumed_line;
            flush_text(&mut text, &mut nodes);

            match sigil {
                Some('!') => {}
                Some('#' | '^') => {
                    let name = checked_name(&tag[1..])?;
                    open_sections.push((
                        name.to_string(),
                        sigil == Some('^'),
                        std::mem::take(&mut nodes),
                    ));
                }
                Some('/') => {
                    let name = checked_name(&tag[1..])?;
                    let (open, inverted, parent) = open_sections.pop().ok_or_else(|| {
                        CodegenError::template(format!("unexpected closing tag '{name}'"))
                    })?;
                    if open != name {
                        return Err(CodegenError::template(format!(
                            "section '{open}' closed by '{name}'"
                        )));
                    }
                    let children = std::mem::replace(&mut nodes, parent);
                    nodes.push(Node::Section {
                        name: open,
                        inverted,
                        children,
                    });
                }
                _ => {
                    let name = checked_name(tag)?;
                    nodes.push(Node::Variable(name.to_string()));
                }
            }
        }

        text.push_str(rest);
        flush_text(&mut text, &mut nodes);

        if let Some((name, ..)) = open_sections.last() {
            return Err(CodegenError::template(format!("unclosed section '{name}'")));
        }

        Ok(Self { nodes })
    }

    /// Renders the template against a context.
    ///
    /// # Errors
    /// In [`TemplateMode::Strict`], returns `CodegenError::Template` when a
    /// tag references missing data or a variable tag references an array or
    /// object.
    pub fn render(&self, context: &Value, mode: TemplateMode) -> Result<String, CodegenError> {
        let mut output = String::new();
        let mut stack = vec![context];
        render_nodes(&self.nodes, &mut stack, mode, &mut output)?;
        Ok(output)
    }
}

fn flush_text(text: &mut String, nodes: &mut Vec<Node>) {
    if !text.is_empty() {
        nodes.push(Node::Text(std::mem::take(text)));
    }
}

fn checked_name(raw: &str) -> Result<&str, CodegenError> {
    let name = raw.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(CodegenError::template(format!("invalid tag name '{raw}'")));
    }
    Ok(name)
}

/// Removes the indentation before a standalone tag and the rest of its line.
///
/// Returns the remaining source after the line break, or `None` when the tag
/// shares its line with other content.
fn strip_standalone<'a>(text: &mut String, at_line_start: bool, rest: &'a str) -> Option<&'a str> {
    let line_start = match text.rfind('\n') {
        Some(index) => index + 1,
        None if at_line_start => 0,
        None => return None,
    };
    if !text[line_start..].chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }

    let newline = rest.find('\n');
    let tail = newline.map_or(rest, |index| &rest[..index]);
    if !tail.chars().all(|c| c == ' ' || c == '\t' || c == '\r') {
        return None;
    }

    text.truncate(line_start);
    Some(newline.map_or("", |index| &rest[index + 1..]))
}

fn render_nodes<'a>(
    nodes: &[Node],
    stack: &mut Vec<&'a Value>,
    mode: TemplateMode,
    output: &mut String,
) -> Result<(), CodegenError> {
    for node in nodes {
        match node {
            Node::Text(text) => output.push_str(text),
            Node::Variable(name) => match lookup(stack, name) {
                Some(value) => output.push_str(&scalar_text(name, value, mode)?),
                None => missing(name, mode)?,
            },
            Node::Section {
                name,
                inverted,
                children,
            } => {
                let value = match lookup(stack, name) {
                    Some(value) => value,
                    None => {
                        missing(name, mode)?;
                        &NULL
                    }
                };

                if *inverted {
                    if !is_truthy(value) {
                        render_nodes(children, stack, mode, output)?;
                    }
                } else if let Value::Array(items) = value {
                    for item in items {
                        stack.push(item);
                        render_nodes(children, stack, mode, output)?;
                        stack.pop();
                    }
                } else if is_truthy(value) {
                    stack.push(value);
                    render_nodes(children, stack, mode, output)?;
                    stack.pop();
                }
            }
        }
    }

    Ok(())
}

/// Resolves a dotted name against the context stack, innermost first.
fn lookup<'a>(stack: &[&'a Value], name: &str) -> Option<&'a Value> {
    if name == "." {
        return stack.last().copied();
    }

    let mut segments = name.split('.');
    let first = segments.next()?;
    let mut value = stack.iter().rev().find_map(|&frame| frame.get(first))?;
    for segment in segments {
        value = value.get(segment)?;
    }
    Some(value)
}

fn missing(name: &str, mode: TemplateMode) -> Result<(), CodegenError> {
    match mode {
        TemplateMode::Strict => Err(CodegenError::template(format!(
            "missing variable '{name}'"
        ))),
        TemplateMode::Lenient => {
            tracing::debug!(variable = name, "missing template variable rendered empty");
            Ok(())
        }
    }
}

fn scalar_text(name: &str, value: &Value, mode: TemplateMode) -> Result<String, CodegenError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => match mode {
            TemplateMode::Strict => Err(CodegenError::template(format!(
                "variable '{name}' is not a scalar"
            ))),
            TemplateMode::Lenient => Ok(String::new()),
        },
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(_) | Value::Object(_) => true,
    }
}
