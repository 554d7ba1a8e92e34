//! kcfg XML schema parser.
//!
//! This module parses the subset of the kcfg format consumed by the
//! converters into the [`Schema`] model. Elements outside that subset are
//! skipped together with their children.

use crate::error::ParseError;
use crate::ir::parse_bool;
use crate::types::{
    Argument, Choice, DefaultValue, Emit, Entry, EntryType, FileRef, Group, Schema, Signal,
};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// Parses a kcfg XML schema from a string.
///
/// # Arguments
/// * `xml` - XML schema content
///
/// # Returns
/// Parsed schema or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, has no root element or
/// carries an invalid `code` attribute on a default.
pub fn parse_schema(xml: &str) -> Result<Schema, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut schema: Option<Schema> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if schema.is_none() => {
                let root = tag_name(e)?;
                schema = Some(parse_root(&mut reader, &root)?);
            }
            Ok(Event::Empty(_)) if schema.is_none() => {
                schema = Some(Schema::new());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let schema = schema.ok_or_else(|| ParseError::InvalidStructure {
        message: "no root element found".to_string(),
    })?;

    tracing::debug!(
        includes = schema.includes.len(),
        files = schema.files.len(),
        signals = schema.signals.len(),
        groups = schema.groups.len(),
        entries = schema.entries().count(),
        "parsed kcfg schema"
    );

    Ok(schema)
}

/// Reads and parses a kcfg XML schema file.
///
/// # Errors
/// Returns `ParseError::Io` if the file cannot be read, or any error of
/// [`parse_schema`].
pub fn parse_schema_file(path: &Path) -> Result<Schema, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    parse_schema(&xml)
}

/// Parses the children of the root element.
fn parse_root(reader: &mut Reader<&[u8]>, root: &str) -> Result<Schema, ParseError> {
    let mut schema = Schema::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = tag_name(e)?;
                match name.as_str() {
                    "include" => {
                        let include = read_text(reader, &name)?;
                        schema.includes.push(include.trim().to_string());
                    }
                    "kcfgfile" => {
                        schema.files.push(FileRef::new(attr_or_empty(e, "name")?));
                        skip_to_end(reader, &name)?;
                    }
                    "signal" => schema.signals.push(parse_signal(reader, e)?),
                    "group" => schema.groups.push(parse_group(reader, e)?),
                    _ => skip_to_end(reader, &name)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = tag_name(e)?;
                match name.as_str() {
                    "include" => schema.includes.push(String::new()),
                    "kcfgfile" => schema.files.push(FileRef::new(attr_or_empty(e, "name")?)),
                    "signal" => schema.signals.push(Signal::new(attr_or_empty(e, "name")?)),
                    "group" => schema.groups.push(Group::new(attr_or_empty(e, "name")?)),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(ParseError::eof(root)),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(schema)
}

/// Parses a signal declaration.
fn parse_signal(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<Signal, ParseError> {
    let mut signal = Signal::new(attr_or_empty(e, "name")?);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = tag_name(e)?;
                if name == "argument" {
                    let type_name = attr_or_empty(e, "type")?;
                    let arg_name = read_text(reader, &name)?;
                    signal.arguments.push(Argument::new(arg_name, type_name));
                } else {
                    skip_to_end(reader, &name)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if tag_name(e)? == "argument" {
                    let type_name = attr_or_empty(e, "type")?;
                    signal.arguments.push(Argument::new("", type_name));
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(ParseError::eof("signal")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(signal)
}

/// Parses a group and its entries.
fn parse_group(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<Group, ParseError> {
    let mut group = Group::new(attr_or_empty(e, "name")?);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = tag_name(e)?;
                if name == "entry" {
                    let mut entry = parse_entry_attributes(e)?;
                    parse_entry_children(reader, &mut entry)?;
                    group.add_entry(entry);
                } else {
                    skip_to_end(reader, &name)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if tag_name(e)? == "entry" {
                    group.add_entry(parse_entry_attributes(e)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(ParseError::eof("group")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(group)
}

/// Parses the attributes of an entry element.
fn parse_entry_attributes(e: &BytesStart<'_>) -> Result<Entry, ParseError> {
    let mut name = String::new();
    let mut key = None;
    let mut entry_type = EntryType::default();

    for attr in e.attributes().flatten() {
        let attr_key = std::str::from_utf8(attr.key.as_ref())?;
        let value = decode_attr(&attr.value)?;

        match attr_key {
            "name" => name = value,
            "key" if !value.is_empty() => key = Some(value),
            "type" => entry_type = EntryType::classify(&value),
            _ => {}
        }
    }

    let mut entry = Entry::new(name, entry_type);
    entry.key = key;
    Ok(entry)
}

/// Parses the children of an entry element.
fn parse_entry_children(reader: &mut Reader<&[u8]>, entry: &mut Entry) -> Result<(), ParseError> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = tag_name(e)?;
                match name.as_str() {
                    "choices" => entry.choices.extend(parse_choices(reader)?),
                    "label" => entry.label = read_text(reader, &name)?.trim().to_string(),
                    "default" => {
                        let code = parse_code_attr(e)?;
                        let value = read_text(reader, &name)?;
                        entry.default = Some(DefaultValue { value, code });
                    }
                    "emit" => {
                        entry.emit = Some(Emit::new(attr_or_empty(e, "signal")?));
                        skip_to_end(reader, &name)?;
                    }
                    _ => skip_to_end(reader, &name)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = tag_name(e)?;
                match name.as_str() {
                    "label" => entry.label = String::new(),
                    "default" => {
                        let code = parse_code_attr(e)?;
                        entry.default = Some(DefaultValue {
                            value: String::new(),
                            code,
                        });
                    }
                    "emit" => entry.emit = Some(Emit::new(attr_or_empty(e, "signal")?)),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(ParseError::eof("entry")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses a `<choices>` block.
fn parse_choices(reader: &mut Reader<&[u8]>) -> Result<Vec<Choice>, ParseError> {
    let mut choices = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = tag_name(e)?;
                if name == "choice" {
                    choices.push(Choice::new(attr_or_empty(e, "name")?));
                }
                // Choice labels and tooltips are not modeled.
                skip_to_end(reader, &name)?;
            }
            Ok(Event::Empty(ref e)) => {
                if tag_name(e)? == "choice" {
                    choices.push(Choice::new(attr_or_empty(e, "name")?));
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(ParseError::eof("choices")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(choices)
}

/// Parses the `code` attribute of a default element.
fn parse_code_attr(e: &BytesStart<'_>) -> Result<bool, ParseError> {
    match find_attr(e, "code")? {
        Some(value) => {
            parse_bool(&value).ok_or_else(|| ParseError::invalid_attr("default", "code", value))
        }
        None => Ok(false),
    }
}

/// Collects the text content of the current element up to its end tag.
///
/// Entity references are resolved, CDATA is taken verbatim and nested
/// elements are skipped. Whitespace is kept as written.
fn read_text(reader: &mut Reader<&[u8]>, element: &str) -> Result<String, ParseError> {
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(ref t)) => {
                let raw = std::str::from_utf8(t.as_ref())?;
                text.push_str(&unescape(raw)?);
            }
            Ok(Event::CData(ref c)) => {
                text.push_str(std::str::from_utf8(c.as_ref())?);
            }
            Ok(Event::GeneralRef(ref r)) => {
                let entity = std::str::from_utf8(r.as_ref())?;
                text.push_str(&unescape(&format!("&{entity};"))?);
            }
            Ok(Event::Start(ref e)) => {
                let name = tag_name(e)?;
                skip_to_end(reader, &name)?;
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(ParseError::eof(element)),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

/// Skips to the end of the current element.
fn skip_to_end(reader: &mut Reader<&[u8]>, element: &str) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => return Err(ParseError::eof(element)),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Returns the local (namespace-free) name of an element.
fn tag_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(e.local_name().as_ref())?.to_string())
}

/// Looks up an attribute and returns its unescaped value.
fn find_attr(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, ParseError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return decode_attr(&attr.value).map(Some);
        }
    }
    Ok(None)
}

/// Looks up an attribute, defaulting to the empty string.
fn attr_or_empty(e: &BytesStart<'_>, name: &str) -> Result<String, ParseError> {
    Ok(find_attr(e, name)?.unwrap_or_default())
}

fn decode_attr(raw: &[u8]) -> Result<String, ParseError> {
    let value = std::str::from_utf8(raw)?;
    Ok(unescape(value)?.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE kcfg SYSTEM "http://www.kde.org/standards/kcfg/1.0/kcfg.dtd">
<kcfg xmlns="http://www.kde.org/standards/kcfg/1.0">
    <include>QColor</include>
    <include>QFont</include>
    <kcfgfile name="examplerc">
        <parameter name="Account"/>
    </kcfgfile>
    <signal name="styleChanged">
        <label>Emitted when the style changes</label>
        <argument type="String">style</argument>
        <argument type="Int">size</argument>
    </signal>
    <group name="General">
        <entry name="Foo" type="Bool">
            <label>Enable foo</label>
            <default>true</default>
        </entry>
        <entry name="Mode" key="mode_key" type="Enum">
            <choices>
                <choice name="Fast"/>
                <choice name="Slow">
                    <label>Slow &amp; steady</label>
                </choice>
            </choices>
            <default>Slow</default>
            <emit signal="styleChanged"/>
        </entry>
        <entry name="X" type="Int">
            <default code="true">someExpr()</default>
        </entry>
        <entry name="Tint" type="Color">
            <whatsthis>A <b>color</b></whatsthis>
        </entry>
    </group>
    <group name="Empty"/>
</kcfg>"#;

    #[test]
    fn test_parse_top_level() {
        let schema = parse_schema(EXAMPLE_SCHEMA).expect("Failed to parse schema");

        assert_eq!(schema.includes, vec!["QColor", "QFont"]);
        assert_eq!(schema.files, vec![FileRef::new("examplerc")]);
        assert_eq!(schema.groups.len(), 2);
        assert_eq!(schema.groups[1].name, "Empty");
        assert!(schema.groups[1].entries.is_empty());
    }

    #[test]
    fn test_parse_signal_arguments_are_inner_text() {
        let schema = parse_schema(EXAMPLE_SCHEMA).expect("Failed to parse schema");

        assert_eq!(schema.signals.len(), 1);
        let signal = &schema.signals[0];
        assert_eq!(signal.name, "styleChanged");
        assert_eq!(
            signal.arguments,
            vec![Argument::new("style", "String"), Argument::new("size", "Int")]
        );
    }

    #[test]
    fn test_parse_entries() {
        let schema = parse_schema(EXAMPLE_SCHEMA).expect("Failed to parse schema");
        let general = schema.get_group("General").unwrap();
        assert_eq!(general.entries.len(), 4);

        let foo = &general.entries[0];
        assert_eq!(foo.name, "Foo");
        assert_eq!(foo.key, None);
        assert_eq!(foo.entry_type, EntryType::Bool);
        assert_eq!(foo.label, "Enable foo");
        assert_eq!(foo.default, Some(DefaultValue::literal("true")));

        let mode = &general.entries[1];
        assert_eq!(mode.key.as_deref(), Some("mode_key"));
        assert_eq!(mode.entry_type, EntryType::Enum);
        let choices: Vec<_> = mode.choices.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(choices, vec!["Fast", "Slow"]);
        assert_eq!(mode.label, "");
        assert_eq!(mode.emit, Some(Emit::new("styleChanged")));

        let x = &general.entries[2];
        assert_eq!(x.default, Some(DefaultValue::code("someExpr()")));

        let tint = &general.entries[3];
        assert_eq!(tint.entry_type, EntryType::Other("color".to_string()));
    }

    #[test]
    fn test_parse_resolves_entities_and_cdata() {
        let xml = r#"<kcfg><group name="G">
            <entry name="S" type="String">
                <label>Fish &amp; chips</label>
                <default><![CDATA[<none>]]></default>
            </entry>
        </group></kcfg>"#;
        let schema = parse_schema(xml).expect("Failed to parse schema");
        let entry = &schema.groups[0].entries[0];
        assert_eq!(entry.label, "Fish & chips");
        assert_eq!(entry.default, Some(DefaultValue::literal("<none>")));
    }

    #[test]
    fn test_parse_keeps_default_and_argument_whitespace() {
        let xml = r#"<kcfg>
            <include>
                QColor
            </include>
            <signal name="changed"><argument type="String"> old value </argument></signal>
            <group name="G">
                <entry name="Sep" type="String">
                    <label>
                        Separator
                    </label>
                    <default> - </default>
                </entry>
                <entry name="Pad" type="String"><default> a &amp; b </default></entry>
            </group>
        </kcfg>"#;
        let schema = parse_schema(xml).expect("Failed to parse schema");

        assert_eq!(schema.includes, vec!["QColor"]);
        assert_eq!(schema.signals[0].arguments[0].name, " old value ");

        let entries = &schema.groups[0].entries;
        assert_eq!(entries[0].label, "Separator");
        assert_eq!(entries[0].default, Some(DefaultValue::literal(" - ")));
        assert_eq!(entries[1].default, Some(DefaultValue::literal(" a & b ")));
    }

    #[test]
    fn test_parse_empty_document_parts() {
        let schema = parse_schema("<kcfg/>").expect("Failed to parse schema");
        assert_eq!(schema, Schema::new());

        let schema = parse_schema("<kcfg></kcfg>").expect("Failed to parse schema");
        assert!(schema.includes.is_empty());
        assert!(schema.groups.is_empty());
    }

    #[test]
    fn test_parse_empty_default_element() {
        let xml = r#"<kcfg><group name="G">
            <entry name="A" type="Int"><default/></entry>
            <entry name="B" type="Int"><default code="true"/></entry>
        </group></kcfg>"#;
        let schema = parse_schema(xml).expect("Failed to parse schema");
        let entries = &schema.groups[0].entries;
        assert_eq!(entries[0].default, Some(DefaultValue::literal("")));
        assert_eq!(entries[1].default, Some(DefaultValue::code("")));
    }

    #[test]
    fn test_parse_invalid_code_attribute() {
        let xml = r#"<kcfg><group name="G">
            <entry name="A" type="Int"><default code="maybe">1</default></entry>
        </group></kcfg>"#;
        let err = parse_schema(xml).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAttribute { .. }));
    }

    #[test]
    fn test_parse_no_root() {
        let err = parse_schema("   ").unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure { .. }));
    }

    #[test]
    fn test_parse_truncated_document() {
        let err =
            parse_schema(r#"<kcfg><group name="G"><entry name="A" type="Int">"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedEof { .. } | ParseError::Xml(_)
        ));
    }

    #[test]
    fn test_parse_mismatched_tags() {
        let err = parse_schema(r#"<kcfg><group name="G"></entry></kcfg>"#).unwrap_err();
        assert!(matches!(err, ParseError::Xml(_)));
    }
}
