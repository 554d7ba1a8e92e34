//! Intermediate representation for code generation.
//!
//! This module resolves each entry of a parsed schema into the fields the
//! generators consume: the effective key, the target type name and a typed
//! default value. Entries that are not convertible are dropped here.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::ResolveError;
use crate::types::{Entry, EntryType, Schema};
use crate::validation::{SkipReason, check_convertible};
use serde::Serialize;
use std::fmt;

/// Typed default value of an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedScalar {
    /// String value.
    String(String),
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Double(f64),
    /// Enum choice name.
    Enum(String),
}

impl fmt::Display for TypedScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) | Self::Enum(value) => f.write_str(value),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            // Debug keeps the fractional part of whole numbers ("1.0").
            Self::Double(value) => write!(f, "{value:?}"),
        }
    }
}

/// What to do with an entry whose default cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvePolicy {
    /// Abort the whole conversion.
    #[default]
    FailFast,
    /// Leave the entry out and report a diagnostic.
    SkipEntry,
}

/// Parses a boolean literal.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Returns the key the entry is stored under: the key override when set and
/// non-empty, the entry name otherwise.
#[must_use]
pub fn effective_key(entry: &Entry) -> &str {
    entry.key_override().unwrap_or(&entry.name)
}

/// Derives the typed default value of an entry.
///
/// Returns `Ok(None)` when the entry has no default, an empty default, or a
/// code default. Code defaults additionally emit one
/// [`Diagnostic::CodeDefault`] to `sink`.
///
/// String defaults keep their text exactly. Bool, int and double defaults
/// are parsed with surrounding whitespace ignored; integers in base 10
/// only, doubles only when finite. Enum entries with choices always
/// resolve to the first declared choice, whatever the textual default says.
///
/// # Errors
/// Returns `ResolveError::InvalidDefault` if the text does not parse as the
/// declared type, and `ResolveError::UnsupportedType` for unrecognized
/// types.
pub fn resolve_default(
    entry: &Entry,
    sink: &mut dyn DiagnosticSink,
) -> Result<Option<TypedScalar>, ResolveError> {
    let Some(default) = entry.default.as_ref() else {
        return Ok(None);
    };

    if default.code {
        sink.emit(Diagnostic::CodeDefault {
            entry: entry.name.clone(),
        });
        return Ok(None);
    }

    let value = default.value.as_str();
    if value.is_empty() {
        return Ok(None);
    }

    let invalid = || ResolveError::invalid_default(&entry.name, entry.entry_type.as_str(), value);

    let scalar = match &entry.entry_type {
        EntryType::String => TypedScalar::String(value.to_string()),
        EntryType::Bool => TypedScalar::Bool(parse_bool(value.trim()).ok_or_else(invalid)?),
        EntryType::Int => TypedScalar::Int(value.trim().parse::<i64>().map_err(|_| invalid())?),
        EntryType::Double => {
            let number = value.trim().parse::<f64>().map_err(|_| invalid())?;
            if !number.is_finite() {
                return Err(invalid());
            }
            TypedScalar::Double(number)
        }
        EntryType::Enum => match entry.choices.first() {
            Some(first) => TypedScalar::Enum(first.name.clone()),
            None => TypedScalar::Enum(value.to_string()),
        },
        EntryType::Other(type_name) => {
            return Err(ResolveError::UnsupportedType {
                entry: entry.name.clone(),
                type_name: type_name.clone(),
            });
        }
    };

    Ok(Some(scalar))
}

/// Intermediate representation of a schema for code generation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaIr {
    /// Groups with their convertible entries, in document order.
    pub groups: Vec<ResolvedGroup>,
}

impl SchemaIr {
    /// Resolves every entry of a parsed schema.
    ///
    /// Entries that are not convertible are reported to `sink` and left
    /// out. Entries whose default fails to parse either abort the
    /// resolution or are left out, depending on `policy`.
    ///
    /// # Errors
    /// Returns the first `ResolveError` when `policy` is
    /// [`ResolvePolicy::FailFast`].
    pub fn resolve(
        schema: &Schema,
        policy: ResolvePolicy,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, ResolveError> {
        let mut ir = Self::default();

        for group in &schema.groups {
            let mut resolved = ResolvedGroup {
                name: group.name.clone(),
                entries: Vec::new(),
            };

            for entry in &group.entries {
                if let Err(reason) = check_convertible(entry) {
                    let entry = entry.name.clone();
                    sink.emit(match reason {
                        SkipReason::CodeDefault => Diagnostic::CodeDefault { entry },
                        reason => Diagnostic::Skipped { entry, reason },
                    });
                    continue;
                }

                match ResolvedEntry::from_entry(entry, sink) {
                    Ok(resolved_entry) => resolved.entries.push(resolved_entry),
                    Err(error) => match policy {
                        ResolvePolicy::FailFast => return Err(error),
                        ResolvePolicy::SkipEntry => sink.emit(Diagnostic::InvalidDefault(error)),
                    },
                }
            }

            ir.groups.push(resolved);
        }

        Ok(ir)
    }

    /// Iterates over every resolved entry.
    pub fn entries(&self) -> impl Iterator<Item = &ResolvedEntry> {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }

    /// Returns the number of resolved entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }
}

/// Group of resolved entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGroup {
    /// Group name.
    pub name: String,
    /// Convertible entries.
    pub entries: Vec<ResolvedEntry>,
}

/// Resolved entry information.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    /// Schema-level identifier.
    pub name: String,
    /// Effective storage key.
    pub key: String,
    /// Declared type.
    pub entry_type: EntryType,
    /// Human readable description.
    pub label: String,
    /// Choice names, for enum entries.
    pub choices: Vec<String>,
    /// Typed default value.
    pub default: Option<TypedScalar>,
    /// Signal raised on change.
    pub emit: Option<String>,
}

impl ResolvedEntry {
    /// Creates a resolved entry from an entry definition.
    ///
    /// # Errors
    /// Returns the error of [`resolve_default`].
    pub fn from_entry(
        entry: &Entry,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, ResolveError> {
        Ok(Self {
            name: entry.name.clone(),
            key: effective_key(entry).to_string(),
            entry_type: entry.entry_type.clone(),
            label: entry.label.clone(),
            choices: entry.choices.iter().map(|c| c.name.clone()).collect(),
            default: resolve_default(entry, sink)?,
            emit: entry
                .emit
                .as_ref()
                .map(|emit| emit.signal.clone())
                .filter(|signal| !signal.is_empty()),
        })
    }

    /// Returns the type name used in generated modules.
    #[must_use]
    pub fn target_type(&self) -> &str {
        self.entry_type.target_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;
    use crate::types::Group;

    type Resolved = Result<Option<TypedScalar>, ResolveError>;

    fn resolve_one(entry: &Entry) -> (Resolved, Vec<Diagnostic>) {
        let mut sink = Vec::new();
        let result = resolve_default(entry, &mut sink);
        (result, sink)
    }

    #[test]
    fn test_parse_bool_spellings() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        for raw in ["yes", "on", "tRuE", ""] {
            assert_eq!(parse_bool(raw), None, "{raw}");
        }
    }

    #[test]
    fn test_effective_key() {
        let plain = Entry::new("Foo", EntryType::Bool);
        assert_eq!(effective_key(&plain), "Foo");

        let empty = Entry::new("Foo", EntryType::Bool).with_key("");
        assert_eq!(effective_key(&empty), "Foo");

        let keyed = Entry::new("Foo", EntryType::Bool).with_key("foo-key");
        assert_eq!(effective_key(&keyed), "foo-key");
    }

    #[test]
    fn test_absent_default_is_none() {
        for entry_type in [
            EntryType::String,
            EntryType::Bool,
            EntryType::Int,
            EntryType::Double,
            EntryType::Enum,
            EntryType::classify("Color"),
        ] {
            let (result, diagnostics) = resolve_one(&Entry::new("E", entry_type));
            assert_eq!(result, Ok(None));
            assert!(diagnostics.is_empty());
        }
    }

    #[test]
    fn test_empty_default_is_none() {
        let (result, _) = resolve_one(&Entry::new("E", EntryType::Int).with_default(""));
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_code_default_emits_one_diagnostic() {
        let entry = Entry::new("X", EntryType::Int).with_code_default("someExpr()");
        let (result, diagnostics) = resolve_one(&entry);
        assert_eq!(result, Ok(None));
        assert_eq!(
            diagnostics,
            vec![Diagnostic::CodeDefault {
                entry: "X".to_string()
            }]
        );
    }

    #[test]
    fn test_typed_defaults() {
        let cases = [
            (EntryType::String, " spaced ", TypedScalar::String(" spaced ".to_string())),
            (EntryType::Bool, "true", TypedScalar::Bool(true)),
            (EntryType::Bool, "False", TypedScalar::Bool(false)),
            (EntryType::Int, "-42", TypedScalar::Int(-42)),
            (EntryType::Int, "010", TypedScalar::Int(10)),
            (EntryType::Double, "0.5", TypedScalar::Double(0.5)),
            (EntryType::Double, "3", TypedScalar::Double(3.0)),
            (EntryType::Double, "1e20", TypedScalar::Double(1e20)),
            (EntryType::Bool, "\n    true\n  ", TypedScalar::Bool(true)),
            (EntryType::Int, " 7 ", TypedScalar::Int(7)),
            (EntryType::Double, "\t0.5\n", TypedScalar::Double(0.5)),
        ];

        for (entry_type, raw, expected) in cases {
            let entry = Entry::new("E", entry_type).with_default(raw);
            let (result, _) = resolve_one(&entry);
            assert_eq!(result, Ok(Some(expected)), "{raw}");
        }
    }

    #[test]
    fn test_invalid_defaults_are_errors() {
        let cases = [
            (EntryType::Bool, "yes"),
            (EntryType::Int, "0x10"),
            (EntryType::Int, "1.5"),
            (EntryType::Int, "99999999999999999999"),
            (EntryType::Double, "half"),
            (EntryType::Double, "NaN"),
            (EntryType::Double, "inf"),
            (EntryType::Double, "-infinity"),
            (EntryType::Int, "   "),
        ];

        for (entry_type, raw) in cases {
            let type_name = entry_type.as_str().to_string();
            let entry = Entry::new("E", entry_type).with_default(raw);
            let (result, _) = resolve_one(&entry);
            assert_eq!(
                result,
                Err(ResolveError::invalid_default("E", type_name, raw)),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_enum_default_is_first_choice() {
        let entry = Entry::new("Mode", EntryType::Enum)
            .with_choices(["Fast", "Slow"])
            .with_default("Slow");
        let (result, _) = resolve_one(&entry);
        assert_eq!(result, Ok(Some(TypedScalar::Enum("Fast".to_string()))));

        let unknown = Entry::new("Mode", EntryType::Enum)
            .with_choices(["Fast", "Slow"])
            .with_default("Turbo");
        let (result, _) = resolve_one(&unknown);
        assert_eq!(result, Ok(Some(TypedScalar::Enum("Fast".to_string()))));
    }

    #[test]
    fn test_enum_without_choices_keeps_text() {
        let entry = Entry::new("Mode", EntryType::Enum).with_default("Slow");
        let (result, _) = resolve_one(&entry);
        assert_eq!(result, Ok(Some(TypedScalar::Enum("Slow".to_string()))));
    }

    #[test]
    fn test_unsupported_type_with_default() {
        let entry = Entry::new("Tint", EntryType::classify("Color")).with_default("red");
        let (result, _) = resolve_one(&entry);
        assert_eq!(
            result,
            Err(ResolveError::UnsupportedType {
                entry: "Tint".to_string(),
                type_name: "color".to_string(),
            })
        );
    }

    #[test]
    fn test_typed_scalar_display() {
        assert_eq!(TypedScalar::Bool(true).to_string(), "true");
        assert_eq!(TypedScalar::Int(7).to_string(), "7");
        assert_eq!(TypedScalar::Double(1.0).to_string(), "1.0");
        assert_eq!(TypedScalar::Enum("Fast".to_string()).to_string(), "Fast");
    }

    #[test]
    fn test_schema_ir_scenarios() {
        let xml = r#"<kcfg>
            <group name="General">
                <entry name="Foo" type="Bool"><default>true</default></entry>
                <entry name="Mode" type="Enum">
                    <choices><choice name="Fast"/><choice name="Slow"/></choices>
                    <default>Slow</default>
                </entry>
                <entry name="X" type="Int"><default code="true">someExpr()</default></entry>
            </group>
        </kcfg>"#;
        let schema = parse_schema(xml).expect("Failed to parse schema");

        let mut sink = Vec::new();
        let ir = SchemaIr::resolve(&schema, ResolvePolicy::FailFast, &mut sink).unwrap();

        assert_eq!(ir.groups.len(), 1);
        assert_eq!(ir.entry_count(), 2);

        let foo = &ir.groups[0].entries[0];
        assert_eq!(foo.key, "Foo");
        assert_eq!(foo.target_type(), "bool");
        assert_eq!(foo.default, Some(TypedScalar::Bool(true)));

        let mode = &ir.groups[0].entries[1];
        assert_eq!(mode.choices, vec!["Fast", "Slow"]);
        assert_eq!(mode.default, Some(TypedScalar::Enum("Fast".to_string())));

        assert_eq!(
            sink,
            vec![Diagnostic::CodeDefault {
                entry: "X".to_string()
            }]
        );
    }

    #[test]
    fn test_parsed_string_default_is_unchanged() {
        let xml = r#"<kcfg><group name="G">
            <entry name="Sep" type="String"><default> - </default></entry>
            <entry name="Count" type="Int">
                <default>
                    3
                </default>
            </entry>
        </group></kcfg>"#;
        let schema = parse_schema(xml).expect("Failed to parse schema");

        let mut sink = Vec::new();
        let ir = SchemaIr::resolve(&schema, ResolvePolicy::FailFast, &mut sink).unwrap();
        let defaults: Vec<_> = ir.entries().map(|e| e.default.clone()).collect();
        assert_eq!(
            defaults,
            vec![
                Some(TypedScalar::String(" - ".to_string())),
                Some(TypedScalar::Int(3)),
            ]
        );
    }

    #[test]
    fn test_schema_ir_skips_unconvertible() {
        let mut group = Group::new("G");
        group.add_entry(Entry::new("Tint", EntryType::classify("Color")));
        group.add_entry(Entry::new("Mode", EntryType::Enum));
        group.add_entry(Entry::new("Name", EntryType::String).with_key("name"));
        let mut schema = Schema::new();
        schema.groups.push(group);

        let mut sink = Vec::new();
        let ir = SchemaIr::resolve(&schema, ResolvePolicy::FailFast, &mut sink).unwrap();

        let keys: Vec<_> = ir.entries().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["name"]);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].entry(), "Tint");
        assert_eq!(sink[1].entry(), "Mode");
    }

    #[test]
    fn test_schema_ir_policies() {
        let mut group = Group::new("G");
        group.add_entry(Entry::new("Bad", EntryType::Int).with_default("ten"));
        group.add_entry(Entry::new("Good", EntryType::Int).with_default("10"));
        let mut schema = Schema::new();
        schema.groups.push(group);

        let mut sink = Vec::new();
        let err = SchemaIr::resolve(&schema, ResolvePolicy::FailFast, &mut sink).unwrap_err();
        assert_eq!(err.entry(), "Bad");

        let mut sink = Vec::new();
        let ir = SchemaIr::resolve(&schema, ResolvePolicy::SkipEntry, &mut sink).unwrap();
        let names: Vec<_> = ir.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Good"]);
        assert_eq!(
            sink,
            vec![Diagnostic::InvalidDefault(ResolveError::invalid_default(
                "Bad", "int", "ten"
            ))]
        );
    }

    #[test]
    fn test_resolved_entry_emit() {
        let mut entry = Entry::new("Style", EntryType::String);
        entry.emit = Some(crate::types::Emit::new("styleChanged"));
        let mut sink = Vec::new();
        let resolved = ResolvedEntry::from_entry(&entry, &mut sink).unwrap();
        assert_eq!(resolved.emit.as_deref(), Some("styleChanged"));
        assert_eq!(resolved.target_type(), "str");
    }
}
