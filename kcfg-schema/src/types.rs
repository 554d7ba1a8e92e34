//! Schema type definitions.
//!
//! This module contains the data structures representing the kcfg elements
//! consumed by the converters: includes, config files, signals, groups and
//! their entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete kcfg schema definition.
///
/// Every sequence keeps document order. Missing elements produce empty
/// sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Other schemas referenced by `<include>`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,
    /// Config files declared by `<kcfgfile>`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileRef>,
    /// Signal declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<Signal>,
    /// Entry groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
}

impl Schema {
    /// Creates a new empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first non-empty config file name, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.files
            .first()
            .map(|file| file.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Looks up a group by name.
    #[must_use]
    pub fn get_group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Iterates over every entry of every group, in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&Group, &Entry)> {
        self.groups
            .iter()
            .flat_map(|group| group.entries.iter().map(move |entry| (group, entry)))
    }
}

/// Config file reference (`<kcfgfile name="..."/>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Logical config file name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl FileRef {
    /// Creates a new file reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Signal declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Signal name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Signal arguments in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
}

impl Signal {
    /// Creates a new signal without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }
}

/// Signal argument. The name is the element's inner text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Argument type as written in the schema.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub type_name: String,
}

impl Argument {
    /// Creates a new argument.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Named group of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Group name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Entries in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<Entry>,
}

impl Group {
    /// Creates a new empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Adds an entry to the group.
    pub fn add_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }
}

/// Configuration entry definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Schema-level identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// On-disk key override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Declared type.
    #[serde(rename = "type", default, skip_serializing_if = "EntryType::is_empty")]
    pub entry_type: EntryType,
    /// Legal values for enum entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    /// Human readable description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// Signal raised on change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit: Option<Emit>,
}

impl Entry {
    /// Creates a new entry with the given name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, entry_type: EntryType) -> Self {
        Self {
            name: name.into(),
            entry_type,
            ..Self::default()
        }
    }

    /// Sets the key override.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets a literal default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(DefaultValue::literal(value));
        self
    }

    /// Sets a code default value.
    #[must_use]
    pub fn with_code_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(DefaultValue::code(value));
        self
    }

    /// Appends choices.
    #[must_use]
    pub fn with_choices<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices.extend(names.into_iter().map(Choice::new));
        self
    }

    /// Returns the key override when it is set and non-empty.
    #[must_use]
    pub fn key_override(&self) -> Option<&str> {
        self.key.as_deref().filter(|key| !key.is_empty())
    }
}

/// Enum choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Choice name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl Choice {
    /// Creates a new choice.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Default value of an entry. The value is the element's inner text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultValue {
    /// Raw default text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    /// True when the value is code rather than a literal.
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
}

impl DefaultValue {
    /// Creates a literal default.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            code: false,
        }
    }

    /// Creates a code default.
    #[must_use]
    pub fn code(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            code: true,
        }
    }
}

/// Signal emitted when an entry changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emit {
    /// Referenced signal name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signal: String,
}

impl Emit {
    /// Creates a new emit reference.
    #[must_use]
    pub fn new(signal: impl Into<String>) -> Self {
        Self {
            signal: signal.into(),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// kcfg entry types.
///
/// Unrecognized type names are kept as [`EntryType::Other`] so that parsing
/// never fails on them; such entries are rejected later by the skip policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// Floating point.
    Double,
    /// One of a fixed list of choices.
    Enum,
    /// Any other type name, lowercased.
    Other(String),
}

impl Default for EntryType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl EntryType {
    /// Classifies a raw type name. Matching is case-insensitive.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        match lower.as_str() {
            "string" => Self::String,
            "bool" => Self::Bool,
            "int" => Self::Int,
            "double" => Self::Double,
            "enum" => Self::Enum,
            _ => Self::Other(lower),
        }
    }

    /// Returns the normalized schema type name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::Enum => "enum",
            Self::Other(name) => name,
        }
    }

    /// Returns the type name used in generated modules.
    ///
    /// `string` is not a primitive in the target language and becomes `str`.
    #[must_use]
    pub fn target_name(&self) -> &str {
        match self {
            Self::String => "str",
            other => other.as_str(),
        }
    }

    /// Returns true for the five recognized types.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Returns true if this is the enum type.
    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self, Self::Enum)
    }

    fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl From<String> for EntryType {
    fn from(raw: String) -> Self {
        Self::classify(&raw)
    }
}

impl From<EntryType> for String {
    fn from(entry_type: EntryType) -> Self {
        entry_type.as_str().to_string()
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
