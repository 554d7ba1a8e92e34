//! Template data for generated modules.
//!
//! The context pairs the parsed schema with the resolved entries and
//! pre-renders the Nix literals templates need, so templates stay
//! logic-less.

use super::literals::{list_literal, nix_type, scalar_literal, string_literal};
use crate::error::CodegenError;
use kcfg_schema::{ResolvedEntry, ResolvedGroup, Schema, SchemaIr, TypedScalar};
use serde::Serialize;

/// Root template context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleContext {
    /// Module name, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Module name as a Nix string literal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_literal: Option<String>,
    /// Included schema names.
    pub includes: Vec<String>,
    /// Config file names.
    pub files: Vec<String>,
    /// Declared signals.
    pub signals: Vec<SignalContext>,
    /// Groups of convertible entries.
    pub groups: Vec<GroupContext>,
}

/// Signal data.
#[derive(Debug, Clone, Serialize)]
pub struct SignalContext {
    /// Signal name.
    pub name: String,
    /// Arguments in declaration order.
    pub arguments: Vec<ArgumentContext>,
}

/// Signal argument data.
#[derive(Debug, Clone, Serialize)]
pub struct ArgumentContext {
    /// Argument name.
    pub name: String,
    /// Argument type.
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Group data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupContext {
    /// Group name.
    pub name: String,
    /// Group name as a Nix string literal.
    pub name_literal: String,
    /// Convertible entries.
    pub entries: Vec<EntryContext>,
}

/// Entry data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryContext {
    /// Schema-level identifier.
    pub name: String,
    /// Effective key.
    pub key: String,
    /// Same as `key`.
    pub effective_key: String,
    /// Effective key as a Nix string literal.
    pub key_literal: String,
    /// Target type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// `lib.types` attribute name.
    pub nix_type: String,
    /// Schema type name.
    pub schema_type: String,
    /// True for enum entries.
    pub is_enum: bool,
    /// Label text.
    pub label: String,
    /// Label as a Nix string literal.
    pub label_literal: String,
    /// Choice names.
    pub choices: Vec<String>,
    /// Choice names as a Nix list literal.
    pub choice_literals: String,
    /// True when there is at least one choice.
    pub has_choices: bool,
    /// True when the entry has a resolved default.
    pub has_default: bool,
    /// Resolved default as a Nix literal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Resolved default as a typed value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<TypedScalar>,
    /// Signal emitted on change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emit: Option<String>,
}

impl ModuleContext {
    /// Builds the context for a schema and its resolved entries.
    #[must_use]
    pub fn new(schema: &Schema, ir: &SchemaIr, module: Option<&str>) -> Self {
        Self {
            module: module.map(str::to_string),
            module_literal: module.map(string_literal),
            includes: schema.includes.clone(),
            files: schema.files.iter().map(|file| file.name.clone()).collect(),
            signals: schema
                .signals
                .iter()
                .map(|signal| SignalContext {
                    name: signal.name.clone(),
                    arguments: signal
                        .arguments
                        .iter()
                        .map(|arg| ArgumentContext {
                            name: arg.name.clone(),
                            type_name: arg.type_name.clone(),
                        })
                        .collect(),
                })
                .collect(),
            groups: ir.groups.iter().map(GroupContext::from_group).collect(),
        }
    }

    /// Converts the context into a template value.
    ///
    /// # Errors
    /// Returns `CodegenError::Json` if serialization fails.
    pub fn to_value(&self) -> Result<serde_json::Value, CodegenError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl GroupContext {
    fn from_group(group: &ResolvedGroup) -> Self {
        Self {
            name: group.name.clone(),
            name_literal: string_literal(&group.name),
            entries: group.entries.iter().map(EntryContext::from_entry).collect(),
        }
    }
}

impl EntryContext {
    fn from_entry(entry: &ResolvedEntry) -> Self {
        Self {
            name: entry.name.clone(),
            key: entry.key.clone(),
            effective_key: entry.key.clone(),
            key_literal: string_literal(&entry.key),
            type_name: entry.target_type().to_string(),
            nix_type: nix_type(&entry.entry_type).to_string(),
            schema_type: entry.entry_type.as_str().to_string(),
            is_enum: entry.entry_type.is_enum(),
            label: entry.label.clone(),
            label_literal: string_literal(&entry.label),
            choices: entry.choices.clone(),
            choice_literals: list_literal(&entry.choices),
            has_choices: !entry.choices.is_empty(),
            has_default: entry.default.is_some(),
            default: entry.default.as_ref().map(scalar_literal),
            default_value: entry.default.clone(),
            emit: entry.emit.clone(),
        }
    }
}
