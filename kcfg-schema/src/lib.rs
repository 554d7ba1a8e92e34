//! # kcfg Schema
//!
//! KDE kcfg XML schema parser and entry resolver.
//!
//! This crate provides:
//! - XML parsing of the kcfg subset used by the converters
//! - Type definitions for schema elements
//! - The convertibility (skip) policy for entries
//! - Intermediate representation with effective keys and typed defaults

pub mod diagnostics;
pub mod error;
pub mod ir;
pub mod parser;
pub mod types;
pub mod validation;

pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::{ParseError, ResolveError};
pub use ir::{
    ResolvePolicy, ResolvedEntry, ResolvedGroup, SchemaIr, TypedScalar, effective_key,
    resolve_default,
};
pub use parser::{parse_schema, parse_schema_file};
pub use types::{
    Argument, Choice, DefaultValue, Emit, Entry, EntryType, FileRef, Group, Schema, Signal,
};
pub use validation::{SkipReason, check_convertible, is_convertible};
