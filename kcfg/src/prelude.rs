//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use kcfg::prelude::*;
//! ```

// Schema types
pub use kcfg_schema::{
    Diagnostic, DiagnosticSink, Entry, EntryType, ParseError, ResolveError, ResolvePolicy,
    Schema, SchemaIr, TracingSink, TypedScalar, parse_schema, parse_schema_file,
};

// Generation types
pub use kcfg_codegen::{
    CodegenError, Convert, GeneratorOptions, OutputMode, Template, TemplateMode,
};
