//! # kcfg Codegen
//!
//! Conversions from KDE kcfg schemas.
//!
//! This crate provides:
//! - JSON re-serialization of the parsed schema
//! - Strict Nix option module generation
//! - Entry summaries with lenient Nix settings generation
//! - The logic-less template engine behind both generators

pub mod error;
pub mod generator;
pub mod json;
pub mod module;
pub mod nix;
pub mod summary;
pub mod template;

pub use error::CodegenError;
pub use generator::{Convert, GeneratorOptions, OutputMode};
pub use json::JsonConverter;
pub use module::ModuleGenerator;
pub use summary::SummaryGenerator;
pub use template::{Template, TemplateMode};

use kcfg_schema::TracingSink;

/// Converts a kcfg XML schema string with the given output mode.
///
/// Diagnostics are reported through `tracing`.
///
/// # Arguments
/// * `xml` - kcfg XML schema content
/// * `mode` - Output mode
/// * `options` - Generator options
///
/// # Returns
/// Generated text as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_xml(
    xml: &str,
    mode: OutputMode,
    options: GeneratorOptions,
) -> Result<String, CodegenError> {
    let schema = kcfg_schema::parse_schema(xml)?;
    let mut out = Vec::new();
    mode.converter(options)
        .convert(&schema, &mut out, &mut TracingSink)?;
    String::from_utf8(out).map_err(|e| CodegenError::generation(e.to_string()))
}

/// Converts a kcfg XML schema file with the given output mode.
///
/// # Arguments
/// * `path` - Path to the kcfg XML schema file
/// * `mode` - Output mode
/// * `options` - Generator options
///
/// # Returns
/// Generated text as a string.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    mode: OutputMode,
    options: GeneratorOptions,
) -> Result<String, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, mode, options)
}
