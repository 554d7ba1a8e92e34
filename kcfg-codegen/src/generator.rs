//! Output strategies.
//!
//! Every output mode is a [`Convert`] implementation over the same parsed
//! schema. [`OutputMode`] selects one of them.

use crate::error::CodegenError;
use crate::json::JsonConverter;
use crate::module::ModuleGenerator;
use crate::summary::SummaryGenerator;
use kcfg_schema::{DiagnosticSink, ResolvePolicy, Schema};
use std::io::Write;

/// A conversion from a parsed schema to output text.
pub trait Convert {
    /// Writes the converted schema to `out`, reporting non-fatal notices to
    /// `sink`.
    ///
    /// # Errors
    /// Returns `CodegenError` if the conversion fails or `out` cannot be
    /// written.
    fn convert(
        &self,
        schema: &Schema,
        out: &mut dyn Write,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), CodegenError>;
}

/// Available output modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Pretty-printed JSON of the schema.
    Json,
    /// Strict module generation.
    Module,
    /// Entry summary followed by lenient settings generation.
    Summary,
}

impl OutputMode {
    /// Builds the converter for this mode.
    #[must_use]
    pub fn converter(self, options: GeneratorOptions) -> Box<dyn Convert> {
        match self {
            Self::Json => Box::new(JsonConverter),
            Self::Module => Box::new(ModuleGenerator::new(options)),
            Self::Summary => Box::new(SummaryGenerator::new(options)),
        }
    }
}

/// Options shared by the template-based generators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Explicit module name.
    pub module_name: Option<String>,
    /// Template source replacing the built-in one.
    pub template: Option<String>,
    /// Policy for defaults that fail to parse; each generator has its own
    /// fallback.
    pub policy: Option<ResolvePolicy>,
}

impl GeneratorOptions {
    /// Creates options with every setting left to the generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the module name.
    #[must_use]
    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = Some(name.into());
        self
    }

    /// Sets the template source.
    #[must_use]
    pub fn template(mut self, source: impl Into<String>) -> Self {
        self.template = Some(source.into());
        self
    }

    /// Sets the default resolution policy.
    #[must_use]
    pub fn policy(mut self, policy: ResolvePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Returns the explicit module name, falling back to the schema's first
    /// config file name.
    #[must_use]
    pub fn resolve_module_name<'a>(&'a self, schema: &'a Schema) -> Option<&'a str> {
        self.module_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| schema.file_name())
    }
}
