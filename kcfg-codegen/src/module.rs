//! Strict module generation.

use crate::error::CodegenError;
use crate::generator::{Convert, GeneratorOptions};
use crate::nix::ModuleContext;
use crate::template::{Template, TemplateMode};
use kcfg_schema::{DiagnosticSink, ResolvePolicy, Schema, SchemaIr};
use std::io::Write;

/// Built-in strict module template.
pub const MODULE_TEMPLATE: &str = include_str!("../templates/module.nix");

/// Generator for option modules.
///
/// A module name is required. Unparseable defaults abort the run unless a
/// different policy is configured, and any template reference to missing
/// data is an error.
#[derive(Debug, Clone, Default)]
pub struct ModuleGenerator {
    options: GeneratorOptions,
}

impl ModuleGenerator {
    /// Creates a new module generator.
    #[must_use]
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    fn policy(&self) -> ResolvePolicy {
        self.options.policy.unwrap_or(ResolvePolicy::FailFast)
    }
}

impl Convert for ModuleGenerator {
    fn convert(
        &self,
        schema: &Schema,
        out: &mut dyn Write,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), CodegenError> {
        let module = self
            .options
            .resolve_module_name(schema)
            .ok_or(CodegenError::MissingModuleName)?;

        let template =
            Template::compile(self.options.template.as_deref().unwrap_or(MODULE_TEMPLATE))?;
        let ir = SchemaIr::resolve(schema, self.policy(), sink)?;
        tracing::debug!(module, entries = ir.entry_count(), "rendering module");

        let context = ModuleContext::new(schema, &ir, Some(module)).to_value()?;
        let output = template.render(&context, TemplateMode::Strict)?;
        out.write_all(output.as_bytes())?;
        Ok(())
    }
}
