//! Entry summary and lenient settings generation.

use crate::error::CodegenError;
use crate::generator::{Convert, GeneratorOptions};
use crate::nix::ModuleContext;
use crate::template::{Template, TemplateMode};
use kcfg_schema::{DiagnosticSink, ResolvePolicy, ResolvedEntry, Schema, SchemaIr};
use std::io::Write;

/// Built-in lenient settings template.
pub const SETTINGS_TEMPLATE: &str = include_str!("../templates/settings.nix");

/// Generator that prints one block per convertible entry, then renders the
/// settings template.
///
/// The module name is optional. Entries with unparseable defaults are left
/// out unless a different policy is configured, and missing template
/// variables render as empty text.
#[derive(Debug, Clone, Default)]
pub struct SummaryGenerator {
    options: GeneratorOptions,
}

impl SummaryGenerator {
    /// Creates a new summary generator.
    #[must_use]
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    fn policy(&self) -> ResolvePolicy {
        self.options.policy.unwrap_or(ResolvePolicy::SkipEntry)
    }
}

/// Writes the summary block of one entry.
///
/// # Errors
/// Returns an IO error if `out` cannot be written.
pub fn write_entry_summary(out: &mut dyn Write, entry: &ResolvedEntry) -> std::io::Result<()> {
    writeln!(out, "Key: {}", entry.key)?;
    writeln!(out, "Type: {}", entry.target_type())?;
    if !entry.choices.is_empty() {
        writeln!(out, "Choices: {}", entry.choices.join(", "))?;
    }
    if let Some(default) = &entry.default {
        writeln!(out, "Default: {default}")?;
    }
    writeln!(out)
}

impl Convert for SummaryGenerator {
    fn convert(
        &self,
        schema: &Schema,
        out: &mut dyn Write,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), CodegenError> {
        let template =
            Template::compile(self.options.template.as_deref().unwrap_or(SETTINGS_TEMPLATE))?;
        let ir = SchemaIr::resolve(schema, self.policy(), sink)?;

        for entry in ir.entries() {
            write_entry_summary(out, entry)?;
        }

        let module = self.options.resolve_module_name(schema);
        let context = ModuleContext::new(schema, &ir, module).to_value()?;
        let output = template.render(&context, TemplateMode::Lenient)?;
        out.write_all(output.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcfg_schema::{Diagnostic, TypedScalar, parse_schema};

    const XML: &str = r#"<kcfg>
        <signal name="changed"><argument type="Int">value</argument></signal>
        <group name="General">
            <entry name="Foo" type="Bool"><default>true</default></entry>
            <entry name="Mode" key="mode" type="Enum">
                <choices><choice name="Fast"/><choice name="Slow"/></choices>
                <default>Slow</default>
            </entry>
            <entry name="Bad" type="Int"><default>ten</default></entry>
            <entry name="Ratio" type="Double"/>
        </group>
    </kcfg>"#;

    fn generate(schema: &Schema, options: GeneratorOptions) -> (String, Vec<Diagnostic>) {
        let mut out = Vec::new();
        let mut sink = Vec::new();
        SummaryGenerator::new(options)
            .convert(schema, &mut out, &mut sink)
            .unwrap();
        (String::from_utf8(out).unwrap(), sink)
    }

    #[test]
    fn test_entry_summary_block() {
        let entry = ResolvedEntry {
            name: "Mode".to_string(),
            key: "mode".to_string(),
            entry_type: kcfg_schema::EntryType::Enum,
            label: String::new(),
            choices: vec!["Fast".to_string(), "Slow".to_string()],
            default: Some(TypedScalar::Enum("Fast".to_string())),
            emit: None,
        };
        let mut out = Vec::new();
        write_entry_summary(&mut out, &entry).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Key: mode\nType: enum\nChoices: Fast, Slow\nDefault: Fast\n\n"
        );
    }

    #[test]
    fn test_summary_then_settings() {
        let schema = parse_schema(XML).unwrap();
        let (output, diagnostics) = generate(&schema, GeneratorOptions::new());

        let expected = r#"Key: Foo
Type: bool
Default: true

Key: mode
Type: enum
Choices: Fast, Slow
Default: Fast

Key: Ratio
Type: double

# Default settings for .
# signal changed( Int value )
{
  "General" = {
    "Foo" = true;
    "mode" = "Fast";
    # "Ratio" has no default
  };
}
"#;
        assert_eq!(output, expected);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].entry(), "Bad");
    }

    #[test]
    fn test_settings_with_module_name() {
        let schema = parse_schema(r#"<kcfg><kcfgfile name="examplerc"/></kcfg>"#).unwrap();
        let (output, _) = generate(&schema, GeneratorOptions::new().module_name("example"));
        assert!(output.starts_with("# Default settings for example (examplerc).\n"));
    }

    #[test]
    fn test_custom_template_is_lenient() {
        let schema = parse_schema(XML).unwrap();
        let options = GeneratorOptions::new().template("[{{module}}|{{nothing.here}}]");
        let (output, _) = generate(&schema, options);
        assert!(output.ends_with("[|]"));
    }

    #[test]
    fn test_fail_fast_policy_override() {
        let schema = parse_schema(XML).unwrap();
        let mut out = Vec::new();
        let mut sink = Vec::new();
        let err = SummaryGenerator::new(GeneratorOptions::new().policy(ResolvePolicy::FailFast))
            .convert(&schema, &mut out, &mut sink)
            .unwrap_err();
        assert!(matches!(err, CodegenError::Resolve(_)));
        assert!(out.is_empty());
    }
}
