//! Command-line interface of the `kcfg` binary.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use kcfg_codegen::{GeneratorOptions, OutputMode};
use kcfg_schema::{DiagnosticSink, ResolvePolicy, parse_schema};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Convert KDE kcfg schemas to JSON and Nix modules.
#[derive(Parser, Debug)]
#[command(name = "kcfg", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the parsed schema as JSON.
    Json(InputArgs),

    /// Generate an option module from the schema.
    Module(GenerateArgs),

    /// Print every convertible entry, then the default settings.
    Summary(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Path to the .kcfg file.
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the .kcfg file.
    pub file: PathBuf,

    /// Module name. Defaults to the schema's config file name.
    #[arg(long)]
    pub module_name: Option<String>,

    /// Template file replacing the built-in template.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// What to do with entries whose default cannot be parsed.
    #[arg(long, value_enum)]
    pub on_error: Option<OnError>,
}

/// Handling of entries whose default cannot be parsed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    /// Abort the run.
    FailFast,
    /// Leave the entry out and report it.
    SkipEntry,
}

impl From<OnError> for ResolvePolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::FailFast => ResolvePolicy::FailFast,
            OnError::SkipEntry => ResolvePolicy::SkipEntry,
        }
    }
}

impl Command {
    /// Output mode selected by the subcommand.
    #[must_use]
    pub fn mode(&self) -> OutputMode {
        match self {
            Self::Json(_) => OutputMode::Json,
            Self::Module(_) => OutputMode::Module,
            Self::Summary(_) => OutputMode::Summary,
        }
    }

    /// Schema file to read.
    #[must_use]
    pub fn input(&self) -> &Path {
        match self {
            Self::Json(args) => &args.file,
            Self::Module(args) | Self::Summary(args) => &args.file,
        }
    }

    /// Builds generator options, loading the template file if one was given.
    ///
    /// # Errors
    /// Returns an error if the template file cannot be read.
    pub fn options(&self) -> anyhow::Result<GeneratorOptions> {
        let mut options = GeneratorOptions::new();
        let (Self::Module(args) | Self::Summary(args)) = self else {
            return Ok(options);
        };

        if let Some(name) = &args.module_name {
            options = options.module_name(name.as_str());
        }
        if let Some(path) = &args.template {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read template {}", path.display()))?;
            options = options.template(source);
        }
        if let Some(on_error) = args.on_error {
            options = options.policy(on_error.into());
        }
        Ok(options)
    }
}

/// Parses the schema named on the command line and writes the converted
/// output to `out`.
///
/// # Errors
/// Returns an error if the schema or template cannot be read, or the
/// conversion fails.
pub fn run(cli: &Cli, out: &mut dyn Write, sink: &mut dyn DiagnosticSink) -> anyhow::Result<()> {
    let command = &cli.command;
    let input = command.input();
    tracing::info!(path = %input.display(), mode = ?command.mode(), "converting schema");

    let xml = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let schema =
        parse_schema(&xml).with_context(|| format!("failed to parse {}", input.display()))?;
    let options = command.options()?;

    command.mode().converter(options).convert(&schema, out, sink)?;
    out.flush()?;
    Ok(())
}
