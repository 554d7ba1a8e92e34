//! Non-fatal diagnostics raised while resolving entries.
//!
//! Diagnostics never stop a conversion. They are handed to a
//! [`DiagnosticSink`] supplied by the caller, so library code never writes
//! to a process-wide stream directly.

use crate::error::ResolveError;
use crate::validation::SkipReason;
use std::fmt;

/// A non-fatal notice about a single entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The entry's default is code and was not interpreted.
    CodeDefault {
        /// Entry name.
        entry: String,
    },
    /// The entry is not convertible and was left out.
    Skipped {
        /// Entry name.
        entry: String,
        /// Failed convertibility rule.
        reason: SkipReason,
    },
    /// The entry's default could not be parsed and the entry was left out.
    InvalidDefault(ResolveError),
}

impl Diagnostic {
    /// Returns the name of the entry the diagnostic refers to.
    #[must_use]
    pub fn entry(&self) -> &str {
        match self {
            Self::CodeDefault { entry } | Self::Skipped { entry, .. } => entry,
            Self::InvalidDefault(error) => error.entry(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodeDefault { entry } => write!(
                f,
                "{entry}: default values with `code` flag set are not supported"
            ),
            Self::Skipped { entry, reason } => write!(f, "{entry}: skipped, {reason}"),
            Self::InvalidDefault(error) => write!(f, "skipped, {error}"),
        }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    /// Records a diagnostic.
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink that reports diagnostics as `tracing` warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(entry = diagnostic.entry(), "{}", diagnostic);
    }
}
