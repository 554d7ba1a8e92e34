//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parsing error.
    #[error("schema parse error: {0}")]
    Parse(#[from] kcfg_schema::ParseError),

    /// Default value resolution error.
    #[error("{0}")]
    Resolve(#[from] kcfg_schema::ResolveError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template compilation or rendering error.
    #[error("template error: {message}")]
    Template {
        /// Error message.
        message: String,
    },

    /// No module name was given and the schema declares no config file.
    #[error("no module name: pass --module-name or declare a <kcfgfile name=...> element")]
    MissingModuleName,

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a template error with the given message.
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}
