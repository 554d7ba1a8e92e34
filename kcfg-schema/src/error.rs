//! Error types for schema parsing and default resolution.

use thiserror::Error;

/// Error type for schema parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid escape sequence or entity reference.
    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Document ended inside an open element.
    #[error("unexpected end of document inside element '{element}'")]
    UnexpectedEof {
        /// Element that was still open.
        element: String,
    },

    /// Invalid schema structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Error type for default value resolution.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    /// The textual default cannot be parsed as the declared type.
    #[error("invalid default '{value}' for {type_name} entry '{entry}'")]
    InvalidDefault {
        /// Entry name.
        entry: String,
        /// Declared type name.
        type_name: String,
        /// Raw default text.
        value: String,
    },

    /// The entry's type has no default representation.
    #[error("unsupported type '{type_name}' for entry '{entry}'")]
    UnsupportedType {
        /// Entry name.
        entry: String,
        /// Declared type name.
        type_name: String,
    },
}

impl ParseError {
    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unexpected end-of-document error.
    pub fn eof(element: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            element: element.into(),
        }
    }
}

impl ResolveError {
    /// Creates an invalid default error.
    pub fn invalid_default(
        entry: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidDefault {
            entry: entry.into(),
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    /// Returns the name of the entry the error refers to.
    #[must_use]
    pub fn entry(&self) -> &str {
        match self {
            Self::InvalidDefault { entry, .. } | Self::UnsupportedType { entry, .. } => entry,
        }
    }
}
