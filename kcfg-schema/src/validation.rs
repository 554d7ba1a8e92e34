//! Entry convertibility checks.
//!
//! An entry is convertible when its type and default can be represented in
//! generated output. Entries that are not convertible are left out of
//! generated modules; they are not errors.

use crate::types::Entry;
use std::fmt;

/// Reason an entry is not convertible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The declared type is not one of the recognized types.
    UnsupportedType(String),
    /// An enum entry declares no choices.
    EmptyEnum,
    /// The default is code rather than a literal.
    CodeDefault,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType(type_name) => write!(f, "unsupported type '{type_name}'"),
            Self::EmptyEnum => f.write_str("enum has no choices"),
            Self::CodeDefault => f.write_str("default is code"),
        }
    }
}

/// Checks whether an entry is convertible.
///
/// # Errors
/// Returns the first failed rule as a [`SkipReason`].
pub fn check_convertible(entry: &Entry) -> Result<(), SkipReason> {
    if !entry.entry_type.is_recognized() {
        return Err(SkipReason::UnsupportedType(
            entry.entry_type.as_str().to_string(),
        ));
    }

    if entry.entry_type.is_enum() && entry.choices.is_empty() {
        return Err(SkipReason::EmptyEnum);
    }

    if entry.default.as_ref().is_some_and(|default| default.code) {
        return Err(SkipReason::CodeDefault);
    }

    Ok(())
}

/// Returns true if the entry is convertible.
#[must_use]
pub fn is_convertible(entry: &Entry) -> bool {
    check_convertible(entry).is_ok()
}
