//! Nix module generation support.

pub mod context;
pub mod literals;

pub use context::ModuleContext;
pub use literals::{float_literal, list_literal, nix_type, scalar_literal, string_literal};
