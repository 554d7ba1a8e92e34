//! # kcfg
//!
//! Converts KDE kcfg configuration schemas into other representations.
//!
//! ## Features
//!
//! - **JSON** - The parsed schema as pretty-printed JSON
//! - **Option modules** - Nix `mkOption` declarations for every convertible entry
//! - **Summaries** - A readable listing of entries followed by default settings
//!
//! ## Quick Start
//!
//! ```ignore
//! use kcfg::prelude::*;
//!
//! let schema = parse_schema(xml)?;
//! let mut out = Vec::new();
//! OutputMode::Module
//!     .converter(GeneratorOptions::new().module_name("kwin"))
//!     .convert(&schema, &mut out, &mut TracingSink)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Schema model, XML parsing and entry resolution
//! - [`codegen`] - JSON conversion, templates and module generation
//! - [`cli`] - Command-line interface of the `kcfg` binary

pub mod cli;
pub mod prelude;

/// Schema model, XML parsing and entry resolution.
pub mod schema {
    pub use kcfg_schema::*;
}

/// JSON conversion, templates and module generation.
pub mod codegen {
    pub use kcfg_codegen::*;
}
