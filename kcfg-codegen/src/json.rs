//! JSON re-serialization of a schema.

use crate::error::CodegenError;
use crate::generator::Convert;
use kcfg_schema::{DiagnosticSink, Schema};
use std::io::Write;

/// Writes the schema as pretty-printed JSON with empty fields omitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonConverter;

impl Convert for JsonConverter {
    fn convert(
        &self,
        schema: &Schema,
        out: &mut dyn Write,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<(), CodegenError> {
        serde_json::to_writer_pretty(&mut *out, schema)?;
        writeln!(out)?;
        Ok(())
    }
}
