//! Signatures of the built-in classes, used to seed the symbol table.

use std::path::Path;

use super::SymbolTable;
use crate::diagnostics::CompileError;

const BUILTINS_JSON: &str = include_str!("builtins.json");

/// The built-in classes shipped with the front end (`Obj`, `Int`, `String`,
/// `Boolean`, `Nothing`).
pub fn builtins() -> Result<SymbolTable, CompileError> {
    parse_builtins(BUILTINS_JSON, "embedded builtins")
}

/// Load a replacement builtin table from a JSON file with the same shape as
/// the symbol table output.
pub fn load_builtins(path: &Path) -> Result<SymbolTable, CompileError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CompileError::builtins(format!("cannot read {}: {e}", path.display())))?;
    parse_builtins(&json, &path.display().to_string())
}

fn parse_builtins(json: &str, origin: &str) -> Result<SymbolTable, CompileError> {
    let table: SymbolTable = serde_json::from_str(json)
        .map_err(|e| CompileError::builtins(format!("{origin}: {e}")))?;
    tracing::debug!(classes = table.len(), origin, "loaded builtin signatures");
    Ok(table)
}
