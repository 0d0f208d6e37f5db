//! Non-fatal propagation output: symbol-misresolution diagnostics.
//!
//! Distinct from [`crate::error::GraphError`] - a `Diagnostic` is collected
//! into the propagation result, not propagated via `Result`, matching the
//! "does NOT abort propagation" requirement for symbol misresolution.

use serde::{Deserialize, Serialize};

/// A location within a source file, as reported by a declared symbol's
/// `loc` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

/// A single propagation-time finding, e.g. an import naming a symbol its
/// target does not export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub file_path: Option<String>,
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn missing_export(file_path: &str, symbol_name: &str, loc: Option<SourceLocation>) -> Self {
        Self {
            message: format!("{file_path} does not export '{symbol_name}'"),
            file_path: Some(file_path.to_string()),
            location: loc,
        }
    }
}
