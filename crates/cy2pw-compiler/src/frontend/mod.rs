//! Source frontends for parsing test suites into IR.
//!
//! Each frontend is responsible for:
//! 1. Discovering spec and support files in a project directory
//! 2. Parsing them into the common IR
//!
//! Translation and code generation only ever see the IR.

pub mod cypress;

use std::path::Path;
use crate::diagnostic::ConverterError;
use crate::ir::ProjectIR;

/// Trait for source frontends.
pub trait Frontend {
    /// Returns the source dialect name (e.g., "cypress").
    fn language(&self) -> &str;

    /// Returns file extensions this frontend handles (e.g., ["js", "ts"]).
    fn extensions(&self) -> &[&str];

    /// Parses all spec and support files in the given directory and returns IR.
    fn parse_directory(&mut self, dir: &Path) -> Result<ProjectIR, ConverterError>;
}

/// Creates a frontend for the given source dialect.
pub fn create_frontend(language: &str) -> Result<Box<dyn Frontend>, ConverterError> {
    match language {
        "cypress" | "cy" => Ok(Box::new(cypress::CypressFrontend::new()?)),
        _ => Err(ConverterError::UnsupportedLanguage {
            language: language.to_string(),
        }),
    }
}
