//! Converter error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can stop a conversion run.
///
/// These only come out of the pipeline layers (reading files, parsing, validating the project).
/// Translation of individual commands never fails; see [`RuleError`].
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum ConverterError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to access '{path}': {message}")]
    #[diagnostic(code(cy2pw::io::access_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Failed to initialize parser")]
    #[diagnostic(code(cy2pw::parse::init_failed))]
    ParserInitFailed,

    #[error("Failed to parse file: {}", path.display())]
    #[diagnostic(code(cy2pw::parse::parse_failed))]
    ParseFailed {
        path: PathBuf,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration in '{}': {message}", path.display())]
    #[diagnostic(
        code(cy2pw::config::invalid),
        help("cy2pw.json accepts sourceDir, outDir, language, writeReport and skipValidation")
    )]
    InvalidConfig {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Analysis Errors
    // =========================================================================
    #[error("No Cypress spec files found in {}", dir.display())]
    #[diagnostic(
        code(cy2pw::analysis::no_spec_files),
        help("Spec files are named *.cy.js / *.cy.ts or live under e2e/ or integration/")
    )]
    NoSpecFiles {
        dir: PathBuf,
    },

    #[error("Custom command '{name}' is added more than once ({} and {})", first.display(), second.display())]
    #[diagnostic(
        code(cy2pw::analysis::duplicate_custom_command),
        help("Cypress keeps only the last Commands.add; use Commands.overwrite or rename one of them")
    )]
    DuplicateCustomCommand {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    // =========================================================================
    // Frontend Errors
    // =========================================================================
    #[error("Unsupported source language: {language}")]
    #[diagnostic(
        code(cy2pw::frontend::unsupported_language),
        help("The only supported source dialect is 'cypress'")
    )]
    UnsupportedLanguage {
        language: String,
    },
}

impl ConverterError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Failure inside a single mapping rule.
///
/// The translator catches these at its boundary and renders a TODO placeholder,
/// so they never escape `translate`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("{command}() requires argument #{index}")]
    MissingArgument {
        command: &'static str,
        index: usize,
    },

    #[error("{command}() argument #{index} must be {expected}")]
    InvalidArgument {
        command: &'static str,
        index: usize,
        expected: &'static str,
    },
}
