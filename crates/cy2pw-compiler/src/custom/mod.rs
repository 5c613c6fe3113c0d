//! Custom command classification and generation.
//!
//! A Cypress custom command is re-expressed in one of four shapes:
//!
//! | strategy     | output                                              |
//! |--------------|-----------------------------------------------------|
//! | `direct`     | a one-line Playwright statement at each call site   |
//! | `utility`    | `async function name(page: Page, ...)` in helpers   |
//! | `pageObject` | a method on the generated `CustomCommands` class    |
//! | `manual`     | a stub flagged for human review                     |
//!
//! [`classify`] accepts raw source (a `Cypress.Commands.add(...)` registration or a call such as
//! `cy.login('a', 'b')`); [`classify_definition`] accepts a parsed definition. Both are total.

mod extract;
mod lowering;
mod page_object;
mod patterns;
mod then_scan;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ir::CustomCommandDefinition;
use crate::naming::to_identifier;
use crate::tokenizer::tokenize_args;

pub use page_object::{generate_page_object, PAGE_OBJECT_CLASS};
pub use patterns::has_named_pattern;

/// Type import needed by helpers and page objects.
pub const PAGE_TYPE_IMPORT: &str = "import type { Page } from '@playwright/test';";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConversionStrategy {
    Direct,
    Utility,
    PageObject,
    Manual,
}

impl fmt::Display for ConversionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConversionStrategy::Direct => "direct",
            ConversionStrategy::Utility => "utility",
            ConversionStrategy::PageObject => "pageObject",
            ConversionStrategy::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// Always computed from structural signals, never supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTag {
    Low,
    Medium,
    High,
}

impl ComplexityTag {
    /// Tag for a body with `operations` recognized sub-operations.
    pub fn from_operations(operations: usize) -> Self {
        match operations {
            0..=2 => ComplexityTag::Low,
            3..=5 => ComplexityTag::Medium,
            _ => ComplexityTag::High,
        }
    }
}

impl fmt::Display for ComplexityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComplexityTag::Low => "low",
            ComplexityTag::Medium => "medium",
            ComplexityTag::High => "high",
        };
        f.write_str(name)
    }
}

/// Output of [`classify`] and [`classify_definition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub name: String,
    pub strategy: ConversionStrategy,
    pub complexity: ComplexityTag,
    pub generated_code: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub imports: Vec<String>,
}

impl ClassificationResult {
    pub fn new(
        name: impl Into<String>,
        strategy: ConversionStrategy,
        complexity: ComplexityTag,
        generated_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            strategy,
            complexity,
            generated_code: generated_code.into(),
            notes: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Result for input that could not be understood at all.
    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        let mut result = Self::new(
            name,
            ConversionStrategy::Manual,
            ComplexityTag::High,
            format!("// TODO: {error}"),
        );
        result.errors.push(error);
        result
    }

    pub fn is_failure(&self) -> bool {
        !self.errors.is_empty()
    }

    fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    fn warn(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Warns when the command name is not a JavaScript identifier and generated code renames it.
    fn check_identifier(self) -> Self {
        let identifier = to_identifier(&self.name);
        if self.name.is_empty() || identifier == self.name {
            return self;
        }
        let warning = format!(
            "Custom command '{}' is not a valid identifier; generated code calls it '{identifier}'",
            self.name
        );
        self.warn(warning)
    }

    fn import(mut self, import: &str) -> Self {
        if !self.imports.iter().any(|i| i == import) {
            self.imports.push(import.to_string());
        }
        self
    }
}

/// Classifies raw custom command source: a registration or a call expression.
pub fn classify(raw: &str) -> ClassificationResult {
    if let Some(definition) = extract::parse_definition(raw) {
        return match definition {
            Ok(definition) => classify_definition(&definition),
            Err(error) => ClassificationResult::failure("", error),
        };
    }

    let (name, args_text) = match extract::extract_call(raw) {
        Ok(call) => call,
        Err(error) => return ClassificationResult::failure("", error),
    };
    let args = tokenize_args(args_text);
    debug!(command = name, args = args.len(), "classify call");

    let result = match patterns::lookup(name) {
        Some(handler) => handler(name, &args),
        None => patterns::generic(name, &args, None),
    };
    result.check_identifier()
}

/// Classifies a parsed `Cypress.Commands.add` definition.
///
/// A body that lowers cleanly wins. Bodies with unknown constructs fall back to the named
/// pattern for the command (if any) and then to the generic stub.
pub fn classify_definition(definition: &CustomCommandDefinition) -> ClassificationResult {
    let name = definition.name.as_str();
    if !definition.body_text.trim().is_empty() {
        if let Some(lowered) = lowering::lower_definition(definition) {
            debug!(command = name, strategy = %lowered.strategy, "lowered custom command body");
            return lowered.check_identifier();
        }
    }
    let result = match patterns::lookup(name) {
        Some(handler) => handler(name, &definition.parameters).note(format!(
            "Generated from the '{name}' pattern; the original body was not translated"
        )),
        None => patterns::generic(name, &definition.parameters, Some(&definition.body_text)),
    };
    result.check_identifier()
}
