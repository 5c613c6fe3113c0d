//! Call-site lowering for custom commands.

use std::collections::HashMap;

use tracing::trace;

use crate::custom::{classify, ClassificationResult, ConversionStrategy, PAGE_OBJECT_CLASS, PAGE_TYPE_IMPORT};
use crate::ir::ParsedCommand;
use crate::literal::{format_args, one_line};
use crate::naming::to_identifier;

/// What a lowered call needs imported from the generated support files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperUse {
    Function(String),
    PageObject,
}

/// A custom command call rewritten for a spec file.
#[derive(Debug, Default)]
pub struct LoweredCall {
    pub code: String,
    pub imports: Vec<String>,
    pub helper: Option<HelperUse>,
    pub diagnostics: Vec<String>,
    /// False when the call became a TODO.
    pub converted: bool,
}

impl LoweredCall {
    fn todo(command: &ParsedCommand, diagnostic: String) -> Self {
        Self {
            code: format!("// TODO: Convert {}", one_line(&command.source_form())),
            diagnostics: vec![diagnostic],
            ..Self::default()
        }
    }
}

/// Classified custom commands, by name.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: HashMap<String, ConversionStrategy>,
}

impl CommandRegistry {
    pub fn new(results: &[ClassificationResult]) -> Self {
        let entries = results
            .iter()
            .filter(|r| !r.name.is_empty())
            .map(|r| (r.name.clone(), r.strategy))
            .collect();
        Self { entries }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Lowers a call to a registered custom command; `None` for unregistered names.
    pub fn lower(&self, command: &ParsedCommand) -> Option<LoweredCall> {
        let strategy = *self.entries.get(&command.name)?;
        let name = command.name.as_str();
        let function = to_identifier(name);
        let args = format_args(&command.args);
        trace!(command = name, %strategy, "lower custom command call");

        let mut lowered = match strategy {
            ConversionStrategy::Utility => LoweredCall {
                code: if args.is_empty() {
                    format!("await {function}(page)")
                } else {
                    format!("await {function}(page, {args})")
                },
                helper: Some(HelperUse::Function(function)),
                converted: true,
                ..LoweredCall::default()
            },
            ConversionStrategy::PageObject => LoweredCall {
                code: format!("await new {PAGE_OBJECT_CLASS}(page).{function}({args})"),
                helper: Some(HelperUse::PageObject),
                converted: true,
                ..LoweredCall::default()
            },
            ConversionStrategy::Direct => {
                let site = classify(&ParsedCommand::new(name, command.args.clone()).source_form());
                if site.is_failure() || site.generated_code.trim().is_empty() {
                    let reason = site.errors.first().cloned().unwrap_or_else(|| "nothing to emit".to_string());
                    LoweredCall::todo(command, format!("Could not convert cy.{name}(): {reason}"))
                } else {
                    LoweredCall {
                        code: site.generated_code,
                        imports: site.imports.into_iter().filter(|i| i != PAGE_TYPE_IMPORT).collect(),
                        diagnostics: site.warnings,
                        converted: true,
                        ..LoweredCall::default()
                    }
                }
            }
            ConversionStrategy::Manual => LoweredCall::todo(
                command,
                format!("Custom command '{name}' needs manual conversion; a stub is in support/helpers.ts"),
            ),
        };

        if !command.chained_calls.is_empty() {
            lowered
                .diagnostics
                .push(format!("Calls chained on custom command cy.{name}() were not converted"));
            lowered
                .code
                .push_str(&format!("\n// TODO: Convert {}", one_line(&command.source_form())));
            lowered.converted = false;
        }
        Some(lowered)
    }
}
