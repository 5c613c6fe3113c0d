//! Command/chain translation.
//!
//! [`translate`] lowers one `cy.<command>(...)` chain to Playwright statements. It dispatches on
//! the shape of the chain:
//!
//! ```text
//! no chained calls                         -> command statement
//! one call, action, ordinary base          -> base locator + action
//! one call, should/and, or url/title base  -> assertion
//! several calls, or intercept/wait/visit   -> ordered statement list
//! ```
//!
//! Every call gets a fresh [`TranslationContext`]; nothing is shared between calls.

mod action;
mod assertion;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::diagnostic::RuleError;
use crate::ir::{ChainedCall, ParsedCommand, Value};
use crate::literal::one_line;
use crate::mapping::{lookup_command, must_execute_first, RuleBody};

use action::{apply_chain, base_locator};
use assertion::{assertion_statement, is_assertion};

/// Prefix for statements that must be awaited.
pub const SUSPENSION: &str = "await ";

/// Joins the statements of one translated chain.
pub const STATEMENT_SEPARATOR: &str = ";\n";

/// The import every generated spec file needs.
pub const PLAYWRIGHT_IMPORT: &str = "import { test, expect } from '@playwright/test';";

/// Per-call accumulator for imports and diagnostics.
#[derive(Debug)]
pub struct TranslationContext {
    required_imports: Vec<String>,
    diagnostics: Vec<String>,
}

impl Default for TranslationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationContext {
    pub fn new() -> Self {
        Self {
            required_imports: vec![PLAYWRIGHT_IMPORT.to_string()],
            diagnostics: Vec::new(),
        }
    }

    /// Adds an import line; duplicates are ignored and first-seen order is kept.
    pub fn require_import(&mut self, import: &str) {
        if !self.required_imports.iter().any(|i| i == import) {
            self.required_imports.push(import.to_string());
        }
    }

    pub fn diagnose(&mut self, message: impl Into<String>) {
        self.diagnostics.push(message.into());
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    fn finish(self, code: String, requires_suspension: bool) -> TranslationResult {
        TranslationResult {
            code,
            requires_suspension,
            imports: self.required_imports,
            diagnostics: self.diagnostics,
        }
    }
}

/// Output of [`translate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub code: String,
    pub requires_suspension: bool,
    pub imports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl TranslationResult {
    /// True when the code is (or contains) a TODO placeholder.
    pub fn has_todo(&self) -> bool {
        self.code.contains("// TODO")
    }
}

/// One rendered statement, before the suspension prefix is applied.
#[derive(Debug)]
struct Emitted {
    code: String,
    suspends: bool,
}

impl Emitted {
    fn new(code: String, suspends: bool) -> Self {
        Self { code, suspends }
    }

    fn todo(what: &str) -> Self {
        Self::new(format!("// TODO: Convert {}", one_line(what)), false)
    }

    fn render(&self) -> String {
        if self.suspends {
            format!("{SUSPENSION}{}", self.code)
        } else {
            self.code.clone()
        }
    }
}

/// Translates one parsed command and its chained calls.
///
/// Never fails: unknown names and rule errors become a `// TODO` line plus a diagnostic.
pub fn translate(command: &ParsedCommand) -> TranslationResult {
    trace!(command = %command.name, chained = command.chained_calls.len(), "translate");
    let mut ctx = TranslationContext::new();
    match lower(command, &mut ctx) {
        Ok(statements) => {
            let requires_suspension = statements.iter().any(|s| s.suspends);
            let code = statements
                .iter()
                .filter(|s| !s.code.is_empty())
                .map(Emitted::render)
                .collect::<Vec<_>>()
                .join(STATEMENT_SEPARATOR);
            ctx.finish(code, requires_suspension)
        }
        Err(err) => {
            ctx.diagnose(format!("Could not convert {}: {err}", command.source_form()));
            let todo = Emitted::todo(&command.source_form());
            ctx.finish(todo.code, false)
        }
    }
}

fn lower(command: &ParsedCommand, ctx: &mut TranslationContext) -> Result<Vec<Emitted>, RuleError> {
    if lookup_command(&command.name).is_none() {
        ctx.diagnose(format!("Unknown command: {}", command.name));
        return Ok(vec![Emitted::todo(&command.source_form())]);
    }
    if command.name == "get" {
        if let Some(alias) = command.args.first().and_then(Value::as_str).and_then(|s| s.strip_prefix('@')) {
            ctx.diagnose(format!(
                "cy.get('@{alias}') reads an alias; it now refers to a variable named '{alias}' that must be declared where the alias was created"
            ));
        }
    }

    match command.chained_calls.as_slice() {
        [] => Ok(vec![command_statement(command, ctx)?]),
        [call] if !must_execute_first(&command.name) => {
            if is_assertion(call) || matches!(command.name.as_str(), "url" | "title") {
                let locator = base_locator(command, ctx)?;
                Ok(vec![assertion_statement(command, &locator, call, ctx)?])
            } else {
                Ok(vec![single_action(command, call, ctx)?])
            }
        }
        _ => multi_statement(command, ctx),
    }
}

/// A command on its own, or the leading statement of a base that must run first.
fn command_statement(command: &ParsedCommand, ctx: &mut TranslationContext) -> Result<Emitted, RuleError> {
    let Some(rule) = lookup_command(&command.name) else {
        ctx.diagnose(format!("Unknown command: {}", command.name));
        return Ok(Emitted::todo(&command.source_form()));
    };
    if command.name == "wait" {
        if let Some(alias) = command.args.first().and_then(Value::as_str).filter(|s| s.starts_with('@')) {
            ctx.diagnose(format!(
                "cy.wait('{alias}') waits on an alias; converted to a network-idle wait, which is an approximation and may need manual adjustment (page.waitForResponse)"
            ));
        }
    }
    for import in rule.imports {
        ctx.require_import(import);
    }
    let code = match rule.body {
        RuleBody::Template(t) => crate::mapping::render_template(t, "", &command.args),
        RuleBody::Transform(f) => f(&command.args)?,
    };
    Ok(Emitted::new(code, rule.requires_suspension))
}

fn single_action(command: &ParsedCommand, call: &ChainedCall, ctx: &mut TranslationContext) -> Result<Emitted, RuleError> {
    let base = base_locator(command, ctx)?;
    let mut locator = base.clone();
    match apply_chain(&mut locator, call, ctx)? {
        Some(emitted) => Ok(emitted),
        // A lone refinement is still a usable expression.
        None if locator != base => Ok(Emitted::new(locator, false)),
        None => Ok(Emitted::new(String::new(), false)),
    }
}

fn multi_statement(command: &ParsedCommand, ctx: &mut TranslationContext) -> Result<Vec<Emitted>, RuleError> {
    let mut statements = Vec::new();
    let mut locator = if must_execute_first(&command.name) {
        statements.push(command_statement(command, ctx)?);
        "page".to_string()
    } else {
        base_locator(command, ctx)?
    };

    for call in &command.chained_calls {
        if is_assertion(call) {
            statements.push(assertion_statement(command, &locator, call, ctx)?);
        } else if let Some(emitted) = apply_chain(&mut locator, call, ctx)? {
            if !emitted.code.is_empty() {
                statements.push(emitted);
            }
        }
    }
    Ok(statements)
}
