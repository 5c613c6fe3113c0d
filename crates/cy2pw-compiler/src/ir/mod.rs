//! Intermediate representation shared by the frontend, the translator and codegen.
//!
//! The frontend turns Cypress source into these values; the translator and the
//! custom-command classifier consume them without mutating them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::diagnostic::Span;
use crate::literal::format_args;

/// A literal argument as it appeared in source.
///
/// Anything the frontend cannot reduce to a string, number or boolean (identifiers,
/// object literals, callbacks, template strings with substitutions) is kept as `Raw`
/// source text and re-emitted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
    Raw { raw: String },
}

impl Value {
    pub fn raw(text: impl Into<String>) -> Self {
        Value::Raw { raw: text.into() }
    }

    /// The string payload, for `Value::String` only.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True for raw function expressions (`($el) => ...`, `function () {...}`).
    pub fn is_callback(&self) -> bool {
        match self {
            Value::Raw { raw } => {
                let raw = raw.trim_start();
                raw.starts_with("function") || raw.starts_with("async") || raw.contains("=>")
            }
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A method invoked on the result of a command (`.click()`, `.should(...)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainedCall {
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl ChainedCall {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// One `cy.<name>(...)` call site with its chained calls in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCommand {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub chained_calls: Vec<ChainedCall>,
}

impl ParsedCommand {
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
            chained_calls: Vec::new(),
        }
    }

    /// Appends a chained call; builder style.
    pub fn chain(mut self, method: impl Into<String>, args: Vec<Value>) -> Self {
        self.chained_calls.push(ChainedCall::new(method, args));
        self
    }

    /// Reconstructs the Cypress call for comments and call-site classification.
    pub fn source_form(&self) -> String {
        let mut out = format!("cy.{}({})", self.name, format_args(&self.args));
        for call in &self.chained_calls {
            out.push_str(&format!(".{}({})", call.method, format_args(&call.args)));
        }
        out
    }
}

/// A user-defined command registered with `Cypress.Commands.add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCommandDefinition {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub body_text: String,
    #[serde(skip)]
    pub span: Option<Span>,
}

impl CustomCommandDefinition {
    pub fn new(name: impl Into<String>, parameters: Vec<String>, body_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters,
            body_text: body_text.into(),
            span: None,
        }
    }
}

/// `.only` / `.skip` on a suite or test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modifier {
    #[default]
    None,
    Only,
    Skip,
}

impl Modifier {
    pub fn from_property(name: &str) -> Option<Self> {
        match name {
            "only" => Some(Modifier::Only),
            "skip" => Some(Modifier::Skip),
            _ => None,
        }
    }
}

/// Mocha hook kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Before,
    BeforeEach,
    After,
    AfterEach,
}

impl HookKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "before" => Some(HookKind::Before),
            "beforeEach" => Some(HookKind::BeforeEach),
            "after" => Some(HookKind::After),
            "afterEach" => Some(HookKind::AfterEach),
            _ => None,
        }
    }
}

/// A statement inside a test or hook body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A `cy.` chain, extracted for translation.
    Command { command: ParsedCommand, span: Span },
    /// Any other statement, dedented source text passed through unchanged.
    Raw { text: String, span: Span },
}

/// Structural node of a spec file.
#[derive(Debug, Clone, PartialEq)]
pub enum TestNode {
    Suite {
        title: Value,
        modifier: Modifier,
        children: Vec<TestNode>,
        span: Span,
    },
    Test {
        title: Value,
        modifier: Modifier,
        body: Vec<Statement>,
        span: Span,
    },
    Hook {
        kind: HookKind,
        body: Vec<Statement>,
        span: Span,
    },
    Statement(Statement),
}

/// One parsed Cypress spec (or support) file.
#[derive(Debug, Clone)]
pub struct SpecFile {
    pub path: PathBuf,
    pub nodes: Vec<TestNode>,
    pub custom_commands: Vec<CustomCommandDefinition>,
}

impl SpecFile {
    /// Counts `cy.` commands in the file, including nested suites.
    pub fn command_count(&self) -> usize {
        fn count(nodes: &[TestNode]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    TestNode::Suite { children, .. } => count(children),
                    TestNode::Test { body, .. } | TestNode::Hook { body, .. } => body
                        .iter()
                        .filter(|s| matches!(s, Statement::Command { .. }))
                        .count(),
                    TestNode::Statement(Statement::Command { .. }) => 1,
                    TestNode::Statement(_) => 0,
                })
                .sum()
        }
        count(&self.nodes)
    }
}

/// Everything the frontend found in a Cypress project directory.
#[derive(Debug)]
pub struct ProjectIR {
    pub spec_files: Vec<SpecFile>,
    pub custom_commands: Vec<CustomCommandDefinition>,
    pub source_dir: PathBuf,
    /// `baseUrl` lifted from cypress.config.* / cypress.json, when present.
    pub base_url: Option<String>,
}

impl ProjectIR {
    pub fn new(source_dir: PathBuf) -> Self {
        Self {
            spec_files: Vec::new(),
            custom_commands: Vec::new(),
            source_dir,
            base_url: None,
        }
    }
}
