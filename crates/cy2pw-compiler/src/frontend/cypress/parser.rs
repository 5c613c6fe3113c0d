//! Cypress spec parser using tree-sitter.
//!
//! JavaScript and TypeScript specs both go through the TypeScript grammar. Mocha structure
//! (`describe`/`it`/hooks) becomes [`TestNode`]s, `cy.` chains become [`ParsedCommand`]s, and
//! everything else is carried through as dedented source text.

use std::path::Path;
use tree_sitter::{Node, Parser};

use crate::diagnostic::{ConverterError, Span};
use crate::ir::{
    ChainedCall, CustomCommandDefinition, HookKind, Modifier, ParsedCommand, SpecFile, Statement, TestNode, Value,
};
use crate::literal::{strip_quotes, unescape};

/// Node kinds that make a custom command body conditional or repetitive.
const BRANCHING_KINDS: &[&str] = &[
    "if_statement",
    "switch_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "ternary_expression",
];

/// Loose statements parsed outside of any spec structure.
#[derive(Debug, Default)]
pub struct Snippet {
    pub statements: Vec<Statement>,
    /// The text contains a conditional or a loop anywhere, including nested callbacks.
    pub branching: bool,
}

/// Cypress parser.
pub struct CypressParser {
    parser: Parser,
}

impl CypressParser {
    /// Creates a new Cypress parser.
    pub fn new() -> Result<Self, ConverterError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|_| ConverterError::ParserInitFailed)?;
        Ok(Self { parser })
    }

    /// Parses one spec or support file.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<SpecFile, ConverterError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ConverterError::ParseFailed { path: path.to_path_buf() })?;

        let root = tree.root_node();
        if root.has_error() {
            tracing::warn!(path = %path.display(), "syntax errors in source; unparsed regions are kept as text");
        }

        let mut visitor = Visitor::new(source, path);
        let nodes = visitor.visit_block(root);

        Ok(SpecFile {
            path: path.to_path_buf(),
            nodes,
            custom_commands: visitor.custom_commands,
        })
    }

    /// Parses statements that are not wrapped in a spec, such as a custom command body.
    pub fn parse_snippet(&mut self, text: &str) -> Result<Snippet, ConverterError> {
        let path = Path::new("<snippet>");
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| ConverterError::ParseFailed { path: path.to_path_buf() })?;
        let root = tree.root_node();

        let visitor = Visitor::new(text, path);
        let mut statements = Vec::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            statements.push(visitor.visit_statement(child));
        }

        Ok(Snippet {
            statements,
            branching: contains_kind(root, BRANCHING_KINDS),
        })
    }
}

/// Walks the tree for the spec structure and custom command registrations.
struct Visitor<'a> {
    source: &'a str,
    path: &'a Path,
    custom_commands: Vec<CustomCommandDefinition>,
}

impl<'a> Visitor<'a> {
    fn new(source: &'a str, path: &'a Path) -> Self {
        Self {
            source,
            path,
            custom_commands: Vec::new(),
        }
    }

    fn span(&self, node: Node) -> Span {
        Span::new(
            self.path.to_path_buf(),
            node.start_position().row,
            node.start_position().column,
            node.end_position().row,
            node.end_position().column,
        )
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Source text of `node` with continuation lines shifted left by its start column.
    fn dedented_text(&self, node: Node) -> String {
        dedent(self.node_text(node), node.start_position().column)
    }

    /// Visits the statements of a program or a `describe` callback body.
    fn visit_block(&mut self, node: Node) -> Vec<TestNode> {
        let mut nodes = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_statement" if self.is_cypress_import(child) => {}
                "comment" if self.node_text(child).starts_with("/// <reference") => {}
                "expression_statement" => {
                    if let Some(node) = self.visit_structural(child) {
                        nodes.push(node);
                    }
                }
                _ => nodes.push(TestNode::Statement(self.raw(child))),
            }
        }
        nodes
    }

    /// Support-file imports only register commands and plugins; Playwright has no use for them.
    fn is_cypress_import(&self, node: Node) -> bool {
        let Some(source) = node.child_by_field_name("source") else {
            return false;
        };
        let module = strip_quotes(self.node_text(source));
        module.starts_with("cypress")
            || module.starts_with("@cypress/")
            || module.starts_with("@testing-library/cypress")
            || matches!(module, "./commands" | "./commands.js" | "./commands.ts")
    }

    /// An expression statement at block level: a suite, test, hook, registration or plain statement.
    fn visit_structural(&mut self, statement: Node) -> Option<TestNode> {
        let Some(call) = expression_of(statement).filter(|e| e.kind() == "call_expression") else {
            return Some(TestNode::Statement(self.raw(statement)));
        };
        let callee = call.child_by_field_name("function")?;
        let callee_text: String = self.node_text(callee).split_whitespace().collect();

        if matches!(callee_text.as_str(), "Cypress.Commands.add" | "Cypress.Commands.overwrite") {
            if let Some(definition) = self.visit_command_definition(call) {
                self.custom_commands.push(definition);
            }
            return None;
        }

        let (base, modifier) = match callee_text.split_once('.') {
            Some((base, property)) => match Modifier::from_property(property) {
                Some(modifier) => (base, modifier),
                None => return Some(TestNode::Statement(self.visit_statement(statement))),
            },
            None => (callee_text.as_str(), Modifier::None),
        };

        let args = call.child_by_field_name("arguments")?;
        let arg_nodes = named_args(args);
        let callback = arg_nodes.last().copied().filter(|n| is_function(*n));

        match (base, callback) {
            ("describe" | "context", Some(callback)) => {
                let title = arg_nodes.first().map(|n| self.value_of(*n)).unwrap_or(Value::raw("''"));
                let children = match callback.child_by_field_name("body") {
                    Some(body) if body.kind() == "statement_block" => self.visit_block(body),
                    _ => Vec::new(),
                };
                Some(TestNode::Suite {
                    title,
                    modifier,
                    children,
                    span: self.span(statement),
                })
            }
            ("it" | "specify", Some(callback)) => {
                let title = arg_nodes.first().map(|n| self.value_of(*n)).unwrap_or(Value::raw("''"));
                Some(TestNode::Test {
                    title,
                    modifier,
                    body: self.visit_callback_body(callback),
                    span: self.span(statement),
                })
            }
            (hook, Some(callback)) if modifier == Modifier::None => match HookKind::from_name(hook) {
                Some(kind) => Some(TestNode::Hook {
                    kind,
                    body: self.visit_callback_body(callback),
                    span: self.span(statement),
                }),
                None => Some(TestNode::Statement(self.visit_statement(statement))),
            },
            _ => Some(TestNode::Statement(self.visit_statement(statement))),
        }
    }

    /// Statements of a test or hook callback.
    fn visit_callback_body(&self, callback: Node) -> Vec<Statement> {
        let Some(body) = callback.child_by_field_name("body") else {
            return Vec::new();
        };
        if body.kind() != "statement_block" {
            // `it('x', () => cy.visit('/'))`
            return vec![self.visit_expression(body)];
        }
        let mut statements = Vec::new();
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            statements.push(self.visit_statement(child));
        }
        statements
    }

    fn visit_statement(&self, node: Node) -> Statement {
        match expression_of(node) {
            Some(expression) => match self.unwind_chain(expression) {
                Some(command) => Statement::Command {
                    command,
                    span: self.span(node),
                },
                None => self.raw(node),
            },
            None => self.raw(node),
        }
    }

    fn visit_expression(&self, node: Node) -> Statement {
        match self.unwind_chain(node) {
            Some(command) => Statement::Command {
                command,
                span: self.span(node),
            },
            None => Statement::Raw {
                text: format!("{};", self.dedented_text(node)),
                span: self.span(node),
            },
        }
    }

    fn raw(&self, node: Node) -> Statement {
        Statement::Raw {
            text: self.dedented_text(node),
            span: self.span(node),
        }
    }

    /// Unwinds `cy.a(...).b(...).c(...)` from the outermost call down to `cy`.
    fn unwind_chain(&self, node: Node) -> Option<ParsedCommand> {
        let mut calls = Vec::new();
        let mut current = node;
        loop {
            if current.kind() != "call_expression" {
                return None;
            }
            let function = current.child_by_field_name("function")?;
            let arguments = current.child_by_field_name("arguments")?;
            if function.kind() != "member_expression" {
                return None;
            }
            let object = function.child_by_field_name("object")?;
            let property = function.child_by_field_name("property")?;
            let args = named_args(arguments).into_iter().map(|n| self.value_of(n)).collect();
            calls.push(ChainedCall::new(self.node_text(property), args));

            if object.kind() == "identifier" && self.node_text(object) == "cy" {
                break;
            }
            current = object;
        }

        calls.reverse();
        let mut calls = calls.into_iter();
        let base = calls.next()?;
        Some(ParsedCommand {
            name: base.method,
            args: base.args,
            chained_calls: calls.collect(),
        })
    }

    /// `Cypress.Commands.add(name, [options,] fn)`.
    fn visit_command_definition(&self, call: Node) -> Option<CustomCommandDefinition> {
        let args = named_args(call.child_by_field_name("arguments")?);
        let name = match self.value_of(*args.first()?) {
            Value::String(name) => name,
            _ => return None,
        };
        let function = args.last().copied().filter(|n| is_function(*n))?;

        let parameters = match function.child_by_field_name("parameters") {
            Some(params) => {
                let mut cursor = params.walk();
                params
                    .named_children(&mut cursor)
                    .filter(|p| p.kind() != "comment")
                    .map(|p| {
                        let pattern = p.child_by_field_name("pattern").unwrap_or(p);
                        self.node_text(pattern).to_string()
                    })
                    .collect()
            }
            // `name => ...`
            None => function
                .child_by_field_name("parameter")
                .map(|p| vec![self.node_text(p).to_string()])
                .unwrap_or_default(),
        };

        let body_text = match function.child_by_field_name("body") {
            Some(body) if body.kind() == "statement_block" => {
                let inner = self.node_text(body);
                let inner = inner.strip_prefix('{').and_then(|s| s.strip_suffix('}')).unwrap_or(inner);
                dedent_block(inner)
            }
            Some(body) => self.node_text(body).to_string(),
            None => String::new(),
        };

        Some(CustomCommandDefinition {
            name,
            parameters,
            body_text,
            span: Some(self.span(call)),
        })
    }

    /// Maps an argument node to a literal value, or keeps its source text.
    fn value_of(&self, node: Node) -> Value {
        let text = self.node_text(node);
        match node.kind() {
            "string" => Value::String(unescape(strip_quotes(text))),
            "template_string" if !contains_kind(node, &["template_substitution"]) => {
                Value::String(unescape(strip_quotes(text)))
            }
            "number" | "unary_expression" => match text.replace('_', "").parse::<f64>() {
                Ok(n) => Value::Number(n),
                Err(_) => Value::raw(text),
            },
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::raw(text),
        }
    }
}

/// The expression inside an `expression_statement`.
fn expression_of(statement: Node) -> Option<Node> {
    if statement.kind() != "expression_statement" {
        return None;
    }
    statement.named_child(0)
}

fn named_args(arguments: Node) -> Vec<Node> {
    let mut cursor = arguments.walk();
    arguments
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

fn is_function(node: Node) -> bool {
    matches!(node.kind(), "arrow_function" | "function_expression" | "function")
}

/// True if `node` or any descendant has one of `kinds`.
fn contains_kind(node: Node, kinds: &[&str]) -> bool {
    let mut cursor = node.walk();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if kinds.contains(&current.kind()) {
            return true;
        }
        stack.extend(current.children(&mut cursor));
    }
    false
}

/// Strips up to `column` leading spaces from every line after the first.
fn dedent(text: &str, column: usize) -> String {
    let mut lines = text.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        let indent = line.len() - line.trim_start().len();
        out.push_str(&line[indent.min(column)..]);
    }
    out
}

/// Removes the common leading indentation of a block body and trims blank edges.
fn dedent_block(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    text.lines()
        .map(|l| if l.len() >= indent { &l[indent..] } else { l.trim_start() })
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SpecFile {
        CypressParser::new().unwrap().parse(source, Path::new("login.cy.ts")).unwrap()
    }

    #[test]
    fn test_structure() {
        let spec = parse(
            r#"/// <reference types="cypress" />
describe('Login', () => {
  beforeEach(() => {
    cy.visit('/login');
  });

  it.only('signs in', () => {
    cy.get('#email').type('user@example.com');
    cy.get('[data-testid="submit"]').click();
  });

  context.skip('nested', () => {
    specify('works', () => {});
  });
});
"#,
        );
        assert_eq!(spec.nodes.len(), 1);
        let TestNode::Suite { title, children, .. } = &spec.nodes[0] else {
            panic!("expected suite");
        };
        assert_eq!(title, &Value::String("Login".into()));
        assert_eq!(children.len(), 3);
        assert!(matches!(&children[0], TestNode::Hook { kind: HookKind::BeforeEach, body, .. } if body.len() == 1));
        let TestNode::Test { modifier, body, .. } = &children[1] else {
            panic!("expected test");
        };
        assert_eq!(*modifier, Modifier::Only);
        let Statement::Command { command, .. } = &body[0] else {
            panic!("expected command");
        };
        assert_eq!(command.source_form(), "cy.get('#email').type('user@example.com')");
        assert!(matches!(&children[2], TestNode::Suite { modifier: Modifier::Skip, .. }));
        assert_eq!(spec.command_count(), 3);
    }

    #[test]
    fn test_argument_values() {
        let spec = parse("it('x', () => { cy.viewport(1280, 720); cy.get(sel, { timeout: 500 }).should('have.length', -1); cy.log(`hi`, true); });");
        let TestNode::Test { body, .. } = &spec.nodes[0] else {
            panic!("expected test");
        };
        let commands: Vec<&ParsedCommand> = body
            .iter()
            .filter_map(|s| match s {
                Statement::Command { command, .. } => Some(command),
                _ => None,
            })
            .collect();
        assert_eq!(commands[0].args, vec![Value::Number(1280.0), Value::Number(720.0)]);
        assert_eq!(commands[1].args, vec![Value::raw("sel"), Value::raw("{ timeout: 500 }")]);
        assert_eq!(commands[1].chained_calls[0].args[1], Value::Number(-1.0));
        assert_eq!(commands[2].args, vec![Value::String("hi".into()), Value::Bool(true)]);
    }

    #[test]
    fn test_raw_statements_are_dedented() {
        let spec = parse("it('x', () => {\n    const user = {\n      name: 'a',\n    };\n});");
        let TestNode::Test { body, .. } = &spec.nodes[0] else {
            panic!("expected test");
        };
        assert_eq!(
            body[0],
            Statement::Raw {
                text: "const user = {\n  name: 'a',\n};".into(),
                span: Span::new("login.cy.ts".into(), 1, 4, 3, 6),
            }
        );
    }

    #[test]
    fn test_custom_command_definition() {
        let spec = parse(
            r#"import './commands';
Cypress.Commands.add('login', (email: string, password) => {
  cy.get('#email').type(email);
  cy.get('#password').type(password);
});
Cypress.Commands.add('dismiss', { prevSubject: 'element' }, subject => cy.wrap(subject).click());
"#,
        );
        assert!(spec.nodes.is_empty());
        assert_eq!(spec.custom_commands.len(), 2);
        let login = &spec.custom_commands[0];
        assert_eq!(login.parameters, vec!["email", "password"]);
        assert_eq!(login.body_text, "cy.get('#email').type(email);\ncy.get('#password').type(password);");
        assert_eq!(spec.custom_commands[1].parameters, vec!["subject"]);
    }

    #[test]
    fn test_snippet_branching() {
        let mut parser = CypressParser::new().unwrap();
        let flat = parser.parse_snippet("cy.get('a').click();\nconst x = 1;").unwrap();
        assert_eq!(flat.statements.len(), 2);
        assert!(!flat.branching);
        let branching = parser
            .parse_snippet("cy.get('a').then(($a) => { if ($a.length) { cy.log('x'); } });")
            .unwrap();
        assert!(branching.branching);
    }
}
