//! Debug script to see what the parser produces, and what the translator makes of it.

use std::path::Path;

use cy2pw_compiler::frontend::cypress::parser::CypressParser;
use cy2pw_compiler::ir::{Statement, TestNode};
use cy2pw_compiler::translate;

fn main() {
    let source = r#"
Cypress.Commands.add('login', (email, password) => {
  cy.visit('/login');
  cy.get('[data-testid="email"]').type(email);
  cy.get('[data-testid="password"]').type(password);
  cy.get('button[type="submit"]').click();
});

describe('Dashboard', () => {
  beforeEach(() => {
    cy.login('user@example.com', 'secret');
  });

  it('shows the greeting', () => {
    cy.contains('Welcome back').should('be.visible');
    cy.get('.card').first().find('a').click();
    cy.url().should('include', '/dashboard');
  });
});
"#;

    let mut parser = CypressParser::new().unwrap();
    let result = parser.parse(source, Path::new("dashboard.cy.js"));

    match result {
        Ok(parsed) => {
            println!("Parsed file: {:?}", parsed.path);
            println!("\nCustom commands:");
            for command in &parsed.custom_commands {
                println!("  {}({})", command.name, command.parameters.join(", "));
            }
            println!("\nNodes:");
            print_nodes(&parsed.nodes, 1);
        }
        Err(e) => {
            println!("Error: {:?}", e);
        }
    }
}

fn print_nodes(nodes: &[TestNode], depth: usize) {
    let pad = "  ".repeat(depth);
    for node in nodes {
        match node {
            TestNode::Suite { title, children, .. } => {
                println!("{pad}suite {:?}", title);
                print_nodes(children, depth + 1);
            }
            TestNode::Test { title, body, .. } => {
                println!("{pad}test {:?}", title);
                print_statements(body, depth + 1);
            }
            TestNode::Hook { kind, body, .. } => {
                println!("{pad}hook {:?}", kind);
                print_statements(body, depth + 1);
            }
            TestNode::Statement(statement) => print_statements(std::slice::from_ref(statement), depth),
        }
    }
}

fn print_statements(statements: &[Statement], depth: usize) {
    let pad = "  ".repeat(depth);
    for statement in statements {
        match statement {
            Statement::Command { command, span } => {
                println!("{pad}[{}] {}", span.line(), command.source_form());
                let result = translate(command);
                for line in result.code.lines() {
                    println!("{pad}  => {line}");
                }
                for diagnostic in &result.diagnostics {
                    println!("{pad}  !! {diagnostic}");
                }
            }
            Statement::Raw { text, .. } => println!("{pad}raw: {text}"),
        }
    }
}
