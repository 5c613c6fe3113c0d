//! Text-level extraction of custom command registrations and calls.

use std::sync::LazyLock;

use regex::Regex;

use crate::ir::CustomCommandDefinition;
use crate::literal::{is_quoted, strip_quotes, unescape};
use crate::tokenizer::{find_closing_paren, tokenize_args};

static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Cypress\s*\.\s*Commands\s*\.\s*(?:add|overwrite)\s*\(").expect("static definition pattern")
});

static CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\bcy\s*\.\s*)?([A-Za-z_$][\w$]*)\s*\(").expect("static call pattern"));

/// The first call expression in `raw`: its name and the text between its parentheses.
pub(super) fn extract_call(raw: &str) -> Result<(&str, &str), String> {
    let caps = CALL
        .captures(raw)
        .ok_or_else(|| "No recognizable call expression".to_string())?;
    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
        return Err("No recognizable call expression".to_string());
    };
    let open = whole.end() - 1;
    let close = find_closing_paren(raw, open)
        .ok_or_else(|| format!("Unbalanced parentheses in call to '{}'", name.as_str()))?;
    Ok((name.as_str(), &raw[open + 1..close]))
}

/// Parses `Cypress.Commands.add(name, [options,] fn)` source text.
///
/// `None` when `raw` is not a registration at all.
pub(super) fn parse_definition(raw: &str) -> Option<Result<CustomCommandDefinition, String>> {
    let found = DEFINITION.find(raw)?;
    Some(parse_registration(raw, found.end() - 1))
}

fn parse_registration(raw: &str, open: usize) -> Result<CustomCommandDefinition, String> {
    let close = find_closing_paren(raw, open).ok_or_else(|| "Unbalanced parentheses in Commands.add".to_string())?;
    let args = tokenize_args(&raw[open + 1..close]);
    let name = args
        .first()
        .filter(|a| is_quoted(a))
        .map(|a| unescape(strip_quotes(a)))
        .ok_or_else(|| "Commands.add is missing a command name".to_string())?;
    let function = args
        .last()
        .filter(|_| args.len() >= 2)
        .ok_or_else(|| format!("Commands.add('{name}') is missing its implementation"))?;
    let (parameters, body_text) =
        split_function(function).ok_or_else(|| format!("Implementation of '{name}' is not a function"))?;
    Ok(CustomCommandDefinition::new(name, parameters, body_text))
}

/// Splits `(a, b) => {...}`, `a => expr` or `function (a, b) {...}` into parameter names
/// and body text.
pub(super) fn split_function(text: &str) -> Option<(Vec<String>, String)> {
    let text = text.trim();
    let text = text.strip_prefix("async").map(str::trim_start).unwrap_or(text);

    let (params, body) = if let Some(rest) = text.strip_prefix("function") {
        let open = rest.find('(')?;
        let close = find_closing_paren(rest, open)?;
        (&rest[open + 1..close], rest[close + 1..].trim())
    } else if text.starts_with('(') {
        let close = find_closing_paren(text, 0)?;
        let rest = text[close + 1..].trim_start();
        // Optional return type annotation before the arrow.
        let arrow = rest.find("=>")?;
        (&text[1..close], rest[arrow + 2..].trim())
    } else {
        let (param, body) = text.split_once("=>")?;
        (param.trim(), body.trim())
    };

    let parameters = tokenize_args(params).iter().map(|p| parameter_name(p)).collect();
    let body = match body.strip_prefix('{').and_then(|b| b.strip_suffix('}')) {
        Some(block) => dedent_block(block),
        None => body.trim_end_matches(';').to_string(),
    };
    Some((parameters, body))
}

/// `email: string = 'x'` to `email`.
fn parameter_name(param: &str) -> String {
    let end = param.find([':', '=', '?']).unwrap_or(param.len());
    param[..end].trim().to_string()
}

fn dedent_block(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    text.lines()
        .map(|l| l.get(indent..).unwrap_or_else(|| l.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_call() {
        assert_eq!(extract_call("cy.login('a', fn(1))").unwrap(), ("login", "'a', fn(1)"));
        assert_eq!(extract_call("  logStep ( 'x' )").unwrap(), ("logStep", " 'x' "));
        assert!(extract_call("cy.login('a'").is_err());
        assert!(extract_call("no call here").is_err());
    }

    #[test]
    fn test_parse_definition_arrow() {
        let def = parse_definition("Cypress.Commands.add('login', (email: string, password = 'x') => {\n    cy.visit('/');\n  })")
            .unwrap()
            .unwrap();
        assert_eq!(def.name, "login");
        assert_eq!(def.parameters, vec!["email", "password"]);
        assert_eq!(def.body_text, "cy.visit('/');");
    }

    #[test]
    fn test_parse_definition_with_options_and_function() {
        let def = parse_definition(
            "Cypress.Commands.add('dismiss', { prevSubject: 'element' }, function (subject) { cy.wrap(subject).click() })",
        )
        .unwrap()
        .unwrap();
        assert_eq!(def.parameters, vec!["subject"]);
        assert_eq!(def.body_text, "cy.wrap(subject).click()");
    }

    #[test]
    fn test_parse_definition_expression_body() {
        let (params, body) = split_function("name => cy.log(name);").unwrap();
        assert_eq!(params, vec!["name"]);
        assert_eq!(body, "cy.log(name)");
    }

    #[test]
    fn test_malformed_definitions() {
        assert!(parse_definition("cy.login()").is_none());
        assert!(parse_definition("Cypress.Commands.add('x')").unwrap().is_err());
        assert!(parse_definition("Cypress.Commands.add(name, () => {})").unwrap().is_err());
        assert!(parse_definition("Cypress.Commands.add('x', handler)").unwrap().is_err());
    }
}
