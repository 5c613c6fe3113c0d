//! Body lowering for custom command definitions.
//!
//! The body is parsed with the Cypress frontend and each `cy.` chain is translated. The
//! result decides the strategy:
//!
//! - conditionals or loops anywhere: `manual`, translated code kept as comments
//! - three or more commands, all of them element interactions: `pageObject`
//! - otherwise: `utility`
//!
//! Branch-free bodies that contain anything the translator could not handle return `None`,
//! and the caller falls back to the named patterns or the generic stub.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::{ClassificationResult, ComplexityTag, ConversionStrategy, PAGE_TYPE_IMPORT};
use crate::frontend::cypress::parser::CypressParser;
use crate::ir::{CustomCommandDefinition, ParsedCommand, Statement};
use crate::naming::to_identifier;
use crate::translate::{translate, PLAYWRIGHT_IMPORT};

/// `page` as a receiver, not as a property (`this.page`, `x.page`) or part of a longer name.
static PAGE_RECEIVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^.\w$])page\b").expect("static page receiver pattern"));

/// Commands that start from an element.
const ELEMENT_QUERIES: &[&str] = &["get", "contains", "focused"];

fn is_element_interaction(command: &ParsedCommand) -> bool {
    ELEMENT_QUERIES.contains(&command.name.as_str())
        && command
            .chained_calls
            .iter()
            .any(|c| !matches!(c.method.as_str(), "should" | "and" | "as"))
}

pub(super) fn lower_definition(definition: &CustomCommandDefinition) -> Option<ClassificationResult> {
    let snippet = CypressParser::new()
        .and_then(|mut parser| parser.parse_snippet(&definition.body_text))
        .ok()?;

    let mut lines = Vec::new();
    let mut imports = Vec::new();
    let mut diagnostics = Vec::new();
    let mut commands = 0;
    let mut interactions = 0;

    for statement in &snippet.statements {
        match statement {
            Statement::Command { command, .. } => {
                let result = translate(command);
                if result.has_todo() && !snippet.branching {
                    trace!(command = %command.name, "custom command body has untranslatable command");
                    return None;
                }
                commands += 1;
                if is_element_interaction(command) {
                    interactions += 1;
                }
                for import in result.imports {
                    if import != PLAYWRIGHT_IMPORT && !imports.contains(&import) {
                        imports.push(import);
                    }
                }
                diagnostics.extend(result.diagnostics);
                if !result.code.is_empty() {
                    lines.push(format!("{};", result.code));
                }
            }
            Statement::Raw { text, .. } => {
                // Cypress calls nested in callbacks or blocks are not translated. A branching
                // body is commented out anyway, so they are kept as written.
                if !snippet.branching && (text.contains("cy.") || text.contains("Cypress.")) {
                    return None;
                }
                lines.push(text.clone());
            }
        }
    }

    let name = definition.name.as_str();
    let function = to_identifier(name);
    let params = definition
        .parameters
        .iter()
        .map(|p| format!("{p}: any"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut result = if snippet.branching {
        let mut code = format!("// TODO: Review custom command '{name}'; it branches or loops\n");
        code.push_str(&format!(
            "export async function {function}(page: Page{}): Promise<void> {{\n",
            leading_comma(&params)
        ));
        for line in lines.iter().flat_map(|l| l.lines()) {
            code.push_str(&format!("  // {line}\n"));
        }
        code.push_str(&format!("  throw new Error('{function} needs manual review');\n}}"));
        let mut result = ClassificationResult::new(name, ConversionStrategy::Manual, ComplexityTag::High, code)
            .warn(format!("'{name}' contains conditional logic or loops; translated statements are kept as comments"));
        result.imports.push(PAGE_TYPE_IMPORT.to_string());
        result
    } else if commands >= 3 && interactions == commands {
        let body: Vec<String> = lines.iter().map(|l| rebind_page(l)).collect();
        let code = format!("async {function}({params}): Promise<void> {{\n{}\n}}", indent(&body.join("\n")));
        ClassificationResult::new(name, ConversionStrategy::PageObject, ComplexityTag::from_operations(commands), code)
            .note(format!("{interactions} element interactions grouped as a page object method"))
    } else {
        let code = format!(
            "export async function {function}(page: Page{}): Promise<void> {{\n{}\n}}",
            leading_comma(&params),
            indent(&lines.join("\n"))
        );
        let mut result =
            ClassificationResult::new(name, ConversionStrategy::Utility, ComplexityTag::from_operations(commands), code);
        result.imports.push(PAGE_TYPE_IMPORT.to_string());
        result
    };

    for import in imports {
        result = result.import(&import);
    }
    result.warnings.extend(diagnostics);
    Some(result)
}

/// Rewrites `page` receivers to `this.page`, leaving string and template literals untouched.
fn rebind_page(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 16);
    let mut code_start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => {
                out.push_str(&line[code_start..=i]);
                code_start = i + c.len_utf8();
                quote = None;
            }
            Some(_) => {}
            None if matches!(c, '\'' | '"' | '`') => {
                out.push_str(&PAGE_RECEIVER.replace_all(&line[code_start..i], "${1}this.page"));
                code_start = i;
                quote = Some(c);
            }
            None => {}
        }
    }
    let rest = &line[code_start..];
    if quote.is_some() {
        out.push_str(rest);
    } else {
        out.push_str(&PAGE_RECEIVER.replace_all(rest, "${1}this.page"));
    }
    out
}

fn leading_comma(params: &str) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!(", {params}")
    }
}

fn indent(code: &str) -> String {
    code.lines()
        .map(|l| if l.is_empty() { String::new() } else { format!("  {l}") })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn definition(name: &str, params: &[&str], body: &str) -> CustomCommandDefinition {
        CustomCommandDefinition::new(name, params.iter().map(|p| p.to_string()).collect(), body)
    }

    #[test]
    fn test_utility_function() {
        let result = lower_definition(&definition(
            "openSettings",
            &[],
            "cy.visit('/settings');\ncy.get('#tab-general').click();",
        ))
        .unwrap();
        assert_eq!(result.strategy, ConversionStrategy::Utility);
        assert_eq!(result.complexity, ComplexityTag::Low);
        assert_eq!(
            result.generated_code,
            "export async function openSettings(page: Page): Promise<void> {\n  await page.goto('/settings');\n  await page.locator('#tab-general').click();\n}"
        );
        assert_eq!(result.imports, vec![PAGE_TYPE_IMPORT.to_string()]);
    }

    #[test]
    fn test_page_object_method() {
        let result = lower_definition(&definition(
            "fillSignup",
            &["user"],
            "cy.get('#name').type(user.name);\ncy.get('#email').type(user.email);\ncy.get('[data-testid=\"signup\"]').click();",
        ))
        .unwrap();
        assert_eq!(result.strategy, ConversionStrategy::PageObject);
        assert_eq!(result.complexity, ComplexityTag::Medium);
        assert_eq!(
            result.generated_code,
            "async fillSignup(user: any): Promise<void> {\n  await this.page.locator('#name').fill(user.name);\n  await this.page.locator('#email').fill(user.email);\n  await this.page.getByTestId('signup').click();\n}"
        );
    }

    #[test]
    fn test_branching_is_manual() {
        let result = lower_definition(&definition(
            "maybeAccept",
            &["accept"],
            "if (accept) {\n  cy.log('accepting');\n}",
        ))
        .unwrap();
        assert_eq!(result.strategy, ConversionStrategy::Manual);
        assert!(result.generated_code.contains("  //   cy.log('accepting');"));

        let result = lower_definition(&definition(
            "pick",
            &["items"],
            "const first = items.length > 0 ? items[0] : null;\ncy.get('#x').click();",
        ))
        .unwrap();
        assert_eq!(result.strategy, ConversionStrategy::Manual);
        assert_eq!(result.complexity, ComplexityTag::High);
        assert!(result.generated_code.contains("  // await page.locator('#x').click();"));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_unknown_command_bails_out() {
        assert!(lower_definition(&definition("x", &[], "cy.task('seed');")).is_none());
        assert!(lower_definition(&definition("y", &[], "cy.get('a').then(($a) => cy.log($a));")).is_none());
        assert!(lower_definition(&definition("z", &[], "const el = cy.get('a');")).is_none());
    }

    #[test]
    fn test_page_receiver_rewrite() {
        let rewritten = PAGE_RECEIVER.replace_all("await page.goto(page.url() + this.page.x + mypage)", "${1}this.page");
        assert_eq!(rewritten, "await this.page.goto(this.page.url() + this.page.x + mypage)");
    }

    #[test]
    fn test_rebind_page_skips_literals() {
        assert_eq!(
            rebind_page("await page.getByText('Next page').click();"),
            "await this.page.getByText('Next page').click();"
        );
        assert_eq!(
            rebind_page(r#"await page.locator("a[title='page']").fill(`page ${n}`);"#),
            r#"await this.page.locator("a[title='page']").fill(`page ${n}`);"#
        );
        assert_eq!(rebind_page(r"page.fill('it\'s page', page)"), r"this.page.fill('it\'s page', this.page)");
    }

    #[test]
    fn test_page_object_keeps_text_mentioning_page() {
        let result = lower_definition(&definition(
            "goNext",
            &[],
            "cy.get('#agree').check();\ncy.contains('Next page').click();\ncy.get('.pager').click();",
        ))
        .unwrap();
        assert_eq!(result.strategy, ConversionStrategy::PageObject);
        assert!(result.generated_code.contains("await this.page.getByText('Next page').click();"));
    }

    #[test]
    fn test_invalid_names_become_identifiers() {
        let utility = lower_definition(&definition("open-menu", &[], "cy.get('#menu').click();")).unwrap();
        assert!(utility.generated_code.starts_with("export async function openMenu(page: Page): Promise<void> {"));

        let method = lower_definition(&definition(
            "fill signup",
            &[],
            "cy.get('#a').click();\ncy.get('#b').click();\ncy.get('#c').click();",
        ))
        .unwrap();
        assert!(method.generated_code.starts_with("async fillSignup(): Promise<void> {"));
    }
}
