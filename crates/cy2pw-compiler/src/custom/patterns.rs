//! Well-known custom command shapes.
//!
//! Handlers receive argument tokens. For a definition these are parameter names, for a call
//! site they are the literal arguments, so every handler re-emits tokens through `requote`
//! and the output is valid in both cases.

use super::then_scan::scan_callback;
use super::{ClassificationResult, ComplexityTag, ConversionStrategy, PAGE_TYPE_IMPORT};
use crate::literal::{is_quoted, one_line, requote, strip_quotes, unescape};
use crate::naming::to_identifier;
use crate::selector::optimize_selector;

pub(super) type Handler = fn(&str, &[String]) -> ClassificationResult;

static NAMED_PATTERNS: &[(&str, Handler)] = &[
    ("login", login),
    ("selectDropdown", select_dropdown),
    ("uploadFile", upload_file),
    ("then", then),
    ("log", log),
    ("logMessage", log),
    ("logStep", log),
    ("navigateTo", navigate),
    ("navigate", navigate),
];

pub(super) fn lookup(name: &str) -> Option<Handler> {
    NAMED_PATTERNS
        .iter()
        .find(|(pattern, _)| *pattern == name)
        .map(|(_, handler)| *handler)
}

/// True if `name` has a dedicated pattern handler.
pub fn has_named_pattern(name: &str) -> bool {
    lookup(name).is_some()
}

/// Locator for a selector token: optimized when literal, `page.locator(expr)` otherwise.
fn locator_for(token: &str) -> String {
    if is_quoted(token) && !token.starts_with('`') {
        optimize_selector(&unescape(strip_quotes(token)))
    } else {
        format!("page.locator({})", token.trim())
    }
}

fn is_identifier(token: &str) -> bool {
    !token.is_empty()
        && !token.starts_with(|c: char| c.is_ascii_digit())
        && token.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn missing_args(name: &str, expected: &str) -> ClassificationResult {
    ClassificationResult::failure(name, format!("'{name}' expects {expected}"))
}

/// A generic login flow: navigate, fill credentials, submit.
fn login(name: &str, args: &[String]) -> ClassificationResult {
    let params: Vec<&str> = if args.len() >= 2 && args.iter().all(|a| is_identifier(a)) {
        args.iter().map(String::as_str).collect()
    } else {
        vec!["email", "password"]
    };
    let (user, password) = (params[0], params[1]);
    let extra = params[2..].iter().map(|p| format!(", {p}: any")).collect::<String>();
    let function = to_identifier(name);
    let code = format!(
        "export async function {function}(page: Page, {user}: any, {password}: any{extra}): Promise<void> {{\n\
         \x20 await page.goto('/login');\n\
         \x20 await page.locator('input[name=\"email\"], input[type=\"email\"], input[name=\"username\"]').fill({user});\n\
         \x20 await page.locator('input[type=\"password\"]').fill({password});\n\
         \x20 await page.locator('button[type=\"submit\"]').click();\n\
         }}"
    );
    ClassificationResult::new(name, ConversionStrategy::Utility, ComplexityTag::Medium, code)
        .import(PAGE_TYPE_IMPORT)
        .note("Login selectors are generic; adjust them to the application's form")
}

fn select_dropdown(name: &str, args: &[String]) -> ClassificationResult {
    let [selector, value, ..] = args else {
        return missing_args(name, "a selector and a value");
    };
    let code = format!("await {}.selectOption({});", locator_for(selector), requote(value));
    ClassificationResult::new(name, ConversionStrategy::Direct, ComplexityTag::Low, code)
}

fn upload_file(name: &str, args: &[String]) -> ClassificationResult {
    let [selector, file, ..] = args else {
        return missing_args(name, "a selector and a file path");
    };
    let file = if is_quoted(file) && !file.starts_with('`') {
        let path = unescape(strip_quotes(file));
        if path.contains('/') {
            requote(file)
        } else {
            crate::literal::quote(&format!("cypress/fixtures/{path}"))
        }
    } else {
        file.trim().to_string()
    };
    let code = format!("await {}.setInputFiles({file});", locator_for(selector));
    ClassificationResult::new(name, ConversionStrategy::Direct, ComplexityTag::Low, code)
        .note("Bare file names are resolved against cypress/fixtures")
}

/// `then(callback)`: best-effort conversion of the callback body, line by line.
fn then(name: &str, args: &[String]) -> ClassificationResult {
    let Some(callback) = args.last() else {
        return missing_args(name, "a callback");
    };
    let scan = scan_callback(callback);
    let complexity = if scan.skipped.is_empty() {
        ComplexityTag::Low
    } else {
        ComplexityTag::Medium
    };
    let mut result = ClassificationResult::new(name, ConversionStrategy::Direct, complexity, scan.statements.join("\n"))
        .note(format!("Converted {} statement(s) from the callback", scan.statements.len()));
    for line in &scan.skipped {
        result = result.warn(format!("Skipped unrecognized line in callback: {line}"));
    }
    result
}

fn log(name: &str, args: &[String]) -> ClassificationResult {
    let args = args.iter().map(|a| requote(a)).collect::<Vec<_>>().join(", ");
    ClassificationResult::new(
        name,
        ConversionStrategy::Direct,
        ComplexityTag::Low,
        format!("console.log({args});"),
    )
}

/// Joins path segments into one URL: literal when every segment is, a template string otherwise.
fn navigate(name: &str, args: &[String]) -> ClassificationResult {
    if args.is_empty() {
        return missing_args(name, "at least one path segment");
    }
    let url = match args {
        [single] if !is_quoted(single) => single.trim().to_string(),
        _ => {
            let all_literal = args.iter().all(|a| is_quoted(a) && !a.starts_with('`'));
            let segments: Vec<String> = args
                .iter()
                .map(|a| {
                    if is_quoted(a) && !a.starts_with('`') {
                        unescape(strip_quotes(a)).trim_matches('/').to_string()
                    } else {
                        format!("${{{}}}", a.trim())
                    }
                })
                .filter(|s| !s.is_empty())
                .collect();
            let path = format!("/{}", segments.join("/"));
            if all_literal {
                crate::literal::quote(&path)
            } else {
                format!("`{path}`")
            }
        }
    };
    ClassificationResult::new(
        name,
        ConversionStrategy::Direct,
        ComplexityTag::Low,
        format!("await page.goto({url});"),
    )
}

/// Fallback: a stub that keeps the name, parameters and (when known) the original body.
pub(super) fn generic(name: &str, args: &[String], body: Option<&str>) -> ClassificationResult {
    let params: Vec<String> = args
        .iter()
        .enumerate()
        .map(|(i, a)| if is_identifier(a) { a.clone() } else { format!("arg{i}") })
        .collect();
    let signature = params.iter().map(|p| format!(", {p}: any")).collect::<String>();

    let function = to_identifier(name);
    let mut code = format!(
        "// TODO: Convert custom command cy.{}({}) manually\nexport async function {function}(page: Page{signature}): Promise<void> {{\n",
        one_line(name),
        one_line(&args.join(", "))
    );
    if let Some(body) = body.filter(|b| !b.trim().is_empty()) {
        code.push_str("  // Original Cypress implementation:\n");
        for line in body.lines() {
            code.push_str(&format!("  // {line}\n").replace("  // \n", "  //\n"));
        }
    }
    code.push_str(&format!("  throw new Error('{function} is not converted yet');\n}}"));

    ClassificationResult::new(name, ConversionStrategy::Utility, ComplexityTag::High, code)
        .import(PAGE_TYPE_IMPORT)
        .warn(format!("Custom command '{name}' requires manual conversion"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_dropdown_definition_and_call() {
        let call = select_dropdown("selectDropdown", &tokens(&["\"[data-testid=country]\"", "'US'"]));
        assert_eq!(call.generated_code, "await page.getByTestId('country').selectOption('US');");
        let def = select_dropdown("selectDropdown", &tokens(&["selector", "value"]));
        assert_eq!(def.generated_code, "await page.locator(selector).selectOption(value);");
        assert!(select_dropdown("selectDropdown", &tokens(&["'#a'"])).is_failure());
    }

    #[test]
    fn test_upload_file_resolves_fixtures() {
        let result = upload_file("uploadFile", &tokens(&["'input[type=file]'", "'avatar.png'"]));
        assert_eq!(
            result.generated_code,
            "await page.locator('input[type=file]').setInputFiles('cypress/fixtures/avatar.png');"
        );
    }

    #[test]
    fn test_login_uses_identifier_parameters() {
        let result = login("login", &tokens(&["username", "pass"]));
        assert!(result.generated_code.starts_with("export async function login(page: Page, username: any, pass: any)"));
        assert!(result.generated_code.contains(".fill(pass);"));
        let call = login("login", &tokens(&["'a@b.co'", "'secret'"]));
        assert!(call.generated_code.contains("email: any, password: any"));
        assert_eq!(call.imports, vec![PAGE_TYPE_IMPORT.to_string()]);
    }

    #[test]
    fn test_navigate_segments() {
        let literal = navigate("navigateTo", &tokens(&["'/users/'", "'42'"]));
        assert_eq!(literal.generated_code, "await page.goto('/users/42');");
        let mixed = navigate("navigateTo", &tokens(&["'users'", "id"]));
        assert_eq!(mixed.generated_code, "await page.goto(`/users/${id}`);");
        let single = navigate("navigate", &tokens(&["path"]));
        assert_eq!(single.generated_code, "await page.goto(path);");
    }

    #[test]
    fn test_log_requotes() {
        let result = log("logStep", &tokens(&["\"Step 1\"", "count"]));
        assert_eq!(result.generated_code, "console.log('Step 1', count);");
    }

    #[test]
    fn test_generic_stub() {
        let result = generic("seedDb", &tokens(&["fixture", "{ reset: true }"]), Some("cy.task('seed', fixture);\n\ncy.reload();"));
        assert_eq!(
            result.generated_code,
            "// TODO: Convert custom command cy.seedDb(fixture, { reset: true }) manually\n\
             export async function seedDb(page: Page, fixture: any, arg1: any): Promise<void> {\n\
             \x20 // Original Cypress implementation:\n\
             \x20 // cy.task('seed', fixture);\n\
             \x20 //\n\
             \x20 // cy.reload();\n\
             \x20 throw new Error('seedDb is not converted yet');\n\
             }"
        );
        assert_eq!(result.strategy, ConversionStrategy::Utility);
        assert_eq!(result.complexity, ComplexityTag::High);
    }

    #[test]
    fn test_generic_stub_keeps_multiline_arguments_in_comment() {
        let result = generic("doThing", &tokens(&["() => {\n  cy.get('a').click();\n}"]), None);
        let mut lines = result.generated_code.lines();
        assert_eq!(
            lines.next(),
            Some("// TODO: Convert custom command cy.doThing(() => { cy.get('a').click(); }) manually")
        );
        assert_eq!(lines.next(), Some("export async function doThing(page: Page, arg0: any): Promise<void> {"));
        assert!(!result.generated_code.contains("\n  cy.get"));
    }

    #[test]
    fn test_generic_stub_uses_identifier_name() {
        let result = generic("open-menu", &[], None);
        assert!(result.generated_code.contains("export async function openMenu(page: Page): Promise<void> {"));
        assert!(result.generated_code.contains("throw new Error('openMenu is not converted yet');"));
    }
}
