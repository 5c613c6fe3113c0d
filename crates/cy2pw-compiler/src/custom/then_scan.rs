//! Line scanner for `.then()` callback bodies.
//!
//! Only two shapes are recognized: `cy.get(sel).should('be.visible')` and `cy.get(sel).click()`.
//! Everything else is reported back as skipped so the caller can warn about it.

use std::sync::LazyLock;

use regex::Regex;

use crate::literal::{is_quoted, strip_quotes, unescape};
use crate::selector::optimize_selector;

/// One selector argument: a single string literal or a plain expression, never a nested call.
const SELECTOR: &str = r#"\s*('(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*"|`(?:[^`\\]|\\.)*`|[\w$.\[\]]+)\s*"#;

static VISIBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"^cy\s*\.\s*get\({SELECTOR}\)\s*\.\s*should\(\s*['"]be\.visible['"]\s*\)\s*;?$"#
    ))
    .expect("static visibility pattern")
});

static CLICK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^cy\s*\.\s*get\({SELECTOR}\)\s*\.\s*click\(\s*\)\s*;?$")).expect("static click pattern")
});

#[derive(Debug, Default)]
pub(super) struct ThenScan {
    pub statements: Vec<String>,
    /// Non-empty, non-comment lines that matched neither shape.
    pub skipped: Vec<String>,
}

/// Scans the body of a callback argument (`() => { ... }` or `function () { ... }`).
pub(super) fn scan_callback(callback: &str) -> ThenScan {
    let body = callback_body(callback);
    let mut scan = ThenScan::default();
    for line in body.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("//") || matches!(line, "{" | "}" | "});" | "})") {
            continue;
        }
        if let Some(caps) = VISIBLE.captures(line) {
            scan.statements
                .push(format!("await expect({}).toBeVisible();", locator(&caps[1])));
        } else if let Some(caps) = CLICK.captures(line) {
            scan.statements.push(format!("await {}.click();", locator(&caps[1])));
        } else {
            scan.skipped.push(line.to_string());
        }
    }
    scan
}

/// The text between the callback's outermost braces, or the expression after `=>`.
fn callback_body(callback: &str) -> &str {
    match (callback.find('{'), callback.rfind('}')) {
        (Some(open), Some(close)) if open < close => &callback[open + 1..close],
        _ => callback.split_once("=>").map(|(_, body)| body).unwrap_or(callback),
    }
}

fn locator(selector: &str) -> String {
    let selector = selector.trim();
    if is_quoted(selector) && !selector.starts_with('`') {
        optimize_selector(&unescape(strip_quotes(selector)))
    } else {
        format!("page.locator({selector})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_lines() {
        let scan = scan_callback(
            "() => {\n  cy.get('[data-testid=\"menu\"]').should('be.visible');\n  cy.get('#open').click();\n}",
        );
        assert_eq!(
            scan.statements,
            vec![
                "await expect(page.getByTestId('menu')).toBeVisible();",
                "await page.locator('#open').click();",
            ]
        );
        assert!(scan.skipped.is_empty());
    }

    #[test]
    fn test_skipped_lines_are_reported() {
        let scan = scan_callback("($el) => {\n  // comment\n  const text = $el.text();\n  cy.get(sel).click();\n}");
        assert_eq!(scan.statements, vec!["await page.locator(sel).click();"]);
        assert_eq!(scan.skipped, vec!["const text = $el.text();"]);
    }

    #[test]
    fn test_expression_callback() {
        let scan = scan_callback("() => cy.get('.x').click()");
        assert_eq!(scan.statements, vec!["await page.locator('.x').click();"]);
    }

    #[test]
    fn test_two_calls_on_one_line_are_skipped() {
        let scan = scan_callback("() => {\n  cy.get('a').click(); cy.get('b').click();\n  cy.get('c').click();\n}");
        assert_eq!(scan.statements, vec!["await page.locator('c').click();"]);
        assert_eq!(scan.skipped, vec!["cy.get('a').click(); cy.get('b').click();"]);
    }

    #[test]
    fn test_selector_with_parentheses_in_literal() {
        let scan = scan_callback("() => {\n  cy.get('li:nth-child(2)').click();\n}");
        assert_eq!(scan.statements, vec!["await page.locator('li:nth-child(2)').click();"]);
    }
}
