//! Selector optimization.
//!
//! Attribute selectors that name a test id, role, accessible label or placeholder map onto
//! Playwright's semantic locators. Everything else stays a CSS locator.

use std::sync::LazyLock;

use regex::Regex;

use crate::literal::quote;

/// Attribute patterns in priority order, paired with the locator factory they map to.
static SEMANTIC_ATTRIBUTES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        ("data-testid", "getByTestId"),
        ("role", "getByRole"),
        ("aria-label", "getByLabel"),
        ("placeholder", "getByPlaceholder"),
    ]
    .into_iter()
    .map(|(attribute, factory)| {
        let pattern = format!(
            r#"^\[\s*{}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\]"'\s]+))\s*\]$"#,
            regex::escape(attribute)
        );
        (Regex::new(&pattern).expect("static selector pattern"), factory)
    })
    .collect()
});

/// Converts a raw selector into a Playwright locator expression rooted at `page`.
///
/// ```
/// use cy2pw_compiler::optimize_selector;
///
/// assert_eq!(optimize_selector(r#"[data-testid="submit"]"#), "page.getByTestId('submit')");
/// assert_eq!(optimize_selector(".title"), "page.locator('.title')");
/// ```
pub fn optimize_selector(selector: &str) -> String {
    let trimmed = selector.trim();
    for (pattern, factory) in SEMANTIC_ATTRIBUTES.iter() {
        if let Some(caps) = pattern.captures(trimmed) {
            let value = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            return format!("page.{}({})", factory, quote(value));
        }
    }
    format!("page.locator({})", quote(selector))
}
