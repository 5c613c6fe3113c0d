//! `.should(<chainer>, ...)` rules.

use super::{arg, LocatorTransform, RuleBody};
use crate::diagnostic::RuleError;
use crate::ir::Value;
use crate::literal::{escape_regex, format_value};

/// Maps one assertion chainer onto a Playwright matcher.
///
/// A `Template` holds the matcher name (`toBeVisible`, `not.toBeChecked`); the translator renders
/// `expect(<locator>).<matcher>(<extra args>)`. A `Transform` renders the whole expression.
pub struct AssertionRule {
    pub source_name: &'static str,
    pub body: RuleBody<LocatorTransform>,
}

pub static ASSERTION_RULES: &[AssertionRule] = &[
    matcher("be.visible", "toBeVisible"),
    matcher("not.be.visible", "not.toBeVisible"),
    matcher("be.hidden", "toBeHidden"),
    matcher("exist", "toBeAttached"),
    transform("not.exist", not_exist),
    matcher("contain", "toContainText"),
    matcher("contain.text", "toContainText"),
    matcher("include.text", "toContainText"),
    matcher("not.contain", "not.toContainText"),
    matcher("not.contain.text", "not.toContainText"),
    matcher("have.text", "toHaveText"),
    matcher("not.have.text", "not.toHaveText"),
    matcher("match", "toHaveText"),
    matcher("have.value", "toHaveValue"),
    matcher("not.have.value", "not.toHaveValue"),
    matcher("have.attr", "toHaveAttribute"),
    matcher("not.have.attr", "not.toHaveAttribute"),
    matcher("have.prop", "toHaveJSProperty"),
    transform("have.class", have_class),
    transform("not.have.class", not_have_class),
    matcher("have.id", "toHaveId"),
    matcher("have.css", "toHaveCSS"),
    matcher("have.length", "toHaveCount"),
    transform("have.length.greaterThan", count_greater),
    transform("have.length.gt", count_greater),
    transform("have.length.above", count_greater),
    transform("have.length.at.least", count_at_least),
    transform("have.length.gte", count_at_least),
    transform("have.length.lessThan", count_less),
    transform("have.length.lt", count_less),
    transform("have.length.below", count_less),
    transform("have.length.at.most", count_at_most),
    transform("have.length.lte", count_at_most),
    matcher("be.checked", "toBeChecked"),
    matcher("not.be.checked", "not.toBeChecked"),
    matcher("be.disabled", "toBeDisabled"),
    matcher("not.be.disabled", "toBeEnabled"),
    matcher("be.enabled", "toBeEnabled"),
    matcher("not.be.enabled", "toBeDisabled"),
    matcher("be.empty", "toBeEmpty"),
    matcher("not.be.empty", "not.toBeEmpty"),
    matcher("be.focused", "toBeFocused"),
    matcher("have.focus", "toBeFocused"),
    matcher("not.be.focused", "not.toBeFocused"),
];

const fn matcher(source_name: &'static str, target: &'static str) -> AssertionRule {
    AssertionRule {
        source_name,
        body: RuleBody::Template(target),
    }
}

const fn transform(source_name: &'static str, f: LocatorTransform) -> AssertionRule {
    AssertionRule {
        source_name,
        body: RuleBody::Transform(f),
    }
}

pub fn lookup_assertion(key: &str) -> Option<&'static AssertionRule> {
    ASSERTION_RULES.iter().find(|rule| rule.source_name == key)
}

fn not_exist(locator: &str, _args: &[Value]) -> Result<String, RuleError> {
    Ok(format!("expect({locator}).toHaveCount(0)"))
}

/// Matches one class token, so `active` does not match `inactive`.
fn class_pattern(args: &[Value], command: &'static str) -> Result<String, RuleError> {
    match arg(args, command, 0)? {
        Value::String(class) => Ok(format!(r"/(^|\s){}(\s|$)/", escape_regex(class))),
        other => Ok(format_value(other)),
    }
}

fn have_class(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    let pattern = class_pattern(args, "have.class")?;
    Ok(format!("expect({locator}).toHaveClass({pattern})"))
}

fn not_have_class(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    let pattern = class_pattern(args, "not.have.class")?;
    Ok(format!("expect({locator}).not.toHaveClass({pattern})"))
}

fn count_comparison(locator: &str, args: &[Value], command: &'static str, matcher: &str) -> Result<String, RuleError> {
    let n = arg(args, command, 0)?;
    Ok(format!("expect(await {locator}.count()).{matcher}({})", format_value(n)))
}

fn count_greater(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    count_comparison(locator, args, "have.length.greaterThan", "toBeGreaterThan")
}

fn count_at_least(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    count_comparison(locator, args, "have.length.at.least", "toBeGreaterThanOrEqual")
}

fn count_less(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    count_comparison(locator, args, "have.length.lessThan", "toBeLessThan")
}

fn count_at_most(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    count_comparison(locator, args, "have.length.at.most", "toBeLessThanOrEqual")
}
