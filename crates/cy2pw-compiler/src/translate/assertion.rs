//! `.should()` / `.and()` lowering.

use super::{Emitted, TranslationContext};
use crate::diagnostic::RuleError;
use crate::ir::{ChainedCall, ParsedCommand, Value};
use crate::literal::{escape_regex, format_args, format_value};
use crate::mapping::{lookup_assertion, RuleBody};

pub(super) fn is_assertion(call: &ChainedCall) -> bool {
    matches!(call.method.as_str(), "should" | "and")
}

/// Renders one assertion against `locator`. Assertions always suspend.
pub(super) fn assertion_statement(
    command: &ParsedCommand,
    locator: &str,
    call: &ChainedCall,
    ctx: &mut TranslationContext,
) -> Result<Emitted, RuleError> {
    let Some(key) = call.args.first().and_then(Value::as_str) else {
        ctx.diagnose(format!(
            "Callback assertion on cy.{}() needs manual conversion",
            command.name
        ));
        return Ok(Emitted::todo(&format!(".{}({})", call.method, format_args(&call.args))));
    };
    let extra = &call.args[1..];

    let code = match command.name.as_str() {
        "url" => page_assertion("toHaveURL", "URL", key, extra, ctx)?,
        "title" => page_assertion("toHaveTitle", "title", key, extra, ctx)?,
        _ => match lookup_assertion(key) {
            Some(rule) => match rule.body {
                RuleBody::Template(matcher) => format!("expect({locator}).{matcher}({})", format_args(extra)),
                RuleBody::Transform(f) => f(locator, extra)?,
            },
            None => {
                ctx.diagnose(format!("Unknown assertion: {key}"));
                String::new()
            }
        },
    };
    if code.is_empty() {
        return Ok(Emitted::todo(&format!(".{}({})", call.method, format_args(&call.args))));
    }
    Ok(Emitted::new(code, true))
}

/// `url()`/`title()` assertions check the page, not a locator.
///
/// `include` becomes a partial-match regular expression, `eq` an exact comparison. Returns an
/// empty string (after a diagnostic) for anything else.
fn page_assertion(
    matcher: &str,
    subject: &str,
    key: &str,
    extra: &[Value],
    ctx: &mut TranslationContext,
) -> Result<String, RuleError> {
    let (negated, key) = match key.strip_prefix("not.") {
        Some(rest) => (true, rest),
        None => (false, key),
    };
    let expect = if negated { "expect(page).not" } else { "expect(page)" };
    let expected = extra.first().ok_or(RuleError::MissingArgument {
        command: "should",
        index: 1,
    })?;

    match key {
        "include" | "contain" | "contains" => {
            ctx.diagnose(format!(
                "{subject} substring assertion converted to a partial-match pattern; review the pattern"
            ));
            let pattern = match expected {
                Value::String(s) => format!("/.*{}.*/", escape_regex(s)),
                other => format!("new RegExp({})", format_value(other)),
            };
            Ok(format!("{expect}.{matcher}({pattern})"))
        }
        "eq" | "equal" | "equals" => Ok(format!("{expect}.{matcher}({})", format_value(expected))),
        "match" => Ok(format!("{expect}.{matcher}({})", format_value(expected))),
        _ => {
            ctx.diagnose(format!("Unsupported {subject} assertion: {key}"));
            Ok(String::new())
        }
    }
}
