//! Static rule tables mapping Cypress names onto Playwright code.
//!
//! Three tables: top-level commands (`cy.visit`), chained methods (`.click()`), and
//! assertion chainers (`.should('be.visible')`). Each is a `static` slice built at compile
//! time and only ever read. A missing entry is `None`, which callers turn into a TODO.

mod assertions;
mod chains;
mod commands;

pub use assertions::{lookup_assertion, AssertionRule, ASSERTION_RULES};
pub use chains::{lookup_chain, ChainKind, ChainRule, CHAIN_RULES};
pub use commands::{
    lookup_command, must_execute_first, selector_locator, text_locator, CommandRule, COMMAND_RULES,
    MUST_EXECUTE_FIRST,
};

use crate::diagnostic::RuleError;
use crate::ir::Value;
use crate::literal::format_args;

/// Renders a command from its arguments.
pub type CommandTransform = fn(&[Value]) -> Result<String, RuleError>;

/// Renders a chained call or assertion from the current locator and the call's arguments.
pub type LocatorTransform = fn(&str, &[Value]) -> Result<String, RuleError>;

/// How a rule produces code. A rule is either a template or a transform, never both.
#[derive(Clone, Copy)]
pub enum RuleBody<F> {
    /// Text with `{args}` and, for chained rules, `{locator}` placeholders.
    /// For assertion rules the template is the bare matcher name.
    Template(&'static str),
    Transform(F),
}

/// Fills `{locator}` and `{args}` in a template.
///
/// Single pass: placeholder text inside the substituted values is never expanded.
pub(crate) fn render_template(template: &str, locator: &str, args: &[Value]) -> String {
    let args = format_args(args);
    let mut out = String::with_capacity(template.len() + locator.len() + args.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        if let Some(after) = tail.strip_prefix("{locator}") {
            out.push_str(locator);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{args}") {
            out.push_str(&args);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Required argument at `index`.
pub(crate) fn arg<'a>(args: &'a [Value], command: &'static str, index: usize) -> Result<&'a Value, RuleError> {
    args.get(index)
        .ok_or(RuleError::MissingArgument { command, index })
}

/// Required string argument at `index`.
pub(crate) fn arg_str<'a>(args: &'a [Value], command: &'static str, index: usize) -> Result<&'a str, RuleError> {
    arg(args, command, index)?
        .as_str()
        .ok_or(RuleError::InvalidArgument {
            command,
            index,
            expected: "a string",
        })
}

/// Raw object-literal arguments (`{ force: true }`), which carry over as Playwright options.
pub(crate) fn option_objects(args: &[Value]) -> Vec<Value> {
    args.iter()
        .filter(|v| matches!(v, Value::Raw { raw } if raw.trim_start().starts_with('{')))
        .cloned()
        .collect()
}
