//! Base locators and chained actions.

use super::{Emitted, TranslationContext};
use crate::diagnostic::RuleError;
use crate::ir::{ChainedCall, ParsedCommand};
use crate::literal::format_args;
use crate::mapping::{lookup_chain, lookup_command, render_template, selector_locator, text_locator, ChainKind, RuleBody};

/// The expression chained calls operate on, computed once per chain.
pub(super) fn base_locator(command: &ParsedCommand, ctx: &mut TranslationContext) -> Result<String, RuleError> {
    match command.name.as_str() {
        "get" => selector_locator(&command.args),
        "contains" => text_locator(&command.args),
        "url" => Ok("page.url()".to_string()),
        name => match lookup_command(name) {
            Some(rule) => {
                for import in rule.imports {
                    ctx.require_import(import);
                }
                match rule.body {
                    RuleBody::Template(t) => Ok(render_template(t, "", &command.args)),
                    RuleBody::Transform(f) => f(&command.args),
                }
            }
            None => Ok("page".to_string()),
        },
    }
}

/// Applies one chained call to `locator`.
///
/// Actions return a statement and leave `locator` alone. Refinements rewrite `locator` and
/// return `None`, as do dropped methods after recording their warning.
pub(super) fn apply_chain(
    locator: &mut String,
    call: &ChainedCall,
    ctx: &mut TranslationContext,
) -> Result<Option<Emitted>, RuleError> {
    let Some(rule) = lookup_chain(&call.method) else {
        ctx.diagnose(format!("Unknown chained method: .{}()", call.method));
        return Ok(Some(Emitted::todo(&format!(
            "{locator}.{}({})",
            call.method,
            format_args(&call.args)
        ))));
    };
    match rule.kind {
        ChainKind::Action { requires_suspension, .. } => {
            let code = rule.apply(locator, &call.args)?;
            Ok(Some(Emitted::new(code, requires_suspension)))
        }
        ChainKind::Refine(_) => {
            *locator = rule.apply(locator, &call.args)?;
            Ok(None)
        }
        ChainKind::Drop { reason } => {
            ctx.diagnose(reason);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Value;

    #[test]
    fn test_base_locators() {
        let mut ctx = TranslationContext::new();
        let get = ParsedCommand::new("get", vec!["[role=dialog]".into()]);
        assert_eq!(base_locator(&get, &mut ctx).unwrap(), "page.getByRole('dialog')");
        let contains = ParsedCommand::new("contains", vec!["Welcome".into()]);
        assert_eq!(base_locator(&contains, &mut ctx).unwrap(), "page.getByText('Welcome')");
        let focused = ParsedCommand::new("focused", vec![]);
        assert_eq!(base_locator(&focused, &mut ctx).unwrap(), "page.locator(':focus')");
    }

    #[test]
    fn test_refine_then_action() {
        let mut ctx = TranslationContext::new();
        let mut locator = "page.locator('tr')".to_string();
        let refined = apply_chain(&mut locator, &ChainedCall::new("eq", vec![Value::Number(1.0)]), &mut ctx).unwrap();
        assert!(refined.is_none());
        let action = apply_chain(&mut locator, &ChainedCall::new("hover", vec![]), &mut ctx)
            .unwrap()
            .unwrap();
        assert_eq!(action.render(), "await page.locator('tr').nth(1).hover()");
        assert_eq!(locator, "page.locator('tr').nth(1)");
        assert!(ctx.diagnostics().is_empty());
    }
}
