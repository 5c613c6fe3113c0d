//! Methods chained on a command result: `.click()`, `.type()`, `.find()`, ...

use super::{arg, arg_str, option_objects, render_template, LocatorTransform, RuleBody};
use crate::diagnostic::RuleError;
use crate::ir::Value;
use crate::literal::{format_args, format_value, quote};

/// What a chained method does to the chain.
#[derive(Clone, Copy)]
pub enum ChainKind {
    /// Emits a statement against the current locator.
    Action {
        body: RuleBody<LocatorTransform>,
        requires_suspension: bool,
    },
    /// Narrows the current locator; emits nothing.
    Refine(LocatorTransform),
    /// Emits nothing and warns with `reason`.
    Drop { reason: &'static str },
}

pub struct ChainRule {
    pub method: &'static str,
    pub kind: ChainKind,
}

pub static CHAIN_RULES: &[ChainRule] = &[
    // Actions
    action("click", RuleBody::Transform(click)),
    action("dblclick", RuleBody::Template("{locator}.dblclick()")),
    action("rightclick", RuleBody::Template("{locator}.click({ button: 'right' })")),
    action("type", RuleBody::Transform(type_text)),
    action("clear", RuleBody::Template("{locator}.clear()")),
    action("check", RuleBody::Transform(check)),
    action("uncheck", RuleBody::Transform(uncheck)),
    action("select", RuleBody::Template("{locator}.selectOption({args})")),
    action("focus", RuleBody::Template("{locator}.focus()")),
    action("blur", RuleBody::Template("{locator}.blur()")),
    action("hover", RuleBody::Template("{locator}.hover()")),
    action("trigger", RuleBody::Transform(trigger)),
    action("scrollIntoView", RuleBody::Template("{locator}.scrollIntoViewIfNeeded()")),
    action("invoke", RuleBody::Transform(invoke)),
    action("its", RuleBody::Transform(its)),
    action("submit", RuleBody::Template("{locator}.evaluate(form => (form as HTMLFormElement).requestSubmit())")),
    action("wait", RuleBody::Template("page.waitForTimeout({args})")),
    // Refinements
    ChainRule { method: "find", kind: ChainKind::Refine(find) },
    ChainRule { method: "first", kind: ChainKind::Refine(first) },
    ChainRule { method: "last", kind: ChainKind::Refine(last) },
    ChainRule { method: "eq", kind: ChainKind::Refine(nth) },
    ChainRule { method: "filter", kind: ChainKind::Refine(filter) },
    ChainRule { method: "parent", kind: ChainKind::Refine(parent) },
    ChainRule { method: "children", kind: ChainKind::Refine(children) },
    // Dropped
    ChainRule {
        method: "as",
        kind: ChainKind::Drop {
            reason: "Alias '.as()' has no Playwright equivalent; assign the locator to a variable instead",
        },
    },
];

const fn action(method: &'static str, body: RuleBody<LocatorTransform>) -> ChainRule {
    ChainRule {
        method,
        kind: ChainKind::Action {
            body,
            requires_suspension: true,
        },
    }
}

pub fn lookup_chain(method: &str) -> Option<&'static ChainRule> {
    CHAIN_RULES.iter().find(|rule| rule.method == method)
}

impl ChainRule {
    /// Renders an action or refinement against `locator`. Drops render to an empty string.
    pub fn apply(&self, locator: &str, args: &[Value]) -> Result<String, RuleError> {
        match self.kind {
            ChainKind::Action { body: RuleBody::Template(t), .. } => Ok(render_template(t, locator, args)),
            ChainKind::Action { body: RuleBody::Transform(f), .. } | ChainKind::Refine(f) => f(locator, args),
            ChainKind::Drop { .. } => Ok(String::new()),
        }
    }
}

fn with_options(locator: &str, method: &str, args: &[Value]) -> String {
    format!("{locator}.{method}({})", format_args(&option_objects(args)))
}

fn click(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    Ok(with_options(locator, "click", args))
}

fn check(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    Ok(with_options(locator, "check", args))
}

fn uncheck(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    Ok(with_options(locator, "uncheck", args))
}

/// Cypress `type` special sequences and the keyboard keys they press.
const KEY_SEQUENCES: &[(&str, &str)] = &[
    ("enter", "Enter"),
    ("esc", "Escape"),
    ("tab", "Tab"),
    ("backspace", "Backspace"),
    ("del", "Delete"),
    ("selectall", "ControlOrMeta+a"),
    ("uparrow", "ArrowUp"),
    ("downarrow", "ArrowDown"),
    ("leftarrow", "ArrowLeft"),
    ("rightarrow", "ArrowRight"),
    ("home", "Home"),
    ("end", "End"),
    ("pageup", "PageUp"),
    ("pagedown", "PageDown"),
];

enum Keystroke<'a> {
    Text(&'a str),
    Key(&'static str),
}

/// Splits typed text into literal runs and `{key}` presses. Unknown `{...}` stays literal.
fn keystrokes(text: &str) -> Vec<Keystroke<'_>> {
    let mut out = Vec::new();
    let mut rest = text;
    let mut literal_start = 0;
    let mut offset = 0;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else { break };
        let name = &rest[open + 1..open + close];
        let consumed = open + close + 1;
        if let Some((_, key)) = KEY_SEQUENCES.iter().find(|(seq, _)| seq.eq_ignore_ascii_case(name)) {
            if offset + open > literal_start {
                out.push(Keystroke::Text(&text[literal_start..offset + open]));
            }
            out.push(Keystroke::Key(*key));
            literal_start = offset + consumed;
        }
        offset += consumed;
        rest = &rest[consumed..];
    }
    if literal_start < text.len() || out.is_empty() {
        out.push(Keystroke::Text(&text[literal_start..]));
    }
    out
}

/// `type(text)` fills the field; embedded `{enter}`-style sequences become key presses.
fn type_text(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    let text = match arg(args, "type", 0)? {
        Value::String(s) => s,
        other => return Ok(format!("{locator}.fill({})", format_value(other))),
    };
    let statements: Vec<String> = keystrokes(text)
        .into_iter()
        .enumerate()
        .map(|(i, stroke)| match stroke {
            Keystroke::Text(t) if i == 0 => format!("{locator}.fill({})", quote(t)),
            Keystroke::Text(t) => format!("{locator}.pressSequentially({})", quote(t)),
            Keystroke::Key(k) => format!("{locator}.press({})", quote(k)),
        })
        .collect();
    Ok(statements.join(";\nawait "))
}

fn trigger(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    let event = arg(args, "trigger", 0)?;
    Ok(format!("{locator}.dispatchEvent({})", format_value(event)))
}

/// `invoke('text' | 'val' | 'html' | 'attr', name)` read element state.
fn invoke(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    match arg_str(args, "invoke", 0)? {
        "text" => Ok(format!("{locator}.textContent()")),
        "val" => Ok(format!("{locator}.inputValue()")),
        "html" => Ok(format!("{locator}.innerHTML()")),
        "attr" | "prop" => {
            let name = arg(args, "invoke", 1)?;
            Ok(format!("{locator}.getAttribute({})", format_value(name)))
        }
        _ => Err(RuleError::InvalidArgument {
            command: "invoke",
            index: 0,
            expected: "'text', 'val', 'html' or 'attr'",
        }),
    }
}

fn its(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    match arg_str(args, "its", 0)? {
        "length" => Ok(format!("{locator}.count()")),
        _ => Err(RuleError::InvalidArgument {
            command: "its",
            index: 0,
            expected: "'length'",
        }),
    }
}

fn find(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    let selector = arg(args, "find", 0)?;
    Ok(format!("{locator}.locator({})", format_value(selector)))
}

fn first(locator: &str, _args: &[Value]) -> Result<String, RuleError> {
    Ok(format!("{locator}.first()"))
}

fn last(locator: &str, _args: &[Value]) -> Result<String, RuleError> {
    Ok(format!("{locator}.last()"))
}

fn nth(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    match arg(args, "eq", 0)? {
        index @ (Value::Number(_) | Value::Raw { .. }) => Ok(format!("{locator}.nth({})", format_value(index))),
        _ => Err(RuleError::InvalidArgument {
            command: "eq",
            index: 0,
            expected: "an index",
        }),
    }
}

fn filter(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    let selector = arg(args, "filter", 0)?;
    Ok(format!("{locator}.and(page.locator({}))", format_value(selector)))
}

fn parent(locator: &str, _args: &[Value]) -> Result<String, RuleError> {
    Ok(format!("{locator}.locator('..')"))
}

fn children(locator: &str, args: &[Value]) -> Result<String, RuleError> {
    match args.first().and_then(Value::as_str) {
        Some(selector) => Ok(format!("{locator}.locator({})", quote(&format!(":scope > {selector}")))),
        None => Ok(format!("{locator}.locator(':scope > *')")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(method: &str, args: &[Value]) -> String {
        lookup_chain(method).unwrap().apply("L", args).unwrap()
    }

    #[test]
    fn test_click_keeps_option_objects() {
        assert_eq!(apply("click", &[]), "L.click()");
        assert_eq!(apply("click", &[Value::raw("{ force: true }")]), "L.click({ force: true })");
        assert_eq!(apply("click", &["topLeft".into()]), "L.click()");
    }

    #[test]
    fn test_type_plain_and_keys() {
        assert_eq!(apply("type", &["hello".into()]), "L.fill('hello')");
        assert_eq!(apply("type", &["hello{enter}".into()]), "L.fill('hello');\nawait L.press('Enter')");
        assert_eq!(apply("type", &["{selectall}{backspace}".into()]), "L.press('ControlOrMeta+a');\nawait L.press('Backspace')");
        assert_eq!(apply("type", &["{notakey}".into()]), "L.fill('{notakey}')");
        assert_eq!(apply("type", &[Value::raw("user.email")]), "L.fill(user.email)");
    }

    #[test]
    fn test_type_text_after_key() {
        assert_eq!(
            apply("type", &["a{tab}b".into()]),
            "L.fill('a');\nawait L.press('Tab');\nawait L.pressSequentially('b')"
        );
    }

    #[test]
    fn test_type_requires_text() {
        let rule = lookup_chain("type").unwrap();
        assert_eq!(
            rule.apply("L", &[]),
            Err(RuleError::MissingArgument { command: "type", index: 0 })
        );
    }

    #[test]
    fn test_refinements() {
        assert_eq!(apply("find", &["li".into()]), "L.locator('li')");
        assert_eq!(apply("eq", &[2.0.into()]), "L.nth(2)");
        assert_eq!(apply("filter", &[".active".into()]), "L.and(page.locator('.active'))");
        assert_eq!(apply("children", &["li".into()]), "L.locator(':scope > li')");
    }

    #[test]
    fn test_invoke_variants() {
        assert_eq!(apply("invoke", &["text".into()]), "L.textContent()");
        assert_eq!(apply("invoke", &["attr".into(), "href".into()]), "L.getAttribute('href')");
        assert!(lookup_chain("invoke").unwrap().apply("L", &["focus".into()]).is_err());
    }

    #[test]
    fn test_as_is_dropped() {
        let rule = lookup_chain("as").unwrap();
        assert!(matches!(rule.kind, ChainKind::Drop { .. }));
        assert_eq!(rule.apply("L", &["btn".into()]).unwrap(), "");
    }

    #[test]
    fn test_unknown_method() {
        assert!(lookup_chain("within").is_none());
        assert!(lookup_chain("should").is_none());
    }
}
