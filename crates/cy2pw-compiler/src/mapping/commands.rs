//! Top-level `cy.<command>()` rules.

use super::{arg, arg_str, CommandTransform, RuleBody};
use crate::diagnostic::RuleError;
use crate::ir::Value;
use crate::literal::{format_value, quote};
use crate::naming::to_identifier;
use crate::selector::optimize_selector;

/// Maps one Cypress command onto Playwright.
pub struct CommandRule {
    pub source_name: &'static str,
    pub body: RuleBody<CommandTransform>,
    /// Whether the rendered code must be awaited.
    pub requires_suspension: bool,
    /// Import lines the rendered code depends on, beyond `@playwright/test`.
    pub imports: &'static [&'static str],
}

/// Commands that must run as their own statement before anything chained on them.
pub const MUST_EXECUTE_FIRST: &[&str] = &["intercept", "wait", "visit"];

pub fn must_execute_first(name: &str) -> bool {
    MUST_EXECUTE_FIRST.contains(&name)
}

const FS_IMPORT: &str = "import fs from 'fs';";

pub static COMMAND_RULES: &[CommandRule] = &[
    // Navigation
    rule("visit", RuleBody::Transform(visit), true),
    rule("reload", RuleBody::Template("page.reload()"), true),
    rule("go", RuleBody::Transform(go), true),
    rule("url", RuleBody::Template("page.url()"), false),
    rule("title", RuleBody::Template("page.title()"), true),
    rule("location", RuleBody::Transform(location), false),
    rule("hash", RuleBody::Template("new URL(page.url()).hash"), false),
    // Queries
    rule("get", RuleBody::Transform(selector_locator), false),
    rule("contains", RuleBody::Transform(text_locator), false),
    rule("focused", RuleBody::Template("page.locator(':focus')"), false),
    rule("window", RuleBody::Template("page.evaluateHandle(() => window)"), true),
    rule("document", RuleBody::Template("page.evaluateHandle(() => document)"), true),
    // Network
    rule("wait", RuleBody::Transform(wait), true),
    rule("intercept", RuleBody::Transform(intercept), true),
    rule("request", RuleBody::Transform(request), true),
    CommandRule {
        source_name: "fixture",
        body: RuleBody::Transform(fixture),
        requires_suspension: false,
        imports: &[FS_IMPORT],
    },
    // Browser state
    rule("viewport", RuleBody::Transform(viewport), true),
    rule("clearCookies", RuleBody::Template("page.context().clearCookies()"), true),
    rule("clearAllCookies", RuleBody::Template("page.context().clearCookies()"), true),
    rule("getCookies", RuleBody::Template("page.context().cookies()"), true),
    rule("getCookie", RuleBody::Transform(get_cookie), true),
    rule("setCookie", RuleBody::Transform(set_cookie), true),
    rule("clearLocalStorage", RuleBody::Template("page.evaluate(() => localStorage.clear())"), true),
    rule("scrollTo", RuleBody::Transform(scroll_to), true),
    rule("clock", RuleBody::Transform(clock), true),
    rule("tick", RuleBody::Transform(tick), true),
    // Debugging
    rule("screenshot", RuleBody::Transform(screenshot), true),
    rule("log", RuleBody::Template("console.log({args})"), false),
    rule("pause", RuleBody::Template("page.pause()"), true),
    rule("debug", RuleBody::Template("page.pause()"), true),
];

const fn rule(source_name: &'static str, body: RuleBody<CommandTransform>, requires_suspension: bool) -> CommandRule {
    CommandRule {
        source_name,
        body,
        requires_suspension,
        imports: &[],
    }
}

/// Looks up the rule for a command name.
pub fn lookup_command(name: &str) -> Option<&'static CommandRule> {
    COMMAND_RULES.iter().find(|rule| rule.source_name == name)
}

/// `cy.get(selector)`: the optimized locator, or a bound variable for `@alias` references.
pub fn selector_locator(args: &[Value]) -> Result<String, RuleError> {
    match arg(args, "get", 0)? {
        Value::String(selector) => match selector.strip_prefix('@') {
            Some(alias) => Ok(to_identifier(alias)),
            None => Ok(optimize_selector(selector)),
        },
        Value::Raw { raw } => Ok(format!("page.locator({raw})")),
        _ => Err(RuleError::InvalidArgument {
            command: "get",
            index: 0,
            expected: "a selector",
        }),
    }
}

/// `cy.contains(text)`, `cy.contains(text, options)` or `cy.contains(selector, text)`.
pub fn text_locator(args: &[Value]) -> Result<String, RuleError> {
    let is_options = |v: &Value| matches!(v, Value::Raw { raw } if raw.trim_start().starts_with('{'));
    match args {
        [] => Err(RuleError::MissingArgument {
            command: "contains",
            index: 0,
        }),
        [text] => Ok(format!("page.getByText({})", format_value(text))),
        [text, options] if is_options(options) => Ok(format!("page.getByText({})", format_value(text))),
        [selector, text, ..] => {
            let base = match selector {
                Value::String(s) => optimize_selector(s),
                other => format!("page.locator({})", format_value(other)),
            };
            Ok(format!("{base}.filter({{ hasText: {} }})", format_value(text)))
        }
    }
}

fn visit(args: &[Value]) -> Result<String, RuleError> {
    let url = arg(args, "visit", 0)?;
    Ok(format!("page.goto({})", format_value(url)))
}

fn go(args: &[Value]) -> Result<String, RuleError> {
    let direction = arg(args, "go", 0)?;
    let back = match direction {
        Value::String(s) if s == "back" => true,
        Value::String(s) if s == "forward" => false,
        Value::Number(n) if *n < 0.0 => true,
        Value::Number(n) if *n > 0.0 => false,
        _ => {
            return Err(RuleError::InvalidArgument {
                command: "go",
                index: 0,
                expected: "'back', 'forward' or a non-zero number",
            })
        }
    };
    Ok(if back { "page.goBack()" } else { "page.goForward()" }.to_string())
}

fn location(args: &[Value]) -> Result<String, RuleError> {
    match args.first() {
        None => Ok("new URL(page.url())".to_string()),
        Some(Value::String(key)) => Ok(format!("new URL(page.url()).{key}")),
        Some(_) => Err(RuleError::InvalidArgument {
            command: "location",
            index: 0,
            expected: "a URL property name",
        }),
    }
}

/// Numeric waits become timeouts; `@alias` waits become a network-idle wait, which is only
/// an approximation of waiting for the aliased request.
fn wait(args: &[Value]) -> Result<String, RuleError> {
    match arg(args, "wait", 0)? {
        Value::Number(ms) => Ok(format!("page.waitForTimeout({})", format_value(&Value::Number(*ms)))),
        Value::String(s) if s.starts_with('@') => Ok("page.waitForLoadState('networkidle')".to_string()),
        Value::Raw { raw } if raw.trim_start().starts_with('[') => {
            Ok("page.waitForLoadState('networkidle')".to_string())
        }
        _ => Err(RuleError::InvalidArgument {
            command: "wait",
            index: 0,
            expected: "milliseconds or an @alias",
        }),
    }
}

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

fn is_http_method(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| HTTP_METHODS.contains(&s.to_ascii_uppercase().as_str()))
}

/// `cy.intercept([method,] url [, response])` to `page.route`.
fn intercept(args: &[Value]) -> Result<String, RuleError> {
    let (method, rest) = match args.first() {
        Some(first) if is_http_method(first) && args.len() > 1 => (first.as_str(), &args[1..]),
        _ => (None, args),
    };
    let url = arg(rest, "intercept", 0)?;
    let handler = match rest.get(1) {
        Some(response) => format!("route.fulfill({{ json: {} }})", format_value(response)),
        None => "route.continue()".to_string(),
    };
    let handler = match method {
        Some(method) => format!(
            "route.request().method() === {} ? {handler} : route.fallback()",
            quote(&method.to_ascii_uppercase())
        ),
        None => handler,
    };
    Ok(format!("page.route({}, route => {handler})", format_value(url)))
}

/// `cy.request(url)`, `cy.request(method, url [, body])` or `cy.request({ ... })`.
fn request(args: &[Value]) -> Result<String, RuleError> {
    match args {
        [] => Err(RuleError::MissingArgument {
            command: "request",
            index: 0,
        }),
        [Value::Raw { raw }] if raw.trim_start().starts_with('{') => {
            Ok(format!("page.request.fetch({raw}.url, {raw})"))
        }
        [method, url, rest @ ..] if is_http_method(method) => {
            let method = method.as_str().unwrap_or("GET").to_ascii_uppercase();
            let mut options = format!("method: {}", quote(&method));
            if let Some(body) = rest.first() {
                options.push_str(&format!(", data: {}", format_value(body)));
            }
            Ok(format!("page.request.fetch({}, {{ {options} }})", format_value(url)))
        }
        [url, ..] => Ok(format!("page.request.get({})", format_value(url))),
    }
}

fn fixture(args: &[Value]) -> Result<String, RuleError> {
    let name = arg_str(args, "fixture", 0)?;
    let file = if name.contains('.') {
        name.to_string()
    } else {
        format!("{name}.json")
    };
    Ok(format!(
        "JSON.parse(fs.readFileSync({}, 'utf-8'))",
        quote(&format!("cypress/fixtures/{file}"))
    ))
}

/// Named Cypress viewport presets.
const VIEWPORT_PRESETS: &[(&str, u32, u32)] = &[
    ("ipad-2", 768, 1024),
    ("ipad-mini", 768, 1024),
    ("iphone-6", 375, 667),
    ("iphone-x", 375, 812),
    ("iphone-xr", 414, 896),
    ("macbook-13", 1280, 800),
    ("macbook-15", 1440, 900),
    ("macbook-16", 1536, 960),
    ("samsung-s10", 360, 760),
];

fn viewport(args: &[Value]) -> Result<String, RuleError> {
    let (width, height) = match args {
        [Value::Number(w), Value::Number(h), ..] => (format_value(&Value::Number(*w)), format_value(&Value::Number(*h))),
        [Value::String(preset), rest @ ..] => {
            let (_, w, h) = VIEWPORT_PRESETS
                .iter()
                .find(|(name, _, _)| name == preset)
                .ok_or(RuleError::InvalidArgument {
                    command: "viewport",
                    index: 0,
                    expected: "a known device preset",
                })?;
            // Cypress presets are portrait unless 'landscape' is passed.
            if rest.first().and_then(Value::as_str) == Some("landscape") {
                (h.to_string(), w.to_string())
            } else {
                (w.to_string(), h.to_string())
            }
        }
        [] => {
            return Err(RuleError::MissingArgument {
                command: "viewport",
                index: 0,
            })
        }
        _ => {
            return Err(RuleError::InvalidArgument {
                command: "viewport",
                index: 0,
                expected: "width and height or a preset",
            })
        }
    };
    Ok(format!("page.setViewportSize({{ width: {width}, height: {height} }})"))
}

fn get_cookie(args: &[Value]) -> Result<String, RuleError> {
    let name = arg(args, "getCookie", 0)?;
    Ok(format!(
        "page.context().cookies().then(cookies => cookies.find(c => c.name === {}))",
        format_value(name)
    ))
}

fn set_cookie(args: &[Value]) -> Result<String, RuleError> {
    let name = arg(args, "setCookie", 0)?;
    let value = arg(args, "setCookie", 1)?;
    Ok(format!(
        "page.context().addCookies([{{ name: {}, value: {}, url: page.url() }}])",
        format_value(name),
        format_value(value)
    ))
}

fn scroll_to(args: &[Value]) -> Result<String, RuleError> {
    let (x, y) = match args {
        [Value::String(position), ..] => match position.as_str() {
            "top" | "topLeft" => ("0", "0"),
            "bottom" | "bottomLeft" => ("0", "document.body.scrollHeight"),
            "topRight" => ("document.body.scrollWidth", "0"),
            "bottomRight" => ("document.body.scrollWidth", "document.body.scrollHeight"),
            "left" => ("0", "window.scrollY"),
            "right" => ("document.body.scrollWidth", "window.scrollY"),
            _ => {
                return Err(RuleError::InvalidArgument {
                    command: "scrollTo",
                    index: 0,
                    expected: "a named position",
                })
            }
        },
        [x, y, ..] => {
            return Ok(format!(
                "page.evaluate(() => window.scrollTo({}, {}))",
                format_value(x),
                format_value(y)
            ))
        }
        _ => {
            return Err(RuleError::MissingArgument {
                command: "scrollTo",
                index: 0,
            })
        }
    };
    Ok(format!("page.evaluate(() => window.scrollTo({x}, {y}))"))
}

fn clock(args: &[Value]) -> Result<String, RuleError> {
    match args.first() {
        None => Ok("page.clock.install()".to_string()),
        Some(time) => Ok(format!("page.clock.install({{ time: {} }})", format_value(time))),
    }
}

fn tick(args: &[Value]) -> Result<String, RuleError> {
    let ms = arg(args, "tick", 0)?;
    Ok(format!("page.clock.runFor({})", format_value(ms)))
}

fn screenshot(args: &[Value]) -> Result<String, RuleError> {
    match args.first().and_then(Value::as_str) {
        Some(name) => Ok(format!(
            "page.screenshot({{ path: {} }})",
            quote(&format!("screenshots/{name}.png"))
        )),
        None => Ok("page.screenshot()".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn render(name: &str, args: &[Value]) -> Result<String, RuleError> {
        let rule = lookup_command(name).unwrap();
        match rule.body {
            RuleBody::Template(t) => Ok(super::super::render_template(t, "", args)),
            RuleBody::Transform(f) => f(args),
        }
    }

    #[test]
    fn test_one_rule_per_name() {
        let mut seen = HashSet::new();
        for rule in COMMAND_RULES {
            assert!(seen.insert(rule.source_name), "duplicate rule for {}", rule.source_name);
        }
    }

    #[test]
    fn test_unknown_is_none() {
        assert!(lookup_command("customThing").is_none());
        assert!(lookup_command("task").is_none());
    }

    #[test]
    fn test_visit_requires_url() {
        assert_eq!(render("visit", &["/login".into()]).unwrap(), "page.goto('/login')");
        assert_eq!(
            render("visit", &[]),
            Err(RuleError::MissingArgument { command: "visit", index: 0 })
        );
    }

    #[test]
    fn test_wait_variants() {
        assert_eq!(render("wait", &[500.0.into()]).unwrap(), "page.waitForTimeout(500)");
        assert_eq!(
            render("wait", &["@getUsers".into()]).unwrap(),
            "page.waitForLoadState('networkidle')"
        );
        assert!(render("wait", &["soon".into()]).is_err());
    }

    #[test]
    fn test_intercept_variants() {
        assert_eq!(
            render("intercept", &["/api/users".into()]).unwrap(),
            "page.route('/api/users', route => route.continue())"
        );
        assert_eq!(
            render("intercept", &["GET".into(), "/api/users".into(), Value::raw("{ users: [] }")]).unwrap(),
            "page.route('/api/users', route => route.request().method() === 'GET' ? route.fulfill({ json: { users: [] } }) : route.fallback())"
        );
    }

    #[test]
    fn test_contains_forms() {
        assert_eq!(text_locator(&["Sign in".into()]).unwrap(), "page.getByText('Sign in')");
        assert_eq!(
            text_locator(&["button".into(), "Save".into()]).unwrap(),
            "page.locator('button').filter({ hasText: 'Save' })"
        );
    }

    #[test]
    fn test_get_alias_and_expression() {
        assert_eq!(selector_locator(&["@submitButton".into()]).unwrap(), "submitButton");
        assert_eq!(selector_locator(&[Value::raw("selectors.email")]).unwrap(), "page.locator(selectors.email)");
    }

    #[test]
    fn test_viewport_presets() {
        assert_eq!(
            render("viewport", &[1280.0.into(), 720.0.into()]).unwrap(),
            "page.setViewportSize({ width: 1280, height: 720 })"
        );
        assert_eq!(
            render("viewport", &["iphone-x".into(), "landscape".into()]).unwrap(),
            "page.setViewportSize({ width: 812, height: 375 })"
        );
        assert!(render("viewport", &["nokia-3310".into()]).is_err());
    }

    #[test]
    fn test_request_forms() {
        assert_eq!(render("request", &["/api/health".into()]).unwrap(), "page.request.get('/api/health')");
        assert_eq!(
            render("request", &["POST".into(), "/api/users".into(), Value::raw("{ name: 'a' }")]).unwrap(),
            "page.request.fetch('/api/users', { method: 'POST', data: { name: 'a' } })"
        );
    }

    #[test]
    fn test_fixture_declares_fs_import() {
        let rule = lookup_command("fixture").unwrap();
        assert_eq!(rule.imports, &[FS_IMPORT]);
        assert_eq!(
            render("fixture", &["users".into()]).unwrap(),
            "JSON.parse(fs.readFileSync('cypress/fixtures/users.json', 'utf-8'))"
        );
    }

    #[test]
    fn test_log_template() {
        assert_eq!(render("log", &["hello".into(), 2.0.into()]).unwrap(), "console.log('hello', 2)");
    }
}
