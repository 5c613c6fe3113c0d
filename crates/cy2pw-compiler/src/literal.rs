//! Quoting and escaping for generated TypeScript.
//!
//! Every rule, handler and generator renders literals through these helpers so quoting
//! stays identical across the whole output.

use crate::ir::Value;

/// Wraps `s` in single quotes, escaping backslashes, single quotes and line breaks.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Strips one matching pair of leading/trailing quote characters (`'`, `"` or `` ` ``).
///
/// Anything that is not wrapped in a matching pair is returned unchanged.
pub fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if matches!(first, b'\'' | b'"' | b'`') && bytes[bytes.len() - 1] == first {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Returns true when `s` is a single quoted literal (not a concatenation or call).
pub fn is_quoted(s: &str) -> bool {
    let inner = strip_quotes(s);
    if inner.len() == s.len() {
        return false;
    }
    let quote_char = s.as_bytes()[0] as char;
    // 'a' + 'b' strips to a' + 'b; reject when the delimiter shows up unescaped inside.
    let mut escaped = false;
    for c in inner.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote_char {
            return false;
        }
    }
    true
}

/// Resolves JavaScript string escapes in the body of a quoted literal.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Re-emits a raw argument token: quoted literals are normalized to single quotes,
/// everything else (identifiers, objects, calls) is kept verbatim.
pub fn requote(token: &str) -> String {
    let token = token.trim();
    if is_quoted(token) && !token.starts_with('`') {
        quote(&unescape(strip_quotes(token)))
    } else {
        token.to_string()
    }
}

/// Renders a single argument value as TypeScript source.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => quote(s),
        Value::Raw { raw } => raw.clone(),
    }
}

/// Renders an argument list, comma separated.
pub fn format_args(args: &[Value]) -> String {
    args.iter().map(format_value).collect::<Vec<_>>().join(", ")
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Escapes `s` for use inside a JavaScript regular expression literal (`/.../`).
pub fn escape_regex(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        if matches!(
            c,
            '\\' | '^' | '$' | '.' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '/'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Collapses a possibly multi-line expression onto one line, for use inside `//` comments.
pub fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
