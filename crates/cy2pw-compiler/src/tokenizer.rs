//! Delimiter-aware argument splitting.
//!
//! Custom command sources are handled as text, and their argument lists routinely hold
//! object literals, arrays and callbacks with commas of their own. A plain `split(',')`
//! would cut those apart; this scanner only splits on commas at nesting depth zero.

/// Scanner state shared by [`tokenize_args`] and [`find_closing_paren`].
#[derive(Debug, Default)]
struct Depth {
    /// Active quote character, if inside a string.
    quote: Option<char>,
    /// Previous character was a backslash inside a string.
    escaped: bool,
    braces: usize,
    brackets: usize,
    parens: usize,
}

impl Depth {
    fn at_top_level(&self) -> bool {
        self.quote.is_none() && self.braces == 0 && self.brackets == 0 && self.parens == 0
    }

    fn feed(&mut self, c: char) {
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == q {
                self.quote = None;
            }
            return;
        }
        match c {
            '\'' | '"' | '`' => self.quote = Some(c),
            '{' => self.braces += 1,
            '}' => self.braces = self.braces.saturating_sub(1),
            '[' => self.brackets += 1,
            ']' => self.brackets = self.brackets.saturating_sub(1),
            '(' => self.parens += 1,
            ')' => self.parens = self.parens.saturating_sub(1),
            _ => {}
        }
    }
}

/// Splits the text between a call's outer parentheses into trimmed arguments.
///
/// Commas inside quotes, `{}`, `[]` or `()` belong to the current argument. Empty input
/// yields no arguments, and a trailing top-level comma does not add an empty one.
pub fn tokenize_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = Depth::default();

    for c in input.chars() {
        if c == ',' && depth.at_top_level() {
            args.push(current.trim().to_string());
            current.clear();
            continue;
        }
        depth.feed(c);
        current.push(c);
    }

    let last = current.trim();
    if !last.is_empty() {
        args.push(last.to_string());
    }
    args
}

/// Given the byte index of an opening `(`, returns the byte index of its matching `)`.
///
/// Parentheses inside string literals are ignored. Returns `None` when `open` is not a
/// `(` or the call is never closed.
pub fn find_closing_paren(text: &str, open: usize) -> Option<usize> {
    if text.as_bytes().get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = Depth::default();
    for (offset, c) in text[open..].char_indices() {
        depth.feed(c);
        if c == ')' && depth.at_top_level() {
            return Some(open + offset);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(tokenize_args("").is_empty());
        assert!(tokenize_args("   ").is_empty());
    }

    #[test]
    fn test_simple_split() {
        assert_eq!(tokenize_args("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_nested_delimiters() {
        assert_eq!(
            tokenize_args("'a, b', {x: 1, y: 2}, (a,b)=>a+b"),
            vec!["'a, b'", "{x: 1, y: 2}", "(a,b)=>a+b"]
        );
    }

    #[test]
    fn test_other_quote_is_not_a_delimiter() {
        assert_eq!(tokenize_args(r#""it's, fine", 'say "hi, there"'"#), vec![
            r#""it's, fine""#,
            r#"'say "hi, there"'"#,
        ]);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        assert_eq!(tokenize_args(r"'it\'s, ok', 2"), vec![r"'it\'s, ok'", "2"]);
    }

    #[test]
    fn test_arrays_and_template_literals() {
        assert_eq!(
            tokenize_args("['a', 'b'], `x, ${y}`, fn(1, [2, 3])"),
            vec!["['a', 'b']", "`x, ${y}`", "fn(1, [2, 3])"]
        );
    }

    #[test]
    fn test_trailing_comma() {
        assert_eq!(tokenize_args("a, b,"), vec!["a", "b"]);
    }

    #[test]
    fn test_find_closing_paren() {
        let text = "cy.login('a)', fn(1)) + rest";
        let open = text.find('(').unwrap();
        let close = find_closing_paren(text, open).unwrap();
        assert_eq!(&text[open..=close], "('a)', fn(1))");
    }

    #[test]
    fn test_find_closing_paren_unbalanced() {
        assert_eq!(find_closing_paren("f(a, (b)", 1), None);
        assert_eq!(find_closing_paren("f(a)", 0), None);
    }
}
