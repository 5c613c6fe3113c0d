//! Identifier case conversions for generated TypeScript.

/// Converts `snake_case`, `kebab-case` or space separated words to PascalCase.
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Converts a name to camelCase.
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Turns an alias or file stem into a valid JavaScript identifier.
///
/// Names that already are identifiers are kept as written, so `submitButton` stays
/// `submitButton` rather than being re-cased.
pub fn to_identifier(s: &str) -> String {
    let is_ident = !s.is_empty()
        && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !s.starts_with(|c: char| c.is_ascii_digit());
    if is_ident {
        return s.to_string();
    }
    let camel = to_camel_case(s);
    if camel.is_empty() {
        "value".to_string()
    } else if camel.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{camel}")
    } else {
        camel
    }
}
