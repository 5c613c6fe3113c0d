//! Page object assembly.

use super::{ClassificationResult, ConversionStrategy, PAGE_TYPE_IMPORT};

/// Name of the class every `pageObject` command is grouped into.
pub const PAGE_OBJECT_CLASS: &str = "CustomCommands";

/// Groups every `pageObject` result into one exported class.
///
/// Results with any other strategy are ignored. Returns `None` when there is nothing to group.
pub fn generate_page_object(class_name: &str, results: &[ClassificationResult]) -> Option<String> {
    let methods: Vec<&ClassificationResult> = results
        .iter()
        .filter(|r| r.strategy == ConversionStrategy::PageObject)
        .collect();
    if methods.is_empty() {
        return None;
    }

    let mut imports = vec![PAGE_TYPE_IMPORT];
    for result in &methods {
        for import in &result.imports {
            if !imports.contains(&import.as_str()) {
                imports.push(import);
            }
        }
    }

    let mut out = imports.join("\n");
    out.push_str("\n\n");
    out.push_str(&format!("export class {class_name} {{\n"));
    out.push_str("  constructor(private readonly page: Page) {}\n");
    for result in methods {
        out.push('\n');
        for line in result.generated_code.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("  {line}\n"));
            }
        }
    }
    out.push_str("}\n");
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom::ComplexityTag;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_groups_page_object_methods() {
        let results = vec![
            ClassificationResult::new(
                "fillForm",
                ConversionStrategy::PageObject,
                ComplexityTag::Medium,
                "async fillForm(): Promise<void> {\n  await this.page.locator('#a').fill('x');\n}",
            ),
            ClassificationResult::new("log", ConversionStrategy::Direct, ComplexityTag::Low, "console.log();"),
        ];
        assert_eq!(
            generate_page_object(PAGE_OBJECT_CLASS, &results).unwrap(),
            "import type { Page } from '@playwright/test';\n\n\
             export class CustomCommands {\n\
             \x20 constructor(private readonly page: Page) {}\n\
             \n\
             \x20 async fillForm(): Promise<void> {\n\
             \x20   await this.page.locator('#a').fill('x');\n\
             \x20 }\n\
             }\n"
        );
    }

    #[test]
    fn test_nothing_to_group() {
        assert!(generate_page_object(PAGE_OBJECT_CLASS, &[]).is_none());
    }
}
