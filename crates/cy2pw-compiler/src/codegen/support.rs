//! Support files shared by the generated specs.

use crate::custom::{generate_page_object, ClassificationResult, ConversionStrategy, PAGE_OBJECT_CLASS};

/// Output path of the helper module, relative to the output directory.
pub const HELPERS_FILE: &str = "support/helpers.ts";

/// Output path of the page object module, relative to the output directory.
pub const PAGE_OBJECT_FILE: &str = "support/custom-commands.ts";

const EXPECT_IMPORT: &str = "import { expect } from '@playwright/test';";

/// `support/helpers.ts`: utility functions plus stubs for commands that need manual work.
pub fn generate_helpers(results: &[ClassificationResult]) -> Option<String> {
    let helpers: Vec<&ClassificationResult> = results
        .iter()
        .filter(|r| matches!(r.strategy, ConversionStrategy::Utility | ConversionStrategy::Manual))
        .collect();
    if helpers.is_empty() {
        return None;
    }

    let mut imports: Vec<&str> = Vec::new();
    for result in &helpers {
        for import in &result.imports {
            if !imports.contains(&import.as_str()) {
                imports.push(import);
            }
        }
    }
    let body = helpers
        .iter()
        .map(|r| r.generated_code.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n");
    if body.contains("expect(") {
        imports.push(EXPECT_IMPORT);
    }

    let mut out = String::new();
    if !imports.is_empty() {
        out.push_str(&imports.join("\n"));
        out.push_str("\n\n");
    }
    out.push_str(&body);
    out.push('\n');
    Some(out)
}

/// `support/custom-commands.ts`: the page object class.
pub fn generate_page_objects(results: &[ClassificationResult]) -> Option<String> {
    let code = generate_page_object(PAGE_OBJECT_CLASS, results)?;
    if code.contains("expect(") {
        Some(format!("{EXPECT_IMPORT}\n{code}"))
    } else {
        Some(code)
    }
}
