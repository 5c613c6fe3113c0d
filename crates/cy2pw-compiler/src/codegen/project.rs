//! Output layout and Playwright project scaffolding.

use std::path::{Component, Path, PathBuf};

use crate::literal::quote;

/// Directories Cypress keeps specs in; they carry no meaning in a Playwright test directory.
const SPEC_ROOTS: &[&str] = &["e2e", "integration"];

/// Maps a spec path (relative to the Cypress directory) to its Playwright output path.
///
/// `e2e/auth/login.cy.js` becomes `auth/login.spec.ts`.
pub fn output_path(relative: &Path) -> PathBuf {
    let mut components: Vec<Component> = relative.components().collect();
    if let Some(Component::Normal(first)) = components.first() {
        if components.len() > 1 && SPEC_ROOTS.iter().any(|root| first == root) {
            components.remove(0);
        }
    }
    let mut out: PathBuf = components.iter().collect();

    let file_name = relative.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let stem = file_name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(&file_name);
    let stem = stem
        .strip_suffix(".cy")
        .or_else(|| stem.strip_suffix(".spec"))
        .or_else(|| stem.strip_suffix(".test"))
        .unwrap_or(stem);
    out.set_file_name(format!("{stem}.spec.ts"));
    out
}

/// Module specifier for `target` (a path under the output directory, without extension) as
/// imported from the file at `from`.
pub fn import_specifier(from: &Path, target: &Path) -> String {
    let from_dir = from.parent().unwrap_or_else(|| Path::new(""));
    let relative = pathdiff::diff_paths(target, from_dir).unwrap_or_else(|| target.to_path_buf());
    let specifier = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if specifier.starts_with("..") {
        specifier
    } else {
        format!("./{specifier}")
    }
}

/// Generates `playwright.config.ts`.
pub fn generate_playwright_config(base_url: Option<&str>) -> String {
    let base_url = match base_url {
        Some(url) => format!("    baseURL: {},\n", quote(url)),
        None => "    // baseURL: 'http://localhost:3000',\n".to_string(),
    };
    format!(
        r#"import {{ defineConfig, devices }} from '@playwright/test';

export default defineConfig({{
  testDir: '.',
  fullyParallel: true,
  retries: process.env.CI ? 2 : 0,
  reporter: 'html',
  use: {{
{base_url}    trace: 'on-first-retry',
  }},
  projects: [
    {{
      name: 'chromium',
      use: {{ ...devices['Desktop Chrome'] }},
    }},
  ],
}});
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(output_path(Path::new("e2e/login.cy.ts")), PathBuf::from("login.spec.ts"));
        assert_eq!(output_path(Path::new("e2e/auth/signup.cy.js")), PathBuf::from("auth/signup.spec.ts"));
        assert_eq!(output_path(Path::new("integration/home.js")), PathBuf::from("home.spec.ts"));
        assert_eq!(output_path(Path::new("smoke/cart.spec.tsx")), PathBuf::from("smoke/cart.spec.ts"));
        assert_eq!(output_path(Path::new("e2e.cy.js")), PathBuf::from("e2e.spec.ts"));
    }

    #[test]
    fn test_import_specifier() {
        assert_eq!(
            import_specifier(Path::new("login.spec.ts"), Path::new("support/helpers")),
            "./support/helpers"
        );
        assert_eq!(
            import_specifier(Path::new("auth/deep/signup.spec.ts"), Path::new("support/helpers")),
            "../../support/helpers"
        );
    }

    #[test]
    fn test_playwright_config_base_url() {
        let config = generate_playwright_config(Some("http://localhost:8080"));
        assert!(config.contains("    baseURL: 'http://localhost:8080',\n"));
        assert!(config.contains("testDir: '.'"));
        assert!(generate_playwright_config(None).contains("// baseURL"));
    }
}
