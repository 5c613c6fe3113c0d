//! Cypress frontend.

pub mod parser;

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use super::Frontend;
use crate::diagnostic::ConverterError;
use crate::ir::ProjectIR;
use parser::CypressParser;

/// Config files that may carry `baseUrl`, in lookup order.
const CONFIG_FILES: &[&str] = &[
    "cypress.config.ts",
    "cypress.config.js",
    "cypress.config.mjs",
    "cypress.config.cjs",
    "cypress.json",
];

static BASE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"baseUrl\s*:\s*['"`]([^'"`]+)['"`]"#).expect("static baseUrl pattern"));

/// Cypress frontend implementation.
pub struct CypressFrontend {
    parser: CypressParser,
}

impl CypressFrontend {
    /// Creates a new Cypress frontend.
    pub fn new() -> Result<Self, ConverterError> {
        Ok(Self {
            parser: CypressParser::new()?,
        })
    }

    /// Direct access to the parser, for single files and snippets.
    pub fn parser_mut(&mut self) -> &mut CypressParser {
        &mut self.parser
    }
}

impl Frontend for CypressFrontend {
    fn language(&self) -> &str {
        "cypress"
    }

    fn extensions(&self) -> &[&str] {
        &["js", "ts", "jsx", "tsx"]
    }

    fn parse_directory(&mut self, dir: &Path) -> Result<ProjectIR, ConverterError> {
        if !dir.is_dir() {
            return Err(ConverterError::io(dir, "not a directory"));
        }
        let mut project = ProjectIR::new(dir.to_path_buf());
        project.base_url = find_base_url(dir)?;

        let walker = WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != "node_modules");

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || !self.is_source_file(path) {
                continue;
            }
            let relative = path.strip_prefix(dir).unwrap_or(path);
            let kind = classify_path(relative);
            if kind == FileKind::Other {
                continue;
            }

            let source = std::fs::read_to_string(path).map_err(|e| ConverterError::io(path, e.to_string()))?;
            let mut parsed = self.parser.parse(&source, path)?;
            debug!(
                path = %relative.display(),
                commands = parsed.command_count(),
                custom_commands = parsed.custom_commands.len(),
                "parsed"
            );

            project.custom_commands.append(&mut parsed.custom_commands);
            if kind == FileKind::Spec {
                project.spec_files.push(parsed);
            }
        }

        Ok(project)
    }
}

impl CypressFrontend {
    fn is_source_file(&self, path: &Path) -> bool {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if name.ends_with(".d.ts") {
            return false;
        }
        path.extension()
            .map(|ext| self.extensions().contains(&ext.to_string_lossy().as_ref()))
            .unwrap_or(false)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FileKind {
    Spec,
    /// Only scanned for `Cypress.Commands.add`.
    Support,
    Other,
}

fn classify_path(relative: &Path) -> FileKind {
    let in_dir = |name: &str| {
        relative
            .parent()
            .map(|p| p.components().any(|c| c == Component::Normal(name.as_ref())))
            .unwrap_or(false)
    };
    let file_name = relative.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();

    if in_dir("support") {
        FileKind::Support
    } else if file_name.contains(".cy.") || file_name.contains(".spec.") || in_dir("e2e") || in_dir("integration") {
        FileKind::Spec
    } else {
        FileKind::Other
    }
}

/// Looks for `baseUrl` next to the source directory and one level up.
pub fn find_base_url(dir: &Path) -> Result<Option<String>, ConverterError> {
    let candidates = std::iter::once(dir).chain(dir.parent());
    for base in candidates {
        for name in CONFIG_FILES {
            let path = base.join(name);
            if !path.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(&path).map_err(|e| ConverterError::io(&path, e.to_string()))?;
            let url = if *name == "cypress.json" {
                let json: serde_json::Value = serde_json::from_str(&text).map_err(|e| ConverterError::InvalidConfig {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                json.get("baseUrl").and_then(|v| v.as_str()).map(str::to_string)
            } else {
                BASE_URL.captures(&text).map(|c| c[1].to_string())
            };
            debug!(path = %path.display(), base_url = ?url, "read cypress config");
            return Ok(url);
        }
    }
    Ok(None)
}
