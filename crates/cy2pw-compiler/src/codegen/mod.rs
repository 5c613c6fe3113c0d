//! Playwright project generation from the parsed Cypress project.
//!
//! Generates:
//! - one `*.spec.ts` per Cypress spec, in the same relative directory
//! - `support/helpers.ts` and `support/custom-commands.ts` for custom commands
//! - `playwright.config.ts`
//!
//! Nothing is written here; [`generate`] returns file contents and the conversion report.

pub mod project;
mod registry;
pub mod report;
mod spec_file;
pub mod support;

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::custom::{classify, classify_definition, has_named_pattern, ClassificationResult};
use crate::diagnostic::ConverterError;
use crate::ir::{ParsedCommand, ProjectIR, SpecFile, Statement, TestNode};
use crate::mapping::lookup_command;

pub use registry::{CommandRegistry, HelperUse, LoweredCall};
pub use report::{ConversionReport, CustomCommandReport, FileReport, REPORT_FILE};
pub use spec_file::{generate_spec, GeneratedSpec};

/// Generated Playwright project.
pub struct GeneratedCode {
    /// Output-relative path and content, in generation order.
    pub files: Vec<(String, String)>,
    pub report: ConversionReport,
}

/// Generates the Playwright project for `project`.
pub fn generate(project: &ProjectIR) -> Result<GeneratedCode, ConverterError> {
    let classified = classify_commands(project);
    let registry = CommandRegistry::new(&classified);
    let mut files = Vec::new();
    let mut file_reports = Vec::new();

    for spec in &project.spec_files {
        let relative = spec.path.strip_prefix(&project.source_dir).unwrap_or(&spec.path);
        let output = project::output_path(relative);
        let generated = generate_spec(spec, &output, &registry);
        debug!(
            source = %relative.display(),
            output = %output.display(),
            commands = generated.commands,
            todos = generated.todos,
            "generated spec"
        );

        file_reports.push(FileReport {
            source: path_string(relative),
            output: path_string(&output),
            commands: generated.commands,
            converted: generated.converted,
            todos: generated.todos,
            diagnostics: generated.diagnostics,
        });
        files.push((path_string(&output), generated.code));
    }

    if let Some(helpers) = support::generate_helpers(&classified) {
        files.push((support::HELPERS_FILE.to_string(), helpers));
    }
    if let Some(page_objects) = support::generate_page_objects(&classified) {
        files.push((support::PAGE_OBJECT_FILE.to_string(), page_objects));
    }
    files.push((
        "playwright.config.ts".to_string(),
        project::generate_playwright_config(project.base_url.as_deref()),
    ));

    let custom_reports = classified.iter().map(CustomCommandReport::from).collect();
    Ok(GeneratedCode {
        files,
        report: ConversionReport::new(file_reports, custom_reports),
    })
}

/// Classifies every defined custom command, plus undefined commands that are called in a spec
/// and match a named pattern.
pub fn classify_commands(project: &ProjectIR) -> Vec<ClassificationResult> {
    let mut results: Vec<ClassificationResult> = project.custom_commands.iter().map(classify_definition).collect();
    let mut known: HashSet<String> = results.iter().map(|r| r.name.clone()).collect();

    for spec in &project.spec_files {
        for_each_command(spec, &mut |command| {
            if lookup_command(&command.name).is_none()
                && !known.contains(&command.name)
                && has_named_pattern(&command.name)
            {
                debug!(command = %command.name, "classifying undefined command from its call site");
                known.insert(command.name.clone());
                results.push(classify(&command.source_form()));
            }
        });
    }
    results
}

fn for_each_command(spec: &SpecFile, f: &mut impl FnMut(&ParsedCommand)) {
    fn visit(nodes: &[TestNode], f: &mut impl FnMut(&ParsedCommand)) {
        for node in nodes {
            match node {
                TestNode::Suite { children, .. } => visit(children, f),
                TestNode::Test { body, .. } | TestNode::Hook { body, .. } => {
                    for statement in body {
                        if let Statement::Command { command, .. } = statement {
                            f(command);
                        }
                    }
                }
                TestNode::Statement(Statement::Command { command, .. }) => f(command),
                TestNode::Statement(_) => {}
            }
        }
    }
    visit(&spec.nodes, f)
}

fn path_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
