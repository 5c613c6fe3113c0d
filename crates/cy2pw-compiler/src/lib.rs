//! # cy2pw Compiler
//!
//! This crate converts Cypress test suites into Playwright Test code. The core is a set of
//! static mapping tables plus a translator that lowers one `cy.<command>(...)` chain at a time;
//! a Cypress frontend and a code generator wrap it into a whole-project converter.
//!
//! ## Architecture
//!
//! ```text
//! Cypress project (js/ts)
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Frontend   │  tree-sitter parsing, describe/it/hooks,
//! │  (TS → IR)   │  cy chains, Cypress.Commands.add
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Validate   │  Duplicate custom commands
//! │   (IR)       │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Translate   │  Mapping tables, selector optimizer,
//! │  + Classify  │  custom command strategies
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  *.spec.ts, support files,
//! │  (IR → TS)   │  playwright.config.ts, report
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cy2pw_compiler::{Converter, ConverterConfig};
//!
//! let config = ConverterConfig {
//!     source_dir: "cypress".into(),
//!     out_dir: "tests".into(),
//!     ..ConverterConfig::default()
//! };
//!
//! let result = Converter::new(config).convert()?;
//! println!("{} files written", result.files_written);
//! ```
//!
//! Single commands can be translated without touching the file system:
//!
//! ```
//! use cy2pw_compiler::{translate, ParsedCommand};
//!
//! let command = ParsedCommand::new("get", vec!["#email".into()]).chain("type", vec!["a@b.co".into()]);
//! assert_eq!(translate(&command).code, "await page.locator('#email').fill('a@b.co')");
//! ```

pub mod codegen;
pub mod config;
pub mod custom;
pub mod diagnostic;
pub mod frontend;
pub mod ir;
pub mod literal;
pub mod mapping;
pub mod naming;
pub mod selector;
pub mod tokenizer;
pub mod translate;
pub mod validate;

use std::path::Path;

use tracing::{debug, info};

pub use codegen::{ConversionReport, CustomCommandReport, FileReport, REPORT_FILE};
pub use config::ConverterConfig;
pub use custom::{classify, classify_definition, ClassificationResult, ComplexityTag, ConversionStrategy};
pub use diagnostic::{ConverterError, RuleError};
pub use ir::{ChainedCall, ParsedCommand, Value};
pub use selector::optimize_selector;
pub use tokenizer::tokenize_args;
pub use translate::{translate, TranslationContext, TranslationResult};

use frontend::cypress::parser::CypressParser;
use ir::ProjectIR;

/// The main converter struct that orchestrates the conversion pipeline.
pub struct Converter {
    config: ConverterConfig,
}

/// Result of a successful [`Converter::convert`].
#[derive(Debug)]
pub struct ConvertResult {
    /// Number of spec files converted.
    pub spec_files: usize,
    /// Number of files written, support files and config included.
    pub files_written: usize,
    pub report: ConversionReport,
}

/// One spec converted in memory by [`Converter::convert_source`].
#[derive(Debug)]
pub struct ConvertedFile {
    pub code: String,
    pub report: FileReport,
    /// Custom commands defined in the same file.
    pub custom_commands: Vec<ClassificationResult>,
}

impl Converter {
    /// Creates a new converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Converts the configured Cypress project.
    ///
    /// This runs the full pipeline:
    /// 1. Parse spec and support files into IR
    /// 2. Validate the project
    /// 3. Classify custom commands and generate Playwright code
    /// 4. Write output files and the report
    pub fn convert(&self) -> Result<ConvertResult, ConverterError> {
        let project = self.parse()?;
        let generated = codegen::generate(&project)?;

        let written = self.write_output(&generated.files)?;
        if self.config.write_report {
            let path = self.config.out_dir.join(REPORT_FILE);
            let json = serde_json::to_string_pretty(&generated.report)
                .map_err(|e| ConverterError::io(&path, e.to_string()))?;
            std::fs::write(&path, json).map_err(|e| ConverterError::io(&path, e.to_string()))?;
        }
        info!(
            specs = project.spec_files.len(),
            files = written,
            todos = generated.report.totals.todos,
            "conversion finished"
        );

        Ok(ConvertResult {
            spec_files: project.spec_files.len(),
            files_written: written,
            report: generated.report,
        })
    }

    /// Parses, validates and converts in memory; nothing is written.
    pub fn check(&self) -> Result<ConversionReport, ConverterError> {
        let project = self.parse()?;
        Ok(codegen::generate(&project)?.report)
    }

    /// Converts a single spec file held in memory.
    ///
    /// Only custom commands defined in `source` itself are known. Helper imports point at
    /// `support/` next to the output file.
    pub fn convert_source(source: &str, path: &Path) -> Result<ConvertedFile, ConverterError> {
        let mut parser = CypressParser::new()?;
        let spec = parser.parse(source, path)?;

        let mut project = ProjectIR::new(path.parent().unwrap_or_else(|| Path::new("")).to_path_buf());
        project.custom_commands = spec.custom_commands.clone();
        project.spec_files.push(spec);
        let custom_commands = codegen::classify_commands(&project);
        let registry = codegen::CommandRegistry::new(&custom_commands);

        let name = path.file_name().map(Path::new).unwrap_or(path);
        let output = codegen::project::output_path(name);
        let generated = codegen::generate_spec(&project.spec_files[0], &output, &registry);

        Ok(ConvertedFile {
            report: FileReport {
                source: path.display().to_string(),
                output: output.display().to_string(),
                commands: generated.commands,
                converted: generated.converted,
                todos: generated.todos,
                diagnostics: generated.diagnostics,
            },
            code: generated.code,
            custom_commands,
        })
    }

    fn parse(&self) -> Result<ProjectIR, ConverterError> {
        let mut frontend = frontend::create_frontend(&self.config.language)?;
        let project = frontend.parse_directory(&self.config.source_dir)?;
        debug!(
            specs = project.spec_files.len(),
            custom_commands = project.custom_commands.len(),
            "parsed project"
        );

        if !self.config.skip_validation {
            validate::validate_project(&project)?;
        }
        Ok(project)
    }

    /// Writes generated files to the output directory.
    fn write_output(&self, files: &[(String, String)]) -> Result<usize, ConverterError> {
        std::fs::create_dir_all(&self.config.out_dir)
            .map_err(|e| ConverterError::io(&self.config.out_dir, e.to_string()))?;

        for (filename, content) in files {
            let path = self.config.out_dir.join(filename);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ConverterError::io(parent, e.to_string()))?;
            }
            std::fs::write(&path, content).map_err(|e| ConverterError::io(&path, e.to_string()))?;
        }

        Ok(files.len())
    }
}
