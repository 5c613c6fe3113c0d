//! Conversion report.

use serde::Serialize;

use crate::custom::{ClassificationResult, ComplexityTag, ConversionStrategy};

/// File name the report is written under, in the output directory.
pub const REPORT_FILE: &str = "conversion-report.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub source: String,
    pub output: String,
    pub commands: usize,
    pub converted: usize,
    pub todos: usize,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCommandReport {
    pub name: String,
    pub strategy: ConversionStrategy,
    pub complexity: ComplexityTag,
    pub warnings: Vec<String>,
}

impl From<&ClassificationResult> for CustomCommandReport {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            name: result.name.clone(),
            strategy: result.strategy,
            complexity: result.complexity,
            warnings: result.warnings.iter().chain(&result.errors).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub files: usize,
    pub commands: usize,
    pub converted: usize,
    pub todos: usize,
    pub diagnostics: usize,
    pub custom_commands: usize,
    pub manual_custom_commands: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub totals: ReportTotals,
    pub files: Vec<FileReport>,
    pub custom_commands: Vec<CustomCommandReport>,
}

impl ConversionReport {
    pub fn new(files: Vec<FileReport>, custom_commands: Vec<CustomCommandReport>) -> Self {
        let totals = ReportTotals {
            files: files.len(),
            commands: files.iter().map(|f| f.commands).sum(),
            converted: files.iter().map(|f| f.converted).sum(),
            todos: files.iter().map(|f| f.todos).sum(),
            diagnostics: files.iter().map(|f| f.diagnostics.len()).sum(),
            custom_commands: custom_commands.len(),
            manual_custom_commands: custom_commands
                .iter()
                .filter(|c| c.strategy == ConversionStrategy::Manual)
                .count(),
        };
        Self {
            totals,
            files,
            custom_commands,
        }
    }

    /// Share of commands converted without a TODO, in percent. 100 when there were none.
    pub fn conversion_rate(&self) -> f64 {
        if self.totals.commands == 0 {
            100.0
        } else {
            self.totals.converted as f64 * 100.0 / self.totals.commands as f64
        }
    }
}
