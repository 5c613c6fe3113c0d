//! Validation of project IR.

mod commands;

use crate::diagnostic::ConverterError;
use crate::ir::ProjectIR;

/// Validates the entire project.
pub fn validate_project(project: &ProjectIR) -> Result<(), ConverterError> {
    if project.spec_files.is_empty() {
        return Err(ConverterError::NoSpecFiles {
            dir: project.source_dir.clone(),
        });
    }

    commands::validate_unique_commands(&project.custom_commands)?;

    Ok(())
}
