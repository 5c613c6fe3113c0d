//! Converter configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostic::ConverterError;

/// Default name of the optional configuration file.
pub const CONFIG_FILE: &str = "cy2pw.json";

/// Configuration for the converter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConverterConfig {
    /// Directory containing the Cypress project (specs and support files).
    pub source_dir: PathBuf,

    /// Directory to write Playwright tests to.
    pub out_dir: PathBuf,

    /// Source dialect (default: "cypress").
    pub language: String,

    /// Write `conversion-report.json` next to the generated tests.
    pub write_report: bool,

    /// Skip project validation (for testing).
    pub skip_validation: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("cypress"),
            out_dir: PathBuf::from("tests"),
            language: "cypress".to_string(),
            write_report: true,
            skip_validation: false,
        }
    }
}

impl ConverterConfig {
    /// Loads a JSON configuration file. Missing keys take their default values.
    pub fn load(path: &Path) -> Result<Self, ConverterError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConverterError::io(path, e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ConverterError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Loads `cy2pw.json` from `dir` when it exists, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self, ConverterError> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "outDir": "e2e-playwright", "writeReport": false }"#).unwrap();
        let config = ConverterConfig::load(&path).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("e2e-playwright"));
        assert!(!config.write_report);
        assert_eq!(config.source_dir, PathBuf::from("cypress"));
        assert_eq!(config.language, "cypress");
    }

    #[test]
    fn test_unknown_key_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "specPattern": "**/*.cy.js" }"#).unwrap();
        assert!(matches!(
            ConverterConfig::load(&path),
            Err(ConverterError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_discover_without_file() {
        let dir = TempDir::new().unwrap();
        let config = ConverterConfig::discover(dir.path()).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("tests"));
    }
}
