//! Custom command registration checks.
//!
//! Cypress keeps only the last `Commands.add` for a name, so a second registration silently
//! replaces the first. Converting both would produce two helpers with the same name.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::diagnostic::ConverterError;
use crate::ir::CustomCommandDefinition;

/// Rejects a custom command name that is registered more than once.
pub fn validate_unique_commands(commands: &[CustomCommandDefinition]) -> Result<(), ConverterError> {
    let mut seen: HashMap<&str, PathBuf> = HashMap::new();
    for command in commands {
        let location = command
            .span
            .as_ref()
            .map(|s| s.file.clone())
            .unwrap_or_default();
        if let Some(first) = seen.get(command.name.as_str()) {
            return Err(ConverterError::DuplicateCustomCommand {
                name: command.name.clone(),
                first: first.clone(),
                second: location,
            });
        }
        seen.insert(&command.name, location);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Span;

    fn defined_in(name: &str, file: &str) -> CustomCommandDefinition {
        let mut command = CustomCommandDefinition::new(name, vec![], "");
        command.span = Some(Span::new(PathBuf::from(file), 0, 0, 0, 0));
        command
    }

    #[test]
    fn test_unique_commands_pass() {
        let commands = vec![defined_in("login", "commands.js"), defined_in("logout", "commands.js")];
        assert!(validate_unique_commands(&commands).is_ok());
    }

    #[test]
    fn test_duplicate_command_reports_both_files() {
        let commands = vec![defined_in("login", "commands.js"), defined_in("login", "auth.js")];
        match validate_unique_commands(&commands) {
            Err(ConverterError::DuplicateCustomCommand { name, first, second }) => {
                assert_eq!(name, "login");
                assert_eq!(first, PathBuf::from("commands.js"));
                assert_eq!(second, PathBuf::from("auth.js"));
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_message_names_both_files() {
        let commands = vec![defined_in("login", "commands.js"), defined_in("login", "auth.js")];
        let message = validate_unique_commands(&commands).unwrap_err().to_string();
        assert_eq!(message, "Custom command 'login' is added more than once (commands.js and auth.js)");
    }
}
