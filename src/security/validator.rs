use std::collections::HashSet;
use thiserror::Error;
use crate::security::DANGEROUS_COMMANDS;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("command must not be empty")]
    EmptyCommand,

    #[error("command '{0}' is blocked: high risk of irreversible system change")]
    BlockedCommand(String),
}

pub struct CommandValidator {
    blocked_commands: HashSet<&'static str>,
}

impl CommandValidator {
    pub fn new() -> Self {
        // Use shared blocklist from security module
        let blocked_commands = DANGEROUS_COMMANDS.iter().copied().collect();

        Self { blocked_commands }
    }

    /// Validate a raw command string
    ///
    /// Only the leading token is inspected; the rest of the command line,
    /// including shell operators, is left to the host shell.
    pub fn validate(&self, command: &str) -> Result<(), ValidationError> {
        let command = command.trim();

        if command.is_empty() {
            return Err(ValidationError::EmptyCommand);
        }

        let name = self.extract_command_name(command);

        // Exact-token match. Substring matching would reject commands that
        // merely contain a blocked word inside an argument.
        if self.blocked_commands.contains(name.as_str()) {
            return Err(ValidationError::BlockedCommand(name));
        }

        Ok(())
    }

    /// Extract the case-normalized command name (first whitespace-delimited token)
    fn extract_command_name(&self, command: &str) -> String {
        command
            .split_whitespace()
            .next()
            .unwrap_or(command)
            .to_ascii_lowercase()
    }
}

impl Default for CommandValidator {
    fn default() -> Self {
        Self::new()
    }
}
