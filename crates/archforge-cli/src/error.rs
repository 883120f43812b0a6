// CLI error types

use archforge_generation::{ConfigError, GenerationError};
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

impl CliError {
    /// Shorthand for [`CliError::InvalidArgument`]
    pub fn invalid(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'archforge --help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(e) => {
                format!("{}\n\nCheck archforge.toml and ARCHFORGE_* environment variables.", e)
            }
            CliError::Generation(e) if e.is_template_not_found() => {
                format!("{}\n\nRun 'archforge list' to see available templates.", e)
            }
            CliError::Generation(GenerationError::ContextValidation(e)) => {
                format!("{}\n\nSupply missing values with --set key=value.", e)
            }
            CliError::Generation(e) => format!("Code generation failed: {}", e),
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_not_found_suggests_list() {
        let err = CliError::from(GenerationError::TemplateNotFound {
            key: "infra/nope".to_string(),
        });
        let message = err.user_message();
        assert!(message.starts_with("Template not found: infra/nope"));
        assert!(message.contains("archforge list"));
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = CliError::invalid("bad --set value");
        assert_eq!(err.to_string(), "Invalid argument: bad --set value");
        assert!(err.user_message().contains("--help"));
    }
}
