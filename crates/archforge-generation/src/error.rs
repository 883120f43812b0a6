//! Error types for code generation

use thiserror::Error;

use crate::templates::error::{CompilationError, LoaderError};

/// A template's declared required variables are not all present in the context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Context for template '{template_id}' is missing required variables: {}", .missing.join(", "))]
pub struct ContextValidationError {
    /// Template whose requirements were checked
    pub template_id: String,
    /// Every missing variable, in declaration order
    pub missing: Vec<String>,
}

/// Configuration loading or validation failed
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config sources could not be read or deserialized
    #[error("Config source error: {0}")]
    Source(#[from] config::ConfigError),

    /// A loaded value is not acceptable
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors that can occur during code generation
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No catalog entry for the requested artifact/file kind pair
    #[error("Template not found: {key}")]
    TemplateNotFound {
        /// Catalog key, e.g. `contract/errors`
        key: String,
    },

    /// Required variables missing from the context
    #[error(transparent)]
    ContextValidation(#[from] ContextValidationError),

    /// The compiler failed to render a template
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// User template files could not be loaded
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// The short name could not produce usable naming variants
    #[error("Invalid name '{0}': it must contain at least one letter or digit")]
    InvalidName(String),
}

impl GenerationError {
    /// Template id the failure originated from, when one is known
    pub fn template_id(&self) -> Option<&str> {
        match self {
            GenerationError::TemplateNotFound { key } => Some(key),
            GenerationError::ContextValidation(e) => Some(&e.template_id),
            GenerationError::Compilation(e) => Some(e.template_id()),
            GenerationError::Config(_)
            | GenerationError::Loader(_)
            | GenerationError::InvalidName(_) => None,
        }
    }

    /// Whether this failure only means an optional template is absent
    pub fn is_template_not_found(&self) -> bool {
        matches!(self, GenerationError::TemplateNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_validation_error_lists_all_missing() {
        let err = ContextValidationError {
            template_id: "contract/errors".to_string(),
            missing: vec!["className".to_string(), "scope".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("className, scope"));
        assert!(message.contains("contract/errors"));
    }

    #[test]
    fn test_template_id_of_not_found() {
        let err = GenerationError::TemplateNotFound {
            key: "feature/missing".to_string(),
        };
        assert_eq!(err.template_id(), Some("feature/missing"));
        assert!(err.is_template_not_found());
    }

    #[test]
    fn test_invalid_name_has_no_template() {
        let err = GenerationError::InvalidName("--".to_string());
        assert_eq!(err.template_id(), None);
        assert!(!err.is_template_not_found());
    }
}
