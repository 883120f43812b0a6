//! Fragment rendering errors

use thiserror::Error;

use crate::templates::error::InterpolationError;

/// Errors raised while rendering a fragment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    /// No renderer registered under the requested type
    #[error("Fragment type not registered: {fragment_type}")]
    NotFound {
        /// Requested type
        fragment_type: String,
    },

    /// Renderer received a config of a different shape
    #[error("Fragment '{fragment_type}' cannot render a '{found}' config")]
    ConfigMismatch {
        /// Renderer type
        fragment_type: String,
        /// Shape of the config it was given
        found: &'static str,
    },

    /// Config is structurally unusable
    #[error("Invalid {fragment_type} config: {message}")]
    InvalidConfig {
        /// Renderer type
        fragment_type: String,
        /// What is wrong with it
        message: String,
    },

    /// Structural fields referenced unresolved placeholders
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

impl FragmentError {
    pub(crate) fn invalid(fragment_type: &str, message: impl Into<String>) -> Self {
        FragmentError::InvalidConfig {
            fragment_type: fragment_type.to_string(),
            message: message.into(),
        }
    }
}
