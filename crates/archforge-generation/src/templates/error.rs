//! Error types for interpolation, compilation and template loading

use std::path::PathBuf;

use thiserror::Error;

use crate::fragments::FragmentError;

/// One or more placeholders could not be resolved against the context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unresolved placeholders: {}", .missing.join(", "))]
pub struct InterpolationError {
    /// Every unresolved placeholder name, sorted and de-duplicated
    pub missing: Vec<String>,
}

impl InterpolationError {
    /// Create an error from any collection of missing names
    pub fn new(missing: impl IntoIterator<Item = String>) -> Self {
        let mut missing: Vec<String> = missing.into_iter().collect();
        missing.sort();
        missing.dedup();
        Self { missing }
    }
}

/// Failure to compile a template definition into text
#[derive(Debug, Error)]
pub enum CompilationError {
    /// Variables referenced by the definition are absent from the context
    #[error("Template '{template_id}' references unresolved variables: {}", .source.missing.join(", "))]
    Interpolation {
        /// Definition being compiled
        template_id: String,
        /// Underlying interpolation failure
        source: InterpolationError,
    },

    /// A fragment section failed to render
    #[error("Template '{template_id}' failed to render a fragment: {source}")]
    Fragment {
        /// Definition being compiled
        template_id: String,
        /// Underlying fragment failure
        source: FragmentError,
    },
}

impl CompilationError {
    /// Id of the definition that failed
    pub fn template_id(&self) -> &str {
        match self {
            CompilationError::Interpolation { template_id, .. }
            | CompilationError::Fragment { template_id, .. } => template_id,
        }
    }

    /// Missing variable names, if this is an interpolation failure
    pub fn missing(&self) -> &[String] {
        match self {
            CompilationError::Interpolation { source, .. } => &source.missing,
            CompilationError::Fragment {
                source: FragmentError::Interpolation(e),
                ..
            } => &e.missing,
            CompilationError::Fragment { .. } => &[],
        }
    }
}

/// Failure to load template definitions from disk
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File could not be read
    #[error("Failed to read template {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// File is not a valid template definition
    #[error("Invalid template definition in {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying YAML error
        source: serde_yaml::Error,
    },

    /// Definition parsed but is structurally unusable
    #[error("Invalid template definition in {path}: {message}")]
    Invalid {
        /// File that failed
        path: PathBuf,
        /// What is wrong with it
        message: String,
    },
}
