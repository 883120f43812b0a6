//! Template definitions and their compilation
//!
//! Definitions are pure data; the [`Compiler`] turns one definition plus a
//! context into file text.

pub mod compiler;
pub mod definition;
pub mod error;
pub mod imports;
pub mod interpolation;
pub mod loader;

pub use compiler::Compiler;
pub use definition::{
    ConditionalBlock, ImportSpec, InterfaceShape, Section, SectionContent, TemplateDefinition,
    TemplateMeta,
};
pub use error::{CompilationError, InterpolationError, LoaderError};
pub use imports::{merge_imports, render_imports};
pub use interpolation::{extract_variables, has_interpolation, interpolate, interpolate_deep};
pub use loader::{TemplateFile, TemplateLoader};
