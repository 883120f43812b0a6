#![warn(missing_docs)]

//! Template compiler for layered Effect-style TypeScript libraries
//!
//! Templates are data: a [`TemplateDefinition`] describes one file as a
//! header, imports and sections. The [`Compiler`] interpolates the structural
//! parts against a [`TemplateContext`] and dispatches fragment sections
//! through the [`FragmentRegistry`]. The [`Generator`] drives the built-in
//! catalog to produce whole libraries.

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod fragments;
pub mod generator;
pub mod models;
pub mod naming;
pub mod telemetry;
pub mod templates;

// Re-export public API
pub use catalog::{output_path, CatalogEntry, TemplateRegistry, TEMPLATE_NOT_FOUND};
pub use self::config::{validate_scope, ConfigLoader, GeneratorConfig, DEFAULT_CONFIG_FILE};
pub use context::{keys, ContextBuilder, OverridePolicy, TemplateContext};
pub use error::{ConfigError, ContextValidationError, GenerationError};
pub use fragments::{FragmentConfig, FragmentDefinition, FragmentError, FragmentRegistry};
pub use generator::Generator;
pub use models::{
    ArtifactKind, ContextValidation, GeneratedFile, GenerationResult, LibraryOptions,
    TemplateKey, UnknownArtifactKind,
};
pub use naming::{HeckNaming, NamingProvider, NamingVariants};
pub use telemetry::{
    InMemoryTelemetry, NoopTelemetry, PrometheusTelemetry, TelemetrySink, FILES_GENERATED,
    GENERATION_DURATION,
};
pub use templates::{
    CompilationError, Compiler, ImportSpec, InterpolationError, LoaderError, Section,
    SectionContent, TemplateDefinition, TemplateLoader, TemplateMeta,
};
