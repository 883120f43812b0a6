//! Reusable code fragments
//!
//! A fragment is a named renderer for one recurring Effect shape: tagged
//! errors, capability modules, validated schemas and layers. Templates invoke
//! fragments by type through the [`FragmentRegistry`].

pub mod buffer;
pub mod config;
pub mod error;
pub mod registry;
pub mod renderers;

pub use buffer::{quote, CodeBuffer};
pub use self::config::{
    Annotation, CapabilityModuleConfig, EnvironmentVariant, FieldSpec, FragmentConfig,
    FragmentDefinition, LayerConfig, LayerKind, MethodSpec, Param, SchemaConfig, SchemaField,
    SchemaKind, StaticMethod, Structural, TaggedErrorConfig,
};
pub use error::FragmentError;
pub use registry::{is_active, FragmentEntry, FragmentRegistry, FragmentRenderer};
