//! Fragment type registry
//!
//! Maps a fragment type name to the renderer that produces its code and the
//! imports its output depends on. The built-in set is shared process-wide and
//! never mutated after construction.

use std::{collections::BTreeMap, fmt, sync::Arc};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::{
    context::TemplateContext,
    fragments::{
        buffer::CodeBuffer,
        config::{FragmentConfig, FragmentDefinition},
        error::FragmentError,
        renderers::{capability_module, layer, schema, tagged_error},
    },
    templates::{definition::ImportSpec, imports::merge_imports},
};

static SHARED_FRAGMENTS: Lazy<Arc<FragmentRegistry>> =
    Lazy::new(|| Arc::new(FragmentRegistry::with_builtins()));

/// Produces code for one fragment type
pub trait FragmentRenderer: Send + Sync {
    /// Write the fragment for `config` into `buffer`
    fn render(
        &self,
        buffer: &mut CodeBuffer,
        config: &FragmentConfig,
        context: &TemplateContext,
    ) -> Result<(), FragmentError>;
}

impl<F> FragmentRenderer for F
where
    F: Fn(&mut CodeBuffer, &FragmentConfig, &TemplateContext) -> Result<(), FragmentError>
        + Send
        + Sync,
{
    fn render(
        &self,
        buffer: &mut CodeBuffer,
        config: &FragmentConfig,
        context: &TemplateContext,
    ) -> Result<(), FragmentError> {
        self(buffer, config, context)
    }
}

/// Registered renderer plus the imports it requires
#[derive(Clone)]
pub struct FragmentEntry {
    /// Fragment type name
    pub fragment_type: String,
    /// Renderer
    pub renderer: Arc<dyn FragmentRenderer>,
    /// Imports merged into any file using this fragment
    pub required_imports: Vec<ImportSpec>,
}

impl fmt::Debug for FragmentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentEntry")
            .field("fragment_type", &self.fragment_type)
            .field("required_imports", &self.required_imports)
            .finish_non_exhaustive()
    }
}

/// Fragment type name to renderer mapping
#[derive(Debug, Clone, Default)]
pub struct FragmentRegistry {
    entries: BTreeMap<String, FragmentEntry>,
}

impl FragmentRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four built-in shapes
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            tagged_error::FRAGMENT_TYPE,
            tagged_error::render_fragment,
            tagged_error::required_imports(),
        );
        registry.register(
            capability_module::FRAGMENT_TYPE,
            capability_module::render_fragment,
            capability_module::required_imports(),
        );
        registry.register(
            schema::FRAGMENT_TYPE,
            schema::render_fragment,
            schema::required_imports(),
        );
        registry.register(
            layer::FRAGMENT_TYPE,
            layer::render_fragment,
            layer::required_imports(),
        );
        registry
    }

    /// Process-wide built-in registry
    pub fn shared() -> Arc<FragmentRegistry> {
        Arc::clone(&SHARED_FRAGMENTS)
    }

    /// Register a renderer, replacing any previous one of the same type
    pub fn register<R>(
        &mut self,
        fragment_type: impl Into<String>,
        renderer: R,
        required_imports: Vec<ImportSpec>,
    ) where
        R: FragmentRenderer + 'static,
    {
        let fragment_type = fragment_type.into();
        debug!(fragment_type = %fragment_type, "Registering fragment renderer");
        self.entries.insert(
            fragment_type.clone(),
            FragmentEntry {
                fragment_type,
                renderer: Arc::new(renderer),
                required_imports,
            },
        );
    }

    /// Look up an entry
    pub fn get(&self, fragment_type: &str) -> Option<&FragmentEntry> {
        self.entries.get(fragment_type)
    }

    /// Whether `fragment_type` is registered
    pub fn has(&self, fragment_type: &str) -> bool {
        self.entries.contains_key(fragment_type)
    }

    /// Registered type names in sorted order
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Render one fragment, ignoring its condition
    pub fn render(
        &self,
        buffer: &mut CodeBuffer,
        definition: &FragmentDefinition,
        context: &TemplateContext,
    ) -> Result<(), FragmentError> {
        let entry = self
            .get(&definition.fragment_type)
            .ok_or_else(|| FragmentError::NotFound {
                fragment_type: definition.fragment_type.clone(),
            })?;
        entry.renderer.render(buffer, &definition.config, context)
    }

    /// Render every fragment whose condition holds, separated by blank lines
    pub fn render_all(
        &self,
        buffer: &mut CodeBuffer,
        definitions: &[FragmentDefinition],
        context: &TemplateContext,
    ) -> Result<(), FragmentError> {
        for definition in definitions.iter().filter(|d| is_active(d, context)) {
            buffer.blank_line();
            self.render(buffer, definition, context)?;
        }
        Ok(())
    }

    /// Merged imports required by the active fragments among `definitions`
    pub fn required_imports<'a>(
        &self,
        definitions: impl IntoIterator<Item = &'a FragmentDefinition>,
        context: &TemplateContext,
    ) -> Vec<ImportSpec> {
        let imports: Vec<&ImportSpec> = definitions
            .into_iter()
            .filter(|d| is_active(d, context))
            .filter_map(|d| self.get(&d.fragment_type))
            .flat_map(|entry| entry.required_imports.iter())
            .collect();
        merge_imports(imports)
    }
}

/// A fragment without a condition is always active
pub fn is_active(definition: &FragmentDefinition, context: &TemplateContext) -> bool {
    definition
        .condition
        .as_deref()
        .map_or(true, |flag| context.is_truthy(flag))
}
