//! Template catalog keyed by artifact kind and file kind
//!
//! The built-in catalog is assembled once, on first use, and is read-only from
//! then on. Owned registries built with [`TemplateRegistry::builtin`] or
//! [`TemplateRegistry::empty`] can take user templates without touching it.

mod contract;
mod data_access;
mod feature;
mod infra;
mod provider;

use std::{collections::BTreeMap, sync::Arc};

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::{
    context::TemplateContext,
    models::{ArtifactKind, ContextValidation, TemplateKey},
    templates::{definition::TemplateDefinition, loader::TemplateFile},
};

static GLOBAL_REGISTRY: Lazy<Arc<TemplateRegistry>> =
    Lazy::new(|| Arc::new(TemplateRegistry::builtin()));

/// Reported by [`TemplateRegistry::validate_context`] for unknown keys
pub const TEMPLATE_NOT_FOUND: &str = "Template not found";

/// Output paths relative to the project root, by file kind
static OUTPUT_PATHS: &[(&str, &str)] = &[
    ("index", "src/index.ts"),
    ("errors", "src/lib/errors.ts"),
    ("entities", "src/lib/entities.ts"),
    ("ports", "src/lib/ports.ts"),
    ("events", "src/lib/events.ts"),
    ("repository", "src/lib/repository.ts"),
    ("service", "src/lib/service.ts"),
    ("layers", "src/lib/layers.ts"),
];

/// Output path of `file_kind` relative to the project root
pub fn output_path(file_kind: &str) -> String {
    OUTPUT_PATHS
        .iter()
        .find(|(kind, _)| *kind == file_kind)
        .map(|(_, path)| path.to_string())
        .unwrap_or_else(|| format!("src/lib/{}.ts", file_kind))
}

/// One catalog entry
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Catalog key
    pub key: TemplateKey,
    /// Shared definition
    pub definition: Arc<TemplateDefinition>,
    /// Context keys checked before compilation
    pub required: Vec<String>,
}

impl CatalogEntry {
    /// Create an entry
    pub fn new(
        artifact_kind: ArtifactKind,
        file_kind: &str,
        required: &[&str],
        definition: TemplateDefinition,
    ) -> Self {
        Self {
            key: TemplateKey::new(artifact_kind, file_kind),
            definition: Arc::new(definition),
            required: required.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Catalog of template definitions
///
/// Entries keep insertion order, which is the order `generate_library` uses
/// when no file kinds are requested.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    entries: Vec<CatalogEntry>,
    index: BTreeMap<TemplateKey, usize>,
}

impl TemplateRegistry {
    /// Registry with no templates
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fresh registry holding every built-in template
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        let entries = contract::entries()
            .into_iter()
            .chain(data_access::entries())
            .chain(feature::entries())
            .chain(infra::entries())
            .chain(provider::entries());
        for entry in entries {
            registry.insert(entry);
        }
        debug!(templates = registry.size(), "Built-in template catalog ready");
        registry
    }

    /// Process-wide built-in catalog
    pub fn global() -> Arc<TemplateRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Add or replace a template
    ///
    /// Replacing keeps the entry's catalog position.
    pub fn register_definition(
        &mut self,
        key: TemplateKey,
        definition: TemplateDefinition,
        required: Vec<String>,
    ) {
        self.insert(CatalogEntry {
            key,
            definition: Arc::new(definition),
            required,
        });
    }

    /// Add or replace a template loaded from disk
    pub fn register_file(&mut self, file: TemplateFile) {
        let key = file.key();
        self.register_definition(key, file.definition, file.required);
    }

    fn insert(&mut self, entry: CatalogEntry) {
        match self.index.get(&entry.key) {
            Some(&slot) => {
                warn!(key = %entry.key, "Template replaces an existing catalog entry");
                self.entries[slot] = entry;
            }
            None => {
                self.index.insert(entry.key.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Look up an entry
    pub fn get(&self, key: &TemplateKey) -> Option<&CatalogEntry> {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    /// Entries of one artifact kind, in catalog order
    pub fn get_by_artifact_kind(&self, artifact_kind: ArtifactKind) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| e.key.artifact_kind == artifact_kind)
            .collect()
    }

    /// File kinds of one artifact kind, in catalog order
    pub fn file_kinds(&self, artifact_kind: ArtifactKind) -> Vec<String> {
        self.get_by_artifact_kind(artifact_kind)
            .into_iter()
            .map(|e| e.key.file_kind.clone())
            .collect()
    }

    /// Whether `key` is catalogued
    pub fn has(&self, key: &TemplateKey) -> bool {
        self.index.contains_key(key)
    }

    /// Every key, in catalog order
    pub fn keys(&self) -> Vec<TemplateKey> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    /// Number of templates
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Check `context` against the declared required keys of `key`
    ///
    /// `key` is `artifact-kind/file-kind`. Unknown or malformed keys fail
    /// closed with `missing: ["Template not found"]`.
    pub fn validate_context(&self, key: &str, context: &TemplateContext) -> ContextValidation {
        let entry = key.parse::<TemplateKey>().ok().and_then(|k| self.get(&k));
        match entry {
            Some(entry) => required_missing(entry, context),
            None => ContextValidation {
                valid: false,
                missing: vec![TEMPLATE_NOT_FOUND.to_string()],
            },
        }
    }
}

/// Missing declared keys of `entry`, sorted
pub(crate) fn required_missing(entry: &CatalogEntry, context: &TemplateContext) -> ContextValidation {
    let mut missing: Vec<String> = entry
        .required
        .iter()
        .filter(|name| !context.contains(name))
        .cloned()
        .collect();
    missing.sort();
    missing.dedup();
    ContextValidation {
        valid: missing.is_empty(),
        missing,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::templates::definition::TemplateMeta;

    #[test]
    fn test_builtin_catalog_layout() {
        let registry = TemplateRegistry::global();
        assert_eq!(registry.size(), 19);
        assert_eq!(
            registry.file_kinds(ArtifactKind::Contract),
            vec!["errors", "entities", "ports", "events", "index"]
        );
        assert_eq!(
            registry.file_kinds(ArtifactKind::DataAccess),
            vec!["repository", "layers", "index"]
        );
        assert_eq!(
            registry.file_kinds(ArtifactKind::Feature),
            vec!["service", "errors", "layers", "index"]
        );
        assert_eq!(registry.file_kinds(ArtifactKind::Infra), vec!["service", "layers", "index"]);
        assert_eq!(
            registry.file_kinds(ArtifactKind::Provider),
            vec!["service", "errors", "layers", "index"]
        );
    }

    #[test]
    fn test_builtin_ids_match_keys() {
        for key in TemplateRegistry::global().keys() {
            let entry = TemplateRegistry::global().get(&key).cloned().unwrap();
            assert_eq!(entry.definition.id, key.to_string());
        }
    }

    #[test]
    fn test_validate_unknown_key() {
        let registry = TemplateRegistry::global();
        let ctx = TemplateContext::new();
        for key in ["contract/doesNotExist", "nonsense", "widget/errors"] {
            let result = registry.validate_context(key, &ctx);
            assert!(!result.valid);
            assert_eq!(result.missing, vec!["Template not found".to_string()]);
        }
    }

    #[test]
    fn test_validate_collects_all_missing() {
        let registry = TemplateRegistry::global();
        let ctx = TemplateContext::from_pairs([("className", json!("User"))]);
        let result = registry.validate_context("contract/errors", &ctx);
        assert!(!result.valid);
        assert_eq!(result.missing, vec!["packageName", "propertyName"]);
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = TemplateRegistry::builtin();
        let key = TemplateKey::new(ArtifactKind::Contract, "errors");
        registry.register_definition(
            key.clone(),
            TemplateDefinition::new("custom/errors", TemplateMeta::new("Custom", "", "")),
            vec![],
        );
        assert_eq!(registry.size(), 19);
        assert_eq!(registry.get(&key).unwrap().definition.id, "custom/errors");
        assert_eq!(registry.keys()[0], key);
        assert_eq!(
            TemplateRegistry::global().get(&key).unwrap().definition.id,
            "contract/errors"
        );
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(output_path("index"), "src/index.ts");
        assert_eq!(output_path("errors"), "src/lib/errors.ts");
        assert_eq!(output_path("metrics"), "src/lib/metrics.ts");
    }
}
