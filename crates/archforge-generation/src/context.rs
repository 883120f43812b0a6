//! Template context and its assembly from a short name
//!
//! A [`TemplateContext`] is built once per generation request and is read-only
//! afterwards. Keys live in a `BTreeMap` so any iteration over the context is
//! deterministic.

use std::{borrow::Cow, collections::BTreeMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{error::GenerationError, models::ArtifactKind, naming::NamingProvider};

/// Keys seeded from naming variants and fixed fields
pub mod keys {
    /// Raw short name as supplied by the caller
    pub const NAME: &str = "name";
    /// PascalCase variant
    pub const CLASS_NAME: &str = "className";
    /// camelCase variant
    pub const PROPERTY_NAME: &str = "propertyName";
    /// kebab-case variant
    pub const FILE_NAME: &str = "fileName";
    /// SCREAMING_SNAKE_CASE variant
    pub const CONSTANT_NAME: &str = "constantName";
    /// Package scope, e.g. `@shop`
    pub const SCOPE: &str = "scope";
    /// Artifact kind identifier
    pub const ARTIFACT_KIND: &str = "artifactKind";
    /// `{artifactKind}-{fileName}`
    pub const PROJECT_NAME: &str = "projectName";
    /// `{scope}/{projectName}`
    pub const PACKAGE_NAME: &str = "packageName";
    /// `{libsDir}/{artifactKind}/{fileName}`
    pub const PROJECT_ROOT: &str = "projectRoot";

    /// Every built-in key, in seeding order
    pub const BUILT_IN: [&str; 10] = [
        NAME,
        CLASS_NAME,
        PROPERTY_NAME,
        FILE_NAME,
        CONSTANT_NAME,
        SCOPE,
        ARTIFACT_KIND,
        PROJECT_NAME,
        PACKAGE_NAME,
        PROJECT_ROOT,
    ];
}

/// Immutable variable environment a template is compiled against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateContext {
    values: BTreeMap<String, Value>,
}

impl TemplateContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context from key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect()
    }

    /// Look up a raw value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether the key is present, whatever its value
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether the flag is present and truthy
    ///
    /// `false`, `null`, `0`, and the empty string are falsy; so is an absent key.
    /// Every other value, including empty arrays and objects, is truthy.
    pub fn is_truthy(&self, flag: &str) -> bool {
        match self.values.get(flag) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    /// Value rendered as placeholder text, if it is a scalar
    pub fn scalar(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.values.get(name)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the context has no variables
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for TemplateContext {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// How caller overrides interact with built-in keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverridePolicy {
    /// An override replaces the built-in value of the same key. Other derived
    /// variants are not recomputed from the overridden value.
    #[default]
    Replace,
    /// Built-in keys win; overrides naming them are dropped with a warning.
    PreserveDerived,
}

/// Assembles a [`TemplateContext`] from a short name, scope and overrides
pub struct ContextBuilder<'a> {
    naming: &'a dyn NamingProvider,
    libs_dir: &'a str,
    policy: OverridePolicy,
}

impl<'a> ContextBuilder<'a> {
    /// Create a builder
    pub fn new(naming: &'a dyn NamingProvider, libs_dir: &'a str, policy: OverridePolicy) -> Self {
        Self {
            naming,
            libs_dir,
            policy,
        }
    }

    /// Build the context for one request
    pub fn build(
        &self,
        name: &str,
        scope: &str,
        artifact_kind: ArtifactKind,
        overrides: &BTreeMap<String, Value>,
    ) -> Result<TemplateContext, GenerationError> {
        if !name.chars().any(char::is_alphanumeric) {
            return Err(GenerationError::InvalidName(name.to_string()));
        }

        let variants = self.naming.variants(name);
        let project_name = format!("{}-{}", artifact_kind, variants.file_name);
        let package_name = if scope.is_empty() {
            project_name.clone()
        } else {
            format!("{}/{}", scope, project_name)
        };
        let project_root = format!(
            "{}/{}/{}",
            self.libs_dir.trim_end_matches('/'),
            artifact_kind,
            variants.file_name
        );

        let mut values: BTreeMap<String, Value> = BTreeMap::new();
        values.insert(keys::NAME.into(), name.into());
        values.insert(keys::CLASS_NAME.into(), variants.class_name.into());
        values.insert(keys::PROPERTY_NAME.into(), variants.property_name.into());
        values.insert(keys::FILE_NAME.into(), variants.file_name.into());
        values.insert(keys::CONSTANT_NAME.into(), variants.constant_name.into());
        values.insert(keys::SCOPE.into(), scope.into());
        values.insert(keys::ARTIFACT_KIND.into(), artifact_kind.as_str().into());
        values.insert(keys::PROJECT_NAME.into(), project_name.into());
        values.insert(keys::PACKAGE_NAME.into(), package_name.into());
        values.insert(keys::PROJECT_ROOT.into(), project_root.into());

        for (key, value) in overrides {
            let built_in = keys::BUILT_IN.contains(&key.as_str());
            match (built_in, self.policy) {
                (true, OverridePolicy::PreserveDerived) => {
                    warn!("Ignoring override of built-in context key '{}'", key);
                }
                (true, OverridePolicy::Replace) => {
                    debug!("Override replaces built-in context key '{}'", key);
                    values.insert(key.clone(), value.clone());
                }
                (false, _) => {
                    values.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(TemplateContext { values })
    }
}
