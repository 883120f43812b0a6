//! Core data models for code generation

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Architectural layer a generated library belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Domain contracts: errors, entities, ports, events
    Contract,
    /// Repository implementations over a database
    DataAccess,
    /// Business services composed from contracts
    Feature,
    /// Infrastructure services (cache, logging, queues)
    Infra,
    /// Adapters around third-party SDKs
    Provider,
}

impl ArtifactKind {
    /// Every artifact kind, in catalog order
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Contract,
        ArtifactKind::DataAccess,
        ArtifactKind::Feature,
        ArtifactKind::Infra,
        ArtifactKind::Provider,
    ];

    /// Kebab-case identifier used in catalog keys and paths
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Contract => "contract",
            ArtifactKind::DataAccess => "data-access",
            ArtifactKind::Feature => "feature",
            ArtifactKind::Infra => "infra",
            ArtifactKind::Provider => "provider",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised artifact kind string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown artifact kind: {0}")]
pub struct UnknownArtifactKind(pub String);

impl FromStr for ArtifactKind {
    type Err = UnknownArtifactKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownArtifactKind(s.to_string()))
    }
}

/// Two-part catalog key, displayed as `artifact-kind/file-kind`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TemplateKey {
    /// Artifact the template belongs to
    pub artifact_kind: ArtifactKind,
    /// File within the artifact, e.g. `errors`
    pub file_kind: String,
}

impl TemplateKey {
    /// Create a new key
    pub fn new(artifact_kind: ArtifactKind, file_kind: impl Into<String>) -> Self {
        Self {
            artifact_kind,
            file_kind: file_kind.into(),
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.artifact_kind, self.file_kind)
    }
}

impl FromStr for TemplateKey {
    type Err = UnknownArtifactKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (artifact, file) = s
            .split_once('/')
            .ok_or_else(|| UnknownArtifactKind(s.to_string()))?;
        Ok(TemplateKey::new(artifact.parse()?, file))
    }
}

/// A generated code file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// File path relative to the workspace root
    pub path: String,
    /// File content
    pub content: String,
    /// Definition the content was compiled from
    pub template_id: String,
}

/// Result of generating one library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Artifact kind that was generated
    pub kind: ArtifactKind,
    /// Files in request order
    pub files: Vec<GeneratedFile>,
    /// Wall time spent on the batch
    pub duration_ms: u64,
    /// Non-fatal problems, e.g. missing optional templates
    pub warnings: Vec<String>,
}

impl GenerationResult {
    /// Whether any warnings were recorded
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Request for one library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryOptions {
    /// Short domain name, e.g. `customer`
    pub name: String,
    /// Package scope, e.g. `@shop`
    pub scope: String,
    /// Artifact to generate
    pub artifact_kind: ArtifactKind,
    /// File kinds to generate; all catalog file kinds when `None`
    #[serde(default)]
    pub file_kinds: Option<Vec<String>>,
    /// Extra context values, applied according to the override policy
    #[serde(default)]
    pub overrides: BTreeMap<String, Value>,
}

impl LibraryOptions {
    /// Request every file kind of `artifact_kind` with no overrides
    pub fn new(name: impl Into<String>, scope: impl Into<String>, artifact_kind: ArtifactKind) -> Self {
        Self {
            name: name.into(),
            scope: scope.into(),
            artifact_kind,
            file_kinds: None,
            overrides: BTreeMap::new(),
        }
    }

    /// Restrict the request to the given file kinds
    pub fn with_file_kinds<I, S>(mut self, file_kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_kinds = Some(file_kinds.into_iter().map(Into::into).collect());
        self
    }

    /// Add a context override
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }
}

/// Outcome of checking a context against a catalog entry's required variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextValidation {
    /// Whether every required variable is present
    pub valid: bool,
    /// Missing variables, or `["Template not found"]` for unknown keys
    pub missing: Vec<String>,
}
