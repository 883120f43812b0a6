//! Template loading from YAML files and directories
//!
//! A template file pairs a catalog key with a [`TemplateDefinition`]:
//!
//! ```yaml
//! artifactKind: feature
//! fileKind: metrics
//! required: [className, packageName]
//! definition:
//!   id: feature/metrics
//!   meta:
//!     title: "{className} metrics"
//!   sections: []
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::{
    models::{ArtifactKind, TemplateKey},
    templates::{definition::TemplateDefinition, error::LoaderError},
};

/// One template as authored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFile {
    /// Catalog artifact kind
    pub artifact_kind: ArtifactKind,
    /// Catalog file kind
    pub file_kind: String,
    /// Context keys the template requires
    #[serde(default)]
    pub required: Vec<String>,
    /// The definition itself; an empty id defaults to the catalog key
    pub definition: TemplateDefinition,
}

impl TemplateFile {
    /// Catalog key this file registers under
    pub fn key(&self) -> TemplateKey {
        TemplateKey::new(self.artifact_kind, self.file_kind.clone())
    }
}

/// Loads [`TemplateFile`]s from disk
#[derive(Debug, Clone, Default)]
pub struct TemplateLoader;

impl TemplateLoader {
    /// Create a loader
    pub fn new() -> Self {
        Self
    }

    /// Load one YAML template file
    pub fn load_file(&self, path: &Path) -> Result<TemplateFile, LoaderError> {
        let content = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(path, &content)
    }

    /// Parse YAML text; `path` is only used for error reporting
    pub fn parse(&self, path: &Path, content: &str) -> Result<TemplateFile, LoaderError> {
        let mut file: TemplateFile =
            serde_yaml::from_str(content).map_err(|source| LoaderError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if file.file_kind.trim().is_empty() {
            return Err(LoaderError::Invalid {
                path: path.to_path_buf(),
                message: "fileKind must not be empty".to_string(),
            });
        }
        if file.file_kind.contains('/') {
            return Err(LoaderError::Invalid {
                path: path.to_path_buf(),
                message: format!("fileKind '{}' must not contain '/'", file.file_kind),
            });
        }
        if file.definition.id.is_empty() {
            file.definition.id = file.key().to_string();
        }
        debug!(path = %path.display(), key = %file.key(), "Loaded template");
        Ok(file)
    }

    /// Load every `*.yaml` / `*.yml` file under `dir`, recursively, in path order
    pub fn load_dir(&self, dir: &Path) -> Result<Vec<TemplateFile>, LoaderError> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                let source = e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed")
                });
                LoaderError::Io { path, source }
            })?;
            if entry.file_type().is_file() && is_yaml(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        debug!(dir = %dir.display(), count = paths.len(), "Discovered template files");
        paths.iter().map(|p| self.load_file(p)).collect()
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const METRICS: &str = r#"
artifactKind: feature
fileKind: metrics
required: [className]
definition:
  id: ""
  meta:
    title: "{className} metrics"
  sections:
    - content:
        type: raw
        text: "export const metrics = {}"
"#;

    #[test]
    fn test_parse_defaults_id() {
        let file = TemplateLoader::new().parse(Path::new("m.yaml"), METRICS).unwrap();
        assert_eq!(file.key().to_string(), "feature/metrics");
        assert_eq!(file.definition.id, "feature/metrics");
        assert_eq!(file.required, vec!["className".to_string()]);
    }

    #[test]
    fn test_parse_rejects_bad_yaml() {
        let err = TemplateLoader::new().parse(Path::new("bad.yaml"), "artifactKind: [").unwrap_err();
        assert!(matches!(err, LoaderError::Parse { .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_artifact_kind() {
        let yaml = METRICS.replace("artifactKind: feature", "artifactKind: widget");
        let err = TemplateLoader::new().parse(Path::new("m.yaml"), &yaml).unwrap_err();
        assert!(matches!(err, LoaderError::Parse { .. }));
    }

    #[test]
    fn test_parse_rejects_slash_in_file_kind() {
        let yaml = METRICS.replace("fileKind: metrics", "fileKind: a/b");
        let err = TemplateLoader::new().parse(Path::new("m.yaml"), &yaml).unwrap_err();
        assert!(err.to_string().contains("must not contain '/'"));
    }

    #[test]
    fn test_load_dir_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.yaml"), METRICS.replace("metrics", "beta")).unwrap();
        fs::write(dir.path().join("nested/a.yml"), METRICS.replace("metrics", "alpha")).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = TemplateLoader::new().load_dir(dir.path()).unwrap();
        let keys: Vec<String> = files.iter().map(|f| f.key().to_string()).collect();
        assert_eq!(keys, vec!["feature/beta", "feature/alpha"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = TemplateLoader::new()
            .load_file(Path::new("/definitely/not/here.yaml"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
