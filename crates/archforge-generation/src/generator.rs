//! Library generation over the template catalog
//!
//! The [`Generator`] turns a [`LibraryOptions`] request into compiled files.
//! It owns no output: writing files is left to the caller.

use std::{sync::Arc, time::Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    catalog::{output_path, required_missing, TemplateRegistry},
    config::GeneratorConfig,
    context::{keys, ContextBuilder, TemplateContext},
    error::{ContextValidationError, GenerationError},
    models::{ArtifactKind, GeneratedFile, GenerationResult, LibraryOptions, TemplateKey},
    naming::{HeckNaming, NamingProvider},
    telemetry::{NoopTelemetry, TelemetrySink, FILES_GENERATED, GENERATION_DURATION},
    templates::{compiler::Compiler, loader::TemplateLoader},
};

/// Generates libraries from catalog templates
#[derive(Clone)]
pub struct Generator {
    registry: Arc<TemplateRegistry>,
    compiler: Compiler,
    naming: Arc<dyn NamingProvider>,
    telemetry: Arc<dyn TelemetrySink>,
    config: GeneratorConfig,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Generator over the built-in catalog with default settings
    pub fn new() -> Self {
        Self {
            registry: TemplateRegistry::global(),
            compiler: Compiler::shared(),
            naming: Arc::new(HeckNaming),
            telemetry: Arc::new(NoopTelemetry),
            config: GeneratorConfig::default(),
        }
    }

    /// Generator for a loaded configuration
    ///
    /// Templates under `template_dirs` are registered on top of a private
    /// copy of the built-in catalog, in directory order.
    pub fn from_config(config: GeneratorConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        let registry = if config.template_dirs.is_empty() {
            TemplateRegistry::global()
        } else {
            let loader = TemplateLoader::new();
            let mut registry = TemplateRegistry::builtin();
            for dir in &config.template_dirs {
                for file in loader.load_dir(dir)? {
                    debug!(key = %file.key(), dir = %dir.display(), "Registering user template");
                    registry.register_file(file);
                }
            }
            Arc::new(registry)
        };
        Ok(Self {
            registry,
            config,
            ..Self::new()
        })
    }

    /// Use another catalog
    pub fn with_registry(mut self, registry: Arc<TemplateRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Use another compiler
    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Use another naming provider
    pub fn with_naming(mut self, naming: Arc<dyn NamingProvider>) -> Self {
        self.naming = naming;
        self
    }

    /// Report metrics to `telemetry`
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Replace the configuration, keeping the current catalog
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Catalog in use
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Context a library request compiles against
    pub fn build_context(&self, options: &LibraryOptions) -> Result<TemplateContext, GenerationError> {
        ContextBuilder::new(
            self.naming.as_ref(),
            &self.config.libs_dir,
            self.config.override_policy,
        )
        .build(
            &options.name,
            &options.scope,
            options.artifact_kind,
            &options.overrides,
        )
    }

    /// Compile one catalog template
    ///
    /// Fails before compiling when the template is unknown or the context
    /// lacks any of its declared required variables.
    pub fn generate_file(
        &self,
        artifact_kind: ArtifactKind,
        file_kind: &str,
        context: &TemplateContext,
    ) -> Result<GeneratedFile, GenerationError> {
        let key = TemplateKey::new(artifact_kind, file_kind);
        let entry = self
            .registry
            .get(&key)
            .ok_or_else(|| GenerationError::TemplateNotFound {
                key: key.to_string(),
            })?;

        let validation = required_missing(entry, context);
        if !validation.valid {
            return Err(ContextValidationError {
                template_id: entry.definition.id.clone(),
                missing: validation.missing,
            }
            .into());
        }

        let content = self.compiler.compile(&entry.definition, context)?;
        let relative = output_path(file_kind);
        let path = match context.scalar(keys::PROJECT_ROOT) {
            Some(root) if !root.is_empty() => format!("{}/{}", root.trim_end_matches('/'), relative),
            _ => relative,
        };

        self.telemetry.increment_counter(
            FILES_GENERATED,
            &[("artifact_kind", artifact_kind.as_str()), ("file_kind", file_kind)],
        );
        debug!(template = %key, path = %path, "Generated file");

        Ok(GeneratedFile {
            path,
            content,
            template_id: entry.definition.id.clone(),
        })
    }

    /// Generate every requested file of one library
    ///
    /// Missing templates become warnings; any other failure aborts the batch.
    pub fn generate_library(&self, options: &LibraryOptions) -> Result<GenerationResult, GenerationError> {
        let started = Instant::now();
        let context = self.build_context(options)?;
        let kind = options.artifact_kind;
        let file_kinds = match &options.file_kinds {
            Some(requested) => requested.clone(),
            None => self.registry.file_kinds(kind),
        };

        let outcomes: Vec<Result<GeneratedFile, GenerationError>> = file_kinds
            .par_iter()
            .map(|file_kind| self.generate_file(kind, file_kind, &context))
            .collect();

        let mut files = Vec::with_capacity(outcomes.len());
        let mut warnings = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(file) => files.push(file),
                Err(e) if e.is_template_not_found() => {
                    warn!("{}", e);
                    warnings.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        let elapsed = started.elapsed();
        self.telemetry.record_histogram(
            GENERATION_DURATION,
            elapsed.as_secs_f64() * 1000.0,
            &[("artifact_kind", kind.as_str())],
        );
        info!(
            artifact_kind = %kind,
            name = %options.name,
            files = files.len(),
            warnings = warnings.len(),
            "Generated library"
        );

        Ok(GenerationResult {
            kind,
            files,
            duration_ms: elapsed.as_millis() as u64,
            warnings,
        })
    }

    /// Generate one library per artifact kind for the same domain name
    pub fn generate_domain(
        &self,
        name: &str,
        scope: &str,
        kinds: &[ArtifactKind],
    ) -> Result<Vec<GenerationResult>, GenerationError> {
        kinds
            .iter()
            .map(|&kind| self.generate_library(&LibraryOptions::new(name, scope, kind)))
            .collect()
    }
}
