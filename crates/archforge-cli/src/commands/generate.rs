// Generate one library

use archforge_generation::{
    validate_scope, ArtifactKind, GenerationResult, Generator, LibraryOptions,
};
use serde_json::Value;
use tracing::debug;

use super::{emit, Command, WriteOptions};
use crate::{
    error::{CliError, CliResult},
    output::OutputStyle,
    sink::{FileSink, WriteReport},
};

/// Parse a `--set key=value` argument
///
/// `true`, `false` and numbers become JSON scalars; anything else is a string.
pub fn parse_assignment(raw: &str) -> CliResult<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::invalid(format!("expected key=value, got '{}'", raw)))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::invalid(format!("missing key in '{}'", raw)));
    }
    let value = match serde_json::from_str::<Value>(value) {
        Ok(parsed @ (Value::Bool(_) | Value::Number(_))) => parsed,
        _ => Value::String(value.to_string()),
    };
    Ok((key.to_string(), value))
}

/// Assemble a library request from command-line arguments
pub fn library_options(
    artifact_kind: ArtifactKind,
    name: &str,
    scope: &str,
    files: Option<Vec<String>>,
    assignments: &[String],
    flags: &[String],
) -> CliResult<LibraryOptions> {
    validate_scope(scope)?;
    let mut options = LibraryOptions::new(name, scope, artifact_kind);
    if let Some(files) = files.filter(|f| !f.is_empty()) {
        options = options.with_file_kinds(files);
    }
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        options = options.with_override(key, value);
    }
    for flag in flags {
        options = options.with_override(flag.as_str(), true);
    }
    Ok(options)
}

/// Generate one library and write its files
pub struct GenerateCommand {
    generator: Generator,
    options: LibraryOptions,
    write: WriteOptions,
}

impl GenerateCommand {
    pub fn new(generator: Generator, options: LibraryOptions, write: WriteOptions) -> Self {
        Self {
            generator,
            options,
            write,
        }
    }

    /// Generate into `sink`
    pub fn run(
        &self,
        sink: &dyn FileSink,
        style: &OutputStyle,
    ) -> CliResult<(GenerationResult, WriteReport)> {
        debug!(options = ?self.options, "Generating library");
        let result = self.generator.generate_library(&self.options)?;
        let report = emit(sink, &result, &self.write, style)?;
        println!(
            "{}",
            style.info(&format!(
                "{} '{}': {} files in {}ms",
                result.kind,
                self.options.name,
                report.written.len(),
                result.duration_ms
            ))
        );
        Ok((result, report))
    }
}

impl Command for GenerateCommand {
    fn execute(&self) -> CliResult<()> {
        let sink = self.write.sink();
        self.run(sink.as_ref(), &OutputStyle::default())?;
        Ok(())
    }
}
