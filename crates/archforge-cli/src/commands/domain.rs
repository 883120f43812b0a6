// Generate several libraries for one domain

use archforge_generation::{validate_scope, ArtifactKind, GenerationResult, Generator};

use super::{emit, Command, WriteOptions};
use crate::{
    error::{CliError, CliResult},
    output::OutputStyle,
    sink::FileSink,
};

/// Generate one library per artifact kind for a domain name
pub struct DomainCommand {
    generator: Generator,
    name: String,
    scope: String,
    kinds: Vec<ArtifactKind>,
    write: WriteOptions,
}

impl DomainCommand {
    pub fn new(
        generator: Generator,
        name: impl Into<String>,
        scope: impl Into<String>,
        kinds: Vec<ArtifactKind>,
        write: WriteOptions,
    ) -> Self {
        Self {
            generator,
            name: name.into(),
            scope: scope.into(),
            kinds,
            write,
        }
    }

    /// Generate into `sink`
    pub fn run(&self, sink: &dyn FileSink, style: &OutputStyle) -> CliResult<Vec<GenerationResult>> {
        if self.kinds.is_empty() {
            return Err(CliError::invalid("--kinds needs at least one artifact kind"));
        }
        validate_scope(&self.scope)?;

        let results = self
            .generator
            .generate_domain(&self.name, &self.scope, &self.kinds)?;
        for result in &results {
            println!("{}", style.section(&format!("{} {}", result.kind, self.name)));
            emit(sink, result, &self.write, style)?;
        }

        let total: usize = results.iter().map(|r| r.files.len()).sum();
        println!(
            "{}",
            style.info(&format!(
                "Domain '{}': {} libraries, {} files",
                self.name,
                results.len(),
                total
            ))
        );
        Ok(results)
    }
}

impl Command for DomainCommand {
    fn execute(&self) -> CliResult<()> {
        let sink = self.write.sink();
        self.run(sink.as_ref(), &OutputStyle::default())?;
        Ok(())
    }
}
