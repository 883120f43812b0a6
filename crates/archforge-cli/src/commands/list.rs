// List catalog templates

use archforge_generation::{output_path, ArtifactKind, Generator};

use super::Command;
use crate::{error::CliResult, output::OutputStyle};

/// Print the template catalog, optionally for one artifact kind
pub struct ListCommand {
    generator: Generator,
    artifact_kind: Option<ArtifactKind>,
}

impl ListCommand {
    pub fn new(generator: Generator, artifact_kind: Option<ArtifactKind>) -> Self {
        Self {
            generator,
            artifact_kind,
        }
    }

    /// Rendered listing, one entry per line
    pub fn render(&self, style: &OutputStyle) -> Vec<String> {
        let kinds: Vec<ArtifactKind> = match self.artifact_kind {
            Some(kind) => vec![kind],
            None => ArtifactKind::ALL.to_vec(),
        };

        let mut lines = Vec::new();
        for kind in kinds {
            let entries = self.generator.registry().get_by_artifact_kind(kind);
            if entries.is_empty() {
                continue;
            }
            lines.push(style.section(kind.as_str()));
            for entry in entries {
                lines.push(style.list_item(&format!(
                    "{} -> {}",
                    entry.key,
                    output_path(&entry.key.file_kind)
                )));
                if !entry.required.is_empty() {
                    lines.push(style.key_value("    requires", &entry.required.join(", ")));
                }
            }
        }
        lines
    }
}

impl Command for ListCommand {
    fn execute(&self) -> CliResult<()> {
        for line in self.render(&OutputStyle::default()) {
            println!("{}", line);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_one_kind() {
        let command = ListCommand::new(Generator::new(), Some(ArtifactKind::Infra));
        let lines = command.render(&OutputStyle::plain());
        assert_eq!(lines[0], "\ninfra\n─────");
        assert_eq!(lines[1], "  • infra/service -> src/lib/service.ts");
        assert!(lines.iter().any(|l| l == "  • infra/index -> src/index.ts"));
    }

    #[test]
    fn test_list_everything() {
        let command = ListCommand::new(Generator::new(), None);
        let lines = command.render(&OutputStyle::plain());
        let items = lines.iter().filter(|l| l.starts_with("  • ")).count();
        assert_eq!(items, 19);
    }
}
