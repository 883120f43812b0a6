// Command handlers for the archforge CLI

pub mod domain;
pub mod generate;
pub mod list;

pub use domain::DomainCommand;
pub use generate::GenerateCommand;
pub use list::ListCommand;

use std::path::PathBuf;

use archforge_generation::GenerationResult;

use crate::{
    error::CliResult,
    output::OutputStyle,
    sink::{write_files, DiskFileSink, FileSink, MemoryFileSink, WriteReport},
};

/// Trait for command handlers
pub trait Command {
    /// Execute the command
    fn execute(&self) -> CliResult<()>;
}

/// Where and how generated files land
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Output root directory
    pub out: PathBuf,
    /// Keep everything in memory and only report
    pub dry_run: bool,
    /// Overwrite existing files
    pub force: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            out: PathBuf::from("."),
            dry_run: false,
            force: false,
        }
    }
}

impl WriteOptions {
    /// Sink matching these options
    pub fn sink(&self) -> Box<dyn FileSink> {
        if self.dry_run {
            Box::new(MemoryFileSink::new())
        } else {
            Box::new(DiskFileSink::new(&self.out))
        }
    }
}

/// Write one library's files and print what happened
pub(crate) fn emit(
    sink: &dyn FileSink,
    result: &GenerationResult,
    options: &WriteOptions,
    style: &OutputStyle,
) -> CliResult<WriteReport> {
    let report = write_files(sink, &result.files, options.force)?;
    let verb = if options.dry_run { "would create" } else { "created" };

    for path in &report.written {
        println!("{}", style.file_action(verb, path));
    }
    for path in &report.skipped {
        println!(
            "{}",
            style.warning(&format!("skipped {} (already exists, use --force)", path))
        );
    }
    for warning in &result.warnings {
        println!("{}", style.warning(warning));
    }
    Ok(report)
}
