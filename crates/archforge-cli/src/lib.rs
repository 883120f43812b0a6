// archforge CLI library

pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod router;
pub mod sink;

pub use error::{CliError, CliResult};
pub use logging::init_logging;
pub use router::{Cli, CommandRouter, Commands};
pub use sink::{DiskFileSink, FileSink, MemoryFileSink};
