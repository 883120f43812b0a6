// Logging and verbosity control

use tracing::Level;

/// Log level selected by the global flags; `--quiet` wins over `--verbose`
pub fn level_for(verbose: bool, quiet: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Initialize logging based on CLI flags
///
/// Logs go to stderr so generated output on stdout stays clean.
pub fn init_logging(verbose: bool, quiet: bool) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}
