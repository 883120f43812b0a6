// archforge CLI entry point

use anyhow::{Context, Result};
use archforge_cli::{
    logging, output,
    router::{Cli, CommandRouter},
};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let config = CommandRouter::load_config(&cli).context("Failed to load archforge configuration")?;
    tracing::debug!(?config, "Configuration loaded");

    if let Err(e) = CommandRouter::execute(&cli, config) {
        output::print_error(&e.user_message());
        if cli.verbose {
            eprintln!("{}", e.technical_details());
        }
        std::process::exit(1);
    }
    Ok(())
}
