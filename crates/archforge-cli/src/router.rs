// Command routing and dispatch

use std::{path::PathBuf, sync::Arc};

use archforge_generation::{
    ArtifactKind, ConfigLoader, Generator, GeneratorConfig, PrometheusTelemetry,
    DEFAULT_CONFIG_FILE,
};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::{
    commands::{generate::library_options, Command, DomainCommand, GenerateCommand, ListCommand, WriteOptions},
    error::CliResult,
    output::OutputStyle,
};

/// archforge - layered Effect library generator
#[derive(Parser, Debug)]
#[command(name = "archforge")]
#[command(bin_name = "archforge")]
#[command(about = "Generate layered Effect-style TypeScript libraries from templates")]
#[command(
    long_about = "archforge compiles built-in and user templates into contract, data-access, feature, infra and provider libraries.\n\nQuick start:\n  archforge list\n  archforge generate contract user --scope @shop\n  archforge domain customer --scope @shop"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ./archforge.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Output flags shared by generating commands
#[derive(Args, Debug, Clone)]
pub struct WriteArgs {
    /// Output root directory
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub out: PathBuf,

    /// Show what would be written without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite files that already exist
    #[arg(long)]
    pub force: bool,
}

impl From<&WriteArgs> for WriteOptions {
    fn from(args: &WriteArgs) -> Self {
        WriteOptions {
            out: args.out.clone(),
            dry_run: args.dry_run,
            force: args.force,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate one library
    #[command(about = "Generate one library of the given artifact kind")]
    Generate {
        /// Artifact kind (contract, data-access, feature, infra, provider)
        #[arg(value_name = "ARTIFACT_KIND")]
        artifact_kind: ArtifactKind,

        /// Domain name, e.g. order-item
        #[arg(value_name = "NAME")]
        name: String,

        /// Package scope (default from config)
        #[arg(long)]
        scope: Option<String>,

        /// Only these file kinds
        #[arg(long, value_delimiter = ',', value_name = "KINDS")]
        files: Vec<String>,

        /// Extra context value
        #[arg(long = "set", value_name = "KEY=VALUE")]
        assignments: Vec<String>,

        /// Context flag set to true, e.g. includeCQRS
        #[arg(long = "flag", value_name = "FLAG")]
        flags: Vec<String>,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Generate several libraries for one domain
    #[command(about = "Generate one library per artifact kind for a domain")]
    Domain {
        /// Domain name
        #[arg(value_name = "NAME")]
        name: String,

        /// Package scope (default from config)
        #[arg(long)]
        scope: Option<String>,

        /// Artifact kinds to generate, in order
        #[arg(
            long,
            value_delimiter = ',',
            default_values_t = [ArtifactKind::Contract, ArtifactKind::DataAccess, ArtifactKind::Feature]
        )]
        kinds: Vec<ArtifactKind>,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// List available templates
    #[command(about = "List catalog templates and their output paths")]
    List {
        /// Only this artifact kind
        #[arg(long)]
        artifact_kind: Option<ArtifactKind>,
    },
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Load configuration for `cli`
    pub fn load_config(cli: &Cli) -> Result<GeneratorConfig, archforge_generation::ConfigError> {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        ConfigLoader::with_path(path).load()
    }

    /// Execute a command
    pub fn execute(cli: &Cli, config: GeneratorConfig) -> CliResult<()> {
        let telemetry = config.metrics.then(|| Arc::new(PrometheusTelemetry::new()));
        let default_scope = config.default_scope.clone();
        let mut generator = Generator::from_config(config)?;
        if let Some(telemetry) = &telemetry {
            generator = generator.with_telemetry(telemetry.clone());
        }
        debug!(templates = generator.registry().size(), "Generator ready");

        match &cli.command {
            Commands::Generate {
                artifact_kind,
                name,
                scope,
                files,
                assignments,
                flags,
                write,
            } => {
                let scope = scope.clone().unwrap_or(default_scope);
                let files = (!files.is_empty()).then(|| files.clone());
                let options =
                    library_options(*artifact_kind, name, &scope, files, assignments, flags)?;
                GenerateCommand::new(generator, options, write.into()).execute()?;
            }
            Commands::Domain {
                name,
                scope,
                kinds,
                write,
            } => {
                let scope = scope.clone().unwrap_or(default_scope);
                DomainCommand::new(generator, name.clone(), scope, kinds.clone(), write.into())
                    .execute()?;
            }
            Commands::List { artifact_kind } => {
                ListCommand::new(generator, *artifact_kind).execute()?;
            }
        }

        if let Some(telemetry) = telemetry {
            if !cli.quiet {
                println!("{}", OutputStyle::default().section("Metrics"));
                print!("{}", telemetry.gather_text());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "archforge",
            "generate",
            "contract",
            "user",
            "--scope",
            "@shop",
            "--files",
            "errors,index",
            "--set",
            "owner=team",
            "--flag",
            "includeCQRS",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                artifact_kind,
                files,
                assignments,
                flags,
                write,
                ..
            } => {
                assert_eq!(artifact_kind, ArtifactKind::Contract);
                assert_eq!(files, vec!["errors", "index"]);
                assert_eq!(assignments, vec!["owner=team"]);
                assert_eq!(flags, vec!["includeCQRS"]);
                assert!(write.dry_run);
                assert!(!write.force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_domain_defaults() {
        let cli = Cli::try_parse_from(["archforge", "domain", "customer"]).unwrap();
        match cli.command {
            Commands::Domain { kinds, scope, .. } => {
                assert_eq!(
                    kinds,
                    vec![ArtifactKind::Contract, ArtifactKind::DataAccess, ArtifactKind::Feature]
                );
                assert_eq!(scope, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_artifact_kind_is_rejected() {
        assert!(Cli::try_parse_from(["archforge", "generate", "widget", "user"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["archforge", "list", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::List { artifact_kind: None }));
    }

    #[test]
    fn test_dry_run_leaves_disk_untouched() {
        let temp = tempfile::TempDir::new().unwrap();
        let out = temp.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "archforge", "generate", "infra", "cache", "--scope", "@shop", "--out", &out, "--dry-run",
        ])
        .unwrap();
        CommandRouter::execute(&cli, GeneratorConfig::default()).unwrap();
        assert!(!temp.path().join("libs").exists());
    }

    #[test]
    fn test_generate_writes_to_out_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let out = temp.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "archforge", "generate", "infra", "cache", "--scope", "@shop", "--out", &out,
        ])
        .unwrap();
        CommandRouter::execute(&cli, GeneratorConfig::default()).unwrap();
        assert!(temp.path().join("libs/infra/cache/src/lib/service.ts").exists());
        assert!(temp.path().join("libs/infra/cache/src/index.ts").exists());
    }
}
