//! CLI scenarios driven through the router with a real config file

use std::fs;

use archforge_cli::{Cli, CommandRouter};
use clap::Parser;
use tempfile::TempDir;

#[test]
fn test_config_file_sets_layout_and_scope() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("archforge.toml");
    fs::write(&config_path, "libs_dir = \"packages\"\ndefault_scope = \"@acme\"\n").unwrap();
    let out = temp.path().join("workspace");
    let out = out.to_string_lossy().to_string();
    let config = config_path.to_string_lossy().to_string();

    let cli = Cli::parse_from([
        "archforge",
        "--config",
        &config,
        "domain",
        "invoice",
        "--kinds",
        "contract,data-access",
        "--out",
        &out,
    ]);
    let loaded = CommandRouter::load_config(&cli).unwrap();
    assert_eq!(loaded.libs_dir, "packages");
    CommandRouter::execute(&cli, loaded).unwrap();

    let root = temp.path().join("workspace/packages");
    assert!(root.join("contract/invoice/src/lib/errors.ts").exists());
    assert!(!temp.path().join("workspace/libs").exists());

    let repository =
        fs::read_to_string(root.join("data-access/invoice/src/lib/repository.ts")).unwrap();
    assert!(repository.contains("from \"@acme/contract-invoice\""), "{}", repository);
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("absent.toml").to_string_lossy().to_string();
    let cli = Cli::parse_from(["archforge", "--config", &config, "list"]);

    let loaded = CommandRouter::load_config(&cli).unwrap();
    assert_eq!(loaded.libs_dir, "libs");
    assert_eq!(loaded.default_scope, "@app");
    assert!(CommandRouter::execute(&cli, loaded).is_ok());
}
