//! Integration tests for the devinit binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const ALL_KEYS: &str = "install_devbox,install_git,install_gh,install_1password,install_chezmoi,\
install_tailscale,login_1password,setup_github,init_chezmoi,setup_tailscale";

/// A devinit command isolated from the caller's home and environment.
fn devinit(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("devinit"));
    cmd.env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("DEVINIT_GITHUB_TOKEN_REF")
        .env_remove("DEVINIT_TAILSCALE_AUTHKEY_REF")
        .env_remove("OP_SERVICE_ACCOUNT_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    devinit(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fresh development machine"))
        .stdout(predicate::str::contains("completions"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    devinit(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_run_help_lists_selection_flags() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    devinit(&home)
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--enable"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("DEVINIT_GITHUB_TOKEN_REF"));
    Ok(())
}

#[test]
fn cli_generates_completions() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    devinit(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("devinit"));
    Ok(())
}

#[test]
fn cli_dry_run_prints_plan() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    devinit(&home)
        .args([
            "run",
            "--non-interactive",
            "--dry-run",
            "--disable",
            ALL_KEYS,
            "--enable",
            "init_chezmoi",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Execution plan (dry run)"))
        .stdout(predicate::str::contains("1. init-chezmoi"))
        .stdout(predicate::str::contains("[requires: chezmoi]"));
    Ok(())
}

#[test]
fn cli_dry_run_without_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    devinit(&home)
        .args(["--non-interactive", "--dry-run", "--disable", ALL_KEYS])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing would run"));
    Ok(())
}

#[test]
fn cli_empty_selection_completes() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    devinit(&home)
        .args(["run", "--non-interactive", "--disable", ALL_KEYS])
        .assert()
        .success()
        .stdout(predicate::str::contains("Setup complete!"));
    Ok(())
}

#[test]
fn cli_dry_run_uses_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let config_dir = home.path().join(".devinit");
    fs::create_dir_all(&config_dir)?;
    fs::write(config_dir.join("config.yml"), "chezmoi_user: octocat\n")?;

    devinit(&home)
        .args(["run", "--non-interactive", "--dry-run", "--disable", ALL_KEYS])
        .assert()
        .success();
    Ok(())
}

#[test]
fn cli_missing_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let missing = home.path().join("nope.yml");
    devinit(&home)
        .args(["--config", missing.to_str().unwrap_or_default()])
        .args(["run", "--non-interactive", "--dry-run"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn cli_invalid_reference_flag_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    devinit(&home)
        .args([
            "run",
            "--non-interactive",
            "--dry-run",
            "--github-token",
            "not-a-reference",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not a secret reference"));
    Ok(())
}

#[test]
fn cli_invalid_reference_from_env_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    devinit(&home)
        .env("DEVINIT_TAILSCALE_AUTHKEY_REF", "tskey-plain")
        .args(["run", "--non-interactive", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tskey-plain"));
    Ok(())
}

#[test]
fn cli_unknown_package_manager_in_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let path = home.path().join("config.yml");
    fs::write(&path, "package_names:\n  zypper:\n    git: git-core\n")?;

    devinit(&home)
        .args(["--config", path.to_str().unwrap_or_default()])
        .args(["run", "--non-interactive", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown package manager 'zypper'"));
    Ok(())
}

#[test]
fn cli_unknown_option_key_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    devinit(&home)
        .args(["run", "--non-interactive", "--enable", "install_vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("install_vim"));
    Ok(())
}
