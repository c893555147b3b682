//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct. Running `devinit` with no
//! subcommand is the same as `devinit run`.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::selection::OptionKey;

/// devinit - Bootstrap a fresh development machine.
#[derive(Debug, Parser)]
#[command(name = "devinit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Path to config file (overrides default ~/.devinit/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments for the implicit `run`
    #[command(flatten)]
    pub run: RunArgs,
}

impl Cli {
    /// The run arguments in effect, whether or not `run` was spelled out.
    pub fn run_args(&self) -> Option<&RunArgs> {
        match &self.command {
            Some(Commands::Run(args)) => Some(args),
            Some(Commands::Completions(_)) => None,
            None => Some(&self.run),
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Pick components and set up this machine (default if no command specified)
    Run(RunArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// 1Password reference for the GitHub token
    #[arg(long, value_name = "REF", env = "DEVINIT_GITHUB_TOKEN_REF")]
    pub github_token: Option<String>,

    /// 1Password reference for the Tailscale auth key
    #[arg(long, value_name = "REF", env = "DEVINIT_TAILSCALE_AUTHKEY_REF")]
    pub tailscale_authkey: Option<String>,

    /// Use a 1Password service account instead of interactive sign-in
    #[arg(long)]
    pub use_service_account: bool,

    /// GitHub user whose dotfiles chezmoi applies
    #[arg(long, value_name = "NAME")]
    pub chezmoi_user: Option<String>,

    /// Skip the checklist and use defaults plus --enable/--disable
    #[arg(long)]
    pub non_interactive: bool,

    /// Options to turn on (comma-separated keys, e.g. install_git,setup_github)
    #[arg(long, value_delimiter = ',', value_name = "KEYS")]
    pub enable: Vec<OptionKey>,

    /// Options to turn off (comma-separated keys)
    #[arg(long, value_delimiter = ',', value_name = "KEYS")]
    pub disable: Vec<OptionKey>,

    /// Print the plan without executing it
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Whether the selection was scripted on the command line.
    pub fn has_scripted_selection(&self) -> bool {
        !self.enable.is_empty() || !self.disable.is_empty()
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
