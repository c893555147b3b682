//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading and layering in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use devinit::config::{load_setup_config, ConfigOverrides};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("config.yml");
//! fs::write(&path, "chezmoi_user: octocat").unwrap();
//!
//! let config = load_setup_config(Some(&path), &ConfigOverrides::default()).unwrap();
//! assert_eq!(config.chezmoi_user, "octocat");
//! ```
//!
//! # Configuration File Location
//!
//! `$HOME/.devinit/config.yml`, or the path given with `--config`.

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    default_config_path, load_config, load_config_file, load_setup_config, parse_config, resolve,
    ConfigOverrides,
};
pub use schema::{
    CredentialRefs, DevInitConfig, SetupConfig, DEFAULT_CHEZMOI_USER, DEFAULT_GITHUB_TOKEN_REF,
    DEFAULT_TAILSCALE_AUTHKEY_REF,
};
pub use validator::{is_valid_reference, validate_file, validate_setup, ValidationError};
