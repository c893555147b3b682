//! Configuration schema definitions.
//!
//! [`DevInitConfig`] maps the YAML file one-to-one; [`SetupConfig`] is the
//! resolved value the rest of the program reads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::plan::PackageNameTable;

/// Default 1Password reference for the GitHub token.
pub const DEFAULT_GITHUB_TOKEN_REF: &str = "op://Developer/GitHub Personal Access Token/token";

/// Default 1Password reference for the Tailscale auth key.
pub const DEFAULT_TAILSCALE_AUTHKEY_REF: &str = "op://Developer/tailscale auth key/credential";

/// Default GitHub user whose dotfiles repo chezmoi applies.
pub const DEFAULT_CHEZMOI_USER: &str = "whexy";

/// Root structure of `config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DevInitConfig {
    /// Secret references.
    pub credentials: CredentialRefs,

    /// Use a 1Password service account instead of interactive sign-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_service_account: Option<bool>,

    /// GitHub user for `chezmoi init`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chezmoi_user: Option<String>,

    /// Per-manager package renames: manager name -> logical id -> real id.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub package_names: BTreeMap<String, BTreeMap<String, String>>,
}

/// Secret references in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialRefs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tailscale_authkey: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupConfig {
    pub github_token_ref: String,
    pub tailscale_authkey_ref: String,
    pub use_service_account: bool,
    pub chezmoi_user: String,
    pub package_names: PackageNameTable,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            github_token_ref: DEFAULT_GITHUB_TOKEN_REF.to_string(),
            tailscale_authkey_ref: DEFAULT_TAILSCALE_AUTHKEY_REF.to_string(),
            use_service_account: false,
            chezmoi_user: DEFAULT_CHEZMOI_USER.to_string(),
            package_names: PackageNameTable::default(),
        }
    }
}
