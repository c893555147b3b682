//! Configuration file discovery, loading and layering.
//!
//! Precedence, lowest first: built-in defaults, the config file, the
//! environment, command-line flags. clap resolves the last two together
//! (each flag declares its environment variable), so this module only has
//! to lay [`ConfigOverrides`] over the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{DevInitConfig, SetupConfig};
use crate::config::validator::{validate_file, validate_setup};
use crate::error::{DevInitError, Result};
use crate::installer::PackageManagerKind;
use crate::shell::home_dir;

/// Values from flags or their environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub github_token_ref: Option<String>,
    pub tailscale_authkey_ref: Option<String>,
    pub use_service_account: bool,
    pub chezmoi_user: Option<String>,
}

/// `$HOME/.devinit/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".devinit").join("config.yml"))
}

/// Parse YAML content into DevInitConfig.
pub fn parse_config(content: &str, source_path: &Path) -> Result<DevInitConfig> {
    serde_yaml::from_str(content).map_err(|e| DevInitError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<DevInitConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DevInitError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DevInitError::Io(e)
        }
    })?;

    // An empty file is an empty config
    if content.trim().is_empty() {
        return Ok(DevInitConfig::default());
    }

    parse_config(&content, path)
}

/// Load the config file, if any.
///
/// An explicit path must exist. The default location is optional.
pub fn load_config(config_override: Option<&Path>) -> Result<Option<DevInitConfig>> {
    if let Some(path) = config_override {
        return load_config_file(path).map(Some);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(&path).map(Some)
        }
        _ => Ok(None),
    }
}

/// Lay the file and overrides over the defaults and validate the result.
pub fn resolve(file: Option<DevInitConfig>, overrides: &ConfigOverrides) -> Result<SetupConfig> {
    let file = file.unwrap_or_default();
    validate_file(&file)?;

    let mut config = SetupConfig::default();

    if let Some(r) = file.credentials.github_token {
        config.github_token_ref = r;
    }
    if let Some(r) = file.credentials.tailscale_authkey {
        config.tailscale_authkey_ref = r;
    }
    if let Some(sa) = file.use_service_account {
        config.use_service_account = sa;
    }
    if let Some(user) = file.chezmoi_user {
        config.chezmoi_user = user;
    }
    config.package_names = config
        .package_names
        .with_overrides(typed_package_names(file.package_names)?);

    if let Some(r) = &overrides.github_token_ref {
        config.github_token_ref = r.clone();
    }
    if let Some(r) = &overrides.tailscale_authkey_ref {
        config.tailscale_authkey_ref = r.clone();
    }
    if overrides.use_service_account {
        config.use_service_account = true;
    }
    if let Some(user) = &overrides.chezmoi_user {
        config.chezmoi_user = user.clone();
    }

    validate_setup(&config)?;
    Ok(config)
}

/// Load from disk and resolve in one go.
pub fn load_setup_config(
    config_override: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<SetupConfig> {
    let file = load_config(config_override)?;
    resolve(file, overrides)
}

fn typed_package_names(
    raw: BTreeMap<String, BTreeMap<String, String>>,
) -> Result<BTreeMap<PackageManagerKind, BTreeMap<String, String>>> {
    raw.into_iter()
        .map(|(manager, names)| {
            manager
                .parse::<PackageManagerKind>()
                .map(|kind| (kind, names))
                .map_err(|message| DevInitError::ConfigValidationError { message })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CredentialRefs, DEFAULT_GITHUB_TOKEN_REF};
    use tempfile::TempDir;

    #[test]
    fn load_config_file_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.yml");

        let err = load_config_file(&path).unwrap_err();

        assert!(matches!(err, DevInitError::ConfigNotFound { .. }));
    }

    #[test]
    fn load_config_file_invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "credentials: [unclosed").unwrap();

        let err = load_config_file(&path).unwrap_err();

        assert!(matches!(err, DevInitError::ConfigParseError { .. }));
    }

    #[test]
    fn load_config_file_empty_is_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "\n").unwrap();

        assert_eq!(load_config_file(&path).unwrap(), DevInitConfig::default());
    }

    #[test]
    fn explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yml");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn resolve_without_file_is_defaults() {
        let config = resolve(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, SetupConfig::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = DevInitConfig {
            credentials: CredentialRefs {
                github_token: Some("op://Work/GitHub/token".into()),
                tailscale_authkey: None,
            },
            chezmoi_user: Some("octocat".into()),
            use_service_account: Some(true),
            ..Default::default()
        };

        let config = resolve(Some(file), &ConfigOverrides::default()).unwrap();

        assert_eq!(config.github_token_ref, "op://Work/GitHub/token");
        assert_eq!(config.chezmoi_user, "octocat");
        assert!(config.use_service_account);
    }

    #[test]
    fn overrides_beat_file() {
        let file = DevInitConfig {
            credentials: CredentialRefs {
                github_token: Some("op://Work/GitHub/token".into()),
                tailscale_authkey: None,
            },
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            github_token_ref: Some("op://Personal/GitHub/pat".into()),
            ..Default::default()
        };

        let config = resolve(Some(file), &overrides).unwrap();

        assert_eq!(config.github_token_ref, "op://Personal/GitHub/pat");
    }

    #[test]
    fn invalid_reference_is_rejected() {
        let overrides = ConfigOverrides {
            github_token_ref: Some("ghp_plaintext_token".into()),
            ..Default::default()
        };

        let err = resolve(None, &overrides).unwrap_err();

        assert!(matches!(err, DevInitError::ConfigValidationError { .. }));
        assert!(err.to_string().contains("ghp_plaintext_token"));
    }

    #[test]
    fn package_names_merge_over_builtins() {
        let mut apt = BTreeMap::new();
        apt.insert("tailscale".to_string(), "tailscale-nightly".to_string());
        let mut package_names = BTreeMap::new();
        package_names.insert("apt".to_string(), apt);
        let file = DevInitConfig {
            package_names,
            ..Default::default()
        };

        let config = resolve(Some(file), &ConfigOverrides::default()).unwrap();

        assert_eq!(
            config
                .package_names
                .resolve(PackageManagerKind::Apt, "tailscale"),
            "tailscale-nightly"
        );
        assert_eq!(
            config
                .package_names
                .resolve(PackageManagerKind::Devbox, "1password-cli"),
            "_1password-cli"
        );
    }

    #[test]
    fn unknown_package_manager_is_rejected() {
        let mut package_names = BTreeMap::new();
        package_names.insert("zypper".to_string(), BTreeMap::new());
        let file = DevInitConfig {
            package_names,
            ..Default::default()
        };

        let err = resolve(Some(file), &ConfigOverrides::default()).unwrap_err();

        assert!(err.to_string().contains("zypper"));
    }

    #[test]
    fn load_setup_config_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "chezmoi_user: someone\n").unwrap();

        let config = load_setup_config(Some(&path), &ConfigOverrides::default()).unwrap();

        assert_eq!(config.chezmoi_user, "someone");
        assert_eq!(config.github_token_ref, DEFAULT_GITHUB_TOKEN_REF);
    }
}
