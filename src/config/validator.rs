//! Configuration validation rules.
//!
//! - Secret references must look like `op://<vault>/<item>/[<section>/]<field>`
//! - `package_names` may only name supported package managers
//! - The chezmoi user must be non-empty

use regex::Regex;
use std::sync::OnceLock;

use crate::config::schema::{DevInitConfig, SetupConfig};
use crate::error::{DevInitError, Result};
use crate::installer::PackageManagerKind;

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

fn reference_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^op://[^/]+/[^/]+/(?:[^/]+/)?[^/]+$").ok())
        .as_ref()
}

/// Whether `reference` is a well-formed 1Password secret reference.
pub fn is_valid_reference(reference: &str) -> bool {
    reference_pattern().is_some_and(|re| re.is_match(reference))
}

fn check_reference(name: &str, reference: &str) -> Option<ValidationError> {
    if is_valid_reference(reference) {
        None
    } else {
        Some(ValidationError {
            rule: "invalid-reference".to_string(),
            message: format!(
                "{} '{}' is not a secret reference (expected op://<vault>/<item>/[<section>/]<field>)",
                name, reference
            ),
        })
    }
}

/// Check the raw file for problems serde cannot catch.
pub fn validate_file_config(config: &DevInitConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (manager, names) in &config.package_names {
        if manager.parse::<PackageManagerKind>().is_err() {
            errors.push(ValidationError {
                rule: "unknown-package-manager".to_string(),
                message: format!(
                    "package_names: unknown package manager '{}' (expected one of: {})",
                    manager,
                    PackageManagerKind::ALL.map(|k| k.name()).join(", ")
                ),
            });
        }
        for (logical, real) in names {
            if real.trim().is_empty() {
                errors.push(ValidationError {
                    rule: "empty-package-name".to_string(),
                    message: format!("package_names.{}.{} is empty", manager, logical),
                });
            }
        }
    }

    errors
}

/// Check the resolved settings.
pub fn validate_setup_config(config: &SetupConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(check_reference("GitHub token reference", &config.github_token_ref));
    errors.extend(check_reference(
        "Tailscale auth key reference",
        &config.tailscale_authkey_ref,
    ));

    if config.chezmoi_user.trim().is_empty() {
        errors.push(ValidationError {
            rule: "empty-chezmoi-user".to_string(),
            message: "chezmoi user must not be empty".to_string(),
        });
    }

    errors
}

fn into_result(errors: Vec<ValidationError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(DevInitError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

/// Validate a config file, returning all errors joined.
pub fn validate_file(config: &DevInitConfig) -> Result<()> {
    into_result(validate_file_config(config))
}

/// Validate resolved settings, returning all errors joined.
pub fn validate_setup(config: &SetupConfig) -> Result<()> {
    into_result(validate_setup_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn accepts_default_references() {
        assert!(validate_setup_config(&SetupConfig::default()).is_empty());
    }

    #[test]
    fn reference_shapes() {
        assert!(is_valid_reference("op://Developer/GitHub Personal Access Token/token"));
        assert!(!is_valid_reference("op://Developer/GitHub"));
        assert!(is_valid_reference("op://Work/Tailscale/keys/authkey"));
        assert!(!is_valid_reference("op://a/b/c/d/e"));
        assert!(!is_valid_reference("op://a//c"));
        assert!(!is_valid_reference("https://example.com/a/b"));
        assert!(!is_valid_reference(""));
    }

    #[test]
    fn collects_every_error() {
        let config = SetupConfig {
            github_token_ref: "nope".into(),
            tailscale_authkey_ref: "also-nope".into(),
            chezmoi_user: " ".into(),
            ..Default::default()
        };

        let errors = validate_setup_config(&config);

        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| !e.rule.is_empty()));
    }

    #[test]
    fn unknown_manager_in_file() {
        let mut package_names = BTreeMap::new();
        package_names.insert("zypper".to_string(), BTreeMap::new());
        let config = DevInitConfig {
            package_names,
            ..Default::default()
        };

        let errors = validate_file_config(&config);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "unknown-package-manager");
        assert!(errors[0].message.contains("devbox, brew, apt"));
    }

    #[test]
    fn empty_remap_target_in_file() {
        let mut devbox = BTreeMap::new();
        devbox.insert("git".to_string(), "".to_string());
        let mut package_names = BTreeMap::new();
        package_names.insert("devbox".to_string(), devbox);
        let config = DevInitConfig {
            package_names,
            ..Default::default()
        };

        let err = validate_file(&config).unwrap_err();

        assert!(err.to_string().contains("package_names.devbox.git"));
    }
}
