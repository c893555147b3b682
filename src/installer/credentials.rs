//! Secret reads through the 1Password CLI.

use crate::error::CredentialError;
use crate::shell::{execute_quiet, Invocation};

/// Something that resolves `op://vault/item/field` style references.
pub trait CredentialSource {
    fn read_secret(&self, reference: &str) -> std::result::Result<String, CredentialError>;
}

/// `op read <reference>`.
#[derive(Debug, Clone, Default)]
pub struct OnePasswordCli;

impl OnePasswordCli {
    pub fn new() -> Self {
        Self
    }

    pub fn read_invocation(reference: &str) -> Invocation {
        Invocation::new("op", ["read", reference])
    }
}

impl CredentialSource for OnePasswordCli {
    fn read_secret(&self, reference: &str) -> std::result::Result<String, CredentialError> {
        tracing::debug!("Reading secret {}", reference);
        let result = execute_quiet(&Self::read_invocation(reference))
            .map_err(|_| CredentialError::Unreachable)?;

        if !result.success {
            let cause = classify_failure(&result.stderr);
            tracing::debug!("op read failed ({}): {}", cause, result.stderr.trim());
            return Err(cause);
        }

        let secret = result.stdout.trim();
        if secret.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(secret.to_string())
    }
}

/// Map `op read` error text onto the three failure kinds.
///
/// Lookup misses say so explicitly; anything else (not signed in, network,
/// locked vault) means the source could not be reached.
pub fn classify_failure(stderr: &str) -> CredentialError {
    let lower = stderr.to_lowercase();
    if lower.contains("isn't an item")
        || lower.contains("not found")
        || lower.contains("no item")
        || lower.contains("isn't a vault")
        || lower.contains("isn't a field")
    {
        CredentialError::NotFound
    } else {
        CredentialError::Unreachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_invocation_passes_reference_as_one_arg() {
        let inv = OnePasswordCli::read_invocation("op://Developer/GitHub Personal Access Token/token");
        assert_eq!(inv.program, "op");
        assert_eq!(
            inv.args,
            vec!["read", "op://Developer/GitHub Personal Access Token/token"]
        );
    }

    #[test]
    fn missing_item_is_not_found() {
        let stderr = "[ERROR] 2024/01/01 \"GitHub\" isn't an item in the \"Developer\" vault.";
        assert_eq!(classify_failure(stderr), CredentialError::NotFound);
    }

    #[test]
    fn missing_field_is_not_found() {
        assert_eq!(
            classify_failure("\"token2\" isn't a field in the \"GitHub\" item"),
            CredentialError::NotFound
        );
    }

    #[test]
    fn signin_errors_are_unreachable() {
        assert_eq!(
            classify_failure("[ERROR] You are not currently signed in."),
            CredentialError::Unreachable
        );
        assert_eq!(classify_failure(""), CredentialError::Unreachable);
    }
}
