//! Plan steps.

use std::fmt;

use super::Package;

/// Stable step identifiers, in plan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepId {
    EnsurePackageManager,
    InstallPackages,
    LoginOnePassword,
    SetupGitHub,
    InitChezmoi,
    SetupTailscale,
}

impl StepId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnsurePackageManager => "ensure-package-manager",
            Self::InstallPackages => "install-packages",
            Self::LoginOnePassword => "login-1password",
            Self::SetupGitHub => "setup-github",
            Self::InitChezmoi => "init-chezmoi",
            Self::SetupTailscale => "setup-tailscale",
        }
    }

    /// Key used for prompts raised while this step runs.
    pub fn prompt_key(self) -> String {
        self.as_str().replace('-', "_")
    }

    /// Whether this step logs in to or initializes something (rather than
    /// installing).
    pub fn is_auth(self) -> bool {
        matches!(
            self,
            Self::LoginOnePassword | Self::SetupGitHub | Self::InitChezmoi | Self::SetupTailscale
        )
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a step does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// Acquire a package-manager handle, installing devbox first if asked.
    EnsurePackageManager { bootstrap_isolated: bool },
    /// One batched install through the current handle.
    InstallPackages { packages: Vec<Package> },
    LoginOnePassword,
    SetupGitHub,
    InitChezmoi,
    SetupTailscale,
}

/// Tools that must be on PATH before a step runs, checked in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Precondition {
    pub tools: Vec<&'static str>,
}

impl Precondition {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn requires(tools: &[&'static str]) -> Self {
        Self {
            tools: tools.to_vec(),
        }
    }

    /// The first required tool `present` says is missing.
    pub fn first_missing(&self, present: impl Fn(&str) -> bool) -> Option<&'static str> {
        self.tools.iter().copied().find(|tool| !present(tool))
    }
}

/// What a failure does to the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    AbortWorkflow,
    WarnAndContinue,
}

/// The single alternative a step may switch to after its primary fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Replace the isolated manager with the system one.
    SystemPackageManager,
}

/// One unit of the execution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: StepId,
    pub action: StepAction,
    pub precondition: Precondition,
    pub fallback: Option<Fallback>,
    pub policy: FailurePolicy,
}

impl Step {
    /// Short human description for progress lines and dry runs.
    pub fn describe(&self) -> String {
        match &self.action {
            StepAction::EnsurePackageManager {
                bootstrap_isolated: true,
            } => "Install devbox and select a package manager".to_string(),
            StepAction::EnsurePackageManager { .. } => "Detect package manager".to_string(),
            StepAction::InstallPackages { packages } => format!(
                "Install {}",
                packages
                    .iter()
                    .map(|p| p.id())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            StepAction::LoginOnePassword => "Sign in to 1Password".to_string(),
            StepAction::SetupGitHub => "Authenticate GitHub CLI".to_string(),
            StepAction::InitChezmoi => "Initialize dotfiles with chezmoi".to_string(),
            StepAction::SetupTailscale => "Connect to Tailscale".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_ids_are_kebab_case() {
        assert_eq!(StepId::EnsurePackageManager.as_str(), "ensure-package-manager");
        assert_eq!(StepId::LoginOnePassword.to_string(), "login-1password");
    }

    #[test]
    fn prompt_key_is_snake_case() {
        assert_eq!(StepId::InstallPackages.prompt_key(), "install_packages");
    }

    #[test]
    fn only_auth_steps_are_auth() {
        assert!(!StepId::EnsurePackageManager.is_auth());
        assert!(!StepId::InstallPackages.is_auth());
        assert!(StepId::SetupGitHub.is_auth());
        assert!(StepId::SetupTailscale.is_auth());
    }

    #[test]
    fn first_missing_reports_in_order() {
        let pre = Precondition::requires(&["gh", "op"]);
        assert_eq!(pre.first_missing(|_| false), Some("gh"));
        assert_eq!(pre.first_missing(|t| t == "gh"), Some("op"));
        assert_eq!(pre.first_missing(|_| true), None);
        assert_eq!(Precondition::none().first_missing(|_| false), None);
    }

    #[test]
    fn describe_install_lists_packages() {
        let step = Step {
            id: StepId::InstallPackages,
            action: StepAction::InstallPackages {
                packages: vec![Package::Git, Package::GitHubCli],
            },
            precondition: Precondition::none(),
            fallback: Some(Fallback::SystemPackageManager),
            policy: FailurePolicy::WarnAndContinue,
        };
        assert_eq!(step.describe(), "Install git, gh");
    }
}
