//! brew, pacman, dnf and yum: managers whose install is a single command.

use crate::detection::find_on_path;
use crate::error::{DevInitError, Result};
use crate::shell::{execute_all, Invocation};

use super::{PackageManager, PackageManagerKind};

/// A package manager with a one-shot install command.
#[derive(Debug, Clone)]
pub struct SystemManager {
    kind: PackageManagerKind,
    elevated: bool,
}

impl SystemManager {
    /// `kind` must be brew, pacman, dnf or yum.
    pub fn new(kind: PackageManagerKind, elevated: bool) -> Self {
        Self { kind, elevated }
    }

    /// The command that installs `packages`.
    pub fn install_invocation(&self, packages: &[String]) -> Invocation {
        let mut args: Vec<String> = match self.kind {
            PackageManagerKind::Pacman => vec!["-S".into(), "--noconfirm".into()],
            PackageManagerKind::Brew => vec!["install".into()],
            _ => vec!["install".into(), "-y".into()],
        };
        args.extend(packages.iter().cloned());

        let invocation = Invocation::new(self.kind.binary(), args);
        if self.kind == PackageManagerKind::Brew {
            // brew refuses to run under sudo
            invocation
        } else {
            invocation.privileged(self.elevated)
        }
    }
}

impl PackageManager for SystemManager {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn kind(&self) -> PackageManagerKind {
        self.kind
    }

    fn install(&self, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        let invocation = self.install_invocation(packages);
        tracing::info!("Running: {}", invocation.display());
        execute_all(std::slice::from_ref(&invocation)).map_err(|e| match e {
            DevInitError::CommandFailed { command, code } => DevInitError::ActionFailed {
                step: "install-packages".into(),
                message: format!("{} exited with {:?}", command, code),
            },
            other => other,
        })
    }

    fn is_available(&self) -> bool {
        find_on_path(self.kind.binary()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn brew_never_uses_sudo() {
        let brew = SystemManager::new(PackageManagerKind::Brew, false);
        let inv = brew.install_invocation(&ids(&["git", "gh"]));
        assert_eq!(inv.display(), "brew install git gh");
    }

    #[test]
    fn pacman_uses_noconfirm() {
        let pacman = SystemManager::new(PackageManagerKind::Pacman, false);
        let inv = pacman.install_invocation(&ids(&["git"]));
        assert_eq!(inv.display(), "sudo pacman -S --noconfirm git");
    }

    #[test]
    fn dnf_and_yum_use_assume_yes() {
        let dnf = SystemManager::new(PackageManagerKind::Dnf, false);
        assert_eq!(
            dnf.install_invocation(&ids(&["git", "tailscale"])).display(),
            "sudo dnf install -y git tailscale"
        );

        let yum = SystemManager::new(PackageManagerKind::Yum, true);
        assert_eq!(
            yum.install_invocation(&ids(&["git"])).display(),
            "yum install -y git"
        );
    }

    #[test]
    fn install_with_no_packages_is_noop() {
        let dnf = SystemManager::new(PackageManagerKind::Dnf, false);
        assert!(dnf.install(&[]).is_ok());
    }

    #[test]
    fn name_matches_kind() {
        let yum = SystemManager::new(PackageManagerKind::Yum, false);
        assert_eq!(yum.name(), "yum");
        assert_eq!(yum.kind(), PackageManagerKind::Yum);
    }
}
