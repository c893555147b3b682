//! The toggleable checklist rows and their defaults.

use std::fmt;
use std::str::FromStr;

use crate::detection::ProbeSnapshot;
use crate::plan::Package;

/// Every option the checklist offers, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKey {
    InstallDevbox,
    InstallGit,
    InstallGh,
    InstallOnePassword,
    InstallChezmoi,
    InstallTailscale,
    LoginOnePassword,
    SetupGitHub,
    InitChezmoi,
    SetupTailscale,
}

impl OptionKey {
    pub const ALL: [OptionKey; 10] = [
        Self::InstallDevbox,
        Self::InstallGit,
        Self::InstallGh,
        Self::InstallOnePassword,
        Self::InstallChezmoi,
        Self::InstallTailscale,
        Self::LoginOnePassword,
        Self::SetupGitHub,
        Self::InitChezmoi,
        Self::SetupTailscale,
    ];

    /// Key used on the command line and in results.
    pub fn key(self) -> &'static str {
        match self {
            Self::InstallDevbox => "install_devbox",
            Self::InstallGit => "install_git",
            Self::InstallGh => "install_gh",
            Self::InstallOnePassword => "install_1password",
            Self::InstallChezmoi => "install_chezmoi",
            Self::InstallTailscale => "install_tailscale",
            Self::LoginOnePassword => "login_1password",
            Self::SetupGitHub => "setup_github",
            Self::InitChezmoi => "init_chezmoi",
            Self::SetupTailscale => "setup_tailscale",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::InstallDevbox => "Install Devbox",
            Self::InstallGit => "Install Git",
            Self::InstallGh => "Install GitHub CLI",
            Self::InstallOnePassword => "Install 1Password CLI",
            Self::InstallChezmoi => "Install Chezmoi",
            Self::InstallTailscale => "Install Tailscale",
            Self::LoginOnePassword => "Login to 1Password",
            Self::SetupGitHub => "Setup GitHub Authentication",
            Self::InitChezmoi => "Initialize Chezmoi",
            Self::SetupTailscale => "Setup Tailscale",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::InstallDevbox => "Install the devbox package manager (recommended for Linux)",
            Self::InstallGit => "Install the git version control system",
            Self::InstallGh => "Install the gh command-line tool",
            Self::InstallOnePassword => "Install the 1Password command-line tool",
            Self::InstallChezmoi => "Install the chezmoi dotfile manager",
            Self::InstallTailscale => "Install the Tailscale VPN client",
            Self::LoginOnePassword => "Authenticate with 1Password",
            Self::SetupGitHub => "Configure GitHub CLI with a token from 1Password",
            Self::InitChezmoi => "Run chezmoi init --apply for your dotfiles",
            Self::SetupTailscale => "Connect to the Tailscale network with a key from 1Password",
        }
    }

    /// The package an "install X" option adds to the batch.
    pub fn package(self) -> Option<Package> {
        match self {
            Self::InstallGit => Some(Package::Git),
            Self::InstallGh => Some(Package::GitHubCli),
            Self::InstallOnePassword => Some(Package::OnePasswordCli),
            Self::InstallChezmoi => Some(Package::Chezmoi),
            Self::InstallTailscale => Some(Package::Tailscale),
            _ => None,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for OptionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.key() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown option '{}' (expected one of: {})",
                    s,
                    Self::ALL.map(|k| k.key()).join(", ")
                )
            })
    }
}

/// One toggleable checklist row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOption {
    pub key: OptionKey,
    pub label: String,
    pub description: String,
    pub enabled: bool,
}

impl SetupOption {
    fn new(key: OptionKey, enabled: bool) -> Self {
        Self {
            key,
            label: key.label().to_string(),
            description: key.description().to_string(),
            enabled,
        }
    }
}

/// Build every option with its default state.
///
/// Install options default on when the tool is missing. Inside a container
/// devbox is forced off, since it needs a Nix daemon.
pub fn default_options(snapshot: &ProbeSnapshot, chezmoi_user: &str) -> Vec<SetupOption> {
    OptionKey::ALL
        .into_iter()
        .map(|key| {
            let enabled = match key {
                OptionKey::InstallDevbox => !snapshot.has("devbox") && !snapshot.in_container,
                OptionKey::InstallGit => !snapshot.has("git"),
                OptionKey::InstallGh => !snapshot.has("gh"),
                OptionKey::InstallOnePassword => !snapshot.has("op"),
                OptionKey::InstallChezmoi => !snapshot.has("chezmoi"),
                OptionKey::InstallTailscale => !snapshot.has("tailscale"),
                OptionKey::LoginOnePassword | OptionKey::SetupGitHub | OptionKey::InitChezmoi => {
                    true
                }
                OptionKey::SetupTailscale => {
                    snapshot.has("tailscale") && !snapshot.tailscale_connected
                }
            };
            let mut option = SetupOption::new(key, enabled);
            match key {
                OptionKey::InstallDevbox if snapshot.in_container => {
                    option.description =
                        "⚠ Not recommended inside containers (requires the Nix daemon)".to_string();
                }
                OptionKey::InitChezmoi => {
                    option.description = format!("Run chezmoi init --apply {}", chezmoi_user);
                }
                _ => {}
            }
            option
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DependencyStatus;

    fn snapshot(present: &[&str], in_container: bool, tailscale_connected: bool) -> ProbeSnapshot {
        let dependencies = crate::detection::TRACKED_TOOLS
            .iter()
            .map(|(name, cmd)| DependencyStatus {
                name: name.to_string(),
                command: cmd.to_string(),
                available: present.contains(cmd),
            })
            .collect();
        ProbeSnapshot {
            dependencies,
            in_container,
            tailscale_connected,
            package_manager: None,
        }
    }

    fn enabled(options: &[SetupOption], key: OptionKey) -> bool {
        options.iter().find(|o| o.key == key).unwrap().enabled
    }

    #[test]
    fn options_follow_display_order() {
        let options = default_options(&snapshot(&[], false, false), "whexy");
        let keys: Vec<_> = options.iter().map(|o| o.key).collect();
        assert_eq!(keys, OptionKey::ALL.to_vec());
    }

    #[test]
    fn install_defaults_to_missing_tools() {
        let options = default_options(&snapshot(&["git", "op"], false, false), "whexy");

        assert!(!enabled(&options, OptionKey::InstallGit));
        assert!(!enabled(&options, OptionKey::InstallOnePassword));
        assert!(enabled(&options, OptionKey::InstallGh));
        assert!(enabled(&options, OptionKey::InstallChezmoi));
        assert!(enabled(&options, OptionKey::InstallDevbox));
    }

    #[test]
    fn container_forces_devbox_off_with_warning() {
        let options = default_options(&snapshot(&[], true, false), "whexy");
        let devbox = options
            .iter()
            .find(|o| o.key == OptionKey::InstallDevbox)
            .unwrap();

        assert!(!devbox.enabled);
        assert!(devbox.description.contains("containers"));
    }

    #[test]
    fn auth_options_default_on() {
        let options = default_options(&snapshot(&[], false, false), "whexy");
        assert!(enabled(&options, OptionKey::LoginOnePassword));
        assert!(enabled(&options, OptionKey::SetupGitHub));
        assert!(enabled(&options, OptionKey::InitChezmoi));
    }

    #[test]
    fn tailscale_setup_only_when_installed_and_disconnected() {
        let absent = default_options(&snapshot(&[], false, false), "whexy");
        assert!(!enabled(&absent, OptionKey::SetupTailscale));

        let disconnected = default_options(&snapshot(&["tailscale"], false, false), "whexy");
        assert!(enabled(&disconnected, OptionKey::SetupTailscale));

        let connected = default_options(&snapshot(&["tailscale"], false, true), "whexy");
        assert!(!enabled(&connected, OptionKey::SetupTailscale));
    }

    #[test]
    fn chezmoi_description_names_user() {
        let options = default_options(&snapshot(&[], false, false), "octocat");
        let init = options
            .iter()
            .find(|o| o.key == OptionKey::InitChezmoi)
            .unwrap();
        assert_eq!(init.description, "Run chezmoi init --apply octocat");
    }

    #[test]
    fn option_key_parses_keys_and_dashes() {
        assert_eq!("install_git".parse(), Ok(OptionKey::InstallGit));
        assert_eq!("setup-github".parse(), Ok(OptionKey::SetupGitHub));
        assert_eq!("INSTALL_1PASSWORD".parse(), Ok(OptionKey::InstallOnePassword));
        let err = "install_vim".parse::<OptionKey>().unwrap_err();
        assert!(err.contains("install_vim"));
    }

    #[test]
    fn only_install_options_carry_packages() {
        assert_eq!(OptionKey::InstallGh.package(), Some(Package::GitHubCli));
        assert_eq!(OptionKey::InstallDevbox.package(), None);
        assert_eq!(OptionKey::SetupGitHub.package(), None);
    }
}
