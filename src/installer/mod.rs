//! Package managers and the external collaborators that log in to things.
//!
//! The runner only ever talks to the traits defined here:
//! - [`PackageManager`]: `name`, `install`, `is_available`
//! - [`PackageManagerProvider`]: detection and the isolated-manager bootstrap
//! - [`CredentialSource`] and [`Authenticator`]: secret reads and logins

pub mod apt;
pub mod auth;
pub mod credentials;
pub mod detect;
pub mod devbox;
pub mod system;

pub use apt::AptManager;
pub use auth::{
    Authenticator, ChezmoiInitializer, Credential, GitHubAuthenticator, OnePasswordLogin,
    TailscaleAuthenticator,
};
pub use credentials::{CredentialSource, OnePasswordCli};
pub use detect::{
    detect_package_manager, detect_system_package_manager, Detection, HostPackageManagers,
    PackageManagerProvider,
};
pub use devbox::DevboxManager;
pub use system::SystemManager;

use std::fmt;
use std::str::FromStr;

use crate::error::Result;

/// A package manager the runner can install through.
pub trait PackageManager {
    /// Short name shown to the user ("apt", "devbox", ...).
    fn name(&self) -> &str;

    /// Which variant this is; used to look up package-name remaps.
    fn kind(&self) -> PackageManagerKind;

    /// Install every id in one batch, in order.
    fn install(&self, packages: &[String]) -> Result<()>;

    /// Whether the manager's binary is on PATH.
    fn is_available(&self) -> bool;
}

/// Every supported package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackageManagerKind {
    Devbox,
    Brew,
    Apt,
    Pacman,
    Dnf,
    Yum,
}

impl PackageManagerKind {
    pub const ALL: [PackageManagerKind; 6] = [
        Self::Devbox,
        Self::Brew,
        Self::Apt,
        Self::Pacman,
        Self::Dnf,
        Self::Yum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Devbox => "devbox",
            Self::Brew => "brew",
            Self::Apt => "apt",
            Self::Pacman => "pacman",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
        }
    }

    /// The executable whose presence means this manager is usable.
    pub fn binary(self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            other => other.name(),
        }
    }

    /// Isolated managers install into a per-user environment rather than
    /// the system.
    pub fn is_isolated(self) -> bool {
        matches!(self, Self::Devbox)
    }

    /// How a user would install `packages` by hand.
    pub fn manual_install_command(self, packages: &[String]) -> String {
        let ids = packages.join(" ");
        match self {
            Self::Devbox => format!("devbox global add {}", ids),
            Self::Brew => format!("brew install {}", ids),
            Self::Apt => format!("sudo apt-get install -y {}", ids),
            Self::Pacman => format!("sudo pacman -S --noconfirm {}", ids),
            Self::Dnf => format!("sudo dnf install -y {}", ids),
            Self::Yum => format!("sudo yum install -y {}", ids),
        }
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PackageManagerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "devbox" => Ok(Self::Devbox),
            "brew" | "homebrew" => Ok(Self::Brew),
            "apt" | "apt-get" => Ok(Self::Apt),
            "pacman" => Ok(Self::Pacman),
            "dnf" => Ok(Self::Dnf),
            "yum" => Ok(Self::Yum),
            _ => Err(format!("unknown package manager: {}", s)),
        }
    }
}
