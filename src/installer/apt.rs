//! apt, plus the vendor repositories some packages need on Debian/Ubuntu.

use crate::detection::find_on_path;
use crate::error::{DevInitError, Result};
use crate::shell::{execute, execute_all, CommandOptions, Invocation};

use super::{PackageManager, PackageManagerKind};

const GH_KEYRING: &str = "/usr/share/keyrings/githubcli-archive-keyring.gpg";
const OP_KEYRING: &str = "/usr/share/keyrings/1password-archive-keyring.gpg";

/// Packages that are not in the stock archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VendorPackage {
    GitHubCli,
    OnePasswordCli,
    Chezmoi,
}

impl VendorPackage {
    fn from_id(id: &str) -> Option<Self> {
        match id {
            "gh" => Some(Self::GitHubCli),
            "1password-cli" => Some(Self::OnePasswordCli),
            "chezmoi" => Some(Self::Chezmoi),
            _ => None,
        }
    }
}

/// apt-get based installs.
#[derive(Debug, Clone)]
pub struct AptManager {
    elevated: bool,
}

/// The install split into its phases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AptPlan {
    /// Missing curl/gnupg/sudo, installed first.
    pub prerequisites: Vec<Invocation>,
    /// `apt-get update` + `apt-get install` for stock packages.
    pub standard: Vec<Invocation>,
    /// Repository setup and installs for vendor packages.
    pub vendor: Vec<Invocation>,
}

impl AptPlan {
    pub fn all(&self) -> Vec<Invocation> {
        self.prerequisites
            .iter()
            .chain(&self.standard)
            .chain(&self.vendor)
            .cloned()
            .collect()
    }
}

impl AptManager {
    pub fn new(elevated: bool) -> Self {
        Self { elevated }
    }

    fn apt_get<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new("apt-get", args).privileged(self.elevated)
    }

    fn sudo_prefix(&self) -> &'static str {
        if self.elevated {
            ""
        } else {
            "sudo "
        }
    }

    /// Build every command needed for `packages`.
    ///
    /// `missing` says which helper binaries (`curl`, `gpg`, `sudo`) are
    /// absent; they are installed first when any vendor package is wanted.
    pub fn plan(&self, packages: &[String], missing: impl Fn(&str) -> bool) -> AptPlan {
        let mut standard_ids = Vec::new();
        let mut vendor = Vec::new();
        for id in packages {
            match VendorPackage::from_id(id) {
                Some(v) => vendor.push(v),
                None => standard_ids.push(id.clone()),
            }
        }

        let mut plan = AptPlan::default();

        if !vendor.is_empty() {
            let mut prereqs = Vec::new();
            if missing("curl") {
                prereqs.push("curl".to_string());
            }
            if missing("gpg") {
                prereqs.push("gnupg".to_string());
            }
            if missing("sudo") && !self.elevated {
                prereqs.push("sudo".to_string());
            }
            if !prereqs.is_empty() {
                plan.prerequisites.push(self.apt_get(["update", "-qq"]));
                let mut args = vec!["install".to_string(), "-y".to_string()];
                args.extend(prereqs);
                plan.prerequisites.push(self.apt_get(args));
            }
        }

        if !standard_ids.is_empty() {
            plan.standard.push(self.apt_get(["update"]));
            let mut args = vec!["install".to_string(), "-y".to_string()];
            args.extend(standard_ids);
            plan.standard.push(self.apt_get(args));
        }

        for package in vendor {
            plan.vendor.extend(self.vendor_invocations(package));
        }

        plan
    }

    fn vendor_invocations(&self, package: VendorPackage) -> Vec<Invocation> {
        let sudo = self.sudo_prefix();
        match package {
            VendorPackage::GitHubCli => vec![
                Invocation::new(
                    "bash",
                    [
                        "-c".to_string(),
                        format!(
                            "curl -fsSL https://cli.github.com/packages/githubcli-archive-keyring.gpg | {}dd of={}",
                            sudo, GH_KEYRING
                        ),
                    ],
                ),
                Invocation::new(
                    "bash",
                    [
                        "-c".to_string(),
                        format!(
                            "echo \"deb [arch=$(dpkg --print-architecture) signed-by={}] https://cli.github.com/packages stable main\" | {}tee /etc/apt/sources.list.d/github-cli.list",
                            GH_KEYRING, sudo
                        ),
                    ],
                ),
                self.apt_get(["update"]),
                self.apt_get(["install", "-y", "gh"]),
            ],
            VendorPackage::OnePasswordCli => vec![
                Invocation::new(
                    "bash",
                    [
                        "-c".to_string(),
                        format!(
                            "curl -sS https://downloads.1password.com/linux/keys/1password.asc | {}gpg --dearmor --output {}",
                            sudo, OP_KEYRING
                        ),
                    ],
                ),
                Invocation::new(
                    "bash",
                    [
                        "-c".to_string(),
                        format!(
                            "echo 'deb [arch=$(dpkg --print-architecture) signed-by={}] https://downloads.1password.com/linux/debian/$(dpkg --print-architecture) stable main' | {}tee /etc/apt/sources.list.d/1password.list",
                            OP_KEYRING, sudo
                        ),
                    ],
                ),
                self.apt_get(["update"]),
                self.apt_get(["install", "-y", "1password-cli"]),
            ],
            VendorPackage::Chezmoi => vec![Invocation::shell(&format!(
                "curl -fsLS get.chezmoi.io | {}sh -s -- -b /usr/local/bin",
                sudo
            ))],
        }
    }
}

impl PackageManager for AptManager {
    fn name(&self) -> &str {
        "apt"
    }

    fn kind(&self) -> PackageManagerKind {
        PackageManagerKind::Apt
    }

    fn install(&self, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        let plan = self.plan(packages, |tool| find_on_path(tool).is_none());
        run_plan(&plan)
    }

    fn is_available(&self) -> bool {
        find_on_path("apt-get").is_some()
    }
}

/// Run the phases in order.
///
/// The prerequisite refresh is best-effort. A stock-package failure does not
/// stop the vendor installs, but it is still the error returned.
fn run_plan(plan: &AptPlan) -> Result<()> {
    if let Some((update, rest)) = plan.prerequisites.split_first() {
        if let Err(e) = execute(update, &CommandOptions::default()) {
            tracing::debug!("Prerequisite refresh failed: {}", e);
        }
        execute_all(rest).map_err(to_action_failed)?;
    }

    let standard = execute_all(&plan.standard);
    if let Err(e) = &standard {
        tracing::warn!("Some standard packages failed to install: {}", e);
    }
    let vendor = execute_all(&plan.vendor);

    standard.and(vendor).map_err(to_action_failed)
}

fn to_action_failed(e: DevInitError) -> DevInitError {
    match e {
        DevInitError::CommandFailed { command, code } => DevInitError::ActionFailed {
            step: "install-packages".into(),
            message: format!("{} exited with {:?}", command, code),
        },
        other => other,
    }
}
