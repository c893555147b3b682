//! devbox: the isolated package manager, and how to get it.

use anyhow::{anyhow, Context};

use crate::detection::find_on_path;
use crate::error::{DevInitError, Result};
use crate::shell::{execute, CommandOptions, Invocation};

use super::{PackageManager, PackageManagerKind};

/// Where the official install script lives.
pub const DEVBOX_INSTALL_URL: &str = "https://get.jetify.com/devbox";

/// What the user must run for devbox-installed tools to land on PATH.
pub const DEVBOX_SHELLENV_HINT: &str = "eval \"$(devbox global shellenv --init-hook)\"";

/// `devbox global add` installs.
#[derive(Debug, Clone, Default)]
pub struct DevboxManager;

impl DevboxManager {
    pub fn new() -> Self {
        Self
    }

    pub fn install_invocation(&self, packages: &[String]) -> Invocation {
        let mut args = vec!["global".to_string(), "add".to_string()];
        args.extend(packages.iter().cloned());
        Invocation::new("devbox", args)
    }
}

impl PackageManager for DevboxManager {
    fn name(&self) -> &str {
        "devbox"
    }

    fn kind(&self) -> PackageManagerKind {
        PackageManagerKind::Devbox
    }

    fn install(&self, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        let invocation = self.install_invocation(packages);
        tracing::info!("Running: {}", invocation.display());
        let result = execute(&invocation, &CommandOptions::default())?;
        if result.success {
            Ok(())
        } else {
            Err(DevInitError::ActionFailed {
                step: "install-packages".into(),
                message: format!("devbox exited with {:?}", result.exit_code),
            })
        }
    }

    fn is_available(&self) -> bool {
        find_on_path("devbox").is_some()
    }
}

/// Download the devbox install script and run it with bash.
pub fn bootstrap_devbox() -> Result<()> {
    let script = download_install_script(DEVBOX_INSTALL_URL)?;
    run_install_script(&script)
}

fn download_install_script(url: &str) -> Result<String> {
    tracing::info!("Downloading devbox installer from {}", url);
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("devinit/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to download devbox installer from {}", url))?;

    if !response.status().is_success() {
        return Err(anyhow!("HTTP {} fetching {}", response.status(), url).into());
    }

    let script = response
        .text()
        .with_context(|| format!("Failed to read response from {}", url))?;
    Ok(script)
}

fn run_install_script(script: &str) -> Result<()> {
    let options = CommandOptions {
        stdin: Some(script.to_string()),
        ..Default::default()
    };
    let result = execute(&Invocation::new("bash", ["-s"]), &options)?;
    if result.success {
        Ok(())
    } else {
        Err(DevInitError::ActionFailed {
            step: "ensure-package-manager".into(),
            message: format!("devbox installer exited with {:?}", result.exit_code),
        })
    }
}
