//! Logins and dotfile initialization.
//!
//! Each tool that needs a login gets one [`Authenticator`]. Secrets are
//! fetched by the runner through a `CredentialSource` and handed in; the
//! authenticators never read them on their own.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{DevInitError, Result};
use crate::shell::{execute, CommandOptions, Invocation};

/// Environment variable the 1Password CLI reads in service-account mode.
pub const SERVICE_ACCOUNT_TOKEN_VAR: &str = "OP_SERVICE_ACCOUNT_TOKEN";

/// A secret value. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Logs a tool in (or initializes it) with an optional credential.
pub trait Authenticator {
    fn authenticate(&self, credential: Option<&Credential>) -> Result<()>;
}

fn run(step: &str, invocation: &Invocation, stdin: Option<String>) -> Result<()> {
    let options = CommandOptions {
        stdin,
        ..Default::default()
    };
    let result = execute(invocation, &options)?;
    if result.success {
        Ok(())
    } else {
        Err(DevInitError::ActionFailed {
            step: step.to_string(),
            message: format!(
                "`{}` exited with {:?}",
                redact(&invocation.display()),
                result.exit_code
            ),
        })
    }
}

// Auth keys travel as arguments; keep them out of messages.
fn redact(command: &str) -> String {
    match command.find("--authkey") {
        Some(idx) => format!("{}--authkey ***", &command[..idx]),
        None => command.to_string(),
    }
}

fn require<'c>(step: &str, credential: Option<&'c Credential>) -> Result<&'c Credential> {
    credential.ok_or_else(|| DevInitError::ActionFailed {
        step: step.to_string(),
        message: "no credential supplied".to_string(),
    })
}

/// `op signin`, or service-account token export.
#[derive(Debug, Clone, Default)]
pub struct OnePasswordLogin;

impl OnePasswordLogin {
    pub fn new() -> Self {
        Self
    }

    pub fn signin_invocation() -> Invocation {
        // --force skips the eval warning when stdout is not a shell
        Invocation::new("op", ["signin", "--force"])
    }
}

impl Authenticator for OnePasswordLogin {
    /// With a credential, export it as the service-account token for this
    /// process and its children. Without one, run an interactive sign-in.
    fn authenticate(&self, credential: Option<&Credential>) -> Result<()> {
        match credential {
            Some(token) => {
                std::env::set_var(SERVICE_ACCOUNT_TOKEN_VAR, token.expose());
                tracing::info!("Exported {}", SERVICE_ACCOUNT_TOKEN_VAR);
                Ok(())
            }
            None => run("login-1password", &Self::signin_invocation(), None),
        }
    }
}

/// `gh auth login --with-token` followed by `gh auth setup-git`.
#[derive(Debug, Clone, Default)]
pub struct GitHubAuthenticator;

impl GitHubAuthenticator {
    pub fn new() -> Self {
        Self
    }

    pub fn login_invocation() -> Invocation {
        Invocation::new("gh", ["auth", "login", "--with-token"])
    }

    pub fn setup_git_invocation() -> Invocation {
        Invocation::new("gh", ["auth", "setup-git"])
    }
}

impl Authenticator for GitHubAuthenticator {
    fn authenticate(&self, credential: Option<&Credential>) -> Result<()> {
        let token = require("setup-github", credential)?;
        run(
            "setup-github",
            &Self::login_invocation(),
            Some(token.expose().to_string()),
        )?;
        run("setup-github", &Self::setup_git_invocation(), None)
    }
}

/// `chezmoi init --apply <user>`.
#[derive(Debug, Clone)]
pub struct ChezmoiInitializer {
    user: String,
    service_account: bool,
    home: Option<PathBuf>,
}

impl ChezmoiInitializer {
    pub fn new(user: &str, service_account: bool, home: Option<PathBuf>) -> Self {
        Self {
            user: user.to_string(),
            service_account,
            home,
        }
    }

    pub fn init_invocation(&self) -> Invocation {
        Invocation::new("chezmoi", ["init", "--apply", self.user.as_str()])
    }
}

/// Write `~/.config/chezmoi/chezmoi.toml` telling chezmoi to use 1Password
/// service-account mode. Overwrites any existing file.
pub fn write_chezmoi_service_config(home: &Path) -> Result<PathBuf> {
    let dir = home.join(".config").join("chezmoi");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("chezmoi.toml");
    std::fs::write(&path, "[onepassword]\nmode = \"service\"\n")?;
    Ok(path)
}

impl Authenticator for ChezmoiInitializer {
    fn authenticate(&self, _credential: Option<&Credential>) -> Result<()> {
        if self.service_account {
            let home = self
                .home
                .as_deref()
                .ok_or_else(|| DevInitError::ActionFailed {
                    step: "init-chezmoi".into(),
                    message: "HOME is not set; cannot write chezmoi config".into(),
                })?;
            let path = write_chezmoi_service_config(home)?;
            tracing::info!("Wrote {}", path.display());
        }
        run("init-chezmoi", &self.init_invocation(), None)
    }
}

/// `tailscale up --authkey <key>`.
#[derive(Debug, Clone, Default)]
pub struct TailscaleAuthenticator;

impl TailscaleAuthenticator {
    pub fn new() -> Self {
        Self
    }

    pub fn up_invocation(auth_key: &Credential) -> Invocation {
        Invocation::new("tailscale", ["up", "--authkey", auth_key.expose()])
    }
}

impl Authenticator for TailscaleAuthenticator {
    fn authenticate(&self, credential: Option<&Credential>) -> Result<()> {
        let key = require("setup-tailscale", credential)?;
        run("setup-tailscale", &Self::up_invocation(key), None)
    }
}
