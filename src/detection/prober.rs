//! The real prober, backed by PATH lookups and a couple of status commands.

use std::path::{Path, PathBuf};

use crate::shell::{execute_quiet, Invocation};

use super::{CapabilityProber, ContainerProbe};

/// Probes the live host.
#[derive(Debug, Clone, Default)]
pub struct SystemProber {
    container: ContainerProbe,
}

impl SystemProber {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CapabilityProber for SystemProber {
    fn probe(&self, tool: &str) -> bool {
        let found = find_on_path(tool).is_some();
        tracing::debug!("probe {}: {}", tool, found);
        found
    }

    fn probe_container(&self) -> bool {
        self.container.detect()
    }

    fn probe_tailscale_connected(&self) -> bool {
        if !self.probe("tailscale") {
            return false;
        }
        match execute_quiet(&Invocation::new("tailscale", ["status"])) {
            Ok(result) if result.success => {
                let combined = format!("{}{}", result.stdout, result.stderr);
                tailscale_status_is_connected(&combined)
            }
            _ => false,
        }
    }
}

/// Whether `tailscale status` output describes a logged-in node.
///
/// Any output other than empty or "Logged out" counts as connected.
pub fn tailscale_status_is_connected(output: &str) -> bool {
    let trimmed = output.trim();
    !trimmed.is_empty() && !trimmed.contains("Logged out")
}

/// Resolve `tool` against `$PATH`, returning the first executable match.
pub fn find_on_path(tool: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(tool))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}
