//! Container detection.

use std::path::{Path, PathBuf};

/// Environment variables container runtimes set.
const CONTAINER_ENV_VARS: &[&str] = &["DOCKER_CONTAINER", "KUBERNETES_SERVICE_HOST", "container"];

/// cgroup markers that mean PID 1 belongs to a container runtime.
const CGROUP_MARKERS: &[&str] = &["docker", "lxc", "containerd"];

/// Checks the usual container signals relative to a filesystem root.
#[derive(Debug, Clone)]
pub struct ContainerProbe {
    root: PathBuf,
}

impl Default for ContainerProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerProbe {
    /// Probe the real filesystem.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/"),
        }
    }

    /// Probe a fake root (for testing).
    pub fn with_root(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Check the filesystem markers and the process environment.
    pub fn detect(&self) -> bool {
        self.detect_with_env(|key| std::env::var(key).ok())
    }

    /// Check the filesystem markers and an arbitrary environment lookup.
    pub fn detect_with_env<F>(&self, env: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.root.join(".dockerenv").exists() {
            tracing::debug!("Container detected via /.dockerenv");
            return true;
        }

        if let Ok(cgroup) = std::fs::read_to_string(self.root.join("proc/1/cgroup")) {
            if CGROUP_MARKERS.iter().any(|m| cgroup.contains(m)) {
                tracing::debug!("Container detected via /proc/1/cgroup");
                return true;
            }
        }

        CONTAINER_ENV_VARS
            .iter()
            .any(|var| env(var).is_some_and(|v| !v.is_empty()))
    }
}
