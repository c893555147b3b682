//! Startup probe results.

use super::CapabilityProber;

/// Tools shown in the dependency panel: (display name, command).
pub const TRACKED_TOOLS: &[(&str, &str)] = &[
    ("Git", "git"),
    ("GitHub CLI", "gh"),
    ("1Password CLI", "op"),
    ("Chezmoi", "chezmoi"),
    ("Devbox", "devbox"),
    ("Tailscale", "tailscale"),
];

/// One read-only row of the dependency panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyStatus {
    pub name: String,
    pub command: String,
    pub available: bool,
}

impl DependencyStatus {
    pub fn icon(&self) -> &'static str {
        if self.available {
            "✓"
        } else {
            "✗"
        }
    }
}

/// Everything probed before the checklist opens.
///
/// Computed once and never updated; option defaults are a pure function of
/// this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSnapshot {
    pub dependencies: Vec<DependencyStatus>,
    pub in_container: bool,
    pub tailscale_connected: bool,
    /// Name of the package manager detection settled on, if any.
    pub package_manager: Option<String>,
}

impl ProbeSnapshot {
    /// Probe every tracked tool plus the container and VPN state.
    pub fn collect(prober: &dyn CapabilityProber, package_manager: Option<String>) -> Self {
        let dependencies = TRACKED_TOOLS
            .iter()
            .map(|(name, command)| DependencyStatus {
                name: name.to_string(),
                command: command.to_string(),
                available: prober.probe(command),
            })
            .collect();

        Self {
            dependencies,
            in_container: prober.probe_container(),
            tailscale_connected: prober.probe_tailscale_connected(),
            package_manager,
        }
    }

    /// Whether `command` was found at startup. Untracked tools read as absent.
    pub fn has(&self, command: &str) -> bool {
        self.dependencies
            .iter()
            .any(|d| d.command == command && d.available)
    }

    /// Dependency rows plus the package manager row.
    pub fn panel_rows(&self) -> Vec<DependencyStatus> {
        let mut rows = self.dependencies.clone();
        rows.push(match &self.package_manager {
            Some(name) => DependencyStatus {
                name: format!("Package Manager ({})", name),
                command: name.clone(),
                available: true,
            },
            None => DependencyStatus {
                name: "Package Manager (none)".to_string(),
                command: String::new(),
                available: false,
            },
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct StaticProber {
        tools: HashSet<&'static str>,
        container: bool,
    }

    impl CapabilityProber for StaticProber {
        fn probe(&self, tool: &str) -> bool {
            self.tools.contains(tool)
        }
        fn probe_container(&self) -> bool {
            self.container
        }
        fn probe_tailscale_connected(&self) -> bool {
            false
        }
    }

    #[test]
    fn collect_probes_every_tracked_tool() {
        let prober = StaticProber {
            tools: ["git", "op"].into_iter().collect(),
            container: true,
        };

        let snapshot = ProbeSnapshot::collect(&prober, Some("apt".into()));

        assert_eq!(snapshot.dependencies.len(), TRACKED_TOOLS.len());
        assert!(snapshot.has("git"));
        assert!(snapshot.has("op"));
        assert!(!snapshot.has("gh"));
        assert!(snapshot.in_container);
    }

    #[test]
    fn untracked_tool_reads_absent() {
        let prober = StaticProber {
            tools: ["curl"].into_iter().collect(),
            container: false,
        };
        let snapshot = ProbeSnapshot::collect(&prober, None);
        assert!(!snapshot.has("curl"));
    }

    #[test]
    fn panel_rows_end_with_package_manager() {
        let prober = StaticProber {
            tools: HashSet::new(),
            container: false,
        };

        let rows = ProbeSnapshot::collect(&prober, Some("brew".into())).panel_rows();
        let last = rows.last().unwrap();
        assert_eq!(last.name, "Package Manager (brew)");
        assert_eq!(last.icon(), "✓");

        let rows = ProbeSnapshot::collect(&prober, None).panel_rows();
        assert_eq!(rows.last().unwrap().icon(), "✗");
    }
}
