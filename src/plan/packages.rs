//! Logical packages and per-manager name remapping.

use std::collections::BTreeMap;
use std::fmt;

use crate::installer::PackageManagerKind;

/// A package the checklist can install, by its manager-neutral name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Package {
    Git,
    GitHubCli,
    OnePasswordCli,
    Chezmoi,
    Tailscale,
}

impl Package {
    /// Installation order within the single batched install.
    pub const ALL: [Package; 5] = [
        Self::Git,
        Self::GitHubCli,
        Self::OnePasswordCli,
        Self::Chezmoi,
        Self::Tailscale,
    ];

    /// Logical id, also the name most managers use.
    pub fn id(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::GitHubCli => "gh",
            Self::OnePasswordCli => "1password-cli",
            Self::Chezmoi => "chezmoi",
            Self::Tailscale => "tailscale",
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Manager-specific package names, for the few that differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNameTable {
    remaps: BTreeMap<PackageManagerKind, BTreeMap<String, String>>,
}

impl Default for PackageNameTable {
    fn default() -> Self {
        let mut devbox = BTreeMap::new();
        devbox.insert("1password-cli".to_string(), "_1password-cli".to_string());

        let mut remaps = BTreeMap::new();
        remaps.insert(PackageManagerKind::Devbox, devbox);
        Self { remaps }
    }
}

impl PackageNameTable {
    /// A table with no remaps at all.
    pub fn empty() -> Self {
        Self {
            remaps: BTreeMap::new(),
        }
    }

    /// Merge `overrides` in; an override entry replaces the same built-in entry.
    pub fn with_overrides(
        mut self,
        overrides: BTreeMap<PackageManagerKind, BTreeMap<String, String>>,
    ) -> Self {
        for (kind, names) in overrides {
            self.remaps.entry(kind).or_default().extend(names);
        }
        self
    }

    /// The id `kind` knows `logical` by.
    pub fn resolve(&self, kind: PackageManagerKind, logical: &str) -> String {
        self.remaps
            .get(&kind)
            .and_then(|names| names.get(logical))
            .cloned()
            .unwrap_or_else(|| logical.to_string())
    }

    /// Resolve a batch, keeping order.
    pub fn resolve_all(&self, kind: PackageManagerKind, packages: &[Package]) -> Vec<String> {
        packages.iter().map(|p| self.resolve(kind, p.id())).collect()
    }
}
