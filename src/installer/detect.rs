//! Choosing a package manager.

use std::fmt;

use crate::detection::CapabilityProber;
use crate::error::Result;
use crate::shell::Platform;

use super::devbox::bootstrap_devbox;
use super::{AptManager, DevboxManager, PackageManager, PackageManagerKind, SystemManager};

/// Outcome of package-manager detection.
pub enum Detection {
    Found(Box<dyn PackageManager>),
    NotFound,
}

impl Detection {
    pub fn is_found(&self) -> bool {
        matches!(self, Detection::Found(_))
    }

    /// Name of the detected manager, if any.
    pub fn name(&self) -> Option<String> {
        match self {
            Detection::Found(pm) => Some(pm.name().to_string()),
            Detection::NotFound => None,
        }
    }
}

impl fmt::Debug for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detection::Found(pm) => write!(f, "Found({})", pm.name()),
            Detection::NotFound => f.write_str("NotFound"),
        }
    }
}

/// System managers to try, in order, for a platform.
fn system_candidates(platform: Platform) -> &'static [PackageManagerKind] {
    match platform {
        Platform::MacOs => &[PackageManagerKind::Brew],
        Platform::Linux => &[
            PackageManagerKind::Apt,
            PackageManagerKind::Pacman,
            PackageManagerKind::Dnf,
            PackageManagerKind::Yum,
        ],
        Platform::Other => &[],
    }
}

fn instantiate(kind: PackageManagerKind, elevated: bool) -> Box<dyn PackageManager> {
    match kind {
        PackageManagerKind::Devbox => Box::new(DevboxManager::new()),
        PackageManagerKind::Apt => Box::new(AptManager::new(elevated)),
        other => Box::new(SystemManager::new(other, elevated)),
    }
}

/// devbox if present, otherwise the first system manager for the platform.
pub fn detect_package_manager(
    prober: &dyn CapabilityProber,
    platform: Platform,
    elevated: bool,
) -> Detection {
    if prober.probe(PackageManagerKind::Devbox.binary()) {
        return Detection::Found(instantiate(PackageManagerKind::Devbox, elevated));
    }
    detect_system_package_manager(prober, platform, elevated)
}

/// The first system manager for the platform, ignoring devbox.
pub fn detect_system_package_manager(
    prober: &dyn CapabilityProber,
    platform: Platform,
    elevated: bool,
) -> Detection {
    system_candidates(platform)
        .iter()
        .find(|kind| prober.probe(kind.binary()))
        .map(|kind| Detection::Found(instantiate(*kind, elevated)))
        .unwrap_or(Detection::NotFound)
}

/// Where the runner gets package managers from.
///
/// Production code uses [`HostPackageManagers`]; tests substitute fakes.
pub trait PackageManagerProvider {
    /// Full detection order (devbox first).
    fn detect(&self) -> Detection;

    /// System managers only; the fallback when devbox fails.
    fn detect_system(&self) -> Detection;

    /// Install the isolated manager.
    fn bootstrap_isolated(&self) -> Result<()>;
}

/// Detection against the live host.
pub struct HostPackageManagers<'a> {
    prober: &'a dyn CapabilityProber,
    platform: Platform,
    elevated: bool,
}

impl<'a> HostPackageManagers<'a> {
    pub fn new(prober: &'a dyn CapabilityProber, platform: Platform, elevated: bool) -> Self {
        Self {
            prober,
            platform,
            elevated,
        }
    }
}

impl PackageManagerProvider for HostPackageManagers<'_> {
    fn detect(&self) -> Detection {
        detect_package_manager(self.prober, self.platform, self.elevated)
    }

    fn detect_system(&self) -> Detection {
        detect_system_package_manager(self.prober, self.platform, self.elevated)
    }

    fn bootstrap_isolated(&self) -> Result<()> {
        bootstrap_devbox()
    }
}
