//! Host capability probing.
//!
//! Everything here is read-only: the prober answers "is this tool on PATH",
//! "are we inside a container" and "is the VPN client already connected".
//! [`ProbeSnapshot`] captures those answers once at startup; later checks go
//! back to the prober explicitly.

pub mod container;
pub mod prober;
pub mod snapshot;

pub use container::ContainerProbe;
pub use prober::{find_on_path, tailscale_status_is_connected, SystemProber};
pub use snapshot::{DependencyStatus, ProbeSnapshot, TRACKED_TOOLS};

/// Read-only questions about the host.
pub trait CapabilityProber {
    /// Whether `tool` resolves to an executable on PATH.
    fn probe(&self, tool: &str) -> bool;

    /// Whether this process runs inside a container.
    fn probe_container(&self) -> bool;

    /// Whether the Tailscale client reports an active login.
    fn probe_tailscale_connected(&self) -> bool;
}
