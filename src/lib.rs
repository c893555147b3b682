//! devinit - Interactive bootstrap for a fresh development machine.
//!
//! devinit probes the host for a handful of developer tools, lets the user
//! pick what to install and configure from a checklist, then runs the
//! resulting plan: package manager first, one batched install, then the
//! logins and dotfile setup.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`detection`] - Read-only host probes
//! - [`error`] - Error types and result aliases
//! - [`installer`] - Package managers, credential source and authenticators
//! - [`plan`] - Turning a selection into ordered steps
//! - [`runner`] - Step execution with fallbacks
//! - [`selection`] - The checklist state machine and its drivers
//! - [`shell`] - Shell command execution
//! - [`ui`] - Prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use devinit::detection::{DependencyStatus, ProbeSnapshot};
//! use devinit::plan::{build, StepId};
//! use devinit::selection::{OptionKey, SelectionResult};
//!
//! let snapshot = ProbeSnapshot {
//!     dependencies: vec![DependencyStatus {
//!         name: "Git".into(),
//!         command: "git".into(),
//!         available: false,
//!     }],
//!     in_container: false,
//!     tailscale_connected: false,
//!     package_manager: Some("apt".into()),
//! };
//! let selection = SelectionResult::from_pairs([(OptionKey::InstallGit, true)]);
//!
//! let plan = build(&selection, &snapshot);
//! assert_eq!(plan.ids(), vec![StepId::EnsurePackageManager, StepId::InstallPackages]);
//! ```

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod installer;
pub mod plan;
pub mod runner;
pub mod selection;
pub mod shell;
pub mod ui;

pub use error::{DevInitError, Result};
