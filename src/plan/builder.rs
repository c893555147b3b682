//! Selection → execution plan.

use tracing::debug;

use crate::detection::ProbeSnapshot;
use crate::selection::{OptionKey, SelectionResult};

use super::packages::Package;
use super::step::{FailurePolicy, Fallback, Precondition, Step, StepAction, StepId};
use super::ExecutionPlan;

/// Auth and init steps, in run order, with the tools each one needs.
const AUTH_STEPS: [(OptionKey, StepId, StepAction, &[&str]); 4] = [
    (
        OptionKey::LoginOnePassword,
        StepId::LoginOnePassword,
        StepAction::LoginOnePassword,
        &["op"],
    ),
    (
        OptionKey::SetupGitHub,
        StepId::SetupGitHub,
        StepAction::SetupGitHub,
        &["gh", "op"],
    ),
    (
        OptionKey::InitChezmoi,
        StepId::InitChezmoi,
        StepAction::InitChezmoi,
        &["chezmoi"],
    ),
    (
        OptionKey::SetupTailscale,
        StepId::SetupTailscale,
        StepAction::SetupTailscale,
        &["tailscale", "op"],
    ),
];

/// Build the ordered plan for a confirmed selection.
///
/// Order is fixed by step kind, never by the selection's key order: package
/// manager, one batched install, then auth steps.
pub fn build(selection: &SelectionResult, snapshot: &ProbeSnapshot) -> ExecutionPlan {
    let mut steps = Vec::new();

    let install_devbox = selection.is_enabled(OptionKey::InstallDevbox);
    let packages: Vec<Package> = OptionKey::ALL
        .into_iter()
        .filter(|key| selection.is_enabled(*key))
        .filter_map(OptionKey::package)
        .collect();

    if install_devbox || !packages.is_empty() {
        let bootstrap_isolated = install_devbox && !snapshot.has("devbox");
        steps.push(Step {
            id: StepId::EnsurePackageManager,
            action: StepAction::EnsurePackageManager { bootstrap_isolated },
            precondition: Precondition::none(),
            fallback: bootstrap_isolated.then_some(Fallback::SystemPackageManager),
            policy: FailurePolicy::AbortWorkflow,
        });
    }

    // Option order already matches Package::ALL.
    if !packages.is_empty() {
        steps.push(Step {
            id: StepId::InstallPackages,
            action: StepAction::InstallPackages { packages },
            precondition: Precondition::none(),
            fallback: Some(Fallback::SystemPackageManager),
            policy: FailurePolicy::WarnAndContinue,
        });
    }

    for (key, id, action, tools) in AUTH_STEPS {
        if selection.is_enabled(key) {
            steps.push(Step {
                id,
                action,
                precondition: Precondition::requires(tools),
                fallback: None,
                policy: FailurePolicy::WarnAndContinue,
            });
        }
    }

    debug!(steps = steps.len(), "built execution plan");
    ExecutionPlan { steps }
}
