//! Plan execution.
//!
//! Steps run strictly in order. Each one goes through a [`StepMachine`]:
//! precondition, primary action, then at most one fallback. Only a failed
//! step with [`FailurePolicy::AbortWorkflow`] stops the run; everything else
//! becomes a warning and the next step starts.

use tracing::{debug, info, warn};

use crate::config::SetupConfig;
use crate::detection::CapabilityProber;
use crate::error::{CredentialError, DevInitError, Result};
use crate::installer::auth::SERVICE_ACCOUNT_TOKEN_VAR;
use crate::installer::devbox::{DEVBOX_INSTALL_URL, DEVBOX_SHELLENV_HINT};
use crate::installer::{
    Authenticator, Credential, CredentialSource, Detection, PackageManager,
    PackageManagerProvider,
};
use crate::plan::{ExecutionPlan, FailurePolicy, Package, Step, StepAction, StepId};
use crate::ui::{Prompt, UserInterface};

use super::report::{RunReport, RunnerState, StepOutcome, StepReport};
use super::step::{StepEvent, StepMachine, StepState};

/// Everything outside the process the runner talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub prober: &'a dyn CapabilityProber,
    pub package_managers: &'a dyn PackageManagerProvider,
    pub credentials: &'a dyn CredentialSource,
    pub onepassword: &'a dyn Authenticator,
    pub github: &'a dyn Authenticator,
    pub chezmoi: &'a dyn Authenticator,
    pub tailscale: &'a dyn Authenticator,
}

/// Walks an [`ExecutionPlan`].
///
/// Owns the package-manager handle for the run. The handle is set by the
/// ensure step and replaced at most once, when a fallback is accepted.
pub struct ExecutionRunner<'a> {
    config: &'a SetupConfig,
    collaborators: Collaborators<'a>,
    service_token: Option<String>,
    handle: Option<Box<dyn PackageManager>>,
    handle_replaced: bool,
    state: RunnerState,
}

impl<'a> ExecutionRunner<'a> {
    pub fn new(config: &'a SetupConfig, collaborators: Collaborators<'a>) -> Self {
        Self {
            config,
            collaborators,
            service_token: None,
            handle: None,
            handle_replaced: false,
            state: RunnerState::NotStarted,
        }
    }

    /// Pre-supplied service-account token; empty values are ignored.
    pub fn with_service_token(mut self, token: Option<String>) -> Self {
        self.service_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Name of the package manager currently in use.
    pub fn package_manager(&self) -> Option<&str> {
        self.handle.as_deref().map(|pm| pm.name())
    }

    pub fn run(&mut self, plan: &ExecutionPlan, ui: &mut dyn UserInterface) -> RunReport {
        info!(steps = plan.len(), "starting run");
        let total = plan.len();
        let mut reports = Vec::with_capacity(total);
        let mut warnings = Vec::new();

        for (index, step) in plan.steps.iter().enumerate() {
            self.state = RunnerState::Running(index);
            ui.show_progress(index + 1, total);
            ui.message(&step.describe());

            let machine = self.execute_step(step, ui);
            let outcome = match machine.state() {
                StepState::Succeeded => StepOutcome::Succeeded,
                StepState::Skipped { reason } => StepOutcome::Skipped {
                    reason: reason.clone(),
                },
                StepState::Failed { cause } => StepOutcome::Failed {
                    cause: cause.clone(),
                },
                other => StepOutcome::Failed {
                    cause: format!("step stopped in state {:?}", other),
                },
            };

            let remediation = match &outcome {
                StepOutcome::Skipped { reason } | StepOutcome::Failed { cause: reason } => {
                    let warning = format!("{}: {}", step.id, reason);
                    warn!(
                        step = %step.id,
                        attempts = machine.attempts(),
                        cause = %reason,
                        "step did not succeed"
                    );
                    ui.warning(&warning);
                    warnings.push(warning);
                    Some(self.remediation(step))
                }
                _ => {
                    debug!(step = %step.id, attempts = machine.attempts(), "step succeeded");
                    None
                }
            };

            let fatal = matches!(outcome, StepOutcome::Failed { .. })
                && step.policy == FailurePolicy::AbortWorkflow;

            reports.push(StepReport {
                id: step.id,
                outcome,
                used_fallback: machine.used_fallback(),
                remediation,
            });

            if fatal {
                self.state = RunnerState::Aborted;
                warn!(step = %step.id, "aborting run");
                ui.error("No package manager is available; remaining steps were not run");
                reports.extend(plan.steps[index + 1..].iter().map(|rest| StepReport {
                    id: rest.id,
                    outcome: StepOutcome::NotRun,
                    used_fallback: false,
                    remediation: None,
                }));
                return RunReport {
                    state: self.state,
                    steps: reports,
                    warnings,
                };
            }
        }

        self.state = RunnerState::Completed;
        info!(warnings = warnings.len(), "run completed");
        RunReport {
            state: self.state,
            steps: reports,
            warnings,
        }
    }

    fn execute_step(&mut self, step: &Step, ui: &mut dyn UserInterface) -> StepMachine {
        let has_fallback = step.fallback.is_some() && self.fallback_applies(step);
        let mut machine = StepMachine::new(has_fallback).handle(StepEvent::Start);

        let prober = self.collaborators.prober;
        machine = machine.handle(
            match step.precondition.first_missing(|tool| prober.probe(tool)) {
                Some(tool) => StepEvent::PreconditionMissing(tool.to_string()),
                None => StepEvent::PreconditionMet,
            },
        );

        while !machine.state().is_terminal() {
            let event = match machine.state() {
                StepState::RunningPrimary => match self.run_primary(step, ui) {
                    Ok(()) => StepEvent::PrimarySucceeded,
                    Err(e) => StepEvent::PrimaryFailed(e.to_string()),
                },
                StepState::AwaitingFallbackDecision { cause } => {
                    let cause = cause.clone();
                    if self.offer_fallback(step, &cause, ui) {
                        StepEvent::FallbackAccepted
                    } else {
                        StepEvent::FallbackDeclined
                    }
                }
                StepState::RunningFallback => match self.run_fallback(step, ui) {
                    Ok(()) => StepEvent::FallbackSucceeded,
                    Err(e) => StepEvent::FallbackFailed(e.to_string()),
                },
                other => {
                    debug!(state = ?other, "unexpected step state");
                    break;
                }
            };
            machine = machine.handle(event);
        }

        machine
    }

    fn fallback_applies(&self, step: &Step) -> bool {
        match &step.action {
            StepAction::EnsurePackageManager { bootstrap_isolated } => *bootstrap_isolated,
            StepAction::InstallPackages { .. } => {
                !self.handle_replaced
                    && self
                        .handle
                        .as_deref()
                        .is_some_and(|pm| pm.kind().is_isolated())
            }
            _ => false,
        }
    }

    fn offer_fallback(&self, step: &Step, cause: &str, ui: &mut dyn UserInterface) -> bool {
        ui.message(&format!("{} failed: {}", step.id, cause));
        let question = match step.action {
            StepAction::EnsurePackageManager { .. } => {
                "Devbox could not be set up. Use the system package manager instead?"
            }
            _ => "Installing through devbox failed. Retry with the system package manager?",
        };
        let prompt = Prompt::confirm(
            &format!("fallback_{}", step.id.prompt_key()),
            question,
            true,
        );
        match ui.prompt(&prompt) {
            Ok(answer) => answer.as_bool().unwrap_or(false),
            Err(e) => {
                warn!(error = %e, "fallback prompt failed; treating as declined");
                false
            }
        }
    }

    fn run_primary(&mut self, step: &Step, ui: &mut dyn UserInterface) -> Result<()> {
        match &step.action {
            StepAction::EnsurePackageManager { bootstrap_isolated } => {
                self.ensure_package_manager(*bootstrap_isolated, ui)
            }
            StepAction::InstallPackages { packages } => self.install(packages, ui),
            StepAction::LoginOnePassword => self.login_onepassword(ui),
            StepAction::SetupGitHub => self.authenticate_with_secret(
                &self.config.github_token_ref,
                self.collaborators.github,
                ui,
            ),
            StepAction::InitChezmoi => self.collaborators.chezmoi.authenticate(None),
            StepAction::SetupTailscale => self.authenticate_with_secret(
                &self.config.tailscale_authkey_ref,
                self.collaborators.tailscale,
                ui,
            ),
        }
    }

    fn run_fallback(&mut self, step: &Step, ui: &mut dyn UserInterface) -> Result<()> {
        match &step.action {
            StepAction::EnsurePackageManager { .. } => self.adopt_system_manager(step.id, ui),
            StepAction::InstallPackages { packages } => {
                self.adopt_system_manager(step.id, ui)?;
                self.install(packages, ui)
            }
            _ => Err(DevInitError::ActionFailed {
                step: step.id.to_string(),
                message: "no fallback available".to_string(),
            }),
        }
    }

    fn ensure_package_manager(
        &mut self,
        bootstrap_isolated: bool,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let provider = self.collaborators.package_managers;

        if !bootstrap_isolated {
            return match provider.detect() {
                Detection::Found(pm) => {
                    self.adopt(pm, ui);
                    Ok(())
                }
                Detection::NotFound => Err(DevInitError::FatalBootstrapFailure {
                    message: "no supported package manager found".to_string(),
                }),
            };
        }

        if self.collaborators.prober.probe("devbox") {
            debug!("devbox already on PATH; skipping bootstrap");
        } else {
            ui.message("Installing devbox...");
            provider.bootstrap_isolated()?;
        }

        // Explicit re-probe: the install may not have put devbox on PATH.
        match provider.detect() {
            Detection::Found(pm) if pm.kind().is_isolated() => {
                self.adopt(pm, ui);
                Ok(())
            }
            _ => Err(DevInitError::ActionFailed {
                step: StepId::EnsurePackageManager.to_string(),
                message: "devbox is not on PATH after installation".to_string(),
            }),
        }
    }

    fn adopt(&mut self, pm: Box<dyn PackageManager>, ui: &mut dyn UserInterface) {
        info!(manager = pm.name(), "using package manager");
        ui.success(&format!("Using {}", pm.name()));
        if pm.kind().is_isolated() {
            ui.show_hint(&format!(
                "Load devbox packages into your shell with: {}",
                DEVBOX_SHELLENV_HINT
            ));
        }
        self.handle = Some(pm);
    }

    fn adopt_system_manager(&mut self, step: StepId, ui: &mut dyn UserInterface) -> Result<()> {
        match self.collaborators.package_managers.detect_system() {
            Detection::Found(pm) => {
                info!(
                    from = self.package_manager().unwrap_or("none"),
                    to = pm.name(),
                    "replacing package manager"
                );
                ui.message(&format!("Switching to {}", pm.name()));
                self.handle = Some(pm);
                self.handle_replaced = true;
                Ok(())
            }
            Detection::NotFound => Err(DevInitError::ActionFailed {
                step: step.to_string(),
                message: "no supported system package manager found".to_string(),
            }),
        }
    }

    fn install(&self, packages: &[Package], ui: &mut dyn UserInterface) -> Result<()> {
        let pm = self
            .handle
            .as_deref()
            .ok_or_else(|| DevInitError::ActionFailed {
                step: StepId::InstallPackages.to_string(),
                message: "no package manager selected".to_string(),
            })?;
        let ids = self.config.package_names.resolve_all(pm.kind(), packages);
        info!(manager = pm.name(), packages = ?ids, "installing packages");
        pm.install(&ids)?;
        ui.success(&format!("Installed {} with {}", ids.join(", "), pm.name()));
        Ok(())
    }

    fn login_onepassword(&self, ui: &mut dyn UserInterface) -> Result<()> {
        if !self.config.use_service_account {
            return self.collaborators.onepassword.authenticate(None);
        }

        let token = match &self.service_token {
            Some(token) => token.clone(),
            None => ui
                .prompt(&Prompt::secret(
                    "op_service_account_token",
                    "1Password service account token",
                ))?
                .as_string(),
        };
        if token.trim().is_empty() {
            return Err(DevInitError::CredentialUnavailable {
                reference: SERVICE_ACCOUNT_TOKEN_VAR.to_string(),
                source: CredentialError::Empty,
            });
        }
        self.collaborators
            .onepassword
            .authenticate(Some(&Credential::new(token.trim())))
    }

    fn authenticate_with_secret(
        &self,
        reference: &str,
        authenticator: &dyn Authenticator,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let mut spinner = ui.start_spinner(&format!("Reading {}", reference));
        let secret = match self.collaborators.credentials.read_secret(reference) {
            Ok(secret) => {
                spinner.finish_success("Secret read");
                secret
            }
            Err(source) => {
                spinner.finish_error("Secret unavailable");
                return Err(DevInitError::CredentialUnavailable {
                    reference: reference.to_string(),
                    source,
                });
            }
        };
        authenticator.authenticate(Some(&Credential::new(secret)))
    }

    /// The command a user can run by hand to do what `step` would have.
    fn remediation(&self, step: &Step) -> String {
        match &step.action {
            StepAction::EnsurePackageManager {
                bootstrap_isolated: true,
            } => format!("curl -fsSL {} | bash", DEVBOX_INSTALL_URL),
            StepAction::EnsurePackageManager { .. } => {
                "install Homebrew (macOS) or apt, pacman, dnf or yum (Linux), then re-run devinit"
                    .to_string()
            }
            StepAction::InstallPackages { packages } => match self.handle.as_deref() {
                Some(pm) => pm
                    .kind()
                    .manual_install_command(&self.config.package_names.resolve_all(pm.kind(), packages)),
                None => format!(
                    "install manually: {}",
                    packages.iter().map(|p| p.id()).collect::<Vec<_>>().join(" ")
                ),
            },
            StepAction::LoginOnePassword => "op signin".to_string(),
            StepAction::SetupGitHub => "gh auth login".to_string(),
            StepAction::InitChezmoi => format!("chezmoi init --apply {}", self.config.chezmoi_user),
            StepAction::SetupTailscale => "tailscale up".to_string(),
        }
    }
}
