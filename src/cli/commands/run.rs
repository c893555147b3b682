//! Run command implementation.
//!
//! `devinit run` probes the host, lets the user pick components, builds the
//! plan and executes it.

use std::path::{Path, PathBuf};

use console::Term;
use tracing::{debug, info};

use crate::cli::args::RunArgs;
use crate::config::{load_setup_config, ConfigOverrides, SetupConfig};
use crate::detection::{ProbeSnapshot, SystemProber};
use crate::error::{DevInitError, Result};
use crate::installer::auth::SERVICE_ACCOUNT_TOKEN_VAR;
use crate::installer::{
    ChezmoiInitializer, GitHubAuthenticator, HostPackageManagers, OnePasswordCli,
    OnePasswordLogin, PackageManagerProvider, TailscaleAuthenticator,
};
use crate::plan::{build, ExecutionPlan};
use crate::runner::{Collaborators, ExecutionRunner};
use crate::selection::{run_checklist, run_scripted, SelectionModel, SelectionResult};
use crate::shell::{home_dir, is_elevated, Platform};
use crate::ui::{should_use_colors, DevInitTheme, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    config_path: Option<PathBuf>,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(config_path: Option<&Path>, args: RunArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Flag and environment values to lay over the config file.
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            github_token_ref: self.args.github_token.clone(),
            tailscale_authkey_ref: self.args.tailscale_authkey.clone(),
            use_service_account: self.args.use_service_account,
            chezmoi_user: self.args.chezmoi_user.clone(),
        }
    }

    /// Run the checklist, or apply `--enable`/`--disable` without one.
    fn select(&self, model: SelectionModel, ui: &mut dyn UserInterface) -> Result<SelectionModel> {
        let model = if ui.is_interactive() && !self.args.has_scripted_selection() {
            let theme = if should_use_colors() {
                DevInitTheme::new()
            } else {
                DevInitTheme::plain()
            };
            run_checklist(model, &Term::stdout(), &theme)?
        } else {
            debug!(
                enable = ?self.args.enable,
                disable = ?self.args.disable,
                "applying scripted selection"
            );
            run_scripted(model, &self.args.enable, &self.args.disable)
        };
        Ok(model)
    }

    /// The confirmed selection, or `UserCancelled` if the user quit.
    fn confirmed(model: &SelectionModel) -> Result<SelectionResult> {
        model.result().ok_or(DevInitError::UserCancelled)
    }

    fn print_plan(plan: &ExecutionPlan, ui: &mut dyn UserInterface) {
        ui.show_header("Execution plan (dry run)");
        if plan.is_empty() {
            ui.message("Nothing selected; nothing would run.");
            return;
        }
        for line in plan.describe() {
            ui.message(&line);
        }
    }

    fn execute_plan(
        &self,
        config: &SetupConfig,
        plan: &ExecutionPlan,
        prober: &SystemProber,
        provider: &dyn PackageManagerProvider,
        ui: &mut dyn UserInterface,
    ) -> CommandResult {
        let credentials = OnePasswordCli::new();
        let onepassword = OnePasswordLogin::new();
        let github = GitHubAuthenticator::new();
        let chezmoi =
            ChezmoiInitializer::new(&config.chezmoi_user, config.use_service_account, home_dir());
        let tailscale = TailscaleAuthenticator::new();

        let collaborators = Collaborators {
            prober,
            package_managers: provider,
            credentials: &credentials,
            onepassword: &onepassword,
            github: &github,
            chezmoi: &chezmoi,
            tailscale: &tailscale,
        };

        let mut runner = ExecutionRunner::new(config, collaborators)
            .with_service_token(std::env::var(SERVICE_ACCOUNT_TOKEN_VAR).ok());
        let report = runner.run(plan, ui);
        ui.show_run_summary(&report.summary());

        match report.exit_code() {
            0 => CommandResult::success(),
            code => CommandResult::failure(i32::from(code)),
        }
    }
}

impl RunCommand {
    /// Everything after argument parsing, with the selection step supplied
    /// by the caller.
    fn execute_with<F>(&self, ui: &mut dyn UserInterface, choose: F) -> Result<CommandResult>
    where
        F: FnOnce(SelectionModel, &mut dyn UserInterface) -> Result<SelectionModel>,
    {
        let config = load_setup_config(self.config_path.as_deref(), &self.overrides())?;
        debug!(?config, "resolved configuration");

        let prober = SystemProber::new();
        let provider = HostPackageManagers::new(&prober, Platform::current(), is_elevated());
        let snapshot = ProbeSnapshot::collect(&prober, provider.detect().name());
        info!(
            in_container = snapshot.in_container,
            package_manager = snapshot.package_manager.as_deref().unwrap_or("none"),
            "probed host"
        );

        let model = SelectionModel::initialize(&snapshot, &config.chezmoi_user);
        let model = choose(model, ui)?;
        let selection = match Self::confirmed(&model) {
            Ok(selection) => selection,
            Err(DevInitError::UserCancelled) => {
                info!("selection cancelled; nothing will run");
                ui.message("Setup cancelled. Nothing was changed.");
                return Ok(CommandResult::success());
            }
            Err(e) => return Err(e),
        };

        let plan = build(&selection, &snapshot);

        if self.args.dry_run {
            Self::print_plan(&plan, ui);
            return Ok(CommandResult::success());
        }

        ui.show_header("devinit");
        Ok(self.execute_plan(&config, &plan, &prober, &provider, ui))
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.execute_with(ui, |model, ui| self.select(model, ui))
    }
}
