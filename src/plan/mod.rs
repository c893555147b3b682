//! Execution plans.
//!
//! [`build`] turns a confirmed [`SelectionResult`](crate::selection::SelectionResult)
//! into an [`ExecutionPlan`]. The plan is data only; the runner executes it.

pub mod builder;
pub mod packages;
pub mod step;

pub use builder::build;
pub use packages::{Package, PackageNameTable};
pub use step::{FailurePolicy, Fallback, Precondition, Step, StepAction, StepId};

/// Ordered steps for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub steps: Vec<Step>,
}

impl ExecutionPlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn ids(&self) -> Vec<StepId> {
        self.steps.iter().map(|s| s.id).collect()
    }

    /// Numbered lines for `--dry-run`.
    pub fn describe(&self) -> Vec<String> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let mut line = format!("{}. {} ({})", i + 1, step.id, step.describe());
                if !step.precondition.tools.is_empty() {
                    line.push_str(&format!(
                        " [requires: {}]",
                        step.precondition.tools.join(", ")
                    ));
                }
                line
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_numbers_steps_and_lists_requirements() {
        let plan = ExecutionPlan {
            steps: vec![
                Step {
                    id: StepId::EnsurePackageManager,
                    action: StepAction::EnsurePackageManager {
                        bootstrap_isolated: false,
                    },
                    precondition: Precondition::none(),
                    fallback: None,
                    policy: FailurePolicy::AbortWorkflow,
                },
                Step {
                    id: StepId::SetupGitHub,
                    action: StepAction::SetupGitHub,
                    precondition: Precondition::requires(&["gh", "op"]),
                    fallback: None,
                    policy: FailurePolicy::WarnAndContinue,
                },
            ],
        };

        assert_eq!(
            plan.describe(),
            vec![
                "1. ensure-package-manager (Detect package manager)",
                "2. setup-github (Authenticate GitHub CLI) [requires: gh, op]",
            ]
        );
    }

    #[test]
    fn empty_plan() {
        let plan = ExecutionPlan::default();
        assert!(plan.is_empty());
        assert!(plan.describe().is_empty());
    }
}
