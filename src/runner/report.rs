//! What a run did, and how to tell the user.

use crate::plan::StepId;
use crate::ui::{RunSummary, StatusKind, StepSummary, SummaryOutcome};

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    NotStarted,
    /// Index of the step being executed.
    Running(usize),
    Completed,
    Aborted,
}

/// How one step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Skipped { reason: String },
    Failed { cause: String },
    /// Never attempted because an earlier step aborted the run.
    NotRun,
}

impl StepOutcome {
    fn status(&self) -> StatusKind {
        match self {
            Self::Succeeded => StatusKind::Success,
            Self::Skipped { .. } => StatusKind::Skipped,
            Self::Failed { .. } => StatusKind::Failed,
            Self::NotRun => StatusKind::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub id: StepId,
    pub outcome: StepOutcome,
    pub used_fallback: bool,
    /// Manual command for a skipped or failed step.
    pub remediation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub state: RunnerState,
    pub steps: Vec<StepReport>,
    /// One entry per skipped or failed step: `<step>: <cause>`.
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn is_aborted(&self) -> bool {
        self.state == RunnerState::Aborted
    }

    pub fn step(&self, id: StepId) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// 0 when the run completed (warnings included), 1 when it aborted.
    pub fn exit_code(&self) -> u8 {
        if self.is_aborted() {
            1
        } else {
            0
        }
    }

    pub fn outcome(&self) -> SummaryOutcome {
        if self.is_aborted() {
            SummaryOutcome::Aborted
        } else if self.warnings.is_empty() {
            SummaryOutcome::Complete
        } else {
            SummaryOutcome::Partial
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            step_results: self
                .steps
                .iter()
                .map(|step| StepSummary {
                    name: step.id.to_string(),
                    status: step.outcome.status(),
                    detail: match &step.outcome {
                        StepOutcome::Skipped { reason } => Some(reason.clone()),
                        StepOutcome::Failed { cause } => Some(cause.clone()),
                        StepOutcome::Succeeded if step.used_fallback => {
                            Some("via fallback".to_string())
                        }
                        _ => None,
                    },
                })
                .collect(),
            warnings: self.warnings.len(),
            outcome: self.outcome(),
            remediation: self
                .steps
                .iter()
                .filter_map(|s| s.remediation.clone())
                .collect(),
        }
    }
}
