//! Execution of a confirmed plan.

pub mod report;
pub mod step;
pub mod workflow;

pub use report::{RunReport, RunnerState, StepOutcome, StepReport};
pub use step::{StepEvent, StepMachine, StepState};
pub use workflow::{Collaborators, ExecutionRunner};
