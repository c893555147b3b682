//! Per-step fallback state machine.
//!
//! The runner performs the side effects and reports what happened as a
//! [`StepEvent`]; [`StepMachine::handle`] decides where the step goes next.
//! A fallback can be offered at most once: `RunningFallback` only leads to a
//! terminal state.

use tracing::debug;

use crate::error::DevInitError;

/// Where a single step is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepState {
    Pending,
    CheckingPrecondition,
    RunningPrimary,
    /// The primary failed and a fallback is on offer.
    AwaitingFallbackDecision { cause: String },
    RunningFallback,
    Succeeded,
    Skipped { reason: String },
    Failed { cause: String },
}

impl StepState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Skipped { .. } | Self::Failed { .. }
        )
    }
}

/// What the runner observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    Start,
    PreconditionMet,
    /// Names the first required tool that is absent.
    PreconditionMissing(String),
    PrimarySucceeded,
    PrimaryFailed(String),
    FallbackAccepted,
    FallbackDeclined,
    FallbackSucceeded,
    FallbackFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepMachine {
    state: StepState,
    has_fallback: bool,
    attempts: u8,
    used_fallback: bool,
}

impl StepMachine {
    /// `has_fallback` is whether a fallback can be offered if the primary fails.
    pub fn new(has_fallback: bool) -> Self {
        Self {
            state: StepState::Pending,
            has_fallback,
            attempts: 0,
            used_fallback: false,
        }
    }

    pub fn state(&self) -> &StepState {
        &self.state
    }

    /// How many times an action ran (primary plus fallback).
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    /// Apply an event. Events that make no sense in the current state leave
    /// it unchanged.
    pub fn handle(mut self, event: StepEvent) -> Self {
        let current = std::mem::replace(&mut self.state, StepState::Pending);
        self.state = match (current, event) {
            (StepState::Pending, StepEvent::Start) => StepState::CheckingPrecondition,
            (StepState::CheckingPrecondition, StepEvent::PreconditionMet) => {
                self.attempts += 1;
                StepState::RunningPrimary
            }
            (StepState::CheckingPrecondition, StepEvent::PreconditionMissing(tool)) => {
                StepState::Skipped {
                    reason: DevInitError::PreconditionMissing { tool }.to_string(),
                }
            }
            (StepState::RunningPrimary, StepEvent::PrimarySucceeded) => StepState::Succeeded,
            (StepState::RunningPrimary, StepEvent::PrimaryFailed(cause)) => {
                if self.has_fallback {
                    StepState::AwaitingFallbackDecision { cause }
                } else {
                    StepState::Failed { cause }
                }
            }
            (StepState::AwaitingFallbackDecision { .. }, StepEvent::FallbackAccepted) => {
                self.attempts += 1;
                self.used_fallback = true;
                StepState::RunningFallback
            }
            (StepState::AwaitingFallbackDecision { cause }, StepEvent::FallbackDeclined) => {
                StepState::Failed { cause }
            }
            (StepState::RunningFallback, StepEvent::FallbackSucceeded) => StepState::Succeeded,
            (StepState::RunningFallback, StepEvent::FallbackFailed(cause)) => {
                StepState::Failed { cause }
            }
            (state, event) => {
                debug!(?state, ?event, "ignoring step event");
                state
            }
        };
        self
    }
}
