//! User-facing output and prompts.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! The checklist screen itself lives in [`crate::selection`]; everything the
//! runner says to the user goes through this trait.
//!
//! # Example
//!
//! ```
//! use devinit::ui::{create_ui, OutputMode, UserInterface};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("devinit");
//! ui.success("Setup complete!");
//! ```

pub mod icons;
pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use icons::StatusKind;
pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, DevInitTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    ///
    /// This is a suspension point: the interactive implementation blocks on
    /// the keyboard, the others answer from a pre-supplied source.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a dim follow-up hint (manual commands, shell reloads).
    fn show_hint(&mut self, hint: &str);

    /// Show progress (e.g., "Step 3 of 7").
    fn show_progress(&mut self, current: usize, total: usize);

    /// Show the end-of-run summary box.
    fn show_run_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped.
    fn finish_skipped(&mut self, msg: &str);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for env overrides and test answers).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    /// A yes/no question.
    pub fn confirm(key: &str, question: &str, default: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Confirm,
            default: Some(if default { "yes" } else { "no" }.to_string()),
        }
    }

    /// A hidden-input question with no default.
    pub fn secret(key: &str, question: &str) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Secret,
            default: None,
        }
    }
}

/// The type of prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Text input that is not echoed.
    Secret,
}

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input or secret entry.
    String(String),
}

impl PromptResult {
    /// Get as string.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Get as bool if this is a Bool result.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Interpret a textual answer for the given prompt type.
    ///
    /// Used wherever answers come from somewhere other than the keyboard
    /// (environment overrides, test fixtures).
    pub fn from_answer(prompt_type: &PromptType, answer: &str) -> Self {
        match prompt_type {
            PromptType::Confirm => Self::Bool(is_affirmative(answer)),
            PromptType::Secret => Self::String(answer.to_string()),
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// How a run ended, as far as the summary line is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// Every step succeeded.
    Complete,
    /// The run finished but some steps were skipped or failed.
    Partial,
    /// A fatal step stopped the run.
    Aborted,
}

/// One row of the summary box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSummary {
    pub name: String,
    pub status: StatusKind,
    pub detail: Option<String>,
}

/// Everything the summary box shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub step_results: Vec<StepSummary>,
    pub warnings: usize,
    pub outcome: SummaryOutcome,
    /// One manual command per skipped or failed step.
    pub remediation: Vec<String>,
}

impl RunSummary {
    /// The closing line printed under the box.
    pub fn closing_line(&self) -> String {
        match self.outcome {
            SummaryOutcome::Complete => "Setup complete!".to_string(),
            SummaryOutcome::Partial => {
                format!("Setup finished with {} warning(s)", self.warnings)
            }
            SummaryOutcome::Aborted => "Setup aborted".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_result_as_string_bool() {
        assert_eq!(PromptResult::Bool(true).as_string(), "true");
        assert_eq!(PromptResult::Bool(false).as_string(), "false");
    }

    #[test]
    fn prompt_result_as_bool() {
        assert_eq!(PromptResult::Bool(true).as_bool(), Some(true));
        assert_eq!(PromptResult::String("test".to_string()).as_bool(), None);
    }

    #[test]
    fn from_answer_confirm_accepts_common_yes_forms() {
        for answer in ["yes", "Y", "true", "1", " yes "] {
            assert_eq!(
                PromptResult::from_answer(&PromptType::Confirm, answer),
                PromptResult::Bool(true),
                "{answer}"
            );
        }
        assert_eq!(
            PromptResult::from_answer(&PromptType::Confirm, "no"),
            PromptResult::Bool(false)
        );
    }

    #[test]
    fn from_answer_secret_is_verbatim() {
        assert_eq!(
            PromptResult::from_answer(&PromptType::Secret, "ops_abc"),
            PromptResult::String("ops_abc".to_string())
        );
    }

    #[test]
    fn confirm_prompt_encodes_default() {
        let prompt = Prompt::confirm("fallback_install", "Retry?", true);
        assert_eq!(prompt.prompt_type, PromptType::Confirm);
        assert_eq!(prompt.default.as_deref(), Some("yes"));

        let prompt = Prompt::confirm("x", "?", false);
        assert_eq!(prompt.default.as_deref(), Some("no"));
    }

    #[test]
    fn secret_prompt_has_no_default() {
        let prompt = Prompt::secret("op_service_account_token", "Token");
        assert_eq!(prompt.prompt_type, PromptType::Secret);
        assert!(prompt.default.is_none());
    }

    fn summary(outcome: SummaryOutcome, warnings: usize) -> RunSummary {
        RunSummary {
            step_results: vec![],
            warnings,
            outcome,
            remediation: vec![],
        }
    }

    #[test]
    fn closing_line_distinguishes_outcomes() {
        assert_eq!(
            summary(SummaryOutcome::Complete, 0).closing_line(),
            "Setup complete!"
        );
        assert_eq!(
            summary(SummaryOutcome::Partial, 2).closing_line(),
            "Setup finished with 2 warning(s)"
        );
        assert_eq!(
            summary(SummaryOutcome::Aborted, 1).closing_line(),
            "Setup aborted"
        );
    }
}
