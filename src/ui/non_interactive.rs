//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{DevInitError, Result};

use super::terminal::summary_lines;
use super::theme::DevInitTheme;
use super::{OutputMode, Prompt, PromptResult, RunSummary, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts by key.
pub const PROMPT_ENV_PREFIX: &str = "DEVINIT_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `DEVINIT_PROMPT_<KEY>` environment variables,
/// then from the prompt's default. A prompt with neither is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        if let Some(value) = self.env_overrides.get(&env_key) {
            tracing::debug!("Answering '{}' from {}", prompt.key, env_key);
            return Ok(PromptResult::from_answer(&prompt.prompt_type, value));
        }

        if let Some(default) = &prompt.default {
            return Ok(PromptResult::from_answer(&prompt.prompt_type, default));
        }

        Err(DevInitError::ConfigValidationError {
            message: format!(
                "Cannot prompt for '{}' in non-interactive mode (set {})",
                prompt.key, env_key
            ),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner)
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        if self.mode.shows_progress() {
            println!("[{}/{}]", current, total);
        }
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            return;
        }
        for line in summary_lines(summary, &DevInitTheme::plain()) {
            println!("{}", line);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints its final state as a plain line.
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        println!("  ✓ {}", msg);
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  ✗ {}", msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        println!("  ○ {}", msg);
    }
}
