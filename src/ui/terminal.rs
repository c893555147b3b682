//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::{
    prompt_user, should_use_colors, DevInitTheme, NonInteractiveUI, OutputMode, ProgressSpinner,
    Prompt, PromptResult, RunSummary, SpinnerHandle, SummaryOutcome, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: DevInitTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            DevInitTheme::new()
        } else {
            DevInitTheme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "  {}", self.theme.hint.apply_to(hint)).ok();
        }
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        if self.mode.shows_progress() {
            writeln!(
                self.term,
                "{}",
                self.theme.dim.apply_to(format!("[{}/{}]", current, total))
            )
            .ok();
        }
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            return;
        }
        for line in summary_lines(summary, &self.theme) {
            writeln!(self.term, "{}", line).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Lay out the summary box, closing line and remediation hints.
pub(crate) fn summary_lines(summary: &RunSummary, theme: &DevInitTheme) -> Vec<String> {
    let b = &theme.border;
    let mut lines = vec![
        String::new(),
        format!(
            "  {} {}",
            b.apply_to("┌─"),
            b.apply_to("Summary ──────────────────────────")
        ),
    ];

    for step in &summary.step_results {
        let detail = step
            .detail
            .as_deref()
            .map(|d| theme.dim.apply_to(d).to_string())
            .unwrap_or_default();
        lines.push(format!(
            "  {} {} {:<24} {}",
            b.apply_to("│"),
            step.status.styled(theme),
            step.name,
            detail
        ));
    }

    lines.push(format!(
        "  {}",
        b.apply_to("└────────────────────────────────────")
    ));

    let closing = summary.closing_line();
    lines.push(match summary.outcome {
        SummaryOutcome::Complete => format!("  {}", theme.format_success(&closing)),
        SummaryOutcome::Partial => format!("  {}", theme.format_warning(&closing)),
        SummaryOutcome::Aborted => format!("  {}", theme.format_error(&closing)),
    });

    if !summary.remediation.is_empty() {
        lines.push(String::new());
        lines.push(format!("  {}", theme.hint.apply_to("To finish manually:")));
        for command in &summary.remediation {
            lines.push(format!("    {}", theme.command.apply_to(command)));
        }
    }

    lines
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{StatusKind, StepSummary};

    #[test]
    fn terminal_ui_output_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn create_ui_non_interactive() {
        let ui = create_ui(false, OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn create_ui_respects_mode() {
        let ui = create_ui(false, OutputMode::Silent);
        assert_eq!(ui.output_mode(), OutputMode::Silent);
    }

    #[test]
    fn summary_lines_list_steps_and_remediation() {
        let summary = RunSummary {
            step_results: vec![
                StepSummary {
                    name: "install-packages".into(),
                    status: StatusKind::Success,
                    detail: None,
                },
                StepSummary {
                    name: "setup-github".into(),
                    status: StatusKind::Skipped,
                    detail: Some("gh not found".into()),
                },
            ],
            warnings: 1,
            outcome: SummaryOutcome::Partial,
            remediation: vec!["gh auth login".into()],
        };

        let text = summary_lines(&summary, &DevInitTheme::plain()).join("\n");

        assert!(text.contains("✓ install-packages"));
        assert!(text.contains("○ setup-github"));
        assert!(text.contains("gh not found"));
        assert!(text.contains("Setup finished with 1 warning(s)"));
        assert!(text.contains("gh auth login"));
    }

    #[test]
    fn summary_lines_complete_has_no_hint_block() {
        let summary = RunSummary {
            step_results: vec![],
            warnings: 0,
            outcome: SummaryOutcome::Complete,
            remediation: vec![],
        };

        let text = summary_lines(&summary, &DevInitTheme::plain()).join("\n");

        assert!(text.contains("✓ Setup complete!"));
        assert!(!text.contains("To finish manually"));
    }
}
