//! Checklist rendering.

use console::truncate_str;

use crate::ui::DevInitTheme;

use super::model::SelectionModel;

pub const TITLE: &str = "devinit · Interactive Setup";
pub const HELP_LINE: &str = "↑/↓: navigate • space: toggle • enter: confirm • q: quit";

const MIN_WIDTH: usize = 20;
const MAX_RULE: usize = 72;

fn checkbox(enabled: bool) -> &'static str {
    if enabled {
        "[✓]"
    } else {
        "[ ]"
    }
}

impl SelectionModel {
    /// Render the full screen: title, dependency panel, options, help line.
    ///
    /// Every option's state reads from its checkbox; the cursor row carries
    /// a marker and its description.
    pub fn render(&self, theme: &DevInitTheme) -> String {
        let width = usize::from(self.geometry().width).max(MIN_WIDTH);
        let rule = theme.border.apply_to("─".repeat(width.min(MAX_RULE)));
        let mut lines = Vec::new();

        lines.push(theme.format_header(TITLE));
        lines.push(rule.to_string());

        lines.push(theme.highlight.apply_to("Dependencies").to_string());
        let name_width = self
            .dependencies()
            .iter()
            .map(|d| console::measure_text_width(&d.name))
            .max()
            .unwrap_or(0);
        for dep in self.dependencies() {
            let (icon, status) = if dep.available {
                (theme.success.apply_to(dep.icon()), "Available")
            } else {
                (theme.error.apply_to(dep.icon()), "Missing")
            };
            let pad = name_width.saturating_sub(console::measure_text_width(&dep.name));
            let line = format!("  {} {}{}  {}", icon, dep.name, " ".repeat(pad), status);
            lines.push(truncate_str(&line, width, "…").into_owned());
        }

        lines.push(rule.to_string());
        lines.push(theme.highlight.apply_to("Setup Options").to_string());
        for (index, option) in self.options().iter().enumerate() {
            let row = format!("{} {}", checkbox(option.enabled), option.label);
            if index == self.cursor() {
                let row = truncate_str(&row, width.saturating_sub(2), "…");
                lines.push(format!(
                    "{} {}",
                    theme.info.apply_to("▶"),
                    theme.cursor.apply_to(row)
                ));
                let detail = truncate_str(&option.description, width.saturating_sub(6), "…");
                lines.push(format!("      {}", theme.dim.apply_to(detail)));
            } else {
                lines.push(format!(
                    "  {}",
                    truncate_str(&row, width.saturating_sub(2), "…")
                ));
            }
        }

        lines.push(rule.to_string());
        lines.push(
            theme
                .hint
                .apply_to(truncate_str(HELP_LINE, width, "…"))
                .to_string(),
        );

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DependencyStatus;
    use crate::selection::model::{Geometry, SelectionEvent};
    use crate::selection::options::{OptionKey, SetupOption};

    fn model() -> SelectionModel {
        SelectionModel::from_parts(
            vec![
                DependencyStatus {
                    name: "Git".into(),
                    command: "git".into(),
                    available: true,
                },
                DependencyStatus {
                    name: "GitHub CLI".into(),
                    command: "gh".into(),
                    available: false,
                },
            ],
            vec![
                SetupOption {
                    key: OptionKey::InstallGit,
                    label: "Install Git".into(),
                    description: "Install the git version control system".into(),
                    enabled: false,
                },
                SetupOption {
                    key: OptionKey::InstallGh,
                    label: "Install GitHub CLI".into(),
                    description: "Install the gh command-line tool".into(),
                    enabled: true,
                },
            ],
        )
    }

    #[test]
    fn shows_every_option_state() {
        let screen = model().render(&DevInitTheme::plain());
        assert!(screen.contains("[ ] Install Git"));
        assert!(screen.contains("[✓] Install GitHub CLI"));
    }

    #[test]
    fn shows_dependency_panel() {
        let screen = model().render(&DevInitTheme::plain());
        assert!(screen.contains("Dependencies"));
        assert!(screen.contains("✓ Git"));
        assert!(screen.contains("Available"));
        assert!(screen.contains("✗ GitHub CLI"));
        assert!(screen.contains("Missing"));
    }

    #[test]
    fn cursor_row_is_marked_and_described() {
        let (model, _) = model().handle_input(SelectionEvent::MoveDown);
        let screen = model.render(&DevInitTheme::plain());

        assert!(screen.contains("▶ [✓] Install GitHub CLI"));
        assert!(screen.contains("Install the gh command-line tool"));
        assert!(!screen.contains("Install the git version control system"));
        assert!(screen.contains("  [ ] Install Git"));
    }

    #[test]
    fn ends_with_help_line() {
        let screen = model().render(&DevInitTheme::plain());
        assert_eq!(screen.lines().last(), Some(HELP_LINE));
    }

    #[test]
    fn rule_follows_geometry() {
        let narrow = model()
            .with_geometry(Geometry {
                width: 30,
                height: 24,
            })
            .render(&DevInitTheme::plain());
        assert!(narrow.lines().any(|l| l == "─".repeat(30)));

        let wide = model()
            .with_geometry(Geometry {
                width: 200,
                height: 50,
            })
            .render(&DevInitTheme::plain());
        assert!(wide.lines().any(|l| l == "─".repeat(MAX_RULE)));
    }

    #[test]
    fn rendering_does_not_change_the_model() {
        let model = model();
        let before = model.clone();
        let _ = model.render(&DevInitTheme::plain());
        assert_eq!(model, before);
    }
}
