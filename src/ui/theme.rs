//! Visual theme and styling.

use console::Style;

/// devinit's visual theme.
#[derive(Debug, Clone)]
pub struct DevInitTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for informational/running elements (cyan).
    pub info: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
    /// Style for the checklist row under the cursor (reverse video).
    pub cursor: Style,
    /// Style for commands shown in output (dim italic).
    pub command: Style,
    /// Style for box-drawing borders (dim).
    pub border: Style,
    /// Style for contextual hints (cyan dim).
    pub hint: Style,
}

impl Default for DevInitTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl DevInitTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            cursor: Style::new().reverse(),
            command: Style::new().dim().italic(),
            border: Style::new().dim(),
            hint: Style::new().cyan().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            cursor: Style::new(),
            command: Style::new(),
            border: Style::new(),
            hint: Style::new(),
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a skipped message (icon + text in dim).
    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("▸"),
            self.highlight.apply_to(title)
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check if stdout is a TTY
    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_success() {
        let theme = DevInitTheme::plain();
        let msg = theme.format_success("Complete");
        assert!(msg.contains("✓"));
        assert!(msg.contains("Complete"));
    }

    #[test]
    fn theme_formats_warning() {
        let theme = DevInitTheme::plain();
        let msg = theme.format_warning("gh not found");
        assert_eq!(msg, "⚠ gh not found");
    }

    #[test]
    fn theme_formats_error() {
        let theme = DevInitTheme::plain();
        let msg = theme.format_error("Failed");
        assert!(msg.contains("✗"));
    }

    #[test]
    fn theme_formats_skipped() {
        let theme = DevInitTheme::plain();
        assert_eq!(theme.format_skipped("setup-github"), "○ setup-github");
    }

    #[test]
    fn theme_formats_header() {
        let theme = DevInitTheme::plain();
        let msg = theme.format_header("devinit");
        assert!(msg.contains("devinit"));
    }

    #[test]
    fn default_impl_matches_new() {
        let default = DevInitTheme::default();
        let new = DevInitTheme::new();
        assert_eq!(default.format_success("test"), new.format_success("test"));
    }
}
