//! The checklist state machine.
//!
//! [`SelectionModel::handle_input`] takes the model by value and returns the
//! next model plus a command for the driver. It performs no I/O, so the
//! terminal loop and the scripted driver share it.

use std::collections::BTreeMap;

use crate::detection::{DependencyStatus, ProbeSnapshot};

use super::options::{default_options, OptionKey, SetupOption};

/// Input the checklist understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    MoveUp,
    MoveDown,
    ToggleCurrent,
    Confirm,
    Quit,
    Resize { width: u16, height: u16 },
}

/// Where the checklist is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Browsing,
    Confirmed,
    Cancelled,
}

impl SelectionState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Browsing)
    }
}

/// What the driver should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCommand {
    /// Nothing visible changed.
    None,
    Redraw,
    /// Stop reading input; the model is in a terminal state.
    Exit,
}

/// Terminal dimensions used for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// The confirmed choices, one entry per option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    choices: BTreeMap<OptionKey, bool>,
}

impl SelectionResult {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (OptionKey, bool)>) -> Self {
        Self {
            choices: pairs.into_iter().collect(),
        }
    }

    /// Absent keys count as disabled.
    pub fn is_enabled(&self, key: OptionKey) -> bool {
        self.choices.get(&key).copied().unwrap_or(false)
    }

    pub fn enabled_keys(&self) -> Vec<OptionKey> {
        self.choices
            .iter()
            .filter(|(_, on)| **on)
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionModel {
    dependencies: Vec<DependencyStatus>,
    options: Vec<SetupOption>,
    cursor: usize,
    state: SelectionState,
    geometry: Geometry,
}

impl SelectionModel {
    /// Build the checklist for a probe snapshot.
    pub fn initialize(snapshot: &ProbeSnapshot, chezmoi_user: &str) -> Self {
        Self::from_parts(snapshot.panel_rows(), default_options(snapshot, chezmoi_user))
    }

    pub fn from_parts(dependencies: Vec<DependencyStatus>, options: Vec<SetupOption>) -> Self {
        Self {
            dependencies,
            options,
            cursor: 0,
            state: SelectionState::Browsing,
            geometry: Geometry::default(),
        }
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn handle_input(mut self, event: SelectionEvent) -> (Self, SelectionCommand) {
        if self.state.is_terminal() {
            return (self, SelectionCommand::None);
        }

        let command = match event {
            SelectionEvent::MoveUp => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    SelectionCommand::Redraw
                } else {
                    SelectionCommand::None
                }
            }
            SelectionEvent::MoveDown => {
                if self.cursor + 1 < self.options.len() {
                    self.cursor += 1;
                    SelectionCommand::Redraw
                } else {
                    SelectionCommand::None
                }
            }
            SelectionEvent::ToggleCurrent => match self.options.get_mut(self.cursor) {
                Some(option) => {
                    option.enabled = !option.enabled;
                    SelectionCommand::Redraw
                }
                None => SelectionCommand::None,
            },
            SelectionEvent::Confirm => {
                self.state = SelectionState::Confirmed;
                SelectionCommand::Exit
            }
            SelectionEvent::Quit => {
                self.state = SelectionState::Cancelled;
                SelectionCommand::Exit
            }
            SelectionEvent::Resize { width, height } => {
                self.geometry = Geometry { width, height };
                SelectionCommand::Redraw
            }
        };

        (self, command)
    }

    /// The choices, once confirmed.
    pub fn result(&self) -> Option<SelectionResult> {
        match self.state {
            SelectionState::Confirmed => Some(SelectionResult::from_pairs(
                self.options.iter().map(|o| (o.key, o.enabled)),
            )),
            _ => None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn options(&self) -> &[SetupOption] {
        &self.options
    }

    pub fn dependencies(&self) -> &[DependencyStatus] {
        &self.dependencies
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Index of `key` in the option list.
    pub fn position_of(&self, key: OptionKey) -> Option<usize> {
        self.options.iter().position(|o| o.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(key: OptionKey, enabled: bool) -> SetupOption {
        SetupOption {
            key,
            label: key.label().to_string(),
            description: String::new(),
            enabled,
        }
    }

    fn model() -> SelectionModel {
        SelectionModel::from_parts(
            Vec::new(),
            vec![
                option(OptionKey::InstallGit, true),
                option(OptionKey::InstallGh, false),
                option(OptionKey::SetupGitHub, true),
            ],
        )
    }

    fn feed(model: SelectionModel, events: &[SelectionEvent]) -> SelectionModel {
        events
            .iter()
            .fold(model, |m, event| m.handle_input(*event).0)
    }

    #[test]
    fn cursor_clamps_at_top() {
        let (model, command) = model().handle_input(SelectionEvent::MoveUp);
        assert_eq!(model.cursor(), 0);
        assert_eq!(command, SelectionCommand::None);
    }

    #[test]
    fn cursor_clamps_at_bottom_without_wrapping() {
        let model = feed(
            model(),
            &[
                SelectionEvent::MoveDown,
                SelectionEvent::MoveDown,
                SelectionEvent::MoveDown,
                SelectionEvent::MoveDown,
            ],
        );
        assert_eq!(model.cursor(), 2);
    }

    #[test]
    fn toggle_changes_only_the_cursor_row() {
        let model = feed(
            model(),
            &[SelectionEvent::MoveDown, SelectionEvent::ToggleCurrent],
        );
        let states: Vec<bool> = model.options().iter().map(|o| o.enabled).collect();
        assert_eq!(states, vec![true, true, true]);
    }

    #[test]
    fn toggle_twice_restores() {
        let model = feed(
            model(),
            &[SelectionEvent::ToggleCurrent, SelectionEvent::ToggleCurrent],
        );
        assert!(model.options()[0].enabled);
    }

    #[test]
    fn toggle_with_no_options_is_noop() {
        let empty = SelectionModel::from_parts(Vec::new(), Vec::new());
        let (model, command) = empty.handle_input(SelectionEvent::ToggleCurrent);
        assert_eq!(command, SelectionCommand::None);
        assert_eq!(model.cursor(), 0);
        let (model, _) = model.handle_input(SelectionEvent::MoveDown);
        assert_eq!(model.cursor(), 0);
    }

    #[test]
    fn result_absent_until_confirmed() {
        let model = model();
        assert!(model.result().is_none());

        let (confirmed, command) = model.handle_input(SelectionEvent::Confirm);
        assert_eq!(command, SelectionCommand::Exit);
        let result = confirmed.result().unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.is_enabled(OptionKey::InstallGit));
        assert!(!result.is_enabled(OptionKey::InstallGh));
        assert!(!result.is_enabled(OptionKey::InstallTailscale));
    }

    #[test]
    fn quit_cancels_without_result() {
        let (model, command) = model().handle_input(SelectionEvent::Quit);
        assert_eq!(model.state(), SelectionState::Cancelled);
        assert_eq!(command, SelectionCommand::Exit);
        assert!(model.result().is_none());
    }

    #[test]
    fn terminal_states_ignore_further_input() {
        let confirmed = feed(model(), &[SelectionEvent::Confirm]);
        let after = feed(
            confirmed.clone(),
            &[
                SelectionEvent::MoveDown,
                SelectionEvent::ToggleCurrent,
                SelectionEvent::Quit,
                SelectionEvent::Resize {
                    width: 10,
                    height: 5,
                },
            ],
        );
        assert_eq!(after, confirmed);
        assert_eq!(after.state(), SelectionState::Confirmed);
    }

    #[test]
    fn resize_only_changes_geometry() {
        let before = model();
        let (after, command) = before.clone().handle_input(SelectionEvent::Resize {
            width: 120,
            height: 40,
        });
        assert_eq!(command, SelectionCommand::Redraw);
        assert_eq!(
            after.geometry(),
            Geometry {
                width: 120,
                height: 40
            }
        );
        assert_eq!(after.options(), before.options());
        assert_eq!(after.cursor(), before.cursor());
    }

    #[test]
    fn enabled_keys_lists_on_entries() {
        let result = SelectionResult::from_pairs([
            (OptionKey::InstallGit, true),
            (OptionKey::InstallGh, false),
            (OptionKey::SetupGitHub, true),
        ]);
        assert_eq!(
            result.enabled_keys(),
            vec![OptionKey::InstallGit, OptionKey::SetupGitHub]
        );
    }
}
