//! Interactive checklist driver.
//!
//! Reads keys from the terminal, feeds them through the model and redraws.
//! Terminal size is polled after every key so a resize is applied on the
//! next redraw.

use console::{Key, Term};
use tracing::debug;

use crate::error::Result;
use crate::ui::DevInitTheme;

use super::model::{Geometry, SelectionCommand, SelectionEvent, SelectionModel};

/// Map a key press to a checklist event. Unmapped keys are ignored.
pub fn event_for_key(key: &Key) -> Option<SelectionEvent> {
    match key {
        Key::ArrowUp | Key::Char('k') => Some(SelectionEvent::MoveUp),
        Key::ArrowDown | Key::Char('j') => Some(SelectionEvent::MoveDown),
        Key::Char(' ') => Some(SelectionEvent::ToggleCurrent),
        Key::Enter => Some(SelectionEvent::Confirm),
        Key::Char('q') | Key::Escape | Key::CtrlC => Some(SelectionEvent::Quit),
        _ => None,
    }
}

fn current_geometry(term: &Term) -> Geometry {
    let (rows, cols) = term.size();
    Geometry {
        width: cols,
        height: rows,
    }
}

fn draw(term: &Term, model: &SelectionModel, theme: &DevInitTheme) -> Result<()> {
    term.clear_screen()?;
    term.write_line(&model.render(theme))?;
    Ok(())
}

/// Run the checklist until the user confirms or quits.
pub fn run_checklist(
    model: SelectionModel,
    term: &Term,
    theme: &DevInitTheme,
) -> Result<SelectionModel> {
    let mut model = model.with_geometry(current_geometry(term));
    term.hide_cursor()?;
    let outcome = drive(&mut model, term, theme);
    let restored = term.show_cursor().and_then(|_| term.clear_screen());
    outcome?;
    restored?;
    Ok(model)
}

fn drive(model: &mut SelectionModel, term: &Term, theme: &DevInitTheme) -> Result<()> {
    draw(term, model, theme)?;

    loop {
        let key = term.read_key()?;
        let mut redraw = false;

        let geometry = current_geometry(term);
        if geometry != model.geometry() {
            debug!(width = geometry.width, height = geometry.height, "terminal resized");
            redraw |= step(
                model,
                SelectionEvent::Resize {
                    width: geometry.width,
                    height: geometry.height,
                },
            ) == SelectionCommand::Redraw;
        }

        if let Some(event) = event_for_key(&key) {
            match step(model, event) {
                SelectionCommand::Exit => return Ok(()),
                SelectionCommand::Redraw => redraw = true,
                SelectionCommand::None => {}
            }
        }

        if redraw {
            draw(term, model, theme)?;
        }
    }
}

fn step(model: &mut SelectionModel, event: SelectionEvent) -> SelectionCommand {
    let current = std::mem::replace(model, SelectionModel::from_parts(Vec::new(), Vec::new()));
    let (next, command) = current.handle_input(event);
    *model = next;
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_vim_keys_navigate() {
        assert_eq!(event_for_key(&Key::ArrowUp), Some(SelectionEvent::MoveUp));
        assert_eq!(event_for_key(&Key::Char('k')), Some(SelectionEvent::MoveUp));
        assert_eq!(event_for_key(&Key::ArrowDown), Some(SelectionEvent::MoveDown));
        assert_eq!(event_for_key(&Key::Char('j')), Some(SelectionEvent::MoveDown));
    }

    #[test]
    fn space_toggles_and_enter_confirms() {
        assert_eq!(
            event_for_key(&Key::Char(' ')),
            Some(SelectionEvent::ToggleCurrent)
        );
        assert_eq!(event_for_key(&Key::Enter), Some(SelectionEvent::Confirm));
    }

    #[test]
    fn quit_keys() {
        for key in [Key::Char('q'), Key::Escape, Key::CtrlC] {
            assert_eq!(event_for_key(&key), Some(SelectionEvent::Quit));
        }
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(event_for_key(&Key::Char('x')), None);
        assert_eq!(event_for_key(&Key::Tab), None);
    }

    #[test]
    fn step_swaps_model_in_place() {
        use crate::selection::options::{OptionKey, SetupOption};

        let mut model = SelectionModel::from_parts(
            Vec::new(),
            vec![SetupOption {
                key: OptionKey::InstallGit,
                label: "Install Git".into(),
                description: String::new(),
                enabled: false,
            }],
        );

        let command = step(&mut model, SelectionEvent::ToggleCurrent);

        assert_eq!(command, SelectionCommand::Redraw);
        assert!(model.options()[0].enabled);
    }
}
