//! Non-interactive checklist driver.
//!
//! `--enable` and `--disable` are turned into the same navigation and toggle
//! events a person would type, then confirmed. The model never learns which
//! driver fed it.

use super::model::{SelectionEvent, SelectionModel};
use super::options::OptionKey;

/// Events that move each listed option to its requested state, then confirm.
///
/// A key named in both lists ends up disabled.
pub fn scripted_events(
    model: &SelectionModel,
    enable: &[OptionKey],
    disable: &[OptionKey],
) -> Vec<SelectionEvent> {
    let mut events = Vec::new();
    let mut cursor = model.cursor();

    for (index, option) in model.options().iter().enumerate() {
        let wanted = if disable.contains(&option.key) {
            false
        } else if enable.contains(&option.key) {
            true
        } else {
            continue;
        };
        if wanted == option.enabled {
            continue;
        }

        while cursor < index {
            events.push(SelectionEvent::MoveDown);
            cursor += 1;
        }
        while cursor > index {
            events.push(SelectionEvent::MoveUp);
            cursor -= 1;
        }
        events.push(SelectionEvent::ToggleCurrent);
    }

    events.push(SelectionEvent::Confirm);
    events
}

/// Apply the requested changes and confirm.
pub fn run_scripted(
    model: SelectionModel,
    enable: &[OptionKey],
    disable: &[OptionKey],
) -> SelectionModel {
    scripted_events(&model, enable, disable)
        .into_iter()
        .fold(model, |model, event| model.handle_input(event).0)
}
