//! The setup checklist.
//!
//! A dependency panel plus toggleable options, driven either by the terminal
//! ([`run_checklist`]) or by command-line flags ([`run_scripted`]). Both
//! feed the same [`SelectionModel`].

pub mod model;
pub mod options;
pub mod render;
pub mod scripted;
pub mod terminal;

pub use model::{
    Geometry, SelectionCommand, SelectionEvent, SelectionModel, SelectionResult, SelectionState,
};
pub use options::{default_options, OptionKey, SetupOption};
pub use render::{HELP_LINE, TITLE};
pub use scripted::{run_scripted, scripted_events};
pub use terminal::{event_for_key, run_checklist};
