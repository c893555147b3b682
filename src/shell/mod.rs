//! External command execution and host platform facts.

pub mod command;
pub mod platform;

pub use command::{
    execute, execute_all, execute_quiet, CommandOptions, CommandResult, Invocation,
};
pub use platform::{home_dir, is_ci, is_elevated, Platform};
