//! Interactive prompts.

use console::Term;
use dialoguer::{Confirm, Password};

use crate::error::{DevInitError, Result};

use super::{Prompt, PromptResult, PromptType};

/// Convert dialoguer errors to DevInitError.
fn map_dialoguer_err(e: dialoguer::Error) -> DevInitError {
    DevInitError::Io(e.into())
}

/// Prompt the user for input.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    match &prompt.prompt_type {
        PromptType::Confirm => prompt_confirm(prompt, term),
        PromptType::Secret => prompt_secret(prompt, term),
    }
}

fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let default = prompt
        .default
        .as_deref()
        .map(|d| PromptResult::from_answer(&PromptType::Confirm, d) == PromptResult::Bool(true))
        .unwrap_or(true);

    let result = Confirm::new()
        .with_prompt(&prompt.question)
        .default(default)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(result))
}

fn prompt_secret(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let secret = Password::new()
        .with_prompt(&prompt.question)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::String(secret))
}
