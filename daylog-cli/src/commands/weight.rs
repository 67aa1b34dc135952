//! Weight command - prompt for and record a body weight

use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use daylog_core::domain::result::{Error, Result as CoreResult};
use daylog_core::ports::{Prompt, PromptRequest};
use daylog_core::LoggingService;
use dialoguer::Input;

use super::{get_context, resolve_date};
use crate::output;

/// Interactive prompt on the terminal
///
/// An empty answer cancels when the request is cancelable.
pub struct TerminalPrompt;

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn prompt(&self, request: &PromptRequest) -> CoreResult<Option<String>> {
        let request = request.clone();
        tokio::task::spawn_blocking(move || read_input(&request))
            .await
            .map_err(|e| Error::Other(format!("Prompt task failed: {}", e)))?
    }
}

fn read_input(request: &PromptRequest) -> CoreResult<Option<String>> {
    println!("{}", request.title.bold());

    let hint = if request.cancelable {
        " (empty to cancel)"
    } else {
        ""
    };
    let input: String = Input::new()
        .with_prompt(format!("{}{}", request.message, hint))
        .with_initial_text(request.default_value.clone())
        .allow_empty(request.cancelable)
        .interact_text()
        .map_err(|e| Error::Other(e.to_string()))?;

    if request.cancelable && input.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(input))
    }
}

/// Answers with a value given on the command line
pub struct FixedPrompt(pub String);

#[async_trait]
impl Prompt for FixedPrompt {
    async fn prompt(&self, _request: &PromptRequest) -> CoreResult<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

pub async fn run(
    logger: &Option<LoggingService>,
    date: Option<String>,
    value: Option<String>,
    json: bool,
) -> Result<()> {
    let date = resolve_date(date.as_deref())?;
    let ctx = get_context(logger).await?;

    let recorded = match value {
        Some(v) => {
            ctx.diary_service
                .prompt_to_set_weight(date, &FixedPrompt(v))
                .await?
        }
        None => ctx.diary_service.prompt_to_set_weight(date, &TerminalPrompt).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recorded)?);
        return Ok(());
    }

    match recorded {
        Some(entry) => output::success(&format!(
            "Recorded weight {} for {}",
            output::format_weight(entry.weight),
            entry.date
        )),
        None => output::warning("No weight recorded"),
    }

    Ok(())
}
