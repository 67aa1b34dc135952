//! Show command - display one day's entry

use anyhow::Result;
use daylog_core::LoggingService;

use super::{get_context, resolve_date};
use crate::output;

pub async fn run(logger: &Option<LoggingService>, date: Option<String>, json: bool) -> Result<()> {
    let date = resolve_date(date.as_deref())?;
    let ctx = get_context(logger).await?;
    let entry = ctx.diary_service.get_entry(date).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(());
    }

    match entry {
        Some(entry) => output::print_entry(&entry),
        None => output::info(&format!("No entry for {}", date)),
    }

    Ok(())
}
