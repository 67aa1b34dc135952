//! Update command - merge fields into a day's entry

use anyhow::{bail, Result};
use daylog_core::{EntryPatch, LoggingService};
use serde_json::Value as JsonValue;

use super::{get_context, resolve_date};
use crate::output;

pub async fn run(
    logger: &Option<LoggingService>,
    date: Option<String>,
    fields: Vec<String>,
    json: bool,
) -> Result<()> {
    let date = resolve_date(date.as_deref())?;
    let patch = parse_fields(&fields)?;

    let ctx = get_context(logger).await?;
    let entry = ctx.diary_service.update(date, patch).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        output::success(&format!("Updated entry for {}", entry.date));
        output::print_entry(&entry);
    }

    Ok(())
}

/// Parse `key=value` pairs. Values are read as JSON where possible, so
/// `weight=72.5` is a number and `mood=good` stays text.
fn parse_fields(fields: &[String]) -> Result<EntryPatch> {
    let mut patch = EntryPatch::new();

    for field in fields {
        let Some((key, raw)) = field.split_once('=') else {
            bail!("Invalid field '{}'. Use KEY=VALUE", field);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Field name missing in '{}'", field);
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()));
        patch.insert(key.to_string(), value);
    }

    Ok(patch)
}
