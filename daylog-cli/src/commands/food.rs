//! Food command - add to a day's nutrition log

use std::str::FromStr;

use anyhow::{anyhow, Result};
use daylog_core::LoggingService;
use rust_decimal::Decimal;

use super::{get_context, resolve_date};
use crate::output;

pub async fn run(
    logger: &Option<LoggingService>,
    item: &str,
    amount: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = resolve_date(date.as_deref())?;
    let amount = Decimal::from_str(amount.trim())
        .map_err(|_| anyhow!("Invalid amount '{}'", amount))?;

    let ctx = get_context(logger).await?;
    let entry = ctx.diary_service.log_food(date, item, amount).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        output::success(&format!("Logged {} {} for {}", amount.normalize(), item.trim(), entry.date));
        output::print_entry(&entry);
    }

    Ok(())
}
