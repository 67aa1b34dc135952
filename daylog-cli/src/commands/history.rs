//! History command - entries over a date range

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate};
use colored::Colorize;
use daylog_core::LoggingService;

use super::{get_context, resolve_date};
use crate::output;

/// Days shown when --from is omitted, counting --to
const DEFAULT_DAYS: i64 = 7;

pub async fn run(
    logger: &Option<LoggingService>,
    from: Option<String>,
    to: Option<String>,
    json: bool,
) -> Result<()> {
    let end = resolve_date(to.as_deref())?;
    let start = match from {
        Some(f) => resolve_date(Some(&f))?,
        None => default_start(end)?,
    };

    let ctx = get_context(logger).await?;
    let entries = ctx.diary_service.list_entries(start, end).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", format!("Diary {} to {}", start, end).bold());
    println!();

    if entries.is_empty() {
        println!("{}", "No entries in range".dimmed());
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Weight", "Items logged", "Goals"]);
    for entry in &entries {
        table.add_row(vec![
            entry.date.to_string(),
            output::format_weight(entry.weight),
            entry.nutrition.len().to_string(),
            entry.goals.targets.len().to_string(),
        ]);
    }
    println!("{}", table);

    Ok(())
}

fn default_start(end: NaiveDate) -> Result<NaiveDate> {
    end.checked_sub_signed(Duration::days(DEFAULT_DAYS - 1))
        .ok_or_else(|| anyhow!("No history window ends at {}; pass --from", end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_start_spans_a_week() {
        let end = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(
            default_start(end).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
        );
    }

    #[test]
    fn test_default_start_near_min_date_is_an_error() {
        assert!(default_start(NaiveDate::MIN).is_err());
    }
}
