//! CLI command implementations

pub mod food;
pub mod goals;
pub mod history;
pub mod logs;
pub mod show;
pub mod update;
pub mod weight;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use daylog_core::domain::{parse_entry_date, today_utc};
use daylog_core::{DaylogContext, EntryPoint, LogEvent, LoggingService};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from DAYLOG_DIR or default to ~/.daylog
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("DAYLOG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".daylog"))
        .ok_or_else(|| anyhow!("Could not find home directory; set DAYLOG_DIR"))
}

/// Open the diary and run the startup hook
///
/// Seeding today's entry is fire-and-forget: a failure is logged and the
/// command carries on.
pub async fn get_context(logger: &Option<LoggingService>) -> Result<DaylogContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    let ctx = DaylogContext::new(&data_dir).context("Failed to open diary")?;

    match ctx.diary_service.ensure_today_entry().await {
        Ok(true) => log_event(logger, LogEvent::new("today_entry_created")),
        Ok(false) => {}
        Err(e) => log_event(
            logger,
            LogEvent::new("today_entry_failed").with_error(e.to_string()),
        ),
    }

    Ok(ctx)
}

/// Parse an optional --date argument, defaulting to today (UTC)
pub fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => Ok(parse_entry_date(d)?),
        None => Ok(today_utc()),
    }
}
