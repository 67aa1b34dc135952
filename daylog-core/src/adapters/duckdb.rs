//! DuckDB repository implementation
//!
//! Diary entries are stored as JSON, one row per date, so fields merged in
//! at update time round-trip unchanged. Scalar settings share the same file.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use duckdb::{params, Connection};

use crate::domain::result::{Error, Result as CoreResult};
use crate::domain::DiaryEntry;
use crate::migrations::MIGRATIONS;
use crate::ports::{EntryStore, SettingsStore};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Timestamp for created_at/updated_at, computed in Rust (no ICU in DuckDB)
fn now_timestamp() -> String {
    Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn to_core_error(err: anyhow::Error) -> Error {
    Error::database(err.to_string())
}

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
}

impl DuckDbRepository {
    /// Open (or create) the diary database
    ///
    /// Retries with exponential backoff on file locking errors, which show
    /// up when two processes start at the same time.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[daylog] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off; JSON is statically linked
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    /// Run database migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    // === Diary entries ===

    pub fn find_entry(&self, date: NaiveDate) -> Result<Option<DiaryEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT entry FROM sys_diary_entries WHERE entry_date = CAST(? AS DATE)",
        )?;
        let mut rows = stmt.query(params![date.format(DATE_FORMAT).to_string()])?;

        let json: Option<String> = match rows.next()? {
            Some(row) => Some(row.get(0)?),
            None => None,
        };

        json.map(|json| Self::decode_entry(date, &json)).transpose()
    }

    pub fn upsert_entry(&self, entry: &DiaryEntry) -> Result<()> {
        let conn = self.lock()?;
        let json = serde_json::to_string(entry)?;
        let now = now_timestamp();

        conn.execute(
            "INSERT INTO sys_diary_entries (entry_date, entry, created_at, updated_at)
             VALUES (CAST(? AS DATE), ?, CAST(? AS TIMESTAMP), CAST(? AS TIMESTAMP))
             ON CONFLICT (entry_date) DO UPDATE SET
                entry = EXCLUDED.entry,
                updated_at = EXCLUDED.updated_at",
            params![entry.date.format(DATE_FORMAT).to_string(), json, now, now],
        )?;

        Ok(())
    }

    pub fn find_entries_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DiaryEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT CAST(entry_date AS VARCHAR), entry FROM sys_diary_entries
             WHERE entry_date BETWEEN CAST(? AS DATE) AND CAST(? AS DATE)
             ORDER BY entry_date",
        )?;

        let rows = stmt.query_map(
            params![
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string()
            ],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut entries = Vec::new();
        for row in rows {
            let (date_str, json) = row?;
            let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)?;
            entries.push(Self::decode_entry(date, &json)?);
        }
        Ok(entries)
    }

    /// The row key is authoritative for the entry's date
    fn decode_entry(date: NaiveDate, json: &str) -> Result<DiaryEntry> {
        let mut entry: DiaryEntry = serde_json::from_str(json)
            .map_err(|e| anyhow!("Corrupt diary entry for {}: {}", date, e))?;
        entry.date = date;
        Ok(entry)
    }

    // === Settings ===

    pub fn get_setting_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT setting_value FROM sys_settings WHERE setting_key = ?")?;
        let mut rows = stmt.query(params![key])?;

        let value = match rows.next()? {
            Some(row) => Some(row.get(0)?),
            None => None,
        };
        Ok(value)
    }

    pub fn set_setting_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_settings (setting_key, setting_value, updated_at)
             VALUES (?, ?, CAST(? AS TIMESTAMP))
             ON CONFLICT (setting_key) DO UPDATE SET
                setting_value = EXCLUDED.setting_value,
                updated_at = EXCLUDED.updated_at",
            params![key, value, now_timestamp()],
        )?;
        Ok(())
    }
}

#[async_trait]
impl EntryStore for DuckDbRepository {
    async fn get_entry(&self, date: NaiveDate) -> CoreResult<Option<DiaryEntry>> {
        self.find_entry(date).map_err(to_core_error)
    }

    async fn put_entry(&self, entry: &DiaryEntry) -> CoreResult<()> {
        self.upsert_entry(entry).map_err(to_core_error)
    }

    async fn list_entries(&self, start: NaiveDate, end: NaiveDate) -> CoreResult<Vec<DiaryEntry>> {
        self.find_entries_in_range(start, end).map_err(to_core_error)
    }
}

impl SettingsStore for DuckDbRepository {
    fn get_setting(&self, key: &str) -> CoreResult<Option<String>> {
        self.get_setting_value(key).map_err(to_core_error)
    }

    fn set_setting(&self, key: &str, value: &str) -> CoreResult<()> {
        self.set_setting_value(key, value).map_err(to_core_error)
    }
}
