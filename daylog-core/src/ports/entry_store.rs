//! Storage ports - diary entries and scalar settings

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::result::Result;
use crate::domain::DiaryEntry;

/// Settings key holding the most recently recorded weight
pub const LAST_WEIGHT_KEY: &str = "weight";

/// Diary entry storage keyed by date
///
/// A missing entry is `Ok(None)`, never an error.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Get the entry stored for a date
    async fn get_entry(&self, date: NaiveDate) -> Result<Option<DiaryEntry>>;

    /// Insert or replace the entry for `entry.date`
    async fn put_entry(&self, entry: &DiaryEntry) -> Result<()>;

    /// Entries between two dates (inclusive), oldest first
    async fn list_entries(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DiaryEntry>>;
}

/// Small string-keyed store for single ambient values
pub trait SettingsStore: Send + Sync {
    /// Read a value, `None` if it was never set
    fn get_setting(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set_setting(&self, key: &str, value: &str) -> Result<()>;
}
