//! Diary service - per-day entries, weight prompt and startup seeding

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::domain::{parse_weight, today_utc, DiaryEntry, EntryPatch};
use crate::ports::{EntryStore, GoalsProvider, Prompt, PromptRequest, SettingsStore, LAST_WEIGHT_KEY};

/// Reads, defaults, merges and persists diary entries
///
/// There is no locking around the read-modify-write in `update`: two
/// overlapping updates for one date can lose fields, and the last write to
/// complete wins.
pub struct DiaryService {
    entries: Arc<dyn EntryStore>,
    goals: Arc<dyn GoalsProvider>,
    settings: Arc<dyn SettingsStore>,
    today: fn() -> NaiveDate,
}

impl DiaryService {
    pub fn new(
        entries: Arc<dyn EntryStore>,
        goals: Arc<dyn GoalsProvider>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            entries,
            goals,
            settings,
            today: today_utc,
        }
    }

    /// Replace the clock used to decide what "today" is
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    /// Get the entry for a date, `None` if there isn't one yet
    pub async fn get_entry(&self, date: NaiveDate) -> Result<Option<DiaryEntry>> {
        self.entries.get_entry(date).await
    }

    /// Merge `patch` into the entry for `date` and persist it.
    ///
    /// A missing entry is created first with the last known weight, the goals
    /// that apply on `date` and an empty nutrition log. Returns the merged
    /// entry as written, not a re-read.
    pub async fn update(&self, date: NaiveDate, patch: EntryPatch) -> Result<DiaryEntry> {
        let mut entry = match self.get_entry(date).await? {
            Some(entry) => entry,
            None => self.default_entry(date)?,
        };

        entry.apply(&patch)?;
        self.entries.put_entry(&entry).await?;

        Ok(entry)
    }

    /// Ask the user for a weight and record it on the entry for `date`.
    ///
    /// Weights recorded for today also become the last known weight. A
    /// cancelled prompt or non-numeric input writes nothing and returns
    /// `Ok(None)`.
    pub async fn prompt_to_set_weight(
        &self,
        date: NaiveDate,
        prompt: &dyn Prompt,
    ) -> Result<Option<DiaryEntry>> {
        let default_value = match self.get_entry(date).await? {
            Some(entry) => entry.weight.map(|w| w.to_string()).unwrap_or_default(),
            None => self
                .last_known_weight()?
                .unwrap_or(Decimal::ZERO)
                .to_string(),
        };

        let request = PromptRequest::number("Record weight", "Weight", default_value);
        let Some(input) = prompt.prompt(&request).await? else {
            return Ok(None);
        };
        let Some(weight) = parse_weight(&input) else {
            return Ok(None);
        };

        if date == self.today() {
            self.settings.set_setting(LAST_WEIGHT_KEY, &weight.to_string())?;
        }

        let mut patch = EntryPatch::new();
        patch.insert("weight".to_string(), JsonValue::String(weight.to_string()));
        self.update(date, patch).await.map(Some)
    }

    /// Startup hook: create today's entry with defaults if it doesn't exist.
    ///
    /// Returns whether an entry was written.
    pub async fn ensure_today_entry(&self) -> Result<bool> {
        let today = self.today();
        if self.get_entry(today).await?.is_some() {
            return Ok(false);
        }
        self.update(today, EntryPatch::new()).await?;
        Ok(true)
    }

    /// Entries between two dates (inclusive), oldest first
    pub async fn list_entries(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DiaryEntry>> {
        if start > end {
            return Err(Error::validation(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }
        self.entries.list_entries(start, end).await
    }

    /// Add `amount` to one nutrition item of the entry for `date`.
    ///
    /// The whole nutrition map is replaced through `update`, so other items
    /// are carried over from the stored entry.
    pub async fn log_food(&self, date: NaiveDate, item: &str, amount: Decimal) -> Result<DiaryEntry> {
        let item = item.trim();
        if item.is_empty() {
            return Err(Error::validation("Nutrition item name cannot be empty"));
        }

        let mut nutrition = self
            .get_entry(date)
            .await?
            .map(|entry| entry.nutrition)
            .unwrap_or_default();
        let total = nutrition.entry(item.to_string()).or_default();
        *total = total
            .checked_add(amount)
            .ok_or_else(|| Error::validation(format!("Amount for '{}' is too large", item)))?;

        let mut patch = EntryPatch::new();
        patch.insert("nutrition".to_string(), serde_json::to_value(&nutrition)?);
        self.update(date, patch).await
    }

    /// Most recently recorded weight, if it was set and parses
    pub fn last_known_weight(&self) -> Result<Option<Decimal>> {
        Ok(self
            .settings
            .get_setting(LAST_WEIGHT_KEY)?
            .as_deref()
            .and_then(parse_weight))
    }

    fn default_entry(&self, date: NaiveDate) -> Result<DiaryEntry> {
        Ok(DiaryEntry::new(
            date,
            self.last_known_weight()?,
            self.goals.goals_for_date(date),
        ))
    }
}
