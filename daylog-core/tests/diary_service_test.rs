//! Integration tests for the diary service
//!
//! Storage is real DuckDB in a temp directory; goals and the prompt are
//! test doubles at the port level.
//!
//! Run with: cargo test --test diary_service_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::TempDir;

use daylog_core::adapters::duckdb::DuckDbRepository;
use daylog_core::domain::result::Result;
use daylog_core::ports::{
    EntryStore, GoalsProvider, Prompt, PromptRequest, SettingsStore, LAST_WEIGHT_KEY,
};
use daylog_core::services::DiaryService;
use daylog_core::{DiaryEntry, EntryPatch, Error, GoalSnapshot};

// ============================================================================
// Test Helpers
// ============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn past_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

/// Goals that depend on the date so snapshots can be told apart
struct DatedGoals;

impl GoalsProvider for DatedGoals {
    fn goals_for_date(&self, date: NaiveDate) -> GoalSnapshot {
        use chrono::Datelike;
        GoalSnapshot::default()
            .with_target("calories", Decimal::new(2000, 0))
            .with_target("day", Decimal::from(date.day()))
    }
}

/// Entry store that counts writes before handing them to DuckDB
struct CountingStore {
    inner: Arc<DuckDbRepository>,
    puts: AtomicUsize,
}

impl CountingStore {
    fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntryStore for CountingStore {
    async fn get_entry(&self, date: NaiveDate) -> Result<Option<DiaryEntry>> {
        self.inner.get_entry(date).await
    }

    async fn put_entry(&self, entry: &DiaryEntry) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put_entry(entry).await
    }

    async fn list_entries(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DiaryEntry>> {
        self.inner.list_entries(start, end).await
    }
}

/// Prompt that answers with a fixed value and remembers what it was asked
struct ScriptedPrompt {
    answer: Option<String>,
    requests: Mutex<Vec<PromptRequest>>,
}

impl ScriptedPrompt {
    fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn cancelling() -> Self {
        Self {
            answer: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn last_request(&self) -> PromptRequest {
        self.requests.lock().unwrap().last().cloned().expect("prompt was not shown")
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn prompt(&self, request: &PromptRequest) -> Result<Option<String>> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.answer.clone())
    }
}

struct Harness {
    _temp_dir: TempDir,
    repo: Arc<DuckDbRepository>,
    store: Arc<CountingStore>,
    service: DiaryService,
}

fn create_harness() -> Harness {
    let temp_dir = TempDir::new().unwrap();
    let repo = DuckDbRepository::new(&temp_dir.path().join("test.duckdb"))
        .expect("Failed to create repository");
    repo.ensure_schema().expect("Failed to initialize schema");
    let repo = Arc::new(repo);

    let store = Arc::new(CountingStore {
        inner: repo.clone(),
        puts: AtomicUsize::new(0),
    });
    let service = DiaryService::new(store.clone(), Arc::new(DatedGoals), repo.clone())
        .with_today(today);

    Harness {
        _temp_dir: temp_dir,
        repo,
        store,
        service,
    }
}

fn patch(value: serde_json::Value) -> EntryPatch {
    value.as_object().cloned().unwrap()
}

// ============================================================================
// get_entry / update
// ============================================================================

#[tokio::test]
async fn test_get_entry_absent_for_unknown_date() {
    let h = create_harness();
    assert!(h.service.get_entry(past_day()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_creates_entry_with_defaults() {
    let h = create_harness();
    h.repo.set_setting(LAST_WEIGHT_KEY, "81.2").unwrap();

    let entry = h.service.update(past_day(), EntryPatch::new()).await.unwrap();

    assert_eq!(entry.date, past_day());
    assert_eq!(entry.weight, Some(Decimal::new(812, 1)));
    assert_eq!(entry.goals, DatedGoals.goals_for_date(past_day()));
    assert!(entry.nutrition.is_empty());
    assert_eq!(h.store.puts(), 1);
}

#[tokio::test]
async fn test_update_without_known_weight_leaves_weight_empty() {
    let h = create_harness();
    let entry = h.service.update(past_day(), EntryPatch::new()).await.unwrap();
    assert_eq!(entry.weight, None);
}

#[tokio::test]
async fn test_update_overlays_latest_values_on_defaults() {
    let h = create_harness();

    h.service
        .update(past_day(), patch(json!({"weight": 70, "mood": "tired"})))
        .await
        .unwrap();
    h.service
        .update(past_day(), patch(json!({"nutrition": {"rice": 200}})))
        .await
        .unwrap();
    let returned = h
        .service
        .update(past_day(), patch(json!({"weight": "71.5"})))
        .await
        .unwrap();

    let stored = h.service.get_entry(past_day()).await.unwrap().unwrap();
    assert_eq!(stored, returned);
    assert_eq!(stored.weight, Some(Decimal::new(715, 1)));
    assert_eq!(stored.nutrition.get("rice"), Some(&Decimal::new(200, 0)));
    assert_eq!(stored.extra.get("mood"), Some(&json!("tired")));
    assert_eq!(stored.goals, DatedGoals.goals_for_date(past_day()));
    assert_eq!(h.store.puts(), 3);
}

#[tokio::test]
async fn test_goals_snapshot_is_not_recomputed() {
    let h = create_harness();
    let created = h.service.update(past_day(), EntryPatch::new()).await.unwrap();

    // A service with different goals must not touch the stored snapshot
    struct NoGoals;
    impl GoalsProvider for NoGoals {
        fn goals_for_date(&self, _date: NaiveDate) -> GoalSnapshot {
            GoalSnapshot::default()
        }
    }
    let other = DiaryService::new(h.repo.clone(), Arc::new(NoGoals), h.repo.clone());
    let updated = other
        .update(past_day(), patch(json!({"weight": 65})))
        .await
        .unwrap();

    assert_eq!(updated.goals, created.goals);
}

#[tokio::test]
async fn test_empty_update_is_idempotent() {
    let h = create_harness();
    h.service
        .update(past_day(), patch(json!({"weight": 70})))
        .await
        .unwrap();

    let first = h.service.update(past_day(), EntryPatch::new()).await.unwrap();
    let second = h.service.update(past_day(), EntryPatch::new()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.service.get_entry(past_day()).await.unwrap(), Some(second));
    assert_eq!(h.store.puts(), 3);
}

#[tokio::test]
async fn test_update_with_bad_field_writes_nothing() {
    let h = create_harness();
    let err = h
        .service
        .update(past_day(), patch(json!({"nutrition": "lots"})))
        .await
        .unwrap_err();

    assert!(matches!(err, daylog_core::Error::Validation(_)));
    assert_eq!(h.store.puts(), 0);
    assert!(h.service.get_entry(past_day()).await.unwrap().is_none());
}

// ============================================================================
// prompt_to_set_weight
// ============================================================================

#[tokio::test]
async fn test_prompt_for_today_writes_entry_and_last_weight() {
    let h = create_harness();
    let prompt = ScriptedPrompt::answering("72.5");

    let entry = h
        .service
        .prompt_to_set_weight(today(), &prompt)
        .await
        .unwrap()
        .expect("weight should be recorded");

    assert_eq!(entry.weight, Some(Decimal::new(725, 1)));
    assert_eq!(
        h.repo.get_setting(LAST_WEIGHT_KEY).unwrap().as_deref(),
        Some("72.5")
    );
    let stored = h.service.get_entry(today()).await.unwrap().unwrap();
    assert_eq!(stored.weight, Some(Decimal::new(725, 1)));
}

#[tokio::test]
async fn test_prompt_for_past_day_leaves_last_weight_alone() {
    let h = create_harness();
    let prompt = ScriptedPrompt::answering("72.5");

    h.service
        .prompt_to_set_weight(past_day(), &prompt)
        .await
        .unwrap();

    assert_eq!(h.repo.get_setting(LAST_WEIGHT_KEY).unwrap(), None);
    let stored = h.service.get_entry(past_day()).await.unwrap().unwrap();
    assert_eq!(stored.weight, Some(Decimal::new(725, 1)));
}

#[tokio::test]
async fn test_cancelled_prompt_writes_nothing() {
    let h = create_harness();
    h.repo.set_setting(LAST_WEIGHT_KEY, "80").unwrap();

    let result = h
        .service
        .prompt_to_set_weight(today(), &ScriptedPrompt::cancelling())
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(h.store.puts(), 0);
    assert!(h.service.get_entry(today()).await.unwrap().is_none());
    assert_eq!(
        h.repo.get_setting(LAST_WEIGHT_KEY).unwrap().as_deref(),
        Some("80")
    );
}

#[tokio::test]
async fn test_non_numeric_input_writes_nothing() {
    let h = create_harness();
    h.service
        .update(today(), patch(json!({"weight": 75})))
        .await
        .unwrap();
    let puts_before = h.store.puts();

    let result = h
        .service
        .prompt_to_set_weight(today(), &ScriptedPrompt::answering("seventy"))
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(h.store.puts(), puts_before);
    assert_eq!(h.repo.get_setting(LAST_WEIGHT_KEY).unwrap(), None);
    let stored = h.service.get_entry(today()).await.unwrap().unwrap();
    assert_eq!(stored.weight, Some(Decimal::new(75, 0)));
}

#[tokio::test]
async fn test_prompt_defaults() {
    let h = create_harness();

    // No entry, no last weight
    let prompt = ScriptedPrompt::cancelling();
    h.service.prompt_to_set_weight(past_day(), &prompt).await.unwrap();
    let request = prompt.last_request();
    assert_eq!(request.default_value, "0");
    assert_eq!(request.title, "Weight");
    assert!(request.cancelable);

    // No entry, last weight known
    h.repo.set_setting(LAST_WEIGHT_KEY, "79.5").unwrap();
    h.service.prompt_to_set_weight(past_day(), &prompt).await.unwrap();
    assert_eq!(prompt.last_request().default_value, "79.5");

    // Entry exists: its weight wins
    h.service
        .update(past_day(), patch(json!({"weight": 68})))
        .await
        .unwrap();
    h.service.prompt_to_set_weight(past_day(), &prompt).await.unwrap();
    assert_eq!(prompt.last_request().default_value, "68");
}

// ============================================================================
// Startup seeding
// ============================================================================

#[tokio::test]
async fn test_startup_creates_todays_entry_once() {
    let h = create_harness();

    assert!(h.service.ensure_today_entry().await.unwrap());
    assert_eq!(h.store.puts(), 1);

    assert!(!h.service.ensure_today_entry().await.unwrap());
    assert_eq!(h.store.puts(), 1);

    let entry = h.service.get_entry(today()).await.unwrap().unwrap();
    assert_eq!(entry.goals, DatedGoals.goals_for_date(today()));
}

#[tokio::test]
async fn test_startup_skips_existing_entry() {
    let h = create_harness();
    h.service
        .update(today(), patch(json!({"weight": 77})))
        .await
        .unwrap();

    assert!(!h.service.ensure_today_entry().await.unwrap());
    assert_eq!(h.store.puts(), 1);
    let entry = h.service.get_entry(today()).await.unwrap().unwrap();
    assert_eq!(entry.weight, Some(Decimal::new(77, 0)));
}

// ============================================================================
// History and food logging
// ============================================================================

#[tokio::test]
async fn test_list_entries_in_range() {
    let h = create_harness();
    for day in [1, 4, 8, 12] {
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        h.service.update(date, EntryPatch::new()).await.unwrap();
    }

    let entries = h
        .service
        .list_entries(
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
        )
        .await
        .unwrap();

    let days: Vec<_> = entries.iter().map(|e| e.date.to_string()).collect();
    assert_eq!(days, vec!["2025-03-04", "2025-03-08"]);

    assert!(h.service.list_entries(today(), past_day()).await.is_err());
}

#[tokio::test]
async fn test_log_food_accumulates_per_item() {
    let h = create_harness();

    h.service
        .log_food(past_day(), "oats", Decimal::new(50, 0))
        .await
        .unwrap();
    h.service
        .log_food(past_day(), "milk", Decimal::new(200, 0))
        .await
        .unwrap();
    let entry = h
        .service
        .log_food(past_day(), "oats", Decimal::new(25, 0))
        .await
        .unwrap();

    assert_eq!(entry.nutrition.get("oats"), Some(&Decimal::new(75, 0)));
    assert_eq!(entry.nutrition.get("milk"), Some(&Decimal::new(200, 0)));
    assert_eq!(entry.goals, DatedGoals.goals_for_date(past_day()));

    assert!(h
        .service
        .log_food(past_day(), "  ", Decimal::ONE)
        .await
        .is_err());
}

#[tokio::test]
async fn test_log_food_overflow_is_rejected() {
    let h = create_harness();

    h.service
        .log_food(past_day(), "oats", Decimal::MAX)
        .await
        .unwrap();
    let err = h
        .service
        .log_food(past_day(), "oats", Decimal::MAX)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(h.store.puts(), 1);
    let stored = h.service.get_entry(past_day()).await.unwrap().unwrap();
    assert_eq!(stored.nutrition.get("oats"), Some(&Decimal::MAX));
}

#[tokio::test]
async fn test_last_weight_is_stored_trimmed() {
    let h = create_harness();

    h.service
        .prompt_to_set_weight(today(), &ScriptedPrompt::answering(" 80.50 "))
        .await
        .unwrap();

    assert_eq!(
        h.repo.get_setting(LAST_WEIGHT_KEY).unwrap().as_deref(),
        Some("80.50")
    );
}
