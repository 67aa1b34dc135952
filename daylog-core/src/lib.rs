//! Daylog Core - per-day health diary
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Diary entries, goal snapshots and errors
//! - **ports**: Trait definitions for storage, goals, settings and prompts
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, settings.json goals)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbRepository;
use adapters::goals::SettingsGoalsProvider;
use config::Config;
use services::DiaryService;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{DiaryEntry, EntryPatch, GoalSnapshot, GoalTarget};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for Daylog operations
///
/// Holds the database, configuration and the diary service wired to them.
pub struct DaylogContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub diary_service: DiaryService,
}

impl DaylogContext {
    /// Open the diary in `data_dir`, creating the database if needed
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let repository = Arc::new(DuckDbRepository::new(&data_dir.join("daylog.duckdb"))?);
        repository.ensure_schema()?;

        let goals = Arc::new(SettingsGoalsProvider::from_config(&config));
        let diary_service = DiaryService::new(repository.clone(), goals, repository.clone());

        Ok(Self {
            config,
            repository,
            diary_service,
        })
    }
}
