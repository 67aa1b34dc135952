//! Log database migrations - embedded SQL files
//!
//! Applied to logs.duckdb by `LoggingService` through the same
//! `MigrationService` as the diary database.

/// All log migrations, embedded at compile time.
/// Format: (filename, sql_content)
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
];
