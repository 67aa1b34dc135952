//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the EntryStore and SettingsStore ports
//! - settings.json for the GoalsProvider port

pub mod duckdb;
pub mod goals;
