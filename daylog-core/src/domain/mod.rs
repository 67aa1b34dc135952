//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

pub mod entry;
pub mod goals;
pub mod result;

pub use entry::{parse_entry_date, parse_weight, today_utc, truncate_to_utc_date, DiaryEntry, EntryPatch};
pub use goals::{GoalSnapshot, GoalTarget};
