//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The diary service
//! depends only on these traits, not on concrete implementations.

mod entry_store;
mod goals_provider;
mod prompt;

pub use entry_store::{EntryStore, SettingsStore, LAST_WEIGHT_KEY};
pub use goals_provider::GoalsProvider;
pub use prompt::{Prompt, PromptRequest};
