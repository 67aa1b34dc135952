//! Goal domain model

use std::collections::BTreeMap;

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily targets captured into a diary entry when it is created.
///
/// Keys are goal names such as "calories", "protein" or "weight".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalSnapshot {
    pub targets: BTreeMap<String, Decimal>,
}

impl GoalSnapshot {
    /// Add or replace a target
    pub fn with_target(mut self, name: impl Into<String>, value: Decimal) -> Self {
        self.targets.insert(name.into(), value);
        self
    }

    /// Look up a single target
    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.targets.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A configured goal: one value for every day, or one per weekday
/// (Monday first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoalTarget {
    Daily(Decimal),
    Weekly([Decimal; 7]),
}

impl GoalTarget {
    /// Target value that applies on the given weekday
    pub fn for_weekday(&self, weekday: Weekday) -> Decimal {
        match self {
            GoalTarget::Daily(value) => *value,
            GoalTarget::Weekly(values) => values[weekday.num_days_from_monday() as usize],
        }
    }
}
