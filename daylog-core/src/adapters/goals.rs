//! Goals provider backed by settings.json

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::config::Config;
use crate::domain::{GoalSnapshot, GoalTarget};
use crate::ports::GoalsProvider;

/// Resolves configured goals for the weekday of a date
#[derive(Debug, Clone, Default)]
pub struct SettingsGoalsProvider {
    goals: BTreeMap<String, GoalTarget>,
}

impl SettingsGoalsProvider {
    pub fn new(goals: BTreeMap<String, GoalTarget>) -> Self {
        Self { goals }
    }

    pub fn from_config(config: &Config) -> Self {
        if config.goals_disabled {
            Self::default()
        } else {
            Self::new(config.goals.clone())
        }
    }
}

impl GoalsProvider for SettingsGoalsProvider {
    fn goals_for_date(&self, date: NaiveDate) -> GoalSnapshot {
        let weekday = date.weekday();
        GoalSnapshot {
            targets: self
                .goals
                .iter()
                .map(|(name, target)| (name.clone(), target.for_weekday(weekday)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_goals_follow_weekday() {
        let mut goals = BTreeMap::new();
        goals.insert("calories".to_string(), GoalTarget::Daily(Decimal::new(2000, 0)));
        goals.insert(
            "protein".to_string(),
            GoalTarget::Weekly([100, 100, 100, 100, 100, 80, 60].map(|v| Decimal::new(v, 0))),
        );
        let provider = SettingsGoalsProvider::new(goals);

        // 2025-03-01 is a Saturday, 2025-03-02 a Sunday
        let saturday = provider.goals_for_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let sunday = provider.goals_for_date(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());

        assert_eq!(saturday.get("calories"), Some(Decimal::new(2000, 0)));
        assert_eq!(saturday.get("protein"), Some(Decimal::new(80, 0)));
        assert_eq!(sunday.get("protein"), Some(Decimal::new(60, 0)));
    }

    #[test]
    fn test_disabled_goals_are_empty() {
        let mut config = Config::default();
        config.set_goal("calories", GoalTarget::Daily(Decimal::new(2000, 0)));
        config.goals_disabled = true;

        let provider = SettingsGoalsProvider::from_config(&config);
        assert!(provider
            .goals_for_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
            .is_empty());
    }
}
