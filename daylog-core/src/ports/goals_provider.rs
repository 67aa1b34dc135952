//! Goals provider port

use chrono::NaiveDate;

use crate::domain::GoalSnapshot;

/// Supplies the daily targets that apply on a date
pub trait GoalsProvider: Send + Sync {
    fn goals_for_date(&self, date: NaiveDate) -> GoalSnapshot;
}
