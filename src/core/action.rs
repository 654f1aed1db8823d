use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One next action pulled from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub name: String,
    pub url: String,
    pub image_url: Option<String>,
    pub project_name: Option<String>,
    /// Absolute due instant. `None` means no deadline.
    pub due_by: Option<DateTime<Utc>>,
}

impl Action {
    /// Returns true if this action's due instant has passed.
    /// Due exactly at `now` is not overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_by {
            Some(due_by) => due_by < now,
            None => false,
        }
    }

    /// Returns true if this action is due within the next 24 hours.
    /// Overdue actions are also "due soon".
    pub fn is_due_soon(&self, now: DateTime<Utc>) -> bool {
        match self.due_by {
            Some(due_by) => due_by < now + Duration::hours(24),
            None => false,
        }
    }
}

/// Sort actions ascending by due date, undated actions last.
/// The sort is stable, so ties keep their input order.
pub fn sorted_by_due_by(actions: &[Action]) -> Vec<Action> {
    let mut sorted = actions.to_vec();
    sorted.sort_by_key(|a| a.due_by.unwrap_or(DateTime::<Utc>::MAX_UTC));
    sorted
}
