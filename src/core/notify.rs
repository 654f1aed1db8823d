use chrono::{DateTime, Utc};

use super::action::Action;

/// Number of actions needing attention: overdue or due within 24 hours.
pub fn notification_count(actions: &[Action], now: DateTime<Utc>) -> usize {
    actions
        .iter()
        .filter(|a| a.is_overdue(now) || a.is_due_soon(now))
        .count()
}

/// Window title for the current state. The notification count and the error
/// indicator are independent prefixes; the error indicator goes outermost.
pub fn window_title(count: usize, has_errors: bool) -> String {
    let count_text = if count > 0 {
        format!("({}) ", count)
    } else {
        String::new()
    };
    let error_text = if has_errors { "[ERROR] " } else { "" };
    format!("{}{}Next Actions", error_text, count_text)
}
