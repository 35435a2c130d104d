use std::collections::HashSet;
use chrono::{DateTime, NaiveDate, Utc};
use crate::history::SubmissionRecord;

/// UTC calendar date of an epoch-ms timestamp. Out-of-range values map to `None`.
pub fn utc_date(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map(|dt| dt.date_naive())
}

/// Consecutive practice days ending today (UTC).
pub fn compute_streak(submissions: &[SubmissionRecord]) -> u32 {
    compute_streak_on(submissions, Utc::now().date_naive())
}

/// Consecutive days, walking back from `today`, that have at least one
/// accepted submission. A missing `today` gives 0.
pub fn compute_streak_on(submissions: &[SubmissionRecord], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = submissions
        .iter()
        .filter_map(|s| utc_date(s.timestamp()))
        .collect();

    let mut streak = 0;
    let mut current = today;
    while days.contains(&current) {
        streak += 1;
        match current.pred_opt() {
            Some(previous) => current = previous,
            None => break,
        }
    }
    streak
}
