use std::collections::HashSet;

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::db::{ProgressStatus, SqliteStore, StoreError};

/// Consecutive UTC days ending at `today` with at least one completion.
/// Zero when nothing was completed today.
pub fn learning_streak(completions: &[DateTime<Utc>], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = completions.iter().map(|c| c.date_naive()).collect();

    let mut streak = 0;
    let mut cursor = today;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.checked_sub_days(Days::new(1)) {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

pub async fn current_streak(
    store: &SqliteStore,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<u32, StoreError> {
    let completions = store.recent_completions(user_id).await?;
    Ok(learning_streak(&completions, now.date_naive()))
}

pub async fn record_progress(
    store: &SqliteStore,
    user_id: &str,
    lesson_id: &str,
    status: ProgressStatus,
    percent: u32,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    store
        .upsert_progress(user_id, lesson_id, status, percent, now)
        .await
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_no_completions_no_streak() {
        assert_eq!(learning_streak(&[], today()), 0);
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let completions = vec![at(10, 9), at(10, 18), at(9, 7), at(8, 23), at(6, 12)];
        assert_eq!(learning_streak(&completions, today()), 3);
    }

    #[test]
    fn test_streak_requires_completion_today() {
        let completions = vec![at(9, 7), at(8, 23)];
        assert_eq!(learning_streak(&completions, today()), 0);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let start = at(1, 12);
        let completions: Vec<_> = (0..4).map(|d| start - Duration::days(d)).collect();
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(learning_streak(&completions, today), 4);
    }
}
