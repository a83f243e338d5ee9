use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Next wall-clock occurrence of `time`: later today if still ahead of
/// `now`, otherwise tomorrow.
pub fn next_daily_occurrence(now: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(time);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}
