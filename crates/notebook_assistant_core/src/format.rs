//! Display helpers shared by list views.

use chrono::{DateTime, Utc};

/// Formats `then` relative to `now` the way notebook cards show it.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3_600 {
        format!("{} mins ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{} hrs ago", seconds / 3_600)
    } else if seconds < 2_592_000 {
        format!("{} days ago", seconds / 86_400)
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn buckets_by_elapsed_time() {
        let now = Utc.with_ymd_and_hms(2025, 6, 13, 12, 0, 0).unwrap();
        let ago = |d: Duration| relative_time(now - d, now);

        assert_eq!(ago(Duration::seconds(5)), "just now");
        assert_eq!(ago(Duration::minutes(5)), "5 mins ago");
        assert_eq!(ago(Duration::hours(3)), "3 hrs ago");
        assert_eq!(ago(Duration::days(2)), "2 days ago");
        assert_eq!(ago(Duration::days(45)), "2025-04-29");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let now = Utc::now();
        assert_eq!(relative_time(now + Duration::minutes(10), now), "just now");
    }
}
