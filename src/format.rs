use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// "Just now", "5 minutes ago", "1 day ago"; "Never" when there is no timestamp.
pub fn format_relative_time(then: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match then {
        None => "Never".to_string(),
        Some(then) => match elapsed_label(then, now) {
            Some(label) => format!("{label} ago"),
            None => "Just now".to_string(),
        },
    }
}

/// Same buckets as [`format_relative_time`] without the "ago" suffix.
pub fn format_time_duration(then: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match then {
        None => "Never".to_string(),
        Some(then) => elapsed_label(then, now).unwrap_or_else(|| "Just now".to_string()),
    }
}

fn elapsed_label(then: DateTime<Utc>, now: DateTime<Utc>) -> Option<String> {
    let seconds = (now - then).num_seconds();
    if seconds < MINUTE {
        return None;
    }

    let (amount, unit) = if seconds < HOUR {
        (seconds / MINUTE, "minute")
    } else if seconds < DAY {
        (seconds / HOUR, "hour")
    } else {
        (seconds / DAY, "day")
    };
    let plural = if amount > 1 { "s" } else { "" };
    Some(format!("{amount} {unit}{plural}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_timestamp_is_never() {
        assert_eq!(format_relative_time(None, now()), "Never");
        assert_eq!(format_time_duration(None, now()), "Never");
    }

    #[test]
    fn under_a_minute_is_just_now() {
        let then = now() - Duration::seconds(30);
        assert_eq!(format_relative_time(Some(then), now()), "Just now");
        assert_eq!(format_time_duration(Some(then), now()), "Just now");
    }

    #[test]
    fn future_timestamp_is_just_now() {
        let then = now() + Duration::minutes(3);
        assert_eq!(format_relative_time(Some(then), now()), "Just now");
    }

    #[test]
    fn buckets_and_plurals() {
        let cases = [
            (Duration::minutes(1), "1 minute ago"),
            (Duration::minutes(5), "5 minutes ago"),
            (Duration::hours(1), "1 hour ago"),
            (Duration::hours(23), "23 hours ago"),
            (Duration::days(1), "1 day ago"),
            (Duration::days(3), "3 days ago"),
        ];
        for (age, expected) in cases {
            assert_eq!(format_relative_time(Some(now() - age), now()), expected);
        }
    }

    #[test]
    fn duration_drops_the_suffix() {
        let then = now() - Duration::hours(2);
        assert_eq!(format_time_duration(Some(then), now()), "2 hours");
    }
}
