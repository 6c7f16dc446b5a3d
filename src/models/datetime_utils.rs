use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Source of "now" for payout and unlock projections.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

pub fn fixed_clock(at: DateTime<Utc>) -> Clock {
    Arc::new(move || at)
}

pub fn format_absolute(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y %-I:%M %p").to_string()
}

/// "in 3 hours", "2 days ago", ...
pub fn humanize(now: &DateTime<Utc>, at: &DateTime<Utc>) -> String {
    let delta = *at - *now;
    let past = delta < Duration::zero();
    let phrase = describe(if past { -delta } else { delta });
    if past {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}

/// "in 3 hours (October 21, 2026 3:00 PM)".
pub fn relative_with_absolute(now: &DateTime<Utc>, at: &DateTime<Utc>) -> String {
    format!("{} ({})", humanize(now, at), format_absolute(at))
}

fn describe(span: Duration) -> String {
    let seconds = span.num_seconds();
    let minutes = (seconds as f64 / 60.0).round() as i64;
    let hours = (seconds as f64 / 3600.0).round() as i64;
    let days = (seconds as f64 / 86_400.0).round() as i64;

    match seconds {
        s if s < 45 => "a few seconds".to_string(),
        s if s < 90 => "a minute".to_string(),
        _ if minutes < 45 => format!("{minutes} minutes"),
        _ if minutes < 90 => "an hour".to_string(),
        _ if hours < 22 => format!("{hours} hours"),
        _ if hours < 36 => "a day".to_string(),
        _ if days < 26 => format!("{days} days"),
        _ if days < 46 => "a month".to_string(),
        _ if days < 320 => format!("{} months", ((days as f64) / 30.4).round() as i64),
        _ if days < 548 => "a year".to_string(),
        _ => format!("{} years", ((days as f64) / 365.0).round() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn humanizes_future_and_past() {
        assert_eq!(humanize(&now(), &(now() + Duration::hours(3))), "in 3 hours");
        assert_eq!(humanize(&now(), &(now() - Duration::days(2))), "2 days ago");
        assert_eq!(humanize(&now(), &(now() + Duration::seconds(10))), "in a few seconds");
        assert_eq!(humanize(&now(), &(now() + Duration::hours(30))), "in a day");
    }

    #[test]
    fn appends_the_absolute_date() {
        let at = Utc.with_ymd_and_hms(2026, 10, 21, 15, 0, 0).unwrap();
        assert_eq!(
            relative_with_absolute(&now(), &at),
            "in 2 days (October 21, 2026 3:00 PM)"
        );
    }
}
