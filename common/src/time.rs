//! Human readable relative timestamps ("3 hours ago", "in a day").

use chrono::{DateTime, Utc};

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: f64 = 60.0 * MS_PER_SECOND;
const MS_PER_HOUR: f64 = 60.0 * MS_PER_MINUTE;
const MS_PER_DAY: f64 = 24.0 * MS_PER_HOUR;
const DAYS_PER_MONTH: f64 = 365.2425 / 12.0;

#[derive(Debug, Clone, Copy)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Unit {
    fn of(self, millis: f64) -> f64 {
        match self {
            Unit::Second => millis / MS_PER_SECOND,
            Unit::Minute => millis / MS_PER_MINUTE,
            Unit::Hour => millis / MS_PER_HOUR,
            Unit::Day => millis / MS_PER_DAY,
            Unit::Month => millis / MS_PER_DAY / DAYS_PER_MONTH,
            Unit::Year => millis / MS_PER_DAY / DAYS_PER_MONTH / 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Label {
    FewSeconds,
    Minute,
    Minutes,
    Hour,
    Hours,
    Day,
    Days,
    Month,
    Months,
    Year,
    Years,
}

impl Label {
    fn phrase(self, n: u64) -> String {
        match self {
            Label::FewSeconds => "a few seconds".into(),
            Label::Minute => "a minute".into(),
            Label::Minutes => format!("{n} minutes"),
            Label::Hour => "an hour".into(),
            Label::Hours => format!("{n} hours"),
            Label::Day => "a day".into(),
            Label::Days => format!("{n} days"),
            Label::Month => "a month".into(),
            Label::Months => format!("{n} months"),
            Label::Year => "a year".into(),
            Label::Years => format!("{n} years"),
        }
    }
}

struct Threshold {
    label: Label,
    /// Largest rounded value (in the most recently measured unit) this
    /// bucket accepts. `None` accepts everything.
    max: Option<u64>,
    /// Re-measure the distance in this unit before comparing.
    unit: Option<Unit>,
}

const THRESHOLDS: &[Threshold] = &[
    Threshold { label: Label::FewSeconds, max: Some(44), unit: Some(Unit::Second) },
    Threshold { label: Label::Minute, max: Some(89), unit: None },
    Threshold { label: Label::Minutes, max: Some(44), unit: Some(Unit::Minute) },
    Threshold { label: Label::Hour, max: Some(89), unit: None },
    Threshold { label: Label::Hours, max: Some(21), unit: Some(Unit::Hour) },
    Threshold { label: Label::Day, max: Some(35), unit: None },
    Threshold { label: Label::Days, max: Some(25), unit: Some(Unit::Day) },
    Threshold { label: Label::Month, max: Some(45), unit: None },
    Threshold { label: Label::Months, max: Some(10), unit: Some(Unit::Month) },
    Threshold { label: Label::Year, max: Some(17), unit: None },
    Threshold { label: Label::Years, max: None, unit: Some(Unit::Year) },
];

/// Render `then` relative to `now`.
///
/// Past instants read "an hour ago", future ones "in an hour". Equal
/// instants count as past.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let millis = (then - now).num_milliseconds() as f64;

    let mut value = 0.0;
    for (i, threshold) in THRESHOLDS.iter().enumerate() {
        if let Some(unit) = threshold.unit {
            value = unit.of(millis);
        }

        let rounded = value.abs().round() as u64;
        if threshold.max.is_none_or(|max| rounded <= max) {
            // "1 minutes" reads as "a minute": fall back to the singular
            // bucket just before this one.
            let label = if rounded <= 1 && i > 0 {
                THRESHOLDS[i - 1].label
            } else {
                threshold.label
            };

            let phrase = label.phrase(rounded);
            return if value > 0.0 {
                format!("in {phrase}")
            } else {
                format!("{phrase} ago")
            };
        }
    }

    unreachable!("the last threshold accepts every value")
}

#[cfg(test)]
mod test {
    use chrono::TimeDelta;

    use super::*;

    fn ago(delta: TimeDelta) -> String {
        let now = Utc::now();
        relative_time(now - delta, now)
    }

    #[test]
    fn seconds() {
        assert_eq!(ago(TimeDelta::zero()), "a few seconds ago");
        assert_eq!(ago(TimeDelta::seconds(44)), "a few seconds ago");
        assert_eq!(ago(TimeDelta::seconds(45)), "a minute ago");
        assert_eq!(ago(TimeDelta::seconds(89)), "a minute ago");
    }

    #[test]
    fn minutes() {
        assert_eq!(ago(TimeDelta::seconds(90)), "2 minutes ago");
        assert_eq!(ago(TimeDelta::minutes(10)), "10 minutes ago");
        assert_eq!(ago(TimeDelta::minutes(44)), "44 minutes ago");
        assert_eq!(ago(TimeDelta::minutes(45)), "an hour ago");
    }

    #[test]
    fn hours() {
        assert_eq!(ago(TimeDelta::seconds(3600)), "an hour ago");
        assert_eq!(ago(TimeDelta::minutes(89)), "an hour ago");
        assert_eq!(ago(TimeDelta::minutes(90)), "2 hours ago");
        assert_eq!(ago(TimeDelta::hours(3)), "3 hours ago");
        assert_eq!(ago(TimeDelta::hours(21)), "21 hours ago");
        assert_eq!(ago(TimeDelta::hours(22)), "a day ago");
    }

    #[test]
    fn days() {
        assert_eq!(ago(TimeDelta::hours(35)), "a day ago");
        assert_eq!(ago(TimeDelta::hours(36)), "2 days ago");
        assert_eq!(ago(TimeDelta::days(25)), "25 days ago");
        assert_eq!(ago(TimeDelta::days(26)), "a month ago");
    }

    #[test]
    fn months_and_years() {
        assert_eq!(ago(TimeDelta::days(45)), "a month ago");
        assert_eq!(ago(TimeDelta::days(60)), "2 months ago");
        assert_eq!(ago(TimeDelta::days(300)), "10 months ago");
        assert_eq!(ago(TimeDelta::days(365)), "a year ago");
        assert_eq!(ago(TimeDelta::days(3 * 365)), "3 years ago");
    }

    #[test]
    fn future_instants() {
        let now = Utc::now();
        assert_eq!(relative_time(now + TimeDelta::hours(3), now), "in 3 hours");
        assert_eq!(relative_time(now + TimeDelta::seconds(10), now), "in a few seconds");
    }
}
