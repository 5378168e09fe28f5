use chrono::{DateTime, Utc};

use crate::locale::Locale;

const SECONDS_PER_DAY: i64 = 86_400;

/// Elapsed time bucketed into the unit and count shown to viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeSpan {
    JustNow,
    Seconds(u64),
    Minutes(u64),
    Hours(u64),
    Days(u64),
    Months(u64),
    Years(u64),
}

impl RelativeSpan {
    /// Negative input (an instant in the future) counts as zero elapsed.
    pub fn from_elapsed(elapsed_seconds: i64) -> Self {
        let seconds = elapsed_seconds.max(0);
        let days = seconds / SECONDS_PER_DAY;
        match seconds {
            s if s < 5 => RelativeSpan::JustNow,
            s if s < 50 => RelativeSpan::Seconds(s as u64),
            s if s < 120 => RelativeSpan::Minutes(1),
            s if s < 3_600 => RelativeSpan::Minutes((s / 60) as u64),
            s if s < 7_200 => RelativeSpan::Hours(1),
            s if s < SECONDS_PER_DAY => RelativeSpan::Hours((s / 3_600) as u64),
            _ if days < 30 => RelativeSpan::Days(days as u64),
            // days / 30.5 and days / 365 never land on .5 for whole days
            _ if days < 336 => RelativeSpan::Months(round_ratio(days, 30.5)),
            _ => RelativeSpan::Years(round_ratio(days, 365.0)),
        }
    }

    fn phrase_key(self) -> (&'static str, u64) {
        match self {
            RelativeSpan::JustNow => ("just-now", 0),
            RelativeSpan::Seconds(count) => ("seconds-ago", count),
            RelativeSpan::Minutes(count) => ("minutes-ago", count),
            RelativeSpan::Hours(count) => ("hours-ago", count),
            RelativeSpan::Days(count) => ("days-ago", count),
            RelativeSpan::Months(count) => ("months-ago", count),
            RelativeSpan::Years(count) => ("years-ago", count),
        }
    }
}

fn round_ratio(days: i64, unit: f64) -> u64 {
    ((days as f64) / unit).round().max(1.0) as u64
}

pub fn format_relative_time(elapsed_seconds: i64, locale: &Locale) -> String {
    let (key, count) = RelativeSpan::from_elapsed(elapsed_seconds).phrase_key();
    locale.phrase(key, count)
}

pub fn format_relative_time_since(
    published: DateTime<Utc>,
    now: DateTime<Utc>,
    locale: &Locale,
) -> String {
    format_relative_time((now - published).num_seconds(), locale)
}
