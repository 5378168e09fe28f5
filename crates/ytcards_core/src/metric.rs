use thiserror::Error;

use crate::locale::{Locale, PluralCategory};

/// Magnitude suffixes accepted on input, each 1000x the previous.
const INPUT_SUFFIXES: [char; 8] = ['K', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y'];
/// Suffixes used for compact display. Billions use `B`.
const DISPLAY_SUFFIXES: [&str; 7] = ["", "K", "M", "B", "T", "P", "E"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricError {
    #[error("empty metric value")]
    Empty,
    #[error("invalid metric value: {0}")]
    Invalid(String),
    #[error("metric value out of range: {0}")]
    Overflow(String),
}

/// Parses `42`, `1.2k`, `3M`, `1.1G` (or `1.1B`) into a count.
pub fn parse_metric(input: &str) -> Result<u64, MetricError> {
    let value = input.trim();
    let Some(last) = value.chars().last() else {
        return Err(MetricError::Empty);
    };

    if !last.is_ascii_alphabetic() {
        return value
            .parse::<u64>()
            .map_err(|_| MetricError::Invalid(input.to_string()));
    }

    let suffix = match last.to_ascii_uppercase() {
        'B' => 'G',
        other => other,
    };
    let exponent = INPUT_SUFFIXES
        .iter()
        .position(|candidate| *candidate == suffix)
        .ok_or_else(|| MetricError::Invalid(input.to_string()))?
        + 1;
    let number = value[..value.len() - last.len_utf8()].trim().replace(',', ".");
    if number.is_empty() || number.starts_with('-') || number.starts_with('+') {
        return Err(MetricError::Invalid(input.to_string()));
    }
    let mantissa: f64 = number
        .parse()
        .map_err(|_| MetricError::Invalid(input.to_string()))?;
    let scaled = mantissa * 1000f64.powi(exponent as i32);
    if !scaled.is_finite() || scaled >= u64::MAX as f64 {
        return Err(MetricError::Overflow(input.to_string()));
    }
    Ok(scaled.round() as u64)
}

/// Compact display: `0`, `105`, `1K`, `1.2K`, `10.2K`, `1.2B`.
pub fn format_metric(count: u64) -> String {
    format_with_separator(count, ".")
}

pub fn format_metric_localized(count: u64, locale: &Locale) -> String {
    format_with_separator(count, &locale.decimal_separator)
}

fn format_with_separator(count: u64, separator: &str) -> String {
    if count < 1000 {
        return count.to_string();
    }
    let last = DISPLAY_SUFFIXES.len() - 1;
    let mut value = count as f64;
    let mut magnitude = 0;
    while value >= 1000.0 && magnitude < last {
        value /= 1000.0;
        magnitude += 1;
    }
    let mut rounded = (value * 10.0).round() / 10.0;
    if rounded >= 1000.0 && magnitude < last {
        rounded = (rounded / 100.0).round() / 10.0;
        magnitude += 1;
    }
    let text = format!("{rounded:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text.replace('.', separator), DISPLAY_SUFFIXES[magnitude])
}

/// Translated "N view(s)". The singular form is reserved for exactly one view.
pub fn format_views(count: u64, locale: &Locale) -> String {
    let number = format_metric_localized(count, locale);
    locale.phrase_with("views", views_category(count, locale), "number", &number)
}

/// Formats a metric string as returned by the view-count endpoint. Yields an
/// empty string when the value is missing or unreadable.
pub fn format_views_from_metric(value: &str, locale: &Locale) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    match parse_metric(value) {
        Ok(count) => format_views(count, locale),
        Err(err) => {
            tracing::debug!(value, error = %err, "ignoring unreadable view count");
            String::new()
        }
    }
}

fn views_category(count: u64, locale: &Locale) -> PluralCategory {
    if count == 1 {
        return PluralCategory::One;
    }
    if count >= 1000 {
        return PluralCategory::Other;
    }
    match locale.plural.category(count) {
        PluralCategory::One => PluralCategory::Other,
        category => category,
    }
}
