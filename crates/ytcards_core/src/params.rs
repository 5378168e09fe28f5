//! Render request parameters
//!
//! Every optional field resolves to a [`FieldValue`]: the parsed input or the
//! field's documented default. Only the video id can fail validation.

use thiserror::Error;

use crate::locale::DEFAULT_LOCALE;
use crate::model::{CardColors, HexColor, VideoId};

pub const DEFAULT_WIDTH: u32 = 250;
pub const DEFAULT_BORDER_RADIUS: u32 = 5;
pub const DEFAULT_MAX_TITLE_LINES: u32 = 1;

const STATUS_BAD_REQUEST: u16 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<T> {
    Parsed(T),
    Default(T),
}

impl<T> FieldValue<T> {
    pub fn into_value(self) -> T {
        match self {
            FieldValue::Parsed(value) | FieldValue::Default(value) => value,
        }
    }

    pub fn get(&self) -> &T {
        match self {
            FieldValue::Parsed(value) | FieldValue::Default(value) => value,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, FieldValue::Default(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub value: Option<String>,
    pub message: String,
    pub status: u16,
}

impl ValidationError {
    fn missing(field: &str) -> Self {
        Self {
            field: field.to_string(),
            value: None,
            message: format!("Required parameter '{field}' is missing"),
            status: STATUS_BAD_REQUEST,
        }
    }

    fn malformed(field: &str, value: &str, expected: &str) -> Self {
        Self {
            field: field.to_string(),
            value: Some(value.to_string()),
            message: format!("'{field}' expects {expected} but got '{value}'"),
            status: STATUS_BAD_REQUEST,
        }
    }
}

/// Decoded `application/x-www-form-urlencoded` pairs. The first occurrence
/// of a key wins.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

pub fn validate_int(params: &QueryParams, field: &str, default: i64) -> FieldValue<i64> {
    match params.get(field).and_then(|value| value.trim().parse().ok()) {
        Some(value) => FieldValue::Parsed(value),
        None => FieldValue::Default(default),
    }
}

/// Zero and negative values fall back to the default.
pub fn validate_positive(params: &QueryParams, field: &str, default: u32) -> FieldValue<u32> {
    match validate_int(params, field, 0) {
        FieldValue::Parsed(value) if value > 0 => {
            FieldValue::Parsed(u32::try_from(value).unwrap_or(u32::MAX))
        }
        _ => FieldValue::Default(default),
    }
}

pub fn validate_non_negative(params: &QueryParams, field: &str, default: u32) -> FieldValue<u32> {
    match validate_int(params, field, -1) {
        FieldValue::Parsed(value) if value >= 0 => {
            FieldValue::Parsed(u32::try_from(value).unwrap_or(u32::MAX))
        }
        _ => FieldValue::Default(default),
    }
}

pub fn validate_color(params: &QueryParams, field: &str, default: &HexColor) -> FieldValue<HexColor> {
    match params.get(field).and_then(HexColor::parse) {
        Some(color) => FieldValue::Parsed(color),
        None => FieldValue::Default(default.clone()),
    }
}

pub fn validate_string(params: &QueryParams, field: &str, default: &str) -> FieldValue<String> {
    match params.get(field) {
        Some(value) => FieldValue::Parsed(value.to_string()),
        None => FieldValue::Default(default.to_string()),
    }
}

/// Accepts tags shaped like `en`, `pt-BR` or `zh_Hant_TW`.
pub fn validate_lang(params: &QueryParams, field: &str, default: &str) -> FieldValue<String> {
    match params.get(field) {
        Some(value) if is_language_tag(value) => FieldValue::Parsed(value.to_string()),
        _ => FieldValue::Default(default.to_string()),
    }
}

fn is_language_tag(value: &str) -> bool {
    let mut parts = value.split(['-', '_']);
    let Some(primary) = parts.next() else {
        return false;
    };
    (2..=3).contains(&primary.len())
        && primary.chars().all(|ch| ch.is_ascii_alphabetic())
        && parts.all(|part| {
            (1..=8).contains(&part.len()) && part.chars().all(|ch| ch.is_ascii_alphanumeric())
        })
}

pub fn validate_video_id(params: &QueryParams, field: &str) -> Result<VideoId, ValidationError> {
    let value = params.get(field).unwrap_or("");
    if value.is_empty() {
        return Err(ValidationError::missing(field));
    }
    VideoId::parse(value).ok_or_else(|| ValidationError::malformed(field, value, "a video ID"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderParameters {
    pub id: VideoId,
    pub width: u32,
    pub border_radius: u32,
    pub colors: CardColors,
    pub title: String,
    pub max_title_lines: u32,
    pub timestamp: Option<i64>,
    pub duration_seconds: Option<u64>,
    pub lang: String,
}

impl RenderParameters {
    pub fn new(id: VideoId) -> Self {
        Self {
            id,
            width: DEFAULT_WIDTH,
            border_radius: DEFAULT_BORDER_RADIUS,
            colors: CardColors::default(),
            title: String::new(),
            max_title_lines: DEFAULT_MAX_TITLE_LINES,
            timestamp: None,
            duration_seconds: None,
            lang: DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn from_query(params: &QueryParams) -> Result<Self, ValidationError> {
        let id = validate_video_id(params, "id")?;
        let defaults = CardColors::default();
        let timestamp = validate_int(params, "timestamp", 0).into_value();
        let duration = validate_int(params, "duration", 0).into_value();
        Ok(Self {
            id,
            width: validate_positive(params, "width", DEFAULT_WIDTH).into_value(),
            border_radius: validate_non_negative(params, "border_radius", DEFAULT_BORDER_RADIUS)
                .into_value(),
            colors: CardColors {
                background: validate_color(params, "background_color", &defaults.background)
                    .into_value(),
                title: validate_color(params, "title_color", &defaults.title).into_value(),
                stats: validate_color(params, "stats_color", &defaults.stats).into_value(),
            },
            title: validate_string(params, "title", "").into_value(),
            max_title_lines: validate_positive(params, "max_title_lines", DEFAULT_MAX_TITLE_LINES)
                .into_value(),
            timestamp: (timestamp > 0).then_some(timestamp),
            duration_seconds: u64::try_from(duration).ok().filter(|value| *value > 0),
            lang: validate_lang(params, "lang", DEFAULT_LOCALE).into_value(),
        })
    }
}
