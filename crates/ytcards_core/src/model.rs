//! Core video and card models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Video identifier restricted to `[A-Za-z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn parse(value: &str) -> Option<Self> {
        if is_video_id(value) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_video_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    pub id: VideoId,
    pub title: String,
    pub link: String,
    pub published: DateTime<Utc>,
    pub duration_seconds: Option<u64>,
    pub views: Option<u64>,
}

/// Hex color normalized to `#` followed by 3, 4, 6, or 8 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Non-hex characters (including a leading `#`) are dropped before the
    /// digit count is checked.
    pub fn parse(input: &str) -> Option<Self> {
        let digits: String = input.chars().filter(|ch| ch.is_ascii_hexdigit()).collect();
        match digits.len() {
            3 | 4 | 6 | 8 => Some(Self(format!("#{digits}"))),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const DEFAULT_BACKGROUND_COLOR: &str = "#0d1117";
pub const DEFAULT_TITLE_COLOR: &str = "#ffffff";
pub const DEFAULT_STATS_COLOR: &str = "#dedede";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardColors {
    pub background: HexColor,
    pub title: HexColor,
    pub stats: HexColor,
}

impl Default for CardColors {
    fn default() -> Self {
        Self {
            background: HexColor(DEFAULT_BACKGROUND_COLOR.to_string()),
            title: HexColor(DEFAULT_TITLE_COLOR.to_string()),
            stats: HexColor(DEFAULT_STATS_COLOR.to_string()),
        }
    }
}

/// One visual variant. A field left as `None` keeps the base color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeOverride {
    pub background: Option<HexColor>,
    pub title: Option<HexColor>,
    pub stats: Option<HexColor>,
}

impl ThemeOverride {
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.title.is_none() && self.stats.is_none()
    }

    pub fn apply(&self, colors: &mut CardColors) {
        if let Some(color) = &self.background {
            colors.background = color.clone();
        }
        if let Some(color) = &self.title {
            colors.title = color.clone();
        }
        if let Some(color) = &self.stats {
            colors.stats = color.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_accepts_url_safe_tokens() {
        assert!(VideoId::parse("abc_123-456").is_some());
        assert!(VideoId::parse("dQw4w9WgXcQ").is_some());
        assert!(VideoId::parse("").is_none());
        assert!(VideoId::parse("**********").is_none());
        assert!(VideoId::parse("abc def").is_none());
    }

    #[test]
    fn hex_color_normalizes_prefix() {
        assert_eq!(HexColor::parse("#cde").map(|c| c.to_string()).as_deref(), Some("#cde"));
        assert_eq!(HexColor::parse("89ab").map(|c| c.to_string()).as_deref(), Some("#89ab"));
        assert_eq!(HexColor::parse("#fghijk"), None);
        assert_eq!(HexColor::parse("#012345678"), None);
    }

    #[test]
    fn override_only_replaces_present_colors() {
        let mut colors = CardColors::default();
        let theme = ThemeOverride {
            title: HexColor::parse("#000"),
            ..ThemeOverride::default()
        };
        theme.apply(&mut colors);
        assert_eq!(colors.title.as_str(), "#000");
        assert_eq!(colors.background.as_str(), DEFAULT_BACKGROUND_COLOR);
    }
}
