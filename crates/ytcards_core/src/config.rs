use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::model::{HexColor, ThemeOverride};
use crate::snippet::{OutputType, SnippetOptions};

pub const DEFAULT_COMMENT_TAG: &str = "YOUTUBE-CARDS";
pub const DEFAULT_README_PATH: &str = "README.md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Channel (`UC...`) or playlist id.
    pub source: Option<String>,
    pub snippet: SnippetOptions,
    pub comment_tag: String,
    pub readme_path: PathBuf,
    pub output_only: bool,
    pub youtube_api_key: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source: None,
            snippet: SnippetOptions::default(),
            comment_tag: DEFAULT_COMMENT_TAG.to_string(),
            readme_path: PathBuf::from(DEFAULT_README_PATH),
            output_only: false,
            youtube_api_key: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.source.as_deref().is_none_or(|id| id.trim().is_empty()) {
            bail!("missing channel or playlist id");
        }
        if self.snippet.max_videos == 0 {
            bail!("max_videos must be greater than 0");
        }
        if self.snippet.show_duration && self.youtube_api_key.is_none() {
            bail!("a YouTube API key is required when show_duration is enabled");
        }
        if self.comment_tag.trim().is_empty() {
            bail!("comment_tag must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeneratorConfigRaw {
    channel_id: Option<String>,
    lang: Option<String>,
    comment_tag: Option<String>,
    max_videos: Option<usize>,
    base_url: Option<String>,
    card_width: Option<u32>,
    border_radius: Option<u32>,
    background_color: Option<String>,
    title_color: Option<String>,
    stats_color: Option<String>,
    theme_light: Option<ThemeOverrideRaw>,
    theme_dark: Option<ThemeOverrideRaw>,
    max_title_lines: Option<u32>,
    show_duration: Option<bool>,
    readme_path: Option<PathBuf>,
    output_only: Option<bool>,
    output_type: Option<OutputType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThemeOverrideRaw {
    background_color: Option<String>,
    title_color: Option<String>,
    stats_color: Option<String>,
}

pub fn load_generator_config(path: &Path) -> Result<GeneratorConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_generator_config(&raw)
        .with_context(|| format!("failed to load config {}", path.display()))
}

/// Fields missing from the YAML keep their defaults.
pub fn parse_generator_config(yaml: &str) -> Result<GeneratorConfig> {
    let parsed: GeneratorConfigRaw = if yaml.trim().is_empty() {
        GeneratorConfigRaw::default()
    } else {
        serde_yaml::from_str(yaml).context("failed to parse YAML config")?
    };

    let mut config = GeneratorConfig::default();
    let snippet = &mut config.snippet;
    if let Some(value) = parsed.base_url {
        snippet.base_url = value;
    }
    if let Some(value) = parsed.lang {
        snippet.lang = value;
    }
    if let Some(value) = parsed.max_videos {
        if value == 0 {
            bail!("max_videos must be greater than 0");
        }
        snippet.max_videos = value;
    }
    if let Some(value) = parsed.output_type {
        snippet.output_type = value;
    }
    if let Some(value) = parsed.card_width {
        snippet.card_width = value;
    }
    if let Some(value) = parsed.border_radius {
        snippet.border_radius = value;
    }
    if let Some(value) = parsed.background_color {
        snippet.colors.background = parse_color("background_color", &value)?;
    }
    if let Some(value) = parsed.title_color {
        snippet.colors.title = parse_color("title_color", &value)?;
    }
    if let Some(value) = parsed.stats_color {
        snippet.colors.stats = parse_color("stats_color", &value)?;
    }
    if let Some(theme) = parsed.theme_light {
        snippet.theme_light = theme_override(theme, "theme_light")?;
    }
    if let Some(theme) = parsed.theme_dark {
        snippet.theme_dark = theme_override(theme, "theme_dark")?;
    }
    if let Some(value) = parsed.max_title_lines {
        snippet.max_title_lines = value;
    }
    if let Some(value) = parsed.show_duration {
        snippet.show_duration = value;
    }

    config.source = parsed.channel_id;
    if let Some(value) = parsed.comment_tag {
        config.comment_tag = value;
    }
    if let Some(value) = parsed.readme_path {
        config.readme_path = value;
    }
    if let Some(value) = parsed.output_only {
        config.output_only = value;
    }
    Ok(config)
}

/// Reads a JSON theme such as `{"background_color": "#fff"}`.
pub fn parse_theme_context(json: &str) -> Result<ThemeOverride> {
    if json.trim().is_empty() {
        return Ok(ThemeOverride::default());
    }
    let raw: ThemeOverrideRaw =
        serde_json::from_str(json).with_context(|| format!("invalid theme context: {json}"))?;
    theme_override(raw, "theme")
}

pub fn parse_color(field: &str, value: &str) -> Result<HexColor> {
    match HexColor::parse(value) {
        Some(color) => Ok(color),
        None => bail!("invalid color for {field}: '{value}'"),
    }
}

fn theme_override(raw: ThemeOverrideRaw, section: &str) -> Result<ThemeOverride> {
    let color = |key: &str, value: Option<String>| -> Result<Option<HexColor>> {
        value
            .map(|value| parse_color(&format!("{section}.{key}"), &value))
            .transpose()
    };
    Ok(ThemeOverride {
        background: color("background_color", raw.background_color)?,
        title: color("title_color", raw.title_color)?,
        stats: color("stats_color", raw.stats_color)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_generator_config("").expect("config");
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.snippet.base_url, "https://ytcards.demolab.com/");
        assert_eq!(config.snippet.max_videos, 6);
        assert_eq!(config.comment_tag, "YOUTUBE-CARDS");
        assert_eq!(config.readme_path, PathBuf::from("README.md"));
        assert_eq!(config.snippet.output_type, OutputType::Markdown);
    }

    #[test]
    fn reads_fields_and_themes() {
        let config = parse_generator_config(
            "channel_id: UCipSxT7a3rn81vGLw9lqRkg\n\
             max_videos: 3\n\
             output_type: html\n\
             background_color: '#000'\n\
             theme_dark:\n  background_color: '#111111'\n  stats_color: '#eeeeee'\n",
        )
        .expect("config");
        assert_eq!(config.source.as_deref(), Some("UCipSxT7a3rn81vGLw9lqRkg"));
        assert_eq!(config.snippet.max_videos, 3);
        assert_eq!(config.snippet.output_type, OutputType::Html);
        assert_eq!(config.snippet.colors.background.as_str(), "#000");
        assert_eq!(
            config.snippet.theme_dark.background.as_ref().map(HexColor::as_str),
            Some("#111111")
        );
        assert!(config.snippet.theme_dark.title.is_none());
        assert!(config.snippet.theme_light.is_empty());
    }

    #[test]
    fn rejects_bad_values() {
        let err = parse_generator_config("title_color: nope").expect_err("color");
        assert!(err.to_string().contains("title_color"));
        assert!(parse_generator_config("max_videos: 0").is_err());
        assert!(parse_generator_config("unknown_key: 1").is_err());
    }

    #[test]
    fn duration_requires_api_key() {
        let mut config = GeneratorConfig {
            source: Some("UCabc".to_string()),
            ..GeneratorConfig::default()
        };
        config.snippet.show_duration = true;
        assert!(config.validate().is_err());
        config.youtube_api_key = Some("key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_source_is_rejected() {
        let err = GeneratorConfig::default().validate().expect_err("source");
        assert!(err.to_string().contains("channel or playlist"));
    }

    #[test]
    fn theme_context_from_json() {
        let theme = parse_theme_context(r##"{"background_color": "#FFF", "title_color": "#000"}"##)
            .expect("theme");
        assert_eq!(theme.background.as_ref().map(HexColor::as_str), Some("#FFF"));
        assert!(theme.stats.is_none());
        assert!(parse_theme_context("{}").expect("empty").is_empty());
        assert!(parse_theme_context(r#"{"background_color": "red"}"#).is_err());
    }
}
