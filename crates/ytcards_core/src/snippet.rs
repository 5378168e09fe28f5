//! Markdown and HTML snippets embedding one card per video

use std::str::FromStr;

use serde::Deserialize;

use crate::locale::DEFAULT_LOCALE;
use crate::model::{CardColors, ThemeOverride, VideoEntry};
use crate::params::{DEFAULT_BORDER_RADIUS, DEFAULT_MAX_TITLE_LINES, DEFAULT_WIDTH};
use crate::theme::{ThemeMode, Themeable, Themed, resolve_themes};

pub const DEFAULT_BASE_URL: &str = "https://ytcards.demolab.com/";
pub const DEFAULT_MAX_VIDEOS: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    #[default]
    Markdown,
    Html,
}

impl FromStr for OutputType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "markdown" => Ok(OutputType::Markdown),
            "html" => Ok(OutputType::Html),
            other => Err(format!("output type must be 'markdown' or 'html', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetOptions {
    pub base_url: String,
    pub lang: String,
    pub max_videos: usize,
    pub output_type: OutputType,
    pub card_width: u32,
    pub border_radius: u32,
    pub colors: CardColors,
    pub theme_light: ThemeOverride,
    pub theme_dark: ThemeOverride,
    pub max_title_lines: u32,
    pub show_duration: bool,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: DEFAULT_LOCALE.to_string(),
            max_videos: DEFAULT_MAX_VIDEOS,
            output_type: OutputType::Markdown,
            card_width: DEFAULT_WIDTH,
            border_radius: DEFAULT_BORDER_RADIUS,
            colors: CardColors::default(),
            theme_light: ThemeOverride::default(),
            theme_dark: ThemeOverride::default(),
            max_title_lines: DEFAULT_MAX_TITLE_LINES,
            show_duration: false,
        }
    }
}

/// Query parameters for one card image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardQuery {
    pub id: String,
    pub title: String,
    pub lang: String,
    pub timestamp: i64,
    pub colors: CardColors,
    pub max_title_lines: u32,
    pub width: u32,
    pub border_radius: u32,
    pub duration: Option<u64>,
}

impl Themeable for CardQuery {
    fn colors_mut(&mut self) -> &mut CardColors {
        &mut self.colors
    }
}

impl CardQuery {
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("id", &self.id)
            .append_pair("title", &self.title)
            .append_pair("lang", &self.lang)
            .append_pair("timestamp", &self.timestamp.to_string())
            .append_pair("background_color", self.colors.background.as_str())
            .append_pair("title_color", self.colors.title.as_str())
            .append_pair("stats_color", self.colors.stats.as_str())
            .append_pair("max_title_lines", &self.max_title_lines.to_string())
            .append_pair("width", &self.width.to_string())
            .append_pair("border_radius", &self.border_radius.to_string());
        if let Some(duration) = self.duration {
            serializer.append_pair("duration", &duration.to_string());
        }
        serializer.finish()
    }
}

pub struct SnippetGenerator {
    options: SnippetOptions,
}

impl SnippetGenerator {
    pub fn new(options: SnippetOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SnippetOptions {
        &self.options
    }

    /// One block per entry, feed order, newline-joined.
    pub fn render(&self, entries: &[VideoEntry]) -> String {
        entries
            .iter()
            .take(self.options.max_videos)
            .map(|entry| self.render_entry(entry))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_entry(&self, entry: &VideoEntry) -> String {
        let query = self.card_query(entry);
        let themed = resolve_themes(&query, &self.options.theme_light, &self.options.theme_dark);
        match self.options.output_type {
            OutputType::Markdown => themed
                .iter()
                .map(|variant| markdown_image(entry, &self.card_url(variant), variant.mode))
                .collect(),
            OutputType::Html => {
                let images: Vec<String> = themed
                    .iter()
                    .map(|variant| html_image(entry, &self.card_url(variant), variant.mode))
                    .collect();
                if let [single] = images.as_slice() {
                    format!("<a href=\"{}\">{single}</a>", entry.link)
                } else {
                    let mut out = format!("<a href=\"{}\">\n  <picture>\n", entry.link);
                    for image in &images {
                        out.push_str(&format!("    {image}\n"));
                    }
                    out.push_str("  </picture>\n</a>");
                    out
                }
            }
        }
    }

    fn card_query(&self, entry: &VideoEntry) -> CardQuery {
        let options = &self.options;
        CardQuery {
            id: entry.id.to_string(),
            title: entry.title.clone(),
            lang: options.lang.clone(),
            timestamp: entry.published.timestamp(),
            colors: options.colors.clone(),
            max_title_lines: options.max_title_lines,
            width: options.card_width,
            border_radius: options.border_radius,
            duration: entry.duration_seconds.filter(|_| options.show_duration),
        }
    }

    fn card_url(&self, variant: &Themed<CardQuery>) -> String {
        format!("{}?{}", self.options.base_url, variant.params.to_query_string())
    }
}

fn markdown_image(entry: &VideoEntry, url: &str, mode: ThemeMode) -> String {
    let escaped = entry.title.replace('"', "\\\"");
    let fragment = match mode {
        ThemeMode::Single => "",
        ThemeMode::Dark => "#gh-dark-mode-only",
        ThemeMode::Light => "#gh-light-mode-only",
    };
    format!(
        "[![{}]({url} \"{escaped}\")]({}{fragment})",
        entry.title, entry.link
    )
}

fn html_image(entry: &VideoEntry, url: &str, mode: ThemeMode) -> String {
    let escaped = entry.title.replace('"', "&quot;");
    match mode {
        ThemeMode::Dark => {
            format!("<source media=\"(prefers-color-scheme: dark)\" srcset=\"{url}\">")
        }
        ThemeMode::Single | ThemeMode::Light => {
            format!("<img src=\"{url}\" alt=\"{escaped}\" title=\"{escaped}\">")
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::{HexColor, VideoId};

    fn entry(id: &str, title: &str) -> VideoEntry {
        VideoEntry {
            id: VideoId::parse(id).expect("id"),
            title: title.to_string(),
            link: format!("https://www.youtube.com/watch?v={id}"),
            published: Utc.with_ymd_and_hms(2009, 10, 25, 6, 57, 33).unwrap(),
            duration_seconds: Some(211),
            views: None,
        }
    }

    fn dual_options(output_type: OutputType) -> SnippetOptions {
        SnippetOptions {
            output_type,
            theme_light: ThemeOverride {
                background: HexColor::parse("#ffffff"),
                title: HexColor::parse("#000000"),
                stats: HexColor::parse("#111111"),
            },
            theme_dark: ThemeOverride {
                background: HexColor::parse("#000000"),
                title: HexColor::parse("#ffffff"),
                stats: HexColor::parse("#eeeeee"),
            },
            ..SnippetOptions::default()
        }
    }

    #[test]
    fn query_string_keeps_parameter_order() {
        let generator = SnippetGenerator::new(SnippetOptions::default());
        let query = generator.card_query(&entry("abc", "Hello World"));
        assert_eq!(
            query.to_query_string(),
            "id=abc&title=Hello+World&lang=en&timestamp=1256453853\
             &background_color=%230d1117&title_color=%23ffffff&stats_color=%23dedede\
             &max_title_lines=1&width=250&border_radius=5"
        );
    }

    #[test]
    fn markdown_single_block() {
        let generator = SnippetGenerator::new(SnippetOptions::default());
        let out = generator.render(&[entry("abc", "Say \"hi\"")]);
        assert!(out.starts_with("[![Say \"hi\"](https://ytcards.demolab.com/?id=abc&"));
        assert!(out.ends_with(" \"Say \\\"hi\\\"\")](https://www.youtube.com/watch?v=abc)"));
        assert_eq!(out.matches("[![").count(), 1);
    }

    #[test]
    fn markdown_dual_blocks_follow_color_scheme() {
        let generator = SnippetGenerator::new(dual_options(OutputType::Markdown));
        let out = generator.render_entry(&entry("abc", "Title"));
        assert_eq!(out.matches("[![").count(), 2);
        let (dark, light) = out.split_once(")[![").expect("two blocks");
        assert!(dark.contains("background_color=%23000000"));
        assert!(dark.contains("stats_color=%23eeeeee"));
        assert!(dark.ends_with("#gh-dark-mode-only"));
        assert!(light.contains("background_color=%23ffffff"));
        assert!(light.contains("stats_color=%23111111"));
        assert!(light.ends_with("#gh-light-mode-only)"));
    }

    #[test]
    fn html_single_block() {
        let generator = SnippetGenerator::new(SnippetOptions {
            output_type: OutputType::Html,
            ..SnippetOptions::default()
        });
        let out = generator.render_entry(&entry("abc", "Say \"hi\""));
        assert!(out.starts_with("<a href=\"https://www.youtube.com/watch?v=abc\"><img src=\""));
        assert!(out.ends_with("alt=\"Say &quot;hi&quot;\" title=\"Say &quot;hi&quot;\"></a>"));
        assert!(!out.contains("<picture>"));
    }

    #[test]
    fn html_dual_wraps_picture() {
        let generator = SnippetGenerator::new(dual_options(OutputType::Html));
        let out = generator.render_entry(&entry("abc", "Title"));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "  <picture>");
        assert!(lines[2].starts_with("    <source media=\"(prefers-color-scheme: dark)\" srcset=\""));
        assert!(lines[2].contains("background_color=%23000000"));
        assert!(lines[3].starts_with("    <img src=\""));
        assert!(lines[3].contains("background_color=%23ffffff"));
        assert_eq!(lines[5], "</a>");
    }

    #[test]
    fn dual_mode_doubles_blocks_per_video() {
        let entries = [entry("a1", "One"), entry("b2", "Two"), entry("c3", "Three")];
        let single = SnippetGenerator::new(SnippetOptions::default()).render(&entries);
        let dual = SnippetGenerator::new(dual_options(OutputType::Markdown)).render(&entries);
        assert_eq!(single.matches("[![").count(), 3);
        assert_eq!(dual.matches("[![").count(), 6);
    }

    #[test]
    fn keeps_feed_order_and_limit() {
        let generator = SnippetGenerator::new(SnippetOptions {
            max_videos: 2,
            ..SnippetOptions::default()
        });
        let out = generator.render(&[entry("zz", "Z"), entry("aa", "A"), entry("mm", "M")]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("id=zz"));
        assert!(lines[1].contains("id=aa"));
    }

    #[test]
    fn duration_requires_show_duration() {
        let hidden = SnippetGenerator::new(SnippetOptions::default());
        assert!(!hidden.render_entry(&entry("abc", "T")).contains("duration="));
        let shown = SnippetGenerator::new(SnippetOptions {
            show_duration: true,
            ..SnippetOptions::default()
        });
        assert!(shown.render_entry(&entry("abc", "T")).contains("&duration=211"));
    }

    #[test]
    fn output_type_parses() {
        assert_eq!("html".parse::<OutputType>(), Ok(OutputType::Html));
        assert!("xml".parse::<OutputType>().is_err());
    }
}
