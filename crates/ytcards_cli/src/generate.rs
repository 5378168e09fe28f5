use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ytcards_core::config::{
    GeneratorConfig, load_generator_config, parse_color, parse_theme_context,
};
use ytcards_core::feed::{FeedSource, apply_durations, parse_feed, parse_video_durations};
use ytcards_core::model::{VideoEntry, VideoId};
use ytcards_core::patch::TaggedDocument;
use ytcards_core::snippet::{OutputType, SnippetGenerator};

use crate::fetch::VideoSource;

/// Flags override values read from `--config`.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    #[arg(long = "channel-id", value_name = "ID")]
    pub channel_id: Option<String>,
    #[arg(long)]
    pub lang: Option<String>,
    #[arg(long = "comment-tag-name")]
    pub comment_tag: Option<String>,
    #[arg(long)]
    pub max_videos: Option<usize>,
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(long)]
    pub card_width: Option<u32>,
    #[arg(long)]
    pub border_radius: Option<u32>,
    #[arg(long)]
    pub background_color: Option<String>,
    #[arg(long)]
    pub title_color: Option<String>,
    #[arg(long)]
    pub stats_color: Option<String>,
    #[arg(long, value_name = "JSON")]
    pub theme_context_light: Option<String>,
    #[arg(long, value_name = "JSON")]
    pub theme_context_dark: Option<String>,
    #[arg(long)]
    pub max_title_lines: Option<u32>,
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub show_duration: Option<bool>,
    #[arg(long, value_name = "PATH")]
    pub readme_path: Option<PathBuf>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub output_only: Option<bool>,
    #[arg(long)]
    pub output_type: Option<OutputType>,
}

impl GenerateArgs {
    pub fn into_config(self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => load_generator_config(path)?,
            None => GeneratorConfig::default(),
        };

        if let Some(value) = self.channel_id {
            config.source = Some(value);
        }
        if let Some(value) = self.comment_tag {
            config.comment_tag = value;
        }
        if let Some(value) = self.readme_path {
            config.readme_path = value;
        }
        if let Some(value) = self.output_only {
            config.output_only = value;
        }
        config.youtube_api_key = self
            .youtube_api_key
            .filter(|key| !key.trim().is_empty());

        let snippet = &mut config.snippet;
        if let Some(value) = self.lang {
            snippet.lang = value;
        }
        if let Some(value) = self.max_videos {
            snippet.max_videos = value;
        }
        if let Some(value) = self.base_url {
            snippet.base_url = value;
        }
        if let Some(value) = self.card_width {
            snippet.card_width = value;
        }
        if let Some(value) = self.border_radius {
            snippet.border_radius = value;
        }
        if let Some(value) = self.background_color {
            snippet.colors.background = parse_color("background_color", &value)?;
        }
        if let Some(value) = self.title_color {
            snippet.colors.title = parse_color("title_color", &value)?;
        }
        if let Some(value) = self.stats_color {
            snippet.colors.stats = parse_color("stats_color", &value)?;
        }
        if let Some(value) = self.theme_context_light {
            snippet.theme_light = parse_theme_context(&value)?;
        }
        if let Some(value) = self.theme_context_dark {
            snippet.theme_dark = parse_theme_context(&value)?;
        }
        if let Some(value) = self.max_title_lines {
            snippet.max_title_lines = value;
        }
        if let Some(value) = self.show_duration {
            snippet.show_duration = value;
        }
        if let Some(value) = self.output_type {
            snippet.output_type = value;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOutcome {
    pub snippet: String,
    pub readme_updated: bool,
}

pub fn run_generate(config: &GeneratorConfig, source: &dyn VideoSource) -> Result<GenerateOutcome> {
    config.validate()?;
    let feed_source = FeedSource::infer(config.source.as_deref().unwrap_or_default());
    let xml = source
        .feed(&feed_source)
        .with_context(|| format!("failed to fetch feed for {}", feed_source.id()))?;
    let mut entries = parse_feed(&xml)
        .with_context(|| format!("failed to parse feed for {}", feed_source.id()))?;
    entries.truncate(config.snippet.max_videos);
    tracing::info!(source = feed_source.id(), videos = entries.len(), "loaded feed");

    if config.snippet.show_duration {
        if let Some(api_key) = &config.youtube_api_key {
            enrich_durations(&mut entries, source, api_key);
        }
    }

    let snippet = SnippetGenerator::new(config.snippet.clone()).render(&entries);
    let readme_updated = if config.output_only {
        false
    } else {
        patch_readme(config, &snippet)?
    };
    Ok(GenerateOutcome {
        snippet,
        readme_updated,
    })
}

/// Missing durations only drop the badge.
fn enrich_durations(entries: &mut [VideoEntry], source: &dyn VideoSource, api_key: &str) {
    if entries.is_empty() {
        return;
    }
    let ids: Vec<&VideoId> = entries.iter().map(|entry| &entry.id).collect();
    let durations = source
        .video_details(&ids, api_key)
        .map_err(anyhow::Error::from)
        .and_then(|json| parse_video_durations(&json).map_err(anyhow::Error::from));
    match durations {
        Ok(durations) => apply_durations(entries, &durations),
        Err(err) => tracing::warn!(error = %err, "video durations unavailable"),
    }
}

fn patch_readme(config: &GeneratorConfig, snippet: &str) -> Result<bool> {
    let path = &config.readme_path;
    let mut doc = TaggedDocument::load(path)?;
    let changed = doc.patch(&config.comment_tag, snippet)?;
    if changed {
        doc.save(path)?;
        tracing::info!(path = %path.display(), "updated readme");
    } else {
        tracing::info!(path = %path.display(), "readme already up to date");
    }
    Ok(changed)
}
