//! SVG card, error card and index page rendering

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use minijinja::{AutoEscape, Environment, context};
use serde::Serialize;
use thiserror::Error;

use crate::layout::{CardLayout, DurationBadge, wrap_title};
use crate::locale::Locale;
use crate::metric::format_views_from_metric;
use crate::params::RenderParameters;
use crate::relative_time::format_relative_time;

const CARD_TEMPLATE: &str = include_str!("../templates/card.svg");
const ERROR_TEMPLATE: &str = include_str!("../templates/error.svg");
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

const STATS_SEPARATOR: &str = "\u{2002}•\u{2002}";
const ERROR_LINE_CHARS: usize = 28;
const ERROR_MAX_LINES: usize = 4;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// `views • relative` when both exist, otherwise whichever is present.
pub fn compose_stats(views: &str, relative: &str) -> String {
    match (views.is_empty(), relative.is_empty()) {
        (false, false) => format!("{views}{STATS_SEPARATOR}{relative}"),
        (false, true) => views.to_string(),
        _ => relative.to_string(),
    }
}

/// Base64 `data:` URI. Characters outside a MIME token are dropped from
/// `mime` so the URI can be emitted into an attribute unescaped.
pub fn data_uri(bytes: &[u8], mime: &str) -> String {
    let mime: String = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '/' | '+' | '.' | '-'))
        .collect();
    let mime = if mime.is_empty() { "image/jpeg" } else { mime.as_str() };
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub width: u32,
    pub height: u32,
    pub border_radius: u32,
    pub background_color: String,
    pub title_color: String,
    pub stats_color: String,
    pub thumbnail: String,
    pub thumbnail_height: u32,
    pub title_lines: Vec<String>,
    pub title_line_height: u32,
    pub title_height: u32,
    pub stats: String,
    pub duration: Option<DurationBadge>,
    pub direction: &'static str,
    pub text_x: u32,
    pub stats_y: u32,
}

impl CardView {
    pub fn build(
        params: &RenderParameters,
        layout: CardLayout,
        stats: String,
        thumbnail: String,
    ) -> Self {
        Self {
            width: layout.width,
            height: layout.height,
            border_radius: params.border_radius,
            background_color: params.colors.background.to_string(),
            title_color: params.colors.title.to_string(),
            stats_color: params.colors.stats.to_string(),
            thumbnail,
            thumbnail_height: layout.thumbnail_height,
            title_lines: layout.title_lines,
            title_line_height: layout.title_line_height,
            title_height: layout.title_height,
            stats,
            duration: layout.duration,
            direction: layout.direction.as_str(),
            text_x: layout.text_x,
            stats_y: layout.stats_y,
        }
    }
}

pub struct CardRenderer {
    env: Environment<'static>,
}

impl CardRenderer {
    pub fn new() -> Result<Self, CardError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|name| {
            if name.ends_with(".svg") || name.ends_with(".html") {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });
        env.add_template("card.svg", CARD_TEMPLATE)?;
        env.add_template("error.svg", ERROR_TEMPLATE)?;
        env.add_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render_card(&self, view: &CardView) -> Result<String, CardError> {
        let template = self.env.get_template("card.svg")?;
        Ok(template.render(context! { card => view })?)
    }

    /// Full pipeline for one request: stats text, layout and template.
    /// `views` is the raw metric string; unreadable values are left out.
    pub fn render_video(
        &self,
        params: &RenderParameters,
        locale: &Locale,
        views: &str,
        thumbnail: String,
        now: DateTime<Utc>,
    ) -> Result<String, CardError> {
        let views = format_views_from_metric(views, locale);
        let relative = params
            .timestamp
            .map(|timestamp| format_relative_time(now.timestamp() - timestamp, locale))
            .unwrap_or_default();
        let layout = CardLayout::compute(params, locale);
        let view = CardView::build(params, layout, compose_stats(&views, &relative), thumbnail);
        self.render_card(&view)
    }

    pub fn render_error(&self, message: &str, status: u16) -> Result<String, CardError> {
        let template = self.env.get_template("error.svg")?;
        let lines = wrap_title(message, ERROR_LINE_CHARS, ERROR_MAX_LINES);
        Ok(template.render(context! {
            code => status,
            message => message,
            message_lines => lines,
        })?)
    }

    pub fn render_index(&self, now: DateTime<Utc>) -> Result<String, CardError> {
        let template = self.env.get_template("index.html")?;
        Ok(template.render(context! {
            year => now.format("%Y").to_string(),
        })?)
    }
}
