//! Card text layout and geometry

use serde::Serialize;

use crate::duration::format_duration;
use crate::locale::Locale;
use crate::model::TextDirection;
use crate::params::RenderParameters;

const ELLIPSIS: char = '…';

pub const TITLE_LINE_HEIGHT: u32 = 20;
const THUMBNAIL_RATIO: f64 = 0.56;
const CHROME_PADDING: u32 = 60;
const TEXT_MARGIN: u32 = 10;
const TITLE_CHAR_WIDTH: u32 = 8;
const STATS_OFFSET: u32 = 35;

const BADGE_DIGIT_WIDTH: u32 = 7;
const BADGE_COLON_WIDTH: u32 = 5;
const BADGE_PADDING: u32 = 8;

/// Greedy word wrap into at most `max_lines` lines of `width` characters.
/// Words longer than a line are split. Overflowing text is cut and marked
/// with an ellipsis on the last kept line.
pub fn wrap_title(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }
    let width = width.max(1);
    let mut lines = wrap_words(text, width);
    if lines.len() <= max_lines {
        return lines;
    }

    let overflow = lines.split_off(max_lines);
    let mut tail = lines.pop().unwrap_or_default();
    for line in &overflow {
        tail.push(' ');
        tail.push_str(line);
    }
    lines.push(truncate_with_ellipsis(&tail, width));
    lines
}

fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > width {
            let mut rest: Vec<char> = word.chars().collect();
            if current_len > 0 && current_len + 1 < width {
                let room = width - current_len - 1;
                current.push(' ');
                current.extend(rest.drain(..room));
                current_len = width;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
            }
            while rest.len() > width {
                lines.push(rest.drain(..width).collect());
            }
            current = rest.into_iter().collect();
            current_len = current.chars().count();
            continue;
        }

        if current_len == 0 {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

fn truncate_with_ellipsis(text: &str, width: usize) -> String {
    let keep = width.saturating_sub(1);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push(ELLIPSIS);
    truncated
}

/// Width heuristic for the duration badge: digits are 7px, colons 5px.
pub fn estimate_duration_width(duration: &str) -> u32 {
    let digits = duration.chars().filter(char::is_ascii_digit).count() as u32;
    let colons = duration.chars().filter(|ch| *ch == ':').count() as u32;
    digits * BADGE_DIGIT_WIDTH + colons * BADGE_COLON_WIDTH + BADGE_PADDING
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationBadge {
    pub text: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    pub thumbnail_height: u32,
    pub title_lines: Vec<String>,
    pub title_line_height: u32,
    pub title_height: u32,
    pub duration: Option<DurationBadge>,
    pub direction: TextDirection,
    /// Horizontal anchor for title and stats text.
    pub text_x: u32,
    pub stats_y: u32,
}

impl CardLayout {
    pub fn compute(params: &RenderParameters, locale: &Locale) -> Self {
        let width = params.width;
        let title_chars = (width.saturating_sub(2 * TEXT_MARGIN) / TITLE_CHAR_WIDTH) as usize;
        let title_lines = wrap_title(&params.title, title_chars, params.max_title_lines as usize);
        let thumbnail_height = (f64::from(width) * THUMBNAIL_RATIO).round() as u32;
        let title_height = title_lines.len() as u32 * TITLE_LINE_HEIGHT;
        let duration = params.duration_seconds.map(|seconds| {
            let text = format_duration(seconds);
            let width = estimate_duration_width(&text);
            DurationBadge { text, width }
        });
        let direction = locale.direction;
        let text_x = match direction {
            TextDirection::Ltr => TEXT_MARGIN,
            TextDirection::Rtl => width.saturating_sub(TEXT_MARGIN),
        };
        Self {
            width,
            height: thumbnail_height + title_height + CHROME_PADDING,
            thumbnail_height,
            title_lines,
            title_line_height: TITLE_LINE_HEIGHT,
            title_height,
            duration,
            direction,
            text_x,
            stats_y: thumbnail_height + title_height + STATS_OFFSET,
        }
    }
}
