//! YouTube Atom feeds and Data API duration lookups

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use roxmltree::{Document, Node};
use serde::Deserialize;
use thiserror::Error;

use crate::duration::parse_iso8601_duration;
use crate::model::{VideoEntry, VideoId};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const YT_NS: &str = "http://www.youtube.com/xml/schemas/2015";
const MEDIA_NS: &str = "http://search.yahoo.com/mrss/";

const FEED_URL: &str = "https://www.youtube.com/feeds/videos.xml";
const VIDEOS_API_URL: &str = "https://youtube.googleapis.com/youtube/v3/videos";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid feed xml: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("expected an Atom <feed> root, found <{0}>")]
    NotAFeed(String),
    #[error("invalid video details response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Channel(String),
    Playlist(String),
}

impl FeedSource {
    /// Channel ids start with `UC`; anything else is treated as a playlist.
    pub fn infer(id: &str) -> Self {
        let id = id.trim().to_string();
        if id.starts_with("UC") {
            FeedSource::Channel(id)
        } else {
            FeedSource::Playlist(id)
        }
    }

    pub fn id(&self) -> &str {
        match self {
            FeedSource::Channel(id) | FeedSource::Playlist(id) => id,
        }
    }

    pub fn feed_url(&self) -> String {
        let key = match self {
            FeedSource::Channel(_) => "channel_id",
            FeedSource::Playlist(_) => "playlist_id",
        };
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(key, self.id())
            .finish();
        format!("{FEED_URL}?{query}")
    }
}

/// Entries come back in document order. Entries lacking an id, title, link
/// or publish date are skipped.
pub fn parse_feed(xml: &str) -> Result<Vec<VideoEntry>, FeedError> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if !is_element(root, ATOM_NS, "feed") {
        return Err(FeedError::NotAFeed(root.tag_name().name().to_string()));
    }

    let mut entries = Vec::new();
    for (index, node) in root
        .children()
        .filter(|node| is_element(*node, ATOM_NS, "entry"))
        .enumerate()
    {
        match parse_entry(node) {
            Ok(entry) => entries.push(entry),
            Err(reason) => tracing::warn!(entry = index, reason, "skipping feed entry"),
        }
    }
    tracing::debug!(count = entries.len(), "parsed feed");
    Ok(entries)
}

fn parse_entry(node: Node<'_, '_>) -> Result<VideoEntry, &'static str> {
    let raw_id = child_text(node, YT_NS, "videoId").ok_or("missing yt:videoId")?;
    let id = VideoId::parse(raw_id.trim()).ok_or("invalid video id")?;
    let title = child_text(node, ATOM_NS, "title")
        .ok_or("missing title")?
        .to_string();
    let link = node
        .children()
        .filter(|child| is_element(*child, ATOM_NS, "link"))
        .find(|child| child.attribute("rel").is_none_or(|rel| rel == "alternate"))
        .and_then(|child| child.attribute("href"))
        .ok_or("missing link")?
        .to_string();
    let published = child_text(node, ATOM_NS, "published").ok_or("missing published")?;
    let published = DateTime::parse_from_rfc3339(published.trim())
        .map_err(|_| "invalid published date")?
        .with_timezone(&Utc);

    Ok(VideoEntry {
        id,
        title,
        link,
        published,
        duration_seconds: None,
        views: entry_views(node),
    })
}

fn entry_views(entry: Node<'_, '_>) -> Option<u64> {
    entry
        .descendants()
        .find(|node| is_element(*node, MEDIA_NS, "statistics"))
        .and_then(|node| node.attribute("views"))
        .and_then(|views| views.trim().parse().ok())
}

fn is_element(node: Node<'_, '_>, namespace: &str, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(namespace)
}

fn child_text<'a>(node: Node<'a, '_>, namespace: &str, name: &str) -> Option<&'a str> {
    node.children()
        .find(|child| is_element(*child, namespace, name))
        .and_then(|child| child.text())
}

/// Data API request for the `contentDetails` of the given videos.
pub fn video_details_url(ids: &[&VideoId], api_key: &str) -> String {
    let joined = ids
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("part", "contentDetails")
        .append_pair("id", &joined)
        .append_pair("key", api_key)
        .append_pair("alt", "json")
        .finish();
    format!("{VIDEOS_API_URL}?{query}")
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

/// Maps video id to duration in seconds. Items without a duration are left out.
pub fn parse_video_durations(json: &str) -> Result<HashMap<String, u64>, FeedError> {
    let response: VideoListResponse = serde_json::from_str(json)?;
    Ok(response
        .items
        .into_iter()
        .filter_map(|item| {
            let duration = item.content_details?.duration?;
            Some((item.id, parse_iso8601_duration(&duration)))
        })
        .collect())
}

pub fn apply_durations(entries: &mut [VideoEntry], durations: &HashMap<String, u64>) {
    for entry in entries {
        if let Some(seconds) = durations.get(entry.id.as_str()) {
            entry.duration_seconds = Some(*seconds);
        }
    }
}
