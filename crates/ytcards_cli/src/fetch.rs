//! Outbound HTTP for thumbnails, view counts, feeds and video details

use std::io::Read;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use ytcards_core::feed::{FeedSource, video_details_url};
use ytcards_core::model::VideoId;

const USER_AGENT: &str = concat!("ytcards/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_BODY_BYTES: u64 = 8 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Not Found")]
    NotFound,
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("failed to read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn status(&self) -> u16 {
        match self {
            FetchError::NotFound => 404,
            _ => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Per-request media lookups used by the card server.
pub trait MediaSource: Send + Sync {
    fn thumbnail(&self, id: &VideoId) -> Result<Thumbnail, FetchError>;
    /// Raw metric string such as `1.2M`.
    fn views(&self, id: &VideoId) -> Result<String, FetchError>;
}

/// Feed and video detail documents used by the snippet generator.
pub trait VideoSource {
    fn feed(&self, source: &FeedSource) -> Result<String, FetchError>;
    fn video_details(&self, ids: &[&VideoId], api_key: &str) -> Result<String, FetchError>;
}

pub struct HttpSource {
    agent: ureq::Agent,
    thumbnail_base: String,
    views_base: String,
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSource {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            thumbnail_base: "https://i.ytimg.com/vi".to_string(),
            views_base: "https://img.shields.io/youtube/views".to_string(),
        }
    }

    fn get(&self, url: &str, accept: &str) -> Result<ureq::Response, FetchError> {
        tracing::debug!(url, "fetching");
        match self.agent.get(url).set("Accept", accept).call() {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(404, _)) => Err(FetchError::NotFound),
            Err(ureq::Error::Status(status, _)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Err(ureq::Error::Transport(err)) => Err(FetchError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }),
        }
    }

    fn get_string(&self, url: &str, accept: &str) -> Result<String, FetchError> {
        let response = self.get(url, accept)?;
        response.into_string().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BadgeResponse {
    #[serde(default)]
    value: String,
}

/// Reads the `value` field of a shields.io badge JSON document.
pub fn parse_badge_value(json: &str) -> String {
    match serde_json::from_str::<BadgeResponse>(json) {
        Ok(badge) => badge.value,
        Err(err) => {
            tracing::debug!(error = %err, "unreadable view badge");
            String::new()
        }
    }
}

impl MediaSource for HttpSource {
    fn thumbnail(&self, id: &VideoId) -> Result<Thumbnail, FetchError> {
        let url = format!("{}/{id}/mqdefault.jpg", self.thumbnail_base);
        let response = self.get(&url, "image/*")?;
        let mime = response
            .header("Content-Type")
            .unwrap_or("image/jpeg")
            .to_string();
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_BODY_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|source| FetchError::Body { url, source })?;
        Ok(Thumbnail { bytes, mime })
    }

    fn views(&self, id: &VideoId) -> Result<String, FetchError> {
        let url = format!("{}/{id}.json", self.views_base);
        let body = self.get_string(&url, "application/json")?;
        Ok(parse_badge_value(&body))
    }
}

impl VideoSource for HttpSource {
    fn feed(&self, source: &FeedSource) -> Result<String, FetchError> {
        self.get_string(&source.feed_url(), "application/atom+xml")
    }

    fn video_details(&self, ids: &[&VideoId], api_key: &str) -> Result<String, FetchError> {
        self.get_string(&video_details_url(ids, api_key), "application/json")
    }
}
