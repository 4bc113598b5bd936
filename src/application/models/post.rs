use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published media item. Regular posts and IGTV episodes share this
/// shape; `post_content` holds one direct media URL per frame (several for
/// sidecar albums).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub description: Option<String>,
    pub likes: u64,
    pub comments: u64,
    pub owner_link: String,
    pub owner_username: String,
    pub post_content: Vec<String>,
    pub post_content_len: usize,
    /// Unix timestamp of publication
    pub posted_at: i64,
    pub shortcode: String,
    pub post_link: String,
}

impl Post {
    pub fn posted_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.posted_at, 0)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", s)
    }
}

/// An IGTV episode: a long-form video post with an episode title. The
/// title is mandatory, an episode without one is a malformed payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Igtv {
    #[serde(flatten)]
    pub post: Post,
    pub title: String,
}

impl fmt::Display for Igtv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", s)
    }
}

/// A single active story frame. Stories expire, so no likes or comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub owner_link: String,
    pub owner_username: String,
    pub post_content: Vec<String>,
    pub post_content_len: usize,
    pub post_link: String,
    /// Unix timestamp of publication
    pub posted_at: i64,
    /// Story frames have no shortcode; the numeric media id stands in
    pub shortcode: String,
}

impl Story {
    pub fn posted_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.posted_at, 0)
    }
}

impl fmt::Display for Story {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", s)
    }
}

/// A saved story collection. `post_content` keeps the first media URL of
/// every frame in the highlight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
    pub owner_link: String,
    pub owner_username: String,
    pub highlight_id: String,
    pub post_content: Vec<String>,
    pub post_content_len: usize,
    pub post_link: String,
    pub title: String,
}

impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", s)
    }
}
