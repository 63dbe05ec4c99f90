//! Data models shared by the source adapters and the page renderer.
//!
//! - [`VideoRecord`]: one trending video, built from a listing API item
//! - [`NewsItem`]: one headline from the news feed
//! - [`PageContext`]: everything the renderer needs for a single page
//!
//! Records live for one run only. They carry no identity beyond the source
//! video id and are dropped once the page has been rendered.

use chrono::{DateTime, Local};

/// Watch/embed URL prefixes used by the video platform.
const EMBED_URL_PREFIX: &str = "https://www.youtube.com/embed/";
const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// A trending video ready to be rendered as a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    /// Video title; empty when the snippet omits it.
    pub title: String,
    /// Name of the uploading channel.
    pub channel: Option<String>,
    /// View count. `None` means "unknown", which is not the same as zero.
    pub views: Option<u64>,
    /// URL that plays the video inside an inline frame.
    pub embed_url: String,
    /// URL of the video's watch page.
    pub watch_url: String,
}

impl VideoRecord {
    /// Build a record, deriving both URLs from the video id.
    pub fn new(video_id: &str, title: String, channel: Option<String>, views: Option<u64>) -> Self {
        Self {
            title,
            channel,
            views,
            embed_url: format!("{EMBED_URL_PREFIX}{video_id}"),
            watch_url: format!("{WATCH_URL_PREFIX}{video_id}"),
        }
    }
}

/// A single headline from the news feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
}

impl NewsItem {
    /// True when the feed entry carried neither a title nor a link.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.link.trim().is_empty()
    }
}

/// Input of [`crate::outputs::html::render_page`].
#[derive(Debug)]
pub struct PageContext {
    pub videos: Vec<VideoRecord>,
    pub news: Vec<NewsItem>,
    /// Wall-clock time the page was generated, shown in the header.
    pub generated_at: DateTime<Local>,
}
