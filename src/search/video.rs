//! Video records returned by a search.
//!
//! Raw items follow the YouTube Data API `search.list` shape. Every item
//! handed back to callers is normalized into [`Video`].

use serde::{Deserialize, Serialize};

// == Raw Provider Types ==
/// One item of a provider search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub id: ItemId,
    #[serde(default)]
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

// == Video ==
/// Normalized video record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub description: String,
    /// Medium resolution URL, falling back to the default resolution
    pub thumbnail: Option<String>,
    pub channel_title: String,
    pub published_at: String,
}

impl Video {
    /// Normalizes a raw item. Items without a video id yield None.
    pub fn from_item(item: SearchItem) -> Option<Self> {
        let video_id = item.id.video_id?;
        let Snippet {
            title,
            description,
            channel_title,
            published_at,
            thumbnails,
        } = item.snippet;

        let thumbnail = thumbnails
            .medium
            .or(thumbnails.default)
            .map(|thumb| thumb.url);

        Some(Self {
            video_id,
            title,
            description,
            thumbnail,
            channel_title,
            published_at,
        })
    }
}

/// Normalizes a batch of raw items, dropping the ones without a video id.
pub fn normalize(items: Vec<SearchItem>) -> Vec<Video> {
    items.into_iter().filter_map(Video::from_item).collect()
}
