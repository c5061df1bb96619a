//! Image board request and response types.
//!
//! These model the Moebooru JSON endpoints (`tag.json`, `post.json`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::preview::Size;

/// Category of a tag as reported by the tag index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TagType {
    #[default]
    General,
    Artist,
    Copyright,
    Character,
    Circle,
    Faults,
    /// A code this client does not know about.
    Unknown(i64),
}

impl From<i64> for TagType {
    fn from(code: i64) -> Self {
        match code {
            0 => TagType::General,
            1 => TagType::Artist,
            3 => TagType::Copyright,
            4 => TagType::Character,
            5 => TagType::Circle,
            6 => TagType::Faults,
            other => TagType::Unknown(other),
        }
    }
}

impl From<TagType> for i64 {
    fn from(tag_type: TagType) -> Self {
        match tag_type {
            TagType::General => 0,
            TagType::Artist => 1,
            TagType::Copyright => 3,
            TagType::Character => 4,
            TagType::Circle => 5,
            TagType::Faults => 6,
            TagType::Unknown(code) => code,
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TagType::General => "general",
            TagType::Artist => "artist",
            TagType::Copyright => "copyright",
            TagType::Character => "character",
            TagType::Circle => "circle",
            TagType::Faults => "faults",
            TagType::Unknown(_) => "unknown",
        };
        f.write_str(label)
    }
}

/// A tag suggestion.
///
/// Returned by `GET /tag.json?name=..`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag id, absent in some mirrors.
    #[serde(default)]
    pub id: Option<u64>,
    /// The tag text itself.
    pub name: String,
    /// The tag category.
    #[serde(rename = "type", default)]
    pub tag_type: TagType,
    /// Number of posts carrying the tag.
    #[serde(default)]
    pub count: u64,
}

#[cfg(test)]
impl Tag {
    pub fn new(name: impl Into<String>, tag_type: TagType, count: u64) -> Self {
        Self {
            id: None,
            name: name.into(),
            tag_type,
            count,
        }
    }
}

/// Content rating of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Rating {
    #[serde(rename = "s")]
    Safe,
    #[serde(rename = "q")]
    Questionable,
    #[serde(rename = "e")]
    Explicit,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Rating {
    /// Single-letter label shown in the result list.
    pub fn short(&self) -> &'static str {
        match self {
            Rating::Safe => "s",
            Rating::Questionable => "q",
            Rating::Explicit => "e",
            Rating::Unknown => "?",
        }
    }
}

/// A post from a search result.
///
/// Returned by `GET /post.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// The post id.
    pub id: u64,
    /// Space-separated tag string.
    #[serde(default)]
    pub tags: String,
    /// Vote score.
    #[serde(default)]
    pub score: i64,
    /// Content rating.
    #[serde(default)]
    pub rating: Rating,
    /// Original width in pixels.
    #[serde(default)]
    pub width: u32,
    /// Original height in pixels.
    #[serde(default)]
    pub height: u32,
    /// URL of the original file.
    #[serde(default)]
    pub file_url: Option<String>,
    /// URL of the downsized sample image.
    #[serde(default)]
    pub sample_url: Option<String>,
    /// Sample width in pixels.
    #[serde(default)]
    pub sample_width: Option<u32>,
    /// Sample height in pixels.
    #[serde(default)]
    pub sample_height: Option<u32>,
    /// URL of the thumbnail.
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl Post {
    /// Iterate over the post's tags.
    pub fn tag_list(&self) -> impl Iterator<Item = &str> {
        self.tags.split_whitespace()
    }

    /// Intrinsic size of the sample image, if the board reported one.
    pub fn sample_size(&self) -> Option<Size> {
        match (self.sample_width, self.sample_height) {
            (Some(w), Some(h)) => Some(Size::from_pixels(w, h)),
            _ => None,
        }
    }

    /// The URL to download for preview: the sample, falling back to the file.
    pub fn preview_source(&self) -> Option<&str> {
        self.sample_url
            .as_deref()
            .or(self.file_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_deserialize() {
        let json = r#"{"id":7,"name":"cat_ears","count":12345,"type":0,"ambiguous":false}"#;
        let tag: Tag = serde_json::from_str(json).unwrap();
        assert_eq!(tag.id, Some(7));
        assert_eq!(tag.name, "cat_ears");
        assert_eq!(tag.tag_type, TagType::General);
        assert_eq!(tag.count, 12345);
    }

    #[test]
    fn test_tag_type_codes() {
        assert_eq!(TagType::from(1), TagType::Artist);
        assert_eq!(TagType::from(3), TagType::Copyright);
        assert_eq!(TagType::from(4), TagType::Character);
        assert_eq!(TagType::from(5), TagType::Circle);
        assert_eq!(TagType::from(6), TagType::Faults);
        assert_eq!(TagType::from(2), TagType::Unknown(2));
    }

    #[test]
    fn test_tag_type_roundtrips_unknown_code() {
        let json = serde_json::to_string(&TagType::Unknown(9)).unwrap();
        assert_eq!(json, "9");
    }

    #[test]
    fn test_tag_list_deserialize() {
        let json = r#"[
            {"name":"cat","count":10,"type":0},
            {"name":"catherine","count":3,"type":4}
        ]"#;
        let tags: Vec<Tag> = serde_json::from_str(json).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].tag_type, TagType::Character);
        assert_eq!(tags[1].id, None);
    }

    #[test]
    fn test_post_deserialize() {
        let json = r#"{
            "id": 1001,
            "tags": "cat_ears  tail",
            "score": 42,
            "rating": "s",
            "width": 3000,
            "height": 2000,
            "file_url": "https://files.example/1001.png",
            "sample_url": "https://files.example/sample-1001.jpg",
            "sample_width": 1500,
            "sample_height": 1000,
            "preview_url": "https://files.example/preview-1001.jpg",
            "md5": "abc"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 1001);
        assert_eq!(post.rating, Rating::Safe);
        assert_eq!(post.tag_list().collect::<Vec<_>>(), vec!["cat_ears", "tail"]);
        assert_eq!(post.sample_size(), Some(Size::new(1500.0, 1000.0)));
        assert_eq!(
            post.preview_source(),
            Some("https://files.example/sample-1001.jpg")
        );
    }

    #[test]
    fn test_post_minimal_fields() {
        let post: Post = serde_json::from_str(r#"{"id": 5, "rating": "x"}"#).unwrap();
        assert_eq!(post.rating, Rating::Unknown);
        assert!(post.sample_size().is_none());
        assert!(post.preview_source().is_none());
    }

    #[test]
    fn test_preview_source_falls_back_to_file() {
        let post: Post =
            serde_json::from_str(r#"{"id": 5, "file_url": "https://f/x.png", "sample_url": null}"#)
                .unwrap();
        assert_eq!(post.preview_source(), Some("https://f/x.png"));
    }

    #[test]
    fn test_tag_type_display() {
        assert_eq!(TagType::Artist.to_string(), "artist");
        assert_eq!(Rating::Explicit.short(), "e");
    }
}
