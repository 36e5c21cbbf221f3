//! Social-publishing domain types.
//!
//! Each event carries one publish record per platform; the two platforms are
//! independent state machines sharing the parent event. `posted = true` is a
//! terminal state enforced with a conditional update at the storage layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Platforms allow at most this many images in a single post.
pub const MAX_IMAGES_PER_POST: usize = 10;

/// Upper bound on images attached to an event at creation.
pub const MAX_EVENT_IMAGES: usize = 50;

/// A supported social-media platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
}

impl Platform {
    /// The stored/URL text form (`instagram` / `facebook`).
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
        }
    }

    /// Human-readable name for error messages and email copy.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
        }
    }

    /// Timeline action recorded for an admin-triggered publish.
    pub fn posted_action(self) -> &'static str {
        match self {
            Platform::Instagram => "POSTED",
            Platform::Facebook => "POSTED_FB",
        }
    }

    /// Timeline action recorded when a post is scheduled.
    pub fn scheduled_action(self) -> &'static str {
        match self {
            Platform::Instagram => "SCHEDULED",
            Platform::Facebook => "SCHEDULED_FB",
        }
    }

    /// Timeline action recorded for a sweep-triggered (system) publish.
    pub fn auto_post_action(self) -> &'static str {
        match self {
            Platform::Instagram => "AUTO_POST_IG",
            Platform::Facebook => "AUTO_POST_FB",
        }
    }

    /// Both platforms, in the order the sweep processes them.
    pub fn all() -> [Platform; 2] {
        [Platform::Instagram, Platform::Facebook]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instagram" => Ok(Platform::Instagram),
            "facebook" => Ok(Platform::Facebook),
            other => Err(CoreError::Validation(format!(
                "Unknown platform: {other}"
            ))),
        }
    }
}

/// Publish status of one platform record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Posted,
    Failed,
}

impl PostStatus {
    /// The stored text form (matches the database column values).
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::Scheduled => "SCHEDULED",
            PostStatus::Posted => "POSTED",
            PostStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(PostStatus::Draft),
            "SCHEDULED" => Ok(PostStatus::Scheduled),
            "POSTED" => Ok(PostStatus::Posted),
            "FAILED" => Ok(PostStatus::Failed),
            other => Err(CoreError::Internal(format!("Unknown post status: {other}"))),
        }
    }
}

/// Resolve stored image references into absolute URLs, capped at
/// [`MAX_IMAGES_PER_POST`].
///
/// Stored images are either absolute URLs (uploaded to external storage) or
/// server-relative paths like `/uploads/x.jpg`. Relative paths need the
/// public base URL to be reachable by the Graph API; when it is not
/// configured the resolution fails rather than producing a URL the platform
/// cannot fetch.
pub fn resolve_image_urls(
    images: &[String],
    public_url: Option<&str>,
) -> Result<Vec<String>, CoreError> {
    images
        .iter()
        .take(MAX_IMAGES_PER_POST)
        .map(|img| {
            if img.starts_with("http") {
                Ok(img.clone())
            } else {
                match public_url {
                    Some(base) => Ok(format!("{}{}", base.trim_end_matches('/'), img)),
                    None => Err(CoreError::Internal(
                        "PUBLIC_URL is not configured but event has relative image paths".into(),
                    )),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_round_trips_through_text() {
        assert_eq!("instagram".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!("facebook".parse::<Platform>().unwrap(), Platform::Facebook);
        assert!("twitter".parse::<Platform>().is_err());
    }

    #[test]
    fn timeline_actions_are_platform_specific() {
        assert_eq!(Platform::Instagram.auto_post_action(), "AUTO_POST_IG");
        assert_eq!(Platform::Facebook.auto_post_action(), "AUTO_POST_FB");
        assert_eq!(Platform::Instagram.posted_action(), "POSTED");
        assert_eq!(Platform::Facebook.posted_action(), "POSTED_FB");
    }

    #[test]
    fn resolve_prefixes_relative_paths() {
        let images = vec![
            "https://cdn.example.com/a.jpg".to_string(),
            "/uploads/b.jpg".to_string(),
        ];
        let resolved = resolve_image_urls(&images, Some("https://example.edu/")).unwrap();
        assert_eq!(
            resolved,
            vec![
                "https://cdn.example.com/a.jpg".to_string(),
                "https://example.edu/uploads/b.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn resolve_caps_at_platform_maximum() {
        let images: Vec<String> = (0..15).map(|i| format!("https://x.test/{i}.jpg")).collect();
        let resolved = resolve_image_urls(&images, None).unwrap();
        assert_eq!(resolved.len(), MAX_IMAGES_PER_POST);
    }

    #[test]
    fn resolve_fails_for_relative_paths_without_base_url() {
        let images = vec!["/uploads/c.jpg".to_string()];
        assert!(resolve_image_urls(&images, None).is_err());
    }
}
