//! Facebook Page publisher: single photos and multi-photo feed posts.

use async_trait::async_trait;
use evently_core::social::Platform;
use serde_json::json;
use tracing::warn;

use crate::error::SocialError;
use crate::graph::{FeedPost, GraphClient, PermalinkUrl, PhotoUpload};
use crate::{PublishOutcome, SocialPublisher};

/// Facebook Page credentials.
pub struct FacebookCredentials {
    pub page_id: String,
    pub access_token: String,
}

impl FacebookCredentials {
    /// Read credentials from `FACEBOOK_PAGE_ID` and
    /// `FACEBOOK_PAGE_ACCESS_TOKEN` (falling back to
    /// `FACEBOOK_ACCESS_TOKEN`). Returns `None` when the page id or both
    /// token variables are unset, in which case Facebook publishing is
    /// disabled.
    pub fn from_env() -> Option<Self> {
        let page_id = std::env::var("FACEBOOK_PAGE_ID").ok()?;
        let access_token = std::env::var("FACEBOOK_PAGE_ACCESS_TOKEN")
            .or_else(|_| std::env::var("FACEBOOK_ACCESS_TOKEN"))
            .ok()?;
        Some(Self {
            page_id,
            access_token,
        })
    }
}

/// Publishes image posts to a Facebook Page via the Graph API.
///
/// A single image goes straight to the `photos` edge. Multiple images are
/// uploaded unpublished, then attached to one feed post.
pub struct FacebookPublisher {
    graph: GraphClient,
    page_id: String,
}

impl FacebookPublisher {
    pub fn new(credentials: FacebookCredentials) -> Self {
        Self {
            graph: GraphClient::new(credentials.access_token),
            page_id: credentials.page_id,
        }
    }

    /// Fetch the post's permalink, falling back to the canonical
    /// `facebook.com/{id}` form when the lookup fails or returns nothing.
    async fn permalink_or_fallback(&self, post_id: &str) -> String {
        let fallback = format!("https://www.facebook.com/{post_id}");
        match self
            .graph
            .get_fields::<PermalinkUrl>(post_id, "permalink_url")
            .await
        {
            Ok(response) => response.permalink_url.unwrap_or(fallback),
            Err(err) => {
                warn!(post_id, error = %err, "permalink fetch failed");
                fallback
            }
        }
    }

    async fn publish_single(&self, image_url: &str, caption: &str) -> Result<PublishOutcome, SocialError> {
        let photo: PhotoUpload = self
            .graph
            .post(
                &format!("{}/photos", self.page_id),
                json!({ "url": image_url, "message": caption }),
            )
            .await?;

        // A published page photo carries the id of the feed story it created.
        let post_id = photo.post_id.unwrap_or_else(|| photo.id.clone());
        let post_url = self.permalink_or_fallback(&post_id).await;

        Ok(PublishOutcome {
            platform_post_id: post_id,
            post_url: Some(post_url),
        })
    }

    async fn publish_album(
        &self,
        image_urls: &[String],
        caption: &str,
    ) -> Result<PublishOutcome, SocialError> {
        let mut attached_media = Vec::with_capacity(image_urls.len());
        for url in image_urls {
            let photo: PhotoUpload = self
                .graph
                .post(
                    &format!("{}/photos", self.page_id),
                    json!({ "url": url, "published": false }),
                )
                .await?;
            attached_media.push(json!({ "media_fbid": photo.id }));
        }

        let post: FeedPost = self
            .graph
            .post(
                &format!("{}/feed", self.page_id),
                json!({ "message": caption, "attached_media": attached_media }),
            )
            .await?;

        let post_url = self.permalink_or_fallback(&post.id).await;

        Ok(PublishOutcome {
            platform_post_id: post.id,
            post_url: Some(post_url),
        })
    }
}

#[async_trait]
impl SocialPublisher for FacebookPublisher {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    async fn publish(
        &self,
        image_urls: &[String],
        caption: &str,
    ) -> Result<PublishOutcome, SocialError> {
        if image_urls.is_empty() {
            return Err(SocialError::NoImages);
        }
        if image_urls.len() > evently_core::social::MAX_IMAGES_PER_POST {
            return Err(SocialError::TooManyImages {
                count: image_urls.len(),
            });
        }

        if image_urls.len() == 1 {
            self.publish_single(&image_urls[0], caption).await
        } else {
            self.publish_album(image_urls, caption).await
        }
    }
}
