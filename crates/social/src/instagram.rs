//! Instagram publisher: media containers, readiness polling, and publish.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use evently_core::social::Platform;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::SocialError;
use crate::graph::{GraphClient, MediaContainer, MediaStatus, Permalink, PublishedMedia};
use crate::{PublishOutcome, SocialPublisher};

/// Number of readiness checks before a container counts as stuck.
const MEDIA_POLL_ATTEMPTS: u32 = 10;

/// Delay before each readiness check.
const MEDIA_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// What to do when a media container is still processing after the full
/// polling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StuckMediaPolicy {
    /// Publish anyway; the platform sometimes accepts a container that
    /// has not yet reported FINISHED.
    #[default]
    AttemptAnyway,
    /// Fail the publish and leave the record unposted.
    Fail,
}

impl StuckMediaPolicy {
    /// Read the policy from `PUBLISH_STUCK_MEDIA_POLICY`, defaulting to
    /// [`StuckMediaPolicy::AttemptAnyway`].
    pub fn from_env() -> Self {
        std::env::var("PUBLISH_STUCK_MEDIA_POLICY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for StuckMediaPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "attempt" => Ok(StuckMediaPolicy::AttemptAnyway),
            "fail" => Ok(StuckMediaPolicy::Fail),
            other => Err(format!("unknown stuck-media policy: {other}")),
        }
    }
}

/// Instagram Business account credentials.
pub struct InstagramCredentials {
    pub business_id: String,
    pub access_token: String,
}

impl InstagramCredentials {
    /// Read credentials from `INSTAGRAM_BUSINESS_ID` and
    /// `INSTAGRAM_ACCESS_TOKEN`. Returns `None` when either is unset, in
    /// which case Instagram publishing is disabled.
    pub fn from_env() -> Option<Self> {
        let business_id = std::env::var("INSTAGRAM_BUSINESS_ID").ok()?;
        let access_token = std::env::var("INSTAGRAM_ACCESS_TOKEN").ok()?;
        Some(Self {
            business_id,
            access_token,
        })
    }
}

/// Publishes image posts to an Instagram Business account via the Graph
/// API content-publishing flow.
pub struct InstagramPublisher {
    graph: GraphClient,
    business_id: String,
    stuck_policy: StuckMediaPolicy,
}

impl InstagramPublisher {
    pub fn new(credentials: InstagramCredentials, stuck_policy: StuckMediaPolicy) -> Self {
        Self {
            graph: GraphClient::new(credentials.access_token),
            business_id: credentials.business_id,
            stuck_policy,
        }
    }

    /// Poll a container's `status_code` until it reports `FINISHED`.
    ///
    /// `ERROR` fails immediately; transient request failures are logged
    /// and the poll continues. A container still unfinished after
    /// [`MEDIA_POLL_ATTEMPTS`] checks is handled per the stuck policy.
    async fn wait_for_media(&self, container_id: &str) -> Result<(), SocialError> {
        for attempt in 1..=MEDIA_POLL_ATTEMPTS {
            tokio::time::sleep(MEDIA_POLL_INTERVAL).await;

            match self
                .graph
                .get_fields::<MediaStatus>(container_id, "status_code")
                .await
            {
                Ok(status) => match status.status_code.as_deref() {
                    Some("FINISHED") => return Ok(()),
                    Some("ERROR") => {
                        return Err(SocialError::MediaProcessing {
                            id: container_id.to_string(),
                        })
                    }
                    _ => {}
                },
                Err(err) => {
                    debug!(container_id, attempt, error = %err, "media status check failed");
                }
            }
        }

        match self.stuck_policy {
            StuckMediaPolicy::AttemptAnyway => {
                warn!(
                    container_id,
                    attempts = MEDIA_POLL_ATTEMPTS,
                    "media container still processing, publishing anyway"
                );
                Ok(())
            }
            StuckMediaPolicy::Fail => Err(SocialError::MediaNotReady {
                id: container_id.to_string(),
                attempts: MEDIA_POLL_ATTEMPTS,
            }),
        }
    }

    /// Create the container for a single-image post.
    async fn create_single_container(
        &self,
        image_url: &str,
        caption: &str,
    ) -> Result<String, SocialError> {
        let container: MediaContainer = self
            .graph
            .post(
                &format!("{}/media", self.business_id),
                json!({ "image_url": image_url, "caption": caption }),
            )
            .await?;
        Ok(container.id)
    }

    /// Create per-image child containers plus the parent carousel
    /// container that carries the caption.
    async fn create_carousel_container(
        &self,
        image_urls: &[String],
        caption: &str,
    ) -> Result<String, SocialError> {
        let mut children = Vec::with_capacity(image_urls.len());
        for url in image_urls {
            let child: MediaContainer = self
                .graph
                .post(
                    &format!("{}/media", self.business_id),
                    json!({ "image_url": url, "is_carousel_item": true }),
                )
                .await?;
            children.push(child.id);
        }

        let container: MediaContainer = self
            .graph
            .post(
                &format!("{}/media", self.business_id),
                json!({ "media_type": "CAROUSEL", "children": children, "caption": caption }),
            )
            .await?;
        Ok(container.id)
    }

    /// Publish a finished container and fetch its permalink best-effort.
    /// A failed permalink lookup is logged and leaves the URL unset.
    async fn publish_container(&self, container_id: &str) -> Result<PublishOutcome, SocialError> {
        let published: PublishedMedia = self
            .graph
            .post(
                &format!("{}/media_publish", self.business_id),
                json!({ "creation_id": container_id }),
            )
            .await?;

        let post_url = match self
            .graph
            .get_fields::<Permalink>(&published.id, "permalink")
            .await
        {
            Ok(response) => response.permalink,
            Err(err) => {
                warn!(media_id = %published.id, error = %err, "permalink fetch failed");
                None
            }
        };

        Ok(PublishOutcome {
            platform_post_id: published.id,
            post_url,
        })
    }
}

#[async_trait]
impl SocialPublisher for InstagramPublisher {
    fn platform(&self) -> Platform {
        Platform::Instagram
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

        let container_id = if image_urls.len() == 1 {
            self.create_single_container(&image_urls[0], caption).await?
        } else {
            self.create_carousel_container(image_urls, caption).await?
        };

        self.wait_for_media(&container_id).await?;
        self.publish_container(&container_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stuck_policy_parses_both_variants() {
        assert_eq!(
            "attempt".parse::<StuckMediaPolicy>().unwrap(),
            StuckMediaPolicy::AttemptAnyway
        );
        assert_eq!(
            "FAIL".parse::<StuckMediaPolicy>().unwrap(),
            StuckMediaPolicy::Fail
        );
        assert!("retry".parse::<StuckMediaPolicy>().is_err());
    }

    #[test]
    fn stuck_policy_defaults_to_attempt() {
        assert_eq!(StuckMediaPolicy::default(), StuckMediaPolicy::AttemptAnyway);
    }
}
