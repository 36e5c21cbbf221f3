//! Publish orchestration shared by the admin endpoints and the background
//! sweep.
//!
//! Both paths resolve image URLs, call the platform adapter, and then
//! compare-and-swap the publish record to its terminal posted state. The
//! only difference between them is the timeline attribution.

use evently_core::error::CoreError;
use evently_core::social::{resolve_image_urls, Platform};
use evently_core::timeline::{ACTOR_ADMIN, ACTOR_SYSTEM};
use evently_core::types::DbId;
use evently_db::models::social_post::SocialPost;
use evently_db::repositories::SocialPostRepo;
use evently_db::DbPool;
use evently_social::{
    FacebookCredentials, FacebookPublisher, InstagramCredentials, InstagramPublisher,
    SocialError, SocialPublisher, StuckMediaPolicy,
};

use crate::error::{AppError, AppResult};

/// The configured platform adapters. A platform whose credentials are not
/// set has no adapter; publishing to it fails per-call while everything
/// else keeps working.
pub struct PublisherSet {
    instagram: Option<InstagramPublisher>,
    facebook: Option<FacebookPublisher>,
}

impl PublisherSet {
    /// Build adapters from environment credentials.
    pub fn from_env() -> Self {
        let stuck_policy = StuckMediaPolicy::from_env();

        let instagram = InstagramCredentials::from_env()
            .map(|creds| InstagramPublisher::new(creds, stuck_policy));
        if instagram.is_none() {
            tracing::warn!("Instagram credentials not configured, publishing disabled");
        }

        let facebook = FacebookCredentials::from_env().map(FacebookPublisher::new);
        if facebook.is_none() {
            tracing::warn!("Facebook credentials not configured, publishing disabled");
        }

        Self {
            instagram,
            facebook,
        }
    }

    /// Test constructor with explicit adapters.
    pub fn new(
        instagram: Option<InstagramPublisher>,
        facebook: Option<FacebookPublisher>,
    ) -> Self {
        Self {
            instagram,
            facebook,
        }
    }

    /// Look up the adapter for a platform.
    pub fn get(&self, platform: Platform) -> Option<&dyn SocialPublisher> {
        match platform {
            Platform::Instagram => self.instagram.as_ref().map(|p| p as &dyn SocialPublisher),
            Platform::Facebook => self.facebook.as_ref().map(|p| p as &dyn SocialPublisher),
        }
    }
}

/// Who initiated a publish. Decides the timeline attribution: admin
/// endpoints record `POSTED`/`POSTED_FB` by ADMIN, the sweep records
/// `AUTO_POST_IG`/`AUTO_POST_FB` by SYSTEM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishTrigger {
    Manual,
    Sweep,
}

impl PublishTrigger {
    fn action(self, platform: Platform) -> &'static str {
        match self {
            PublishTrigger::Manual => platform.posted_action(),
            PublishTrigger::Sweep => platform.auto_post_action(),
        }
    }

    fn actor(self) -> &'static str {
        match self {
            PublishTrigger::Manual => ACTOR_ADMIN,
            PublishTrigger::Sweep => ACTOR_SYSTEM,
        }
    }
}

/// Pick the caption for a publish: explicit override, then the stored
/// per-platform content, then the event details. Empty strings count as
/// absent.
pub fn resolve_caption(
    override_caption: Option<&str>,
    stored_content: &str,
    details: &str,
) -> Option<String> {
    [override_caption.unwrap_or(""), stored_content, details]
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Publish an event's images to one platform and record the result.
///
/// On success the publish record is CAS-marked posted with the platform's
/// post URL and a timeline entry attributed per `trigger`. Losing the CAS
/// (another writer published first) is a 409 Conflict; the remote post is
/// left as-is and the record unchanged.
pub async fn publish_post(
    pool: &DbPool,
    publishers: &PublisherSet,
    public_url: Option<&str>,
    event_id: DbId,
    platform: Platform,
    images: &[String],
    caption: &str,
    trigger: PublishTrigger,
) -> AppResult<SocialPost> {
    if images.is_empty() {
        return Err(AppError::BadRequest("At least one image required".into()));
    }
    let image_urls = resolve_image_urls(images, public_url)?;

    let publisher = publishers.get(platform).ok_or(AppError::Social(
        SocialError::CredentialsMissing {
            platform: platform.display_name(),
        },
    ))?;

    let outcome = publisher.publish(&image_urls, caption).await?;
    tracing::info!(
        event_id,
        platform = %platform,
        post_id = %outcome.platform_post_id,
        "Published to platform"
    );

    SocialPostRepo::mark_posted(
        pool,
        event_id,
        platform,
        outcome.post_url.as_deref(),
        trigger.action(platform),
        trigger.actor(),
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::Conflict("Event already published".into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_prefers_override_then_stored_then_details() {
        assert_eq!(
            resolve_caption(Some("override"), "stored", "details").as_deref(),
            Some("override")
        );
        assert_eq!(
            resolve_caption(None, "stored", "details").as_deref(),
            Some("stored")
        );
        assert_eq!(
            resolve_caption(None, "", "details").as_deref(),
            Some("details")
        );
        assert_eq!(resolve_caption(Some("  "), " ", ""), None);
    }

    #[test]
    fn trigger_attribution_matches_platform() {
        assert_eq!(
            PublishTrigger::Manual.action(Platform::Instagram),
            "POSTED"
        );
        assert_eq!(
            PublishTrigger::Sweep.action(Platform::Facebook),
            "AUTO_POST_FB"
        );
        assert_eq!(PublishTrigger::Manual.actor(), "ADMIN");
        assert_eq!(PublishTrigger::Sweep.actor(), "SYSTEM");
    }
}
