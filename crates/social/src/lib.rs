//! Social-platform publish adapters.
//!
//! Each platform implements [`SocialPublisher`] over the shared
//! [`graph::GraphClient`]. Publishers are constructed once at startup from
//! environment credentials; an unconfigured platform simply has no
//! publisher registered.

pub mod error;
pub mod facebook;
pub mod graph;
pub mod instagram;

use async_trait::async_trait;
use evently_core::social::Platform;

pub use error::SocialError;
pub use facebook::{FacebookCredentials, FacebookPublisher};
pub use instagram::{InstagramCredentials, InstagramPublisher, StuckMediaPolicy};

/// Result of a successful publish.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// Platform-assigned id of the created post.
    pub platform_post_id: String,
    /// Public URL of the post, when the platform reported one.
    pub post_url: Option<String>,
}

/// A platform adapter that can publish an image post with a caption.
#[async_trait]
pub trait SocialPublisher: Send + Sync {
    /// Which platform this adapter publishes to.
    fn platform(&self) -> Platform;

    /// Publish the given absolute image URLs with the caption.
    ///
    /// Fails before any network call when `image_urls` is empty or longer
    /// than [`evently_core::social::MAX_IMAGES_PER_POST`].
    async fn publish(
        &self,
        image_urls: &[String],
        caption: &str,
    ) -> Result<PublishOutcome, SocialError>;
}
