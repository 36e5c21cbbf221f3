//! Errors from the social-publishing layer.

/// Errors raised while publishing to a social platform.
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// The platform's credentials are not configured.
    #[error("{platform} credentials missing")]
    CredentialsMissing {
        /// Human-readable platform name.
        platform: &'static str,
    },

    /// The caller supplied no images to publish.
    #[error("no images provided")]
    NoImages,

    /// The caller supplied more images than a single post allows.
    #[error("too many images for one post: {count}")]
    TooManyImages { count: usize },

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The Graph API returned a non-2xx status code.
    #[error("Graph API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The platform reported the media container as failed.
    #[error("media container {id} failed processing")]
    MediaProcessing { id: String },

    /// The media container never reached the ready state within the
    /// polling window, and the stuck-media policy forbids publishing it.
    #[error("media container {id} not ready after {attempts} status checks")]
    MediaNotReady { id: String, attempts: u32 },
}
