//! Thin client for the Facebook Graph API.
//!
//! Both platform publishers talk to the same Graph endpoint family
//! (media containers, photo uploads, feed posts, permalink lookups)
//! using [`reqwest`]; this wraps the shared request/response plumbing.

use serde::Deserialize;

use crate::error::SocialError;

/// Default Graph API base URL.
const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com/v19.0";

/// HTTP client for one Graph API identity (one access token).
pub struct GraphClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

/// Response to a media-container creation request.
#[derive(Debug, Deserialize)]
pub struct MediaContainer {
    /// Container id, used as `creation_id` when publishing.
    pub id: String,
}

/// Processing status of a media container.
#[derive(Debug, Deserialize)]
pub struct MediaStatus {
    /// `IN_PROGRESS`, `FINISHED`, or `ERROR`.
    pub status_code: Option<String>,
}

/// Response to a `media_publish` request.
#[derive(Debug, Deserialize)]
pub struct PublishedMedia {
    pub id: String,
}

/// Permalink of a published Instagram media object.
#[derive(Debug, Deserialize)]
pub struct Permalink {
    pub permalink: Option<String>,
}

/// Response to a page photo upload.
#[derive(Debug, Deserialize)]
pub struct PhotoUpload {
    /// Photo object id (used for `attached_media`).
    pub id: String,
    /// Feed post id, present when the photo was published directly.
    pub post_id: Option<String>,
}

/// Response to a page feed post.
#[derive(Debug, Deserialize)]
pub struct FeedPost {
    pub id: String,
}

/// Permalink of a Facebook page post.
#[derive(Debug, Deserialize)]
pub struct PermalinkUrl {
    pub permalink_url: Option<String>,
}

impl GraphClient {
    /// Create a client for the given access token.
    ///
    /// The base URL defaults to the public Graph endpoint; `GRAPH_API_URL`
    /// overrides it (used by tests to point at a local stub).
    pub fn new(access_token: String) -> Self {
        let base_url =
            std::env::var("GRAPH_API_URL").unwrap_or_else(|_| DEFAULT_GRAPH_URL.to_string());
        Self::with_base_url(access_token, base_url)
    }

    /// Create a client with an explicit base URL.
    pub fn with_base_url(access_token: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    /// POST a JSON body to `{base}/{path}`, injecting the access token,
    /// and parse the JSON response.
    pub async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, SocialError> {
        let mut body = body;
        if let Some(map) = body.as_object_mut() {
            map.insert(
                "access_token".to_string(),
                serde_json::Value::String(self.access_token.clone()),
            );
        }

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// GET selected fields of a Graph object by id.
    pub async fn get_fields<T: serde::de::DeserializeOwned>(
        &self,
        object_id: &str,
        fields: &str,
    ) -> Result<T, SocialError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, object_id))
            .query(&[("fields", fields), ("access_token", &self.access_token)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`SocialError::Api`] containing the
    /// status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SocialError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SocialError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SocialError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
