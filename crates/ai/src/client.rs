//! Chat-completion HTTP client with API-key rotation.
//!
//! Keys come from `OPENAI_API_KEYS` (comma-separated) or the single
//! `OPENAI_API_KEY`. Rotation spreads rate-limit pressure across keys:
//! one-shot calls pick a random key, and the retrying variant tries every
//! key in a shuffled order with a short delay between attempts.

use std::time::Duration;

use rand::seq::{IndexedRandom, SliceRandom};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::AiError;

/// Default chat-completion endpoint base.
const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Model used for every completion.
const MODEL: &str = "gpt-4o-mini";

/// Delay between attempts with different keys.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Chat-completion client holding the configured key pool.
pub struct ChatClient {
    client: reqwest::Client,
    api_url: String,
    keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl ChatClient {
    /// Build the client from the environment.
    ///
    /// | Variable          | Meaning                                  |
    /// |-------------------|------------------------------------------|
    /// | `OPENAI_API_KEYS` | Comma-separated key pool (preferred)     |
    /// | `OPENAI_API_KEY`  | Single key, used when the pool is empty  |
    /// | `OPENAI_API_URL`  | Endpoint base override (tests)           |
    ///
    /// An empty pool is allowed; calls then fail with
    /// [`AiError::NoApiKey`] and callers with a fallback use it.
    pub fn from_env() -> Self {
        let mut keys: Vec<String> = std::env::var("OPENAI_API_KEYS")
            .map(|raw| {
                raw.split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if keys.is_empty() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                if !key.trim().is_empty() {
                    keys.push(key.trim().to_string());
                }
            }
        }

        let api_url =
            std::env::var("OPENAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            keys,
        }
    }

    /// Whether at least one key is configured.
    pub fn is_configured(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Run one completion with a random key, no retry.
    pub async fn complete_once(
        &self,
        system: &str,
        user: &str,
        temperature: f64,
        json_mode: bool,
    ) -> Result<String, AiError> {
        let key = self
            .keys
            .choose(&mut rand::rng())
            .ok_or(AiError::NoApiKey)?;
        self.request(key, system, user, temperature, json_mode).await
    }

    /// Run a completion, trying every configured key in a shuffled order
    /// with a short delay between attempts. Returns the first success or
    /// the last failure.
    pub async fn complete_with_rotation(
        &self,
        system: &str,
        user: &str,
        temperature: f64,
    ) -> Result<String, AiError> {
        if self.keys.is_empty() {
            return Err(AiError::NoApiKey);
        }

        let mut keys = self.keys.clone();
        keys.shuffle(&mut rand::rng());
        let attempts = keys.len();

        let mut last_err = AiError::NoApiKey;
        for (i, key) in keys.iter().enumerate() {
            debug!(attempt = i + 1, attempts, "requesting completion");
            match self.request(key, system, user, temperature, false).await {
                Ok(text) => return Ok(text),
                Err(err) => {
                    warn!(attempt = i + 1, attempts, error = %err, "completion attempt failed");
                    last_err = err;
                    if i + 1 < attempts {
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        }
        Err(last_err)
    }

    async fn request(
        &self,
        api_key: &str,
        system: &str,
        user: &str,
        temperature: f64,
        json_mode: bool,
    ) -> Result<String, AiError> {
        let mut body = serde_json::json!({
            "model": MODEL,
            "temperature": temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });
        if json_mode {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}
