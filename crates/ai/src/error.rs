//! Errors from the chat-completion layer.

/// Errors raised while talking to the chat-completion API.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No API key is configured.
    #[error("no chat-completion API key configured")]
    NoApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("chat-completion API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The API answered but the completion carried no usable text.
    #[error("chat-completion response was empty")]
    EmptyResponse,

    /// The completion text could not be parsed into the expected shape.
    #[error("failed to parse completion: {0}")]
    Parse(String),
}
