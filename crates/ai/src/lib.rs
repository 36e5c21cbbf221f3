//! Chat-completion integration: caption generation with key rotation and
//! a deterministic fallback, posting-time suggestions, and the help
//! assistant.

pub mod caption;
pub mod client;
pub mod error;

pub use caption::{
    chat, fallback_caption, generate_caption, suggest_posting_time, EventBrief,
    PostingTimeSuggestion,
};
pub use client::ChatClient;
pub use error::AiError;
