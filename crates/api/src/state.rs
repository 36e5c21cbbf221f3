use std::sync::Arc;

use evently_ai::ChatClient;

use crate::config::ServerConfig;
use crate::notifications::Mailer;
use crate::publish::PublisherSet;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: evently_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Social-platform publish adapters.
    pub publishers: Arc<PublisherSet>,
    /// Chat-completion client for captions and the assistant.
    pub ai: Arc<ChatClient>,
    /// SMTP mailer; `None` when SMTP is not configured (emails skipped).
    pub mailer: Option<Arc<Mailer>>,
}
