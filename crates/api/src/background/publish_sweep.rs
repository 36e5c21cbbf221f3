//! Background publish sweep: posts scheduled content whose time has come.
//!
//! Every minute the sweep queries due publish records per platform
//! (scheduled, unposted, past their scheduled time) and publishes them
//! sequentially. Failures are recorded and logged but leave the record
//! scheduled, so the next tick retries. Runs until cancelled.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use evently_core::social::Platform;
use evently_core::types::{DbId, Timestamp};
use evently_db::repositories::SocialPostRepo;
use evently_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::publish::{publish_post, resolve_caption, PublishTrigger, PublisherSet};

/// How often the sweep checks for due posts.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// The result of one publish attempt during a sweep.
#[derive(Debug)]
pub enum SweepOutcome {
    /// The post went out and the record is now terminal.
    Published {
        event_id: DbId,
        platform: Platform,
        post_url: Option<String>,
    },
    /// The attempt failed; the record stays scheduled and is retried on
    /// the next tick.
    Failed {
        event_id: DbId,
        platform: Platform,
        error: String,
    },
}

/// Everything one sweep tick did, collected before any logging happens.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub outcomes: Vec<SweepOutcome>,
}

impl SweepReport {
    pub fn published(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SweepOutcome::Published { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.published()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Emit the report to the log, one line per outcome plus a summary.
    fn log(&self) {
        for outcome in &self.outcomes {
            match outcome {
                SweepOutcome::Published {
                    event_id,
                    platform,
                    post_url,
                } => {
                    tracing::info!(
                        event_id,
                        platform = %platform,
                        post_url = post_url.as_deref().unwrap_or(""),
                        "Sweep published scheduled post"
                    );
                }
                SweepOutcome::Failed {
                    event_id,
                    platform,
                    error,
                } => {
                    tracing::error!(
                        event_id,
                        platform = %platform,
                        error,
                        "Sweep publish failed, will retry next tick"
                    );
                }
            }
        }
        tracing::info!(
            published = self.published(),
            failed = self.failed(),
            "Publish sweep tick complete"
        );
    }
}

/// The scheduled-post publisher task.
pub struct PublishSweep {
    pool: DbPool,
    publishers: Arc<PublisherSet>,
    public_url: Option<String>,
}

impl PublishSweep {
    pub fn new(pool: DbPool, publishers: Arc<PublisherSet>, public_url: Option<String>) -> Self {
        Self {
            pool,
            publishers,
            public_url,
        }
    }

    /// Run the sweep loop until `cancel` is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = SWEEP_INTERVAL.as_secs(),
            "Publish sweep started"
        );

        let mut interval = tokio::time::interval(SWEEP_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Publish sweep stopping");
                    break;
                }
                _ = interval.tick() => {
                    let report = self.run_once(Utc::now()).await;
                    if !report.is_empty() {
                        report.log();
                    }
                }
            }
        }
    }

    /// One sweep pass over both platforms at the given instant.
    pub async fn run_once(&self, now: Timestamp) -> SweepReport {
        let mut report = SweepReport::default();

        for platform in Platform::all() {
            let due = match SocialPostRepo::list_due(&self.pool, platform, now).await {
                Ok(due) => due,
                Err(err) => {
                    tracing::error!(platform = %platform, error = %err, "Due-post query failed");
                    continue;
                }
            };

            for post in due {
                let outcome = self.publish_one(&post, platform).await;
                report.outcomes.push(outcome);
            }
        }

        report
    }

    async fn publish_one(
        &self,
        due: &evently_db::models::social_post::DuePost,
        platform: Platform,
    ) -> SweepOutcome {
        let Some(caption) = resolve_caption(None, &due.content, &due.details) else {
            return SweepOutcome::Failed {
                event_id: due.event_id,
                platform,
                error: "no caption available (content and details both empty)".to_string(),
            };
        };

        match publish_post(
            &self.pool,
            &self.publishers,
            self.public_url.as_deref(),
            due.event_id,
            platform,
            &due.images,
            &caption,
            PublishTrigger::Sweep,
        )
        .await
        {
            Ok(post) => SweepOutcome::Published {
                event_id: due.event_id,
                platform,
                post_url: post.post_url,
            },
            Err(err) => SweepOutcome::Failed {
                event_id: due.event_id,
                platform,
                error: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_by_outcome() {
        let report = SweepReport {
            outcomes: vec![
                SweepOutcome::Published {
                    event_id: 1,
                    platform: Platform::Instagram,
                    post_url: Some("https://instagram.com/p/x".into()),
                },
                SweepOutcome::Failed {
                    event_id: 2,
                    platform: Platform::Facebook,
                    error: "boom".into(),
                },
                SweepOutcome::Published {
                    event_id: 3,
                    platform: Platform::Facebook,
                    post_url: None,
                },
            ],
        };

        assert_eq!(report.published(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_empty());
        assert!(SweepReport::default().is_empty());
    }
}
