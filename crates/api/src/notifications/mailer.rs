//! Approval-workflow email delivery via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer is constructed,
//! in which case notifications are skipped (the workflow itself never
//! depends on email succeeding).

use evently_db::models::event::Event;
use rand::seq::IndexedRandom;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "Event Automation System <noreply@evently.local>";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" mailbox.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                                        |
    /// |-----------------|----------|------------------------------------------------|
    /// | `SMTP_HOST`     | yes      | —                                              |
    /// | `SMTP_PORT`     | no       | `587`                                          |
    /// | `SMTP_FROM`     | no       | `Event Automation System <noreply@evently.local>` |
    /// | `SMTP_USER`     | no       | —                                              |
    /// | `SMTP_PASSWORD` | no       | —                                              |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Social-media tips appended to approval notices, one picked at random.
const PRO_TIPS: [&str; 10] = [
    "Schedule your social media posts at least 48 hours before the event for maximum reach.",
    "Use high-quality images (1080x1080) for better engagement on Instagram.",
    "Include a clear Call to Action (CTA) in your caption to drive registrations.",
    "Tag relevant speakers and partners in your post to expand your reach.",
    "Use 3-5 relevant hashtags to make your post discoverable.",
    "Post during peak hours (10 AM - 1 PM) for higher visibility.",
    "Engage with comments within the first hour of posting to boost the algorithm.",
    "Cross-promote your event on LinkedIn and Twitter for a professional audience.",
    "Create a sense of urgency by mentioning 'Limited Seats' or registration deadlines.",
    "Share behind-the-scenes content in Stories to build anticipation.",
];

/// Sends approval-workflow notification emails via SMTP.
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Ask the HOD to review an event. `review_url` is the public
    /// approval page for this event.
    pub async fn send_approval_request(
        &self,
        to_email: &str,
        event: &Event,
        review_url: &str,
    ) -> Result<(), EmailError> {
        let subject = format!("Approval Required: {}", event.title);
        let body = format!(
            "<h2>Event Approval Required</h2>\
             <p>A new event has been submitted and requires your approval.</p>\
             {}\
             <p><a href=\"{review_url}\">Review &amp; Approve Details</a></p>\
             <p style=\"color:#888;font-size:12px\">This is an automated notification \
             from the Event Automation System.</p>",
            event_summary_html(event),
        );
        self.deliver(to_email, &subject, &body).await
    }

    /// Tell the admin their event was approved. `publish_url` carries the
    /// magic-link token so the emailed button lands signed in.
    pub async fn send_approved_notice(
        &self,
        to_email: &str,
        event: &Event,
        publish_url: &str,
    ) -> Result<(), EmailError> {
        let tip = PRO_TIPS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(PRO_TIPS[0]);

        let subject = format!("✅ Event Approved: {}", event.title);
        let body = format!(
            "<h2>Event Approved!</h2>\
             <p><strong>Great news!</strong> Your event has been reviewed and approved by \
             the HOD. You can now publish it on social media.</p>\
             {}\
             <p><a href=\"{publish_url}\">📣 Publish to Social Media</a></p>\
             <p>💡 <strong>Pro Tip:</strong> {tip}</p>",
            event_summary_html(event),
        );
        self.deliver(to_email, &subject, &body).await
    }

    /// Tell the admin their event was rejected, quoting the reason.
    pub async fn send_rejected_notice(
        &self,
        to_email: &str,
        event: &Event,
        reason: &str,
    ) -> Result<(), EmailError> {
        let subject = format!("❌ Event Rejected: {}", event.title);
        let body = format!(
            "<h2>Event Rejected</h2>\
             <p><strong>Reason for rejection:</strong> \"{reason}\"</p>\
             {}",
            event_summary_html(event),
        );
        self.deliver(to_email, &subject, &body).await
    }

    /// Send a password-reset link.
    pub async fn send_password_reset(
        &self,
        to_email: &str,
        reset_url: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            "<p>You requested a password reset.</p>\
             <p>Click the link below to reset your password:</p>\
             <p><a href=\"{reset_url}\">{reset_url}</a></p>\
             <p>This link expires in 5 minutes. If you did not request this, \
             please ignore this email.</p>"
        );
        self.deliver(to_email, "Password Reset Request", &body).await
    }

    async fn deliver(&self, to_email: &str, subject: &str, html: &str) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, subject, "Notification email sent");
        Ok(())
    }
}

fn event_summary_html(event: &Event) -> String {
    format!(
        "<ul>\
         <li><strong>Event:</strong> {}</li>\
         <li><strong>Department:</strong> {}</li>\
         <li><strong>Date:</strong> {}</li>\
         </ul>",
        event.title,
        event.department,
        event.event_date.format("%a, %b %d, %Y"),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        // Ensure SMTP_HOST is not set in the test environment.
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn email_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = EmailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}
