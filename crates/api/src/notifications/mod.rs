//! Outbound notifications (SMTP email).

pub mod mailer;

pub use mailer::{EmailConfig, EmailError, Mailer};
