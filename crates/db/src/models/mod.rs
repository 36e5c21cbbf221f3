//! sqlx row models and create/update DTOs, one module per table.

pub mod event;
pub mod social_post;
pub mod timeline;
pub mod user;
