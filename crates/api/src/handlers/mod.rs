//! HTTP request handlers, one module per resource.

pub mod ai;
pub mod approval;
pub mod auth;
pub mod chat;
pub mod events;
pub mod social;
pub mod users;
