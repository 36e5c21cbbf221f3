//! Shared domain types for the evently platform.
//!
//! Pure types and logic only -- no I/O, no database access. Everything here
//! is consumed by the `evently-db`, `evently-social`, and `evently-api`
//! crates.

pub mod approval;
pub mod error;
pub mod roles;
pub mod social;
pub mod timeline;
pub mod types;
