//! Repositories: one struct of associated query functions per table.

pub mod event_repo;
pub mod social_post_repo;
pub mod timeline_repo;
pub mod user_repo;

pub use event_repo::EventRepo;
pub use social_post_repo::SocialPostRepo;
pub use timeline_repo::TimelineRepo;
pub use user_repo::UserRepo;
