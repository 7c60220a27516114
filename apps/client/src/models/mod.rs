//! Plain records shared by the stores, the gateway and the assistant.
//!
//! Relationships are string id arrays with no referential integrity; nothing
//! here validates that a referenced user, post or job exists.

pub mod feed;
pub mod job;
pub mod message;
pub mod project;
pub mod user;

pub use feed::{Comment, Post};
pub use job::{Compensation, Job, JobAddress, JobStatus, JobType};
pub use message::Message;
pub use project::{ManagementProject, ProjectStatus};
pub use user::{Education, Experience, PortfolioProject, User, UserPatch, UserRole};

/// Fresh record identifier (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
