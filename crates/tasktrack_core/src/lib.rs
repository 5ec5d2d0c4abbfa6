//! Core data-access layer for TaskTrack.
//! This crate is the single source of truth for project/task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{Project, ProjectId, ProjectStatus, Task, TaskId, TaskProgress};
pub use model::update::{ProjectUpdate, TaskUpdate, ValidationError};
pub use model::user::{User, UserId};
pub use repo::project_repo::{ProjectRepository, RecordProjectRepository};
pub use repo::user_repo::{RecordUserRepository, UserRepository};
pub use repo::{ErrorKind, RepoError, RepoResult};
pub use service::auth_service::AuthService;
pub use service::project_service::ProjectService;
pub use service::state::{LoadStatus, ViewState};
pub use service::{ServiceError, ServiceResult};
pub use session::Session;
pub use store::{RecordStore, SqliteRecordStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
