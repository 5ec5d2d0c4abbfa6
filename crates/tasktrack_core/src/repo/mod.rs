//! User directory and project repository.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Keep record-store layout details out of the service layer.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`DuplicateUser`, `*NotFound`)
//!   in addition to storage failures.
//! - Repositories never validate user input; callers validate at the boundary.

mod error;
pub mod project_repo;
pub mod user_repo;

pub use error::{ErrorKind, RepoError, RepoResult};
