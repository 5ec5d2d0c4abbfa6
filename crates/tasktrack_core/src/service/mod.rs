//! Application state services.
//!
//! # Responsibility
//! - Mirror repository data in observable, state-machine style caches.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - A failed call records its message and keeps previously cached data.
//! - Services never bypass repository persistence contracts.

pub mod auth_service;
pub mod project_service;
pub mod state;

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service-level error.
#[derive(Debug)]
pub enum ServiceError {
    /// Operation needs a logged-in user and the session has none.
    NoActiveUser,
    Repo(RepoError),
}

impl ServiceError {
    /// Stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoActiveUser => "no_active_user",
            Self::Repo(err) => err.code(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveUser => write!(f, "no user is logged in"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NoActiveUser => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
