use crate::model::project::{ProjectId, TaskId};
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by the user directory and project repository.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    DuplicateUser(String),
    UserNotFound(String),
    ProjectNotFound(ProjectId),
    TaskNotFound {
        project_id: ProjectId,
        task_id: TaskId,
    },
}

/// Coarse classification of a `RepoError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    DuplicateUser,
    StorageFailure,
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(_) => ErrorKind::StorageFailure,
            Self::DuplicateUser(_) => ErrorKind::DuplicateUser,
            Self::UserNotFound(_) | Self::ProjectNotFound(_) | Self::TaskNotFound { .. } => {
                ErrorKind::NotFound
            }
        }
    }

    /// Stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Store(_) => "storage_failure",
            Self::DuplicateUser(_) => "duplicate_user",
            Self::UserNotFound(_) => "user_not_found",
            Self::ProjectNotFound(_) => "project_not_found",
            Self::TaskNotFound { .. } => "task_not_found",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::DuplicateUser(email) => write!(f, "user already exists: {email}"),
            Self::UserNotFound(email) => write!(f, "user not found: {email}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::TaskNotFound {
                project_id,
                task_id,
            } => write!(f, "task not found: {task_id} (project {project_id})"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
