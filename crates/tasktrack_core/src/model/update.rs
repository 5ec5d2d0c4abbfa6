//! Tagged update payloads and boundary validation.
//!
//! # Responsibility
//! - Represent each settable field combination as its own variant.
//! - Reject empty payloads and blank text before they reach a repository.
//!
//! # Invariants
//! - A constructed update always changes at least one field.
//! - Text carried by an update is trimmed and non-empty.

use super::project::ProjectStatus;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Boundary validation failure for user-supplied input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    BlankField(&'static str),
    /// Update payload does not set any field.
    EmptyUpdate,
    /// Status text is not a known project status.
    UnknownStatus(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} cannot be empty"),
            Self::EmptyUpdate => write!(f, "update must change at least one field"),
            Self::UnknownStatus(value) => write!(
                f,
                "unknown project status `{value}`; expected `In Progress` or `Completed`"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing is left.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

/// Change set for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectUpdate {
    Rename(String),
    /// Only durable when it agrees with the status derived from tasks.
    SetStatus(ProjectStatus),
    RenameAndSetStatus {
        name: String,
        status: ProjectStatus,
    },
}

impl ProjectUpdate {
    /// Builds an update from optional fields.
    ///
    /// # Errors
    /// - `EmptyUpdate` when neither field is supplied.
    /// - `BlankField("name")` when the name is blank.
    pub fn from_fields(
        name: Option<&str>,
        status: Option<ProjectStatus>,
    ) -> Result<Self, ValidationError> {
        let name = name.map(|value| require_text("name", value)).transpose()?;
        match (name, status) {
            (Some(name), Some(status)) => Ok(Self::RenameAndSetStatus { name, status }),
            (Some(name), None) => Ok(Self::Rename(name)),
            (None, Some(status)) => Ok(Self::SetStatus(status)),
            (None, None) => Err(ValidationError::EmptyUpdate),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Rename(name) | Self::RenameAndSetStatus { name, .. } => Some(name),
            Self::SetStatus(_) => None,
        }
    }

    pub fn status(&self) -> Option<ProjectStatus> {
        match self {
            Self::SetStatus(status) | Self::RenameAndSetStatus { status, .. } => Some(*status),
            Self::Rename(_) => None,
        }
    }
}

/// Change set for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUpdate {
    Retitle(String),
    SetCompleted(bool),
    RetitleAndSetCompleted { title: String, completed: bool },
}

impl TaskUpdate {
    /// Builds an update from optional fields.
    ///
    /// # Errors
    /// - `EmptyUpdate` when neither field is supplied.
    /// - `BlankField("title")` when the title is blank.
    pub fn from_fields(
        title: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Self, ValidationError> {
        let title = title.map(|value| require_text("title", value)).transpose()?;
        match (title, completed) {
            (Some(title), Some(completed)) => {
                Ok(Self::RetitleAndSetCompleted { title, completed })
            }
            (Some(title), None) => Ok(Self::Retitle(title)),
            (None, Some(completed)) => Ok(Self::SetCompleted(completed)),
            (None, None) => Err(ValidationError::EmptyUpdate),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Retitle(title) | Self::RetitleAndSetCompleted { title, .. } => Some(title),
            Self::SetCompleted(_) => None,
        }
    }

    pub fn completed(&self) -> Option<bool> {
        match self {
            Self::SetCompleted(completed) | Self::RetitleAndSetCompleted { completed, .. } => {
                Some(*completed)
            }
            Self::Retitle(_) => None,
        }
    }
}
