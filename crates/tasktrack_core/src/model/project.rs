//! Project and task records.
//!
//! # Responsibility
//! - Define the project record and its embedded, ordered task list.
//! - Derive project status from task completion.
//!
//! # Invariants
//! - `status == Completed` iff `tasks` is non-empty and every task is completed.
//! - Every task in `tasks` carries the owning project's id in `project_id`.
//! - `updated_at` moves forward whenever the project or one of its tasks changes.

use super::update::{ProjectUpdate, TaskUpdate};
use super::user::UserId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Stable identifier for a task, unique within its project.
pub type TaskId = Uuid;

/// Completion state of a project. Always derived from its tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl ProjectStatus {
    /// Applies the status rule to a task list.
    ///
    /// An empty list is never "vacuously" completed.
    pub fn derive(tasks: &[Task]) -> Self {
        if !tasks.is_empty() && tasks.iter().all(|task| task.completed) {
            Self::Completed
        } else {
            Self::InProgress
        }
    }

    /// Display label, matching the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Parses a display label or a snake_case variant name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "In Progress" | "in_progress" => Some(Self::InProgress),
            "Completed" | "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Task embedded in a project. Not addressable on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    pub project_id: ProjectId,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Task {
    /// Creates an incomplete task owned by `project_id`.
    pub fn new(project_id: ProjectId, title: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id: super::new_id(),
            title: title.into(),
            completed: false,
            project_id,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Merges an update into this task and stamps `updated_at`.
    pub fn apply(&mut self, update: &TaskUpdate, now_ms: i64) {
        if let Some(title) = update.title() {
            self.title = title.to_string();
        }
        if let Some(completed) = update.completed() {
            self.completed = completed;
        }
        self.updated_at = now_ms;
    }
}

/// Completed/total counts for a project's tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskProgress {
    pub completed: usize,
    pub total: usize,
}

impl TaskProgress {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            completed: tasks.iter().filter(|task| task.completed).count(),
            total: tasks.len(),
        }
    }
}

impl Display for TaskProgress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

/// Project record owning an ordered task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub status: ProjectStatus,
    /// Insertion order.
    pub tasks: Vec<Task>,
    pub user_id: UserId,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Project {
    /// Creates an empty, in-progress project owned by `user_id`.
    pub fn new(name: impl Into<String>, user_id: UserId, now_ms: i64) -> Self {
        Self {
            id: super::new_id(),
            name: name.into(),
            status: ProjectStatus::InProgress,
            tasks: Vec::new(),
            user_id,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Recomputes `status` from the current task list.
    pub fn refresh_status(&mut self) {
        self.status = ProjectStatus::derive(&self.tasks);
    }

    /// Stamps `updated_at` and re-derives status.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at = now_ms;
        self.refresh_status();
    }

    /// Merges an update, then re-derives status.
    ///
    /// A supplied status only survives when it agrees with the derived one;
    /// the task list is the source of truth.
    pub fn apply(&mut self, update: &ProjectUpdate, now_ms: i64) {
        if let Some(name) = update.name() {
            self.name = name.to_string();
        }
        if let Some(status) = update.status() {
            self.status = status;
        }
        self.touch(now_ms);
    }

    /// Appends a new incomplete task and returns a copy of it.
    pub fn add_task(&mut self, title: impl Into<String>, now_ms: i64) -> Task {
        let task = Task::new(self.id, title, now_ms);
        self.tasks.push(task.clone());
        self.touch(now_ms);
        task
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    /// Removes a task by id. Returns whether anything was removed.
    pub fn remove_task(&mut self, task_id: TaskId, now_ms: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        let removed = self.tasks.len() != before;
        if removed {
            self.touch(now_ms);
        }
        removed
    }

    pub fn progress(&self) -> TaskProgress {
        TaskProgress::of(&self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectStatus, Task, TaskProgress};
    use crate::model::update::{ProjectUpdate, TaskUpdate};
    use uuid::Uuid;

    fn project() -> Project {
        Project::new("Garden", Uuid::now_v7(), 1_000)
    }

    #[test]
    fn empty_task_list_is_in_progress() {
        assert_eq!(ProjectStatus::derive(&[]), ProjectStatus::InProgress);
    }

    #[test]
    fn status_follows_task_completion() {
        let mut project = project();
        let first = project.add_task("dig", 2_000);
        assert_eq!(project.status, ProjectStatus::InProgress);

        project
            .task_mut(first.id)
            .unwrap()
            .apply(&TaskUpdate::SetCompleted(true), 3_000);
        project.touch(3_000);
        assert_eq!(project.status, ProjectStatus::Completed);

        project.add_task("plant", 4_000);
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.progress(), TaskProgress { completed: 1, total: 2 });
    }

    #[test]
    fn added_task_belongs_to_project() {
        let mut project = project();
        let task = project.add_task("water", 2_000);
        assert_eq!(task.project_id, project.id);
        assert!(!task.completed);
        assert_eq!(project.updated_at, 2_000);
    }

    #[test]
    fn explicit_status_is_overridden_by_derivation() {
        let mut project = project();
        project.apply(&ProjectUpdate::SetStatus(ProjectStatus::Completed), 2_000);
        assert_eq!(project.status, ProjectStatus::InProgress);
    }

    #[test]
    fn apply_stamps_exact_update_time() {
        let mut project = project();
        project.apply(&ProjectUpdate::Rename("Orchard".to_string()), 2_500);
        assert_eq!(project.name, "Orchard");
        assert_eq!(project.updated_at, 2_500);
        assert_eq!(project.created_at, 1_000);
    }

    #[test]
    fn task_apply_stamps_task_and_touch_stamps_project() {
        let mut project = project();
        let task = project.add_task("prune", 2_000);

        let stored = project.task_mut(task.id).unwrap();
        stored.apply(&TaskUpdate::Retitle("prune roses".to_string()), 3_500);
        assert_eq!(stored.updated_at, 3_500);
        assert_eq!(stored.created_at, 2_000);
        assert_eq!(project.updated_at, 2_000);

        project.touch(3_500);
        assert_eq!(project.updated_at, 3_500);
    }

    #[test]
    fn removing_task_stamps_project() {
        let mut project = project();
        let task = project.add_task("weed", 2_000);
        assert!(project.remove_task(task.id, 4_000));
        assert_eq!(project.updated_at, 4_000);
        assert!(project.tasks.is_empty());
    }

    #[test]
    fn removing_missing_task_does_not_touch_project() {
        let mut project = project();
        assert!(!project.remove_task(Uuid::now_v7(), 9_000));
        assert_eq!(project.updated_at, 1_000);
    }

    #[test]
    fn status_serializes_as_display_label() {
        let json = serde_json::to_string(&ProjectStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        assert_eq!(ProjectStatus::parse("completed"), Some(ProjectStatus::Completed));
        assert_eq!(ProjectStatus::parse("done"), None);
    }

    #[test]
    fn task_fields_serialize_in_camel_case() {
        let task = Task::new(Uuid::now_v7(), "t", 5);
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("projectId").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }
}
