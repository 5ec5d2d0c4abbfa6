//! Project repository over the record store.
//!
//! # Responsibility
//! - Provide CRUD over projects and their embedded tasks.
//! - Re-derive project status on every task mutation.
//!
//! # Invariants
//! - Every mutation re-reads the whole `projects` collection and writes it
//!   back in full; concurrent writers race with last-write-wins.
//! - Deleting an absent project, or an absent task of an existing project,
//!   succeeds without writing.
//! - An explicit status in `ProjectUpdate` never outlives the same call
//!   unless it matches the derived status.

use super::error::{RepoError, RepoResult};
use crate::model::now_epoch_ms;
use crate::model::project::{Project, ProjectId, Task, TaskId};
use crate::model::update::{ProjectUpdate, TaskUpdate};
use crate::model::user::UserId;
use crate::store::{read_collection, write_collection, RecordStore, PROJECTS_KEY};
use log::{info, warn};

/// Repository interface for project and task operations.
pub trait ProjectRepository {
    fn list_projects(&self, user_id: UserId) -> RepoResult<Vec<Project>>;
    fn list_all_projects(&self) -> RepoResult<Vec<Project>>;
    fn get_project(&self, project_id: ProjectId) -> RepoResult<Project>;
    fn create_project(&self, name: &str, user_id: UserId) -> RepoResult<Project>;
    fn update_project(&self, project_id: ProjectId, update: &ProjectUpdate)
        -> RepoResult<Project>;
    fn delete_project(&self, project_id: ProjectId) -> RepoResult<()>;
    fn list_tasks(&self, project_id: ProjectId) -> RepoResult<Vec<Task>>;
    fn create_task(&self, project_id: ProjectId, title: &str) -> RepoResult<Task>;
    fn update_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        update: &TaskUpdate,
    ) -> RepoResult<Task>;
    fn delete_task(&self, project_id: ProjectId, task_id: TaskId) -> RepoResult<()>;
    fn save_progress(&self, project_id: ProjectId) -> RepoResult<Project>;
}

/// Project repository persisted through a `RecordStore`.
pub struct RecordProjectRepository<'store> {
    store: &'store dyn RecordStore,
}

impl<'store> RecordProjectRepository<'store> {
    pub fn new(store: &'store dyn RecordStore) -> Self {
        Self { store }
    }

    fn load(&self) -> Vec<Project> {
        read_collection(self.store, PROJECTS_KEY)
    }

    /// Loads all projects, applies `mutate` to one of them and persists the
    /// whole collection when `mutate` succeeds.
    fn mutate_project<T>(
        &self,
        event: &'static str,
        project_id: ProjectId,
        mutate: impl FnOnce(&mut Project) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let mut projects = self.load();
        let Some(project) = projects.iter_mut().find(|project| project.id == project_id) else {
            warn!(
                "event={event} module=repo status=error error_code=project_not_found project_id={project_id}"
            );
            return Err(RepoError::ProjectNotFound(project_id));
        };

        let output = match mutate(project) {
            Ok(output) => output,
            Err(err) => {
                warn!(
                    "event={event} module=repo status=error error_code={} project_id={project_id}",
                    err.code()
                );
                return Err(err);
            }
        };
        let status = project.status;
        let progress = project.progress();

        write_collection(self.store, PROJECTS_KEY, &projects)?;
        info!(
            "event={event} module=repo status=ok project_id={project_id} project_status={status:?} progress={progress}"
        );
        Ok(output)
    }
}

impl ProjectRepository for RecordProjectRepository<'_> {
    fn list_projects(&self, user_id: UserId) -> RepoResult<Vec<Project>> {
        Ok(self
            .load()
            .into_iter()
            .filter(|project| project.user_id == user_id)
            .collect())
    }

    fn list_all_projects(&self) -> RepoResult<Vec<Project>> {
        Ok(self.load())
    }

    fn get_project(&self, project_id: ProjectId) -> RepoResult<Project> {
        self.load()
            .into_iter()
            .find(|project| project.id == project_id)
            .ok_or(RepoError::ProjectNotFound(project_id))
    }

    fn create_project(&self, name: &str, user_id: UserId) -> RepoResult<Project> {
        let mut projects = self.load();
        let project = Project::new(name, user_id, now_epoch_ms());
        projects.push(project.clone());
        write_collection(self.store, PROJECTS_KEY, &projects)?;

        info!(
            "event=project_create module=repo status=ok project_id={} user_id={}",
            project.id, user_id
        );
        Ok(project)
    }

    fn update_project(
        &self,
        project_id: ProjectId,
        update: &ProjectUpdate,
    ) -> RepoResult<Project> {
        self.mutate_project("project_update", project_id, |project| {
            project.apply(update, now_epoch_ms());
            Ok(project.clone())
        })
    }

    fn delete_project(&self, project_id: ProjectId) -> RepoResult<()> {
        let mut projects = self.load();
        let before = projects.len();
        projects.retain(|project| project.id != project_id);
        if projects.len() == before {
            info!(
                "event=project_delete module=repo status=noop project_id={project_id}"
            );
            return Ok(());
        }

        write_collection(self.store, PROJECTS_KEY, &projects)?;
        info!("event=project_delete module=repo status=ok project_id={project_id}");
        Ok(())
    }

    fn list_tasks(&self, project_id: ProjectId) -> RepoResult<Vec<Task>> {
        Ok(self.get_project(project_id)?.tasks)
    }

    fn create_task(&self, project_id: ProjectId, title: &str) -> RepoResult<Task> {
        self.mutate_project("task_create", project_id, |project| {
            Ok(project.add_task(title, now_epoch_ms()))
        })
    }

    fn update_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        update: &TaskUpdate,
    ) -> RepoResult<Task> {
        self.mutate_project("task_update", project_id, |project| {
            let now_ms = now_epoch_ms();
            let task = project.task_mut(task_id).ok_or(RepoError::TaskNotFound {
                project_id,
                task_id,
            })?;
            task.apply(update, now_ms);
            let updated = task.clone();
            project.touch(now_ms);
            Ok(updated)
        })
    }

    fn delete_task(&self, project_id: ProjectId, task_id: TaskId) -> RepoResult<()> {
        let mut projects = self.load();
        let Some(project) = projects.iter_mut().find(|project| project.id == project_id) else {
            warn!(
                "event=task_delete module=repo status=error error_code=project_not_found project_id={project_id}"
            );
            return Err(RepoError::ProjectNotFound(project_id));
        };

        if !project.remove_task(task_id, now_epoch_ms()) {
            info!(
                "event=task_delete module=repo status=noop project_id={project_id} task_id={task_id}"
            );
            return Ok(());
        }
        let status = project.status;
        let progress = project.progress();

        write_collection(self.store, PROJECTS_KEY, &projects)?;
        info!(
            "event=task_delete module=repo status=ok project_id={project_id} task_id={task_id} project_status={status:?} progress={progress}"
        );
        Ok(())
    }

    fn save_progress(&self, project_id: ProjectId) -> RepoResult<Project> {
        self.mutate_project("project_save_progress", project_id, |project| {
            project.touch(now_epoch_ms());
            Ok(project.clone())
        })
    }
}
