//! Project state service.
//!
//! # Responsibility
//! - Cache the logged-in user's projects for rendering.
//! - Forward mutations to the project repository and re-fetch afterwards.
//!
//! # Invariants
//! - The cache is re-listed whenever the session identity changes and is
//!   cleared without a store read on logout.
//! - Every successful mutation is followed by a full re-list, so the cache
//!   never lags durable state by more than one repository call.
//! - A failed call records its message and keeps the cached list.
//! - Mutations only reach projects owned by the session user. Another user's
//!   project is reported as not found.

use super::state::ViewState;
use super::{ServiceError, ServiceResult};
use crate::model::project::{Project, ProjectId, Task, TaskId};
use crate::model::update::{ProjectUpdate, TaskUpdate};
use crate::model::user::UserId;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::{RepoError, RepoResult};
use crate::session::Session;
use log::{debug, warn};

/// Project list container over a project repository.
pub struct ProjectService<P: ProjectRepository> {
    projects: P,
    owner: Option<UserId>,
    state: ViewState<Vec<Project>>,
}

impl<P: ProjectRepository> ProjectService<P> {
    /// Creates an empty, ready service with no owner.
    pub fn new(projects: P) -> Self {
        Self {
            projects,
            owner: None,
            state: ViewState::ready(Vec::new()),
        }
    }

    pub fn state(&self) -> &ViewState<Vec<Project>> {
        &self.state
    }

    pub fn projects(&self) -> &[Project] {
        self.state.data()
    }

    pub fn project(&self, project_id: ProjectId) -> Option<&Project> {
        self.projects().iter().find(|project| project.id == project_id)
    }

    /// User whose projects are cached.
    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Follows the session identity.
    ///
    /// Re-lists when a different user logged in, clears the cache on logout,
    /// and does nothing when the identity is unchanged.
    pub fn sync_session(&mut self, session: &Session) -> ServiceResult<()> {
        let next = session.user_id();
        if next == self.owner {
            return Ok(());
        }

        self.owner = next;
        match next {
            Some(_) => self.refresh(),
            None => {
                self.state.resolve(Vec::new());
                Ok(())
            }
        }
    }

    /// Re-lists the owner's projects. No-op without an owner.
    pub fn refresh(&mut self) -> ServiceResult<()> {
        let Some(owner) = self.owner else {
            return Ok(());
        };

        self.state.begin_loading();
        match self.projects.list_projects(owner) {
            Ok(projects) => {
                debug!(
                    "event=projects_refresh module=service status=ok user_id={owner} project_count={}",
                    projects.len()
                );
                self.state.resolve(projects);
                Ok(())
            }
            Err(err) => self.record_failure("projects_refresh", err.into()),
        }
    }

    /// Creates a project owned by the session user.
    pub fn create_project(&mut self, name: &str) -> ServiceResult<Project> {
        let Some(owner) = self.owner else {
            return self.record_failure("project_create", ServiceError::NoActiveUser);
        };
        self.mutate("project_create", |repo| repo.create_project(name, owner))
    }

    pub fn update_project(
        &mut self,
        project_id: ProjectId,
        update: &ProjectUpdate,
    ) -> ServiceResult<Project> {
        self.mutate_owned("project_update", project_id, |repo| {
            repo.update_project(project_id, update)
        })
    }

    pub fn delete_project(&mut self, project_id: ProjectId) -> ServiceResult<()> {
        self.mutate_owned("project_delete", project_id, |repo| {
            repo.delete_project(project_id)
        })
    }

    pub fn create_task(&mut self, project_id: ProjectId, title: &str) -> ServiceResult<Task> {
        self.mutate_owned("task_create", project_id, |repo| {
            repo.create_task(project_id, title)
        })
    }

    pub fn update_task(
        &mut self,
        project_id: ProjectId,
        task_id: TaskId,
        update: &TaskUpdate,
    ) -> ServiceResult<Task> {
        self.mutate_owned("task_update", project_id, |repo| {
            repo.update_task(project_id, task_id, update)
        })
    }

    pub fn delete_task(&mut self, project_id: ProjectId, task_id: TaskId) -> ServiceResult<()> {
        self.mutate_owned("task_delete", project_id, |repo| {
            repo.delete_task(project_id, task_id)
        })
    }

    /// Re-derives and persists a project's status on explicit request.
    pub fn save_progress(&mut self, project_id: ProjectId) -> ServiceResult<Project> {
        self.mutate_owned("project_save_progress", project_id, |repo| {
            repo.save_progress(project_id)
        })
    }

    pub fn clear_error(&mut self) {
        self.state.clear_error();
    }

    /// Runs `call` after checking that `project_id` belongs to the owner.
    ///
    /// An absent project passes the check so the repository applies its own
    /// missing-id policy.
    fn mutate_owned<T>(
        &mut self,
        event: &'static str,
        project_id: ProjectId,
        call: impl FnOnce(&P) -> RepoResult<T>,
    ) -> ServiceResult<T> {
        self.state.clear_error();
        if let Err(err) = self.ensure_owned(project_id) {
            return self.record_failure(event, err);
        }
        self.mutate(event, call)
    }

    fn ensure_owned(&self, project_id: ProjectId) -> ServiceResult<()> {
        let Some(owner) = self.owner else {
            return Err(ServiceError::NoActiveUser);
        };
        match self.projects.get_project(project_id) {
            Ok(project) if project.user_id != owner => {
                warn!(
                    "event=project_access module=service status=denied user_id={owner} project_id={project_id}"
                );
                Err(RepoError::ProjectNotFound(project_id).into())
            }
            Ok(_) | Err(RepoError::ProjectNotFound(_)) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn mutate<T>(
        &mut self,
        event: &'static str,
        call: impl FnOnce(&P) -> RepoResult<T>,
    ) -> ServiceResult<T> {
        self.state.clear_error();
        match call(&self.projects) {
            Ok(output) => {
                self.refresh()?;
                Ok(output)
            }
            Err(err) => self.record_failure(event, err.into()),
        }
    }

    fn record_failure<T>(&mut self, event: &'static str, err: ServiceError) -> ServiceResult<T> {
        warn!(
            "event={event} module=service status=error error_code={}",
            err.code()
        );
        self.state.fail(err.to_string());
        Err(err)
    }
}
