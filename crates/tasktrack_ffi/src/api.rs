//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Validate user input before it reaches core services.
//! - Flatten every outcome into an envelope with a human-readable message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens the record database, restores the session from the
//!   durable current-user pointer, runs one use case and returns fresh data.
//! - No structured error codes cross the boundary, only messages.

use tasktrack_core::db::open_db;
use tasktrack_core::model::update::require_text;
use tasktrack_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AuthService, Project, ProjectService, ProjectStatus, ProjectUpdate, RecordProjectRepository,
    RecordUserRepository, SqliteRecordStore, Task, TaskUpdate, User, ValidationError,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const DB_FILE_NAME: &str = "tasktrack.sqlite3";
const DB_PATH_ENV: &str = "TASKTRACK_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// User as shown by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserItem {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Task as shown by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub project_id: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Project as shown by the UI, with progress counts precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub id: String,
    pub name: String,
    /// `In Progress` or `Completed`.
    pub status: String,
    pub tasks: Vec<TaskItem>,
    pub completed_count: u32,
    pub total_count: u32,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Response envelope for auth calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub ok: bool,
    /// Current user after the call.
    pub user: Option<UserItem>,
    pub message: String,
}

/// Response envelope for project and task calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectsResponse {
    pub ok: bool,
    /// Current user's projects after the call (empty on failure).
    pub projects: Vec<ProjectItem>,
    /// Id of the created or changed project/task, when there is one.
    pub entity_id: Option<String>,
    pub message: String,
}

impl ProjectsResponse {
    fn success(message: impl Into<String>, projects: &[Project], entity_id: Option<String>) -> Self {
        Self {
            ok: true,
            projects: projects.iter().map(to_project_item).collect(),
            entity_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            projects: Vec::new(),
            entity_id: None,
            message: message.into(),
        }
    }
}

/// Response envelope for a single project's task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksResponse {
    pub ok: bool,
    pub tasks: Vec<TaskItem>,
    pub message: String,
}

/// Returns the user restored from the durable current-user pointer.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_current_user() -> AuthResponse {
    auth_call("auth_current_user", |app| {
        Ok((app.auth.current_user().cloned(), "Session restored."))
    })
}

/// Logs in by email. The password is not verified.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_login(email: String, password: String) -> AuthResponse {
    let email = match require_text("email", &email) {
        Ok(email) => email,
        Err(err) => return auth_failure("auth_login", err),
    };
    auth_call("auth_login", |app| {
        let user = app
            .auth
            .login(&email, &password)
            .map_err(|err| err.to_string())?;
        Ok((Some(user), "Logged in."))
    })
}

/// Registers a new user and logs them in.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_register(email: String, password: String, name: String) -> AuthResponse {
    let fields = require_text("email", &email).and_then(|email| {
        require_text("name", &name).map(|name| (email, name))
    });
    let (email, name) = match fields {
        Ok(fields) => fields,
        Err(err) => return auth_failure("auth_register", err),
    };
    auth_call("auth_register", |app| {
        let user = app
            .auth
            .register(&email, &password, &name)
            .map_err(|err| err.to_string())?;
        Ok((Some(user), "Account created."))
    })
}

/// Clears the current user.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_logout() -> AuthResponse {
    auth_call("auth_logout", |app| {
        app.auth.logout().map_err(|err| err.to_string())?;
        Ok((None, "Logged out."))
    })
}

/// Lists the current user's projects.
#[flutter_rust_bridge::frb(sync)]
pub fn projects_list() -> ProjectsResponse {
    projects_call("projects_list", |_| Ok((None, "Projects loaded.")))
}

/// Creates a project owned by the current user.
#[flutter_rust_bridge::frb(sync)]
pub fn project_create(name: String) -> ProjectsResponse {
    let name = match require_text("name", &name) {
        Ok(name) => name,
        Err(err) => return projects_failure("project_create", err),
    };
    projects_call("project_create", |app| {
        let project = app
            .projects
            .create_project(&name)
            .map_err(|err| err.to_string())?;
        Ok((Some(project.id), "Project created."))
    })
}

/// Renames a project and/or requests a status.
///
/// A requested status only sticks when it matches the status derived from
/// the project's tasks.
#[flutter_rust_bridge::frb(sync)]
pub fn project_update(
    project_id: String,
    name: Option<String>,
    status: Option<String>,
) -> ProjectsResponse {
    let request = parse_id("project_id", &project_id).and_then(|project_id| {
        let status = status
            .as_deref()
            .map(|value| {
                ProjectStatus::parse(value)
                    .ok_or_else(|| ValidationError::UnknownStatus(value.to_string()).to_string())
            })
            .transpose()?;
        let update =
            ProjectUpdate::from_fields(name.as_deref(), status).map_err(|err| err.to_string())?;
        Ok((project_id, update))
    });
    let (project_id, update) = match request {
        Ok(request) => request,
        Err(message) => return projects_failure("project_update", message),
    };
    projects_call("project_update", |app| {
        app.projects
            .update_project(project_id, &update)
            .map_err(|err| err.to_string())?;
        Ok((Some(project_id), "Project updated."))
    })
}

/// Deletes a project and all of its tasks.
#[flutter_rust_bridge::frb(sync)]
pub fn project_delete(project_id: String) -> ProjectsResponse {
    let project_id = match parse_id("project_id", &project_id) {
        Ok(id) => id,
        Err(message) => return projects_failure("project_delete", message),
    };
    projects_call("project_delete", |app| {
        app.projects
            .delete_project(project_id)
            .map_err(|err| err.to_string())?;
        Ok((Some(project_id), "Project deleted."))
    })
}

/// Re-derives and persists a project's status.
#[flutter_rust_bridge::frb(sync)]
pub fn project_save_progress(project_id: String) -> ProjectsResponse {
    let project_id = match parse_id("project_id", &project_id) {
        Ok(id) => id,
        Err(message) => return projects_failure("project_save_progress", message),
    };
    projects_call("project_save_progress", |app| {
        app.projects
            .save_progress(project_id)
            .map_err(|err| err.to_string())?;
        Ok((Some(project_id), "Progress saved."))
    })
}

/// Lists one of the current user's projects' tasks.
#[flutter_rust_bridge::frb(sync)]
pub fn project_tasks(project_id: String) -> TasksResponse {
    let result = parse_id("project_id", &project_id).and_then(|project_id| {
        with_app(|app| {
            app.projects
                .project(project_id)
                .map(|project| project.tasks.iter().map(to_task_item).collect::<Vec<_>>())
                .ok_or_else(|| format!("project not found: {project_id}"))
        })
    });
    match result {
        Ok(tasks) => TasksResponse {
            ok: true,
            tasks,
            message: "Tasks loaded.".to_string(),
        },
        Err(message) => TasksResponse {
            ok: false,
            tasks: Vec::new(),
            message: format!("project_tasks failed: {message}"),
        },
    }
}

/// Appends a task to a project.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(project_id: String, title: String) -> ProjectsResponse {
    let request = parse_id("project_id", &project_id).and_then(|project_id| {
        require_text("title", &title)
            .map(|title| (project_id, title))
            .map_err(|err| err.to_string())
    });
    let (project_id, title) = match request {
        Ok(request) => request,
        Err(message) => return projects_failure("task_create", message),
    };
    projects_call("task_create", |app| {
        let task = app
            .projects
            .create_task(project_id, &title)
            .map_err(|err| err.to_string())?;
        Ok((Some(task.id), "Task created."))
    })
}

/// Retitles and/or toggles a task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_update(
    project_id: String,
    task_id: String,
    title: Option<String>,
    completed: Option<bool>,
) -> ProjectsResponse {
    let request = parse_id("project_id", &project_id).and_then(|project_id| {
        let task_id = parse_id("task_id", &task_id)?;
        let update =
            TaskUpdate::from_fields(title.as_deref(), completed).map_err(|err| err.to_string())?;
        Ok((project_id, task_id, update))
    });
    let (project_id, task_id, update) = match request {
        Ok(request) => request,
        Err(message) => return projects_failure("task_update", message),
    };
    projects_call("task_update", |app| {
        app.projects
            .update_task(project_id, task_id, &update)
            .map_err(|err| err.to_string())?;
        Ok((Some(task_id), "Task updated."))
    })
}

/// Removes a task from a project.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(project_id: String, task_id: String) -> ProjectsResponse {
    let request = parse_id("project_id", &project_id)
        .and_then(|project_id| Ok((project_id, parse_id("task_id", &task_id)?)));
    let (project_id, task_id) = match request {
        Ok(request) => request,
        Err(message) => return projects_failure("task_delete", message),
    };
    projects_call("task_delete", |app| {
        app.projects
            .delete_task(project_id, task_id)
            .map_err(|err| err.to_string())?;
        Ok((Some(task_id), "Task deleted."))
    })
}

struct App<'store> {
    auth: AuthService<RecordUserRepository<'store>>,
    projects: ProjectService<RecordProjectRepository<'store>>,
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_app<T>(f: impl FnOnce(&mut App<'_>) -> Result<T, String>) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("database open failed: {err}"))?;
    let store =
        SqliteRecordStore::try_new(&conn).map_err(|err| format!("record store init failed: {err}"))?;

    let mut auth = AuthService::new(RecordUserRepository::new(&store));
    auth.load_current_user();
    let mut projects = ProjectService::new(RecordProjectRepository::new(&store));
    projects
        .sync_session(auth.session())
        .map_err(|err| err.to_string())?;

    f(&mut App { auth, projects })
}

fn auth_call(
    op: &'static str,
    f: impl FnOnce(&mut App<'_>) -> Result<(Option<User>, &'static str), String>,
) -> AuthResponse {
    match with_app(f) {
        Ok((user, message)) => AuthResponse {
            ok: true,
            user: user.as_ref().map(to_user_item),
            message: message.to_string(),
        },
        Err(message) => auth_failure(op, message),
    }
}

fn auth_failure(op: &str, message: impl std::fmt::Display) -> AuthResponse {
    log::warn!("event={op} module=ffi status=error");
    AuthResponse {
        ok: false,
        user: None,
        message: format!("{op} failed: {message}"),
    }
}

fn projects_call(
    op: &'static str,
    f: impl FnOnce(&mut App<'_>) -> Result<(Option<Uuid>, &'static str), String>,
) -> ProjectsResponse {
    let result = with_app(|app| {
        let (entity_id, message) = f(app)?;
        Ok(ProjectsResponse::success(
            message,
            app.projects.projects(),
            entity_id.map(|id| id.to_string()),
        ))
    });
    result.unwrap_or_else(|message| projects_failure(op, message))
}

fn projects_failure(op: &str, message: impl std::fmt::Display) -> ProjectsResponse {
    log::warn!("event={op} module=ffi status=error");
    ProjectsResponse::failure(format!("{op} failed: {message}"))
}

fn parse_id(field: &str, value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid {field} `{}`", value.trim()))
}

fn to_user_item(user: &User) -> UserItem {
    UserItem {
        id: user.id.to_string(),
        email: user.email.clone(),
        name: user.name.clone(),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        completed: task.completed,
        project_id: task.project_id.to_string(),
        created_at_ms: task.created_at,
        updated_at_ms: task.updated_at,
    }
}

fn to_project_item(project: &Project) -> ProjectItem {
    let progress = project.progress();
    ProjectItem {
        id: project.id.to_string(),
        name: project.name.clone(),
        status: project.status.label().to_string(),
        tasks: project.tasks.iter().map(to_task_item).collect(),
        completed_count: u32::try_from(progress.completed).unwrap_or(u32::MAX),
        total_count: u32::try_from(progress.total).unwrap_or(u32::MAX),
        created_at_ms: project.created_at,
        updated_at_ms: project.updated_at,
    }
}
