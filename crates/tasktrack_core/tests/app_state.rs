use std::cell::Cell;
use tasktrack_core::db::open_db_in_memory;
use tasktrack_core::{
    AuthService, ErrorKind, LoadStatus, ProjectRepository, ProjectService, ProjectStatus,
    ProjectUpdate, RecordProjectRepository, RecordStore, RecordUserRepository, ServiceError,
    SqliteRecordStore, StoreError, StoreResult, TaskUpdate,
};
use uuid::Uuid;

#[test]
fn projects_follow_login_and_logout() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let mut auth = AuthService::new(RecordUserRepository::new(&store));
    let mut projects = ProjectService::new(RecordProjectRepository::new(&store));

    auth.load_current_user();
    projects.sync_session(auth.session()).unwrap();
    assert!(projects.projects().is_empty());

    auth.register("ana@example.com", "pw", "Ana").unwrap();
    projects.sync_session(auth.session()).unwrap();
    projects.create_project("Ana's").unwrap();
    assert_eq!(projects.projects().len(), 1);

    auth.logout().unwrap();
    projects.sync_session(auth.session()).unwrap();
    assert!(projects.projects().is_empty());
    assert_eq!(projects.owner(), None);
    assert_eq!(projects.state().status(), &LoadStatus::Ready);

    auth.register("ben@example.com", "pw", "Ben").unwrap();
    projects.sync_session(auth.session()).unwrap();
    assert!(projects.projects().is_empty());

    auth.login("ana@example.com", "pw").unwrap();
    projects.sync_session(auth.session()).unwrap();
    assert_eq!(projects.projects().len(), 1);
    assert_eq!(projects.projects()[0].name, "Ana's");
}

#[test]
fn session_restores_from_durable_pointer() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let user = {
        let mut auth = AuthService::new(RecordUserRepository::new(&store));
        auth.register("ana@example.com", "pw", "Ana").unwrap()
    };

    let mut restarted = AuthService::new(RecordUserRepository::new(&store));
    assert!(restarted.state().is_loading());
    let session = restarted.load_current_user();
    assert_eq!(session.user(), Some(&user));
}

#[test]
fn mutations_refresh_cache_from_repository() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let mut auth = AuthService::new(RecordUserRepository::new(&store));
    let mut projects = ProjectService::new(RecordProjectRepository::new(&store));
    auth.register("ana@example.com", "pw", "Ana").unwrap();
    projects.sync_session(auth.session()).unwrap();

    let project = projects.create_project("P1").unwrap();
    let task = projects.create_task(project.id, "T1").unwrap();
    assert_eq!(projects.project(project.id).unwrap().tasks.len(), 1);

    projects
        .update_task(project.id, task.id, &TaskUpdate::SetCompleted(true))
        .unwrap();
    assert_eq!(
        projects.project(project.id).unwrap().status,
        ProjectStatus::Completed
    );

    projects
        .update_project(project.id, &ProjectUpdate::Rename("Renamed".to_string()))
        .unwrap();
    assert_eq!(projects.project(project.id).unwrap().name, "Renamed");

    projects.delete_task(project.id, task.id).unwrap();
    let cached = projects.project(project.id).unwrap();
    assert!(cached.tasks.is_empty());
    assert_eq!(cached.status, ProjectStatus::InProgress);

    let saved = projects.save_progress(project.id).unwrap();
    assert_eq!(projects.project(project.id), Some(&saved));

    projects.delete_project(project.id).unwrap();
    assert!(projects.projects().is_empty());
}

#[test]
fn repository_error_keeps_stale_cache_visible() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let mut auth = AuthService::new(RecordUserRepository::new(&store));
    let mut projects = ProjectService::new(RecordProjectRepository::new(&store));
    auth.register("ana@example.com", "pw", "Ana").unwrap();
    projects.sync_session(auth.session()).unwrap();
    projects.create_project("Keep me").unwrap();

    let err = projects.create_task(Uuid::now_v7(), "nowhere").unwrap_err();

    assert!(matches!(err, ServiceError::Repo(_)));
    assert_eq!(projects.projects().len(), 1);
    assert!(projects.state().error().unwrap().contains("project not found"));

    projects.clear_error();
    assert_eq!(projects.state().error(), None);
}

#[test]
fn next_successful_call_clears_previous_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let mut auth = AuthService::new(RecordUserRepository::new(&store));
    let mut projects = ProjectService::new(RecordProjectRepository::new(&store));
    auth.register("ana@example.com", "pw", "Ana").unwrap();
    projects.sync_session(auth.session()).unwrap();

    projects.delete_task(Uuid::now_v7(), Uuid::now_v7()).unwrap_err();
    assert!(projects.state().error().is_some());

    projects.create_project("Fine").unwrap();
    assert_eq!(projects.state().status(), &LoadStatus::Ready);
}

#[test]
fn foreign_projects_cannot_be_mutated() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let mut auth = AuthService::new(RecordUserRepository::new(&store));
    let mut projects = ProjectService::new(RecordProjectRepository::new(&store));
    auth.register("ana@example.com", "pw", "Ana").unwrap();
    projects.sync_session(auth.session()).unwrap();
    let secret = projects.create_project("Ana secret").unwrap();
    let secret_task = projects.create_task(secret.id, "hidden").unwrap();
    let before = RecordProjectRepository::new(&store)
        .get_project(secret.id)
        .unwrap();
    auth.logout().unwrap();

    auth.register("ben@example.com", "pw", "Ben").unwrap();
    projects.sync_session(auth.session()).unwrap();

    let rename =
        projects.update_project(secret.id, &ProjectUpdate::Rename("pwned".to_string()));
    let add = projects.create_task(secret.id, "intruder");
    let toggle =
        projects.update_task(secret.id, secret_task.id, &TaskUpdate::SetCompleted(true));
    let drop_task = projects.delete_task(secret.id, secret_task.id);
    let save = projects.save_progress(secret.id);
    let delete = projects.delete_project(secret.id);

    for err in [
        rename.map(|_| ()).unwrap_err(),
        add.map(|_| ()).unwrap_err(),
        toggle.map(|_| ()).unwrap_err(),
        drop_task.unwrap_err(),
        save.map(|_| ()).unwrap_err(),
        delete.unwrap_err(),
    ] {
        assert!(matches!(
            err,
            ServiceError::Repo(ref repo) if repo.kind() == ErrorKind::NotFound
        ));
    }
    assert!(projects.projects().is_empty());

    let after = RecordProjectRepository::new(&store)
        .get_project(secret.id)
        .unwrap();
    assert_eq!(after, before);
}

#[test]
fn create_project_without_session_fails() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let mut projects = ProjectService::new(RecordProjectRepository::new(&store));

    let err = projects.create_project("Nobody's").unwrap_err();

    assert!(matches!(err, ServiceError::NoActiveUser));
    assert_eq!(projects.state().error(), Some("no user is logged in"));
}

#[test]
fn duplicate_registration_reports_message_and_keeps_session() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let mut auth = AuthService::new(RecordUserRepository::new(&store));
    let ana = auth.register("ana@example.com", "pw", "Ana").unwrap();

    let err = auth.register("ana@example.com", "pw", "Again").unwrap_err();

    assert!(err.to_string().contains("user already exists"));
    assert_eq!(auth.current_user(), Some(&ana));
    assert!(matches!(auth.state().status(), LoadStatus::Failed(_)));
}

/// Store that rejects every write after construction.
struct ReadOnlyStore<'conn> {
    inner: SqliteRecordStore<'conn>,
    writable: Cell<bool>,
}

impl RecordStore for ReadOnlyStore<'_> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        if !self.writable.get() {
            return Err(StoreError::MissingSchema);
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        if !self.writable.get() {
            return Err(StoreError::MissingSchema);
        }
        self.inner.remove_item(key)
    }
}

#[test]
fn failed_logout_keeps_user_and_reports_error() {
    let conn = open_db_in_memory().unwrap();
    let store = ReadOnlyStore {
        inner: SqliteRecordStore::try_new(&conn).unwrap(),
        writable: Cell::new(true),
    };
    let mut auth = AuthService::new(RecordUserRepository::new(&store));
    let mut projects = ProjectService::new(RecordProjectRepository::new(&store));
    let ana = auth.register("ana@example.com", "pw", "Ana").unwrap();
    projects.sync_session(auth.session()).unwrap();
    projects.create_project("Survives").unwrap();

    store.writable.set(false);
    auth.logout().unwrap_err();
    let err = projects.create_project("Rejected").unwrap_err();

    assert_eq!(auth.current_user(), Some(&ana));
    assert!(auth.state().error().unwrap().contains("storage failure"));
    assert!(err.to_string().contains("storage failure"));
    assert_eq!(projects.projects().len(), 1);
    assert_eq!(projects.projects()[0].name, "Survives");
}
