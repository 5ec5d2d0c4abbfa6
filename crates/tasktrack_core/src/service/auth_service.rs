//! Auth state service.
//!
//! # Responsibility
//! - Own the `Session` for one application instance.
//! - Drive login/register/logout through the user directory and keep the
//!   durable current-user pointer in step with the session.
//!
//! # Invariants
//! - Starts in `Loading` until `load_current_user` runs.
//! - The session only changes after the durable pointer was written.
//! - Failures keep the previous session.

use super::state::ViewState;
use super::ServiceResult;
use crate::model::user::User;
use crate::repo::user_repo::UserRepository;
use crate::session::Session;
use log::{debug, warn};

/// Auth state container over a user directory.
pub struct AuthService<U: UserRepository> {
    users: U,
    state: ViewState<Session>,
}

impl<U: UserRepository> AuthService<U> {
    /// Creates a service in the `Loading` phase with an anonymous session.
    pub fn new(users: U) -> Self {
        Self {
            users,
            state: ViewState::loading(Session::anonymous()),
        }
    }

    pub fn session(&self) -> &Session {
        self.state.data()
    }

    pub fn state(&self) -> &ViewState<Session> {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session().user()
    }

    /// Restores the session from the durable pointer.
    ///
    /// Never fails: an unreadable pointer leaves the session anonymous.
    pub fn load_current_user(&mut self) -> &Session {
        let user = match self.users.current_user() {
            Ok(user) => user,
            Err(err) => {
                warn!(
                    "event=session_restore module=service status=error error_code={} error={err}",
                    err.code()
                );
                None
            }
        };
        debug!(
            "event=session_restore module=service status=ok authenticated={}",
            user.is_some()
        );
        self.state.data_mut().replace(user);
        self.state.settle();
        self.state.data()
    }

    /// Resolves `email` to a user and makes it current.
    ///
    /// The password is not verified.
    pub fn login(&mut self, email: &str, password: &str) -> ServiceResult<User> {
        self.state.begin_loading();
        let result = self
            .users
            .authenticate(email, password)
            .and_then(|user| self.users.set_current_user(Some(&user)).map(|()| user));
        self.adopt(result)
    }

    /// Registers a new user and makes it current.
    pub fn register(&mut self, email: &str, password: &str, name: &str) -> ServiceResult<User> {
        self.state.begin_loading();
        let result = self
            .users
            .create_user(email, password, name)
            .and_then(|user| self.users.set_current_user(Some(&user)).map(|()| user));
        self.adopt(result)
    }

    /// Clears the durable pointer and the session.
    pub fn logout(&mut self) -> ServiceResult<()> {
        self.state.begin_loading();
        match self.users.set_current_user(None) {
            Ok(()) => {
                self.state.data_mut().replace(None);
                self.state.settle();
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=logout module=service status=error error_code={}",
                    err.code()
                );
                self.state.fail(err.to_string());
                Err(err.into())
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.state.clear_error();
    }

    fn adopt(&mut self, result: crate::repo::RepoResult<User>) -> ServiceResult<User> {
        match result {
            Ok(user) => {
                self.state.data_mut().replace(Some(user.clone()));
                self.state.settle();
                Ok(user)
            }
            Err(err) => {
                self.state.fail(err.to_string());
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AuthService;
    use crate::db::open_db_in_memory;
    use crate::repo::user_repo::{RecordUserRepository, UserRepository};
    use crate::service::state::LoadStatus;
    use crate::store::SqliteRecordStore;

    #[test]
    fn starts_loading_then_restores_anonymous_session() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteRecordStore::try_new(&conn).unwrap();
        let mut auth = AuthService::new(RecordUserRepository::new(&store));

        assert!(auth.state().is_loading());
        assert!(!auth.load_current_user().is_authenticated());
        assert_eq!(auth.state().status(), &LoadStatus::Ready);
    }

    #[test]
    fn register_persists_current_user_pointer() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteRecordStore::try_new(&conn).unwrap();
        let mut auth = AuthService::new(RecordUserRepository::new(&store));

        let user = auth.register("ana@example.com", "pw", "Ana").unwrap();

        let users = RecordUserRepository::new(&store);
        assert_eq!(users.current_user().unwrap(), Some(user.clone()));
        assert_eq!(auth.session().user_id(), Some(user.id));
    }

    #[test]
    fn failed_login_keeps_previous_session() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteRecordStore::try_new(&conn).unwrap();
        let mut auth = AuthService::new(RecordUserRepository::new(&store));
        let user = auth.register("ana@example.com", "pw", "Ana").unwrap();

        let err = auth.login("nobody@example.com", "pw").unwrap_err();

        assert!(err.to_string().contains("user not found"));
        assert_eq!(auth.current_user(), Some(&user));
        assert!(auth.state().error().is_some());
        auth.clear_error();
        assert_eq!(auth.state().error(), None);
    }
}
