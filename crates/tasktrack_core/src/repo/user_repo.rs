//! User directory over the record store.
//!
//! # Responsibility
//! - Register users and resolve them by email.
//! - Persist the current-user pointer under its own key.
//!
//! # Invariants
//! - Emails are unique with case-sensitive exact matching.
//! - A rejected registration leaves the `users` collection untouched.
//! - Passwords are accepted for API parity but never stored or checked.

use super::error::{RepoError, RepoResult};
use crate::model::user::User;
use crate::store::{
    read_collection, read_record, write_collection, write_record, RecordStore, CURRENT_USER_KEY,
    USERS_KEY,
};
use log::{info, warn};

/// Directory of registered users.
pub trait UserRepository {
    fn create_user(&self, email: &str, password: &str, name: &str) -> RepoResult<User>;
    fn authenticate(&self, email: &str, password: &str) -> RepoResult<User>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn current_user(&self) -> RepoResult<Option<User>>;
    fn set_current_user(&self, user: Option<&User>) -> RepoResult<()>;
}

/// User directory persisted through a `RecordStore`.
pub struct RecordUserRepository<'store> {
    store: &'store dyn RecordStore,
}

impl<'store> RecordUserRepository<'store> {
    pub fn new(store: &'store dyn RecordStore) -> Self {
        Self { store }
    }

    fn load(&self) -> Vec<User> {
        read_collection(self.store, USERS_KEY)
    }
}

impl UserRepository for RecordUserRepository<'_> {
    fn create_user(&self, email: &str, _password: &str, name: &str) -> RepoResult<User> {
        let mut users = self.load();
        if users.iter().any(|user| user.email == email) {
            warn!("event=user_create module=repo status=error error_code=duplicate_user");
            return Err(RepoError::DuplicateUser(email.to_string()));
        }

        let user = User::new(email, name);
        users.push(user.clone());
        write_collection(self.store, USERS_KEY, &users)?;

        info!(
            "event=user_create module=repo status=ok user_id={} user_count={}",
            user.id,
            users.len()
        );
        Ok(user)
    }

    fn authenticate(&self, email: &str, _password: &str) -> RepoResult<User> {
        match self.find_by_email(email)? {
            Some(user) => {
                info!(
                    "event=user_authenticate module=repo status=ok user_id={}",
                    user.id
                );
                Ok(user)
            }
            None => {
                warn!("event=user_authenticate module=repo status=error error_code=user_not_found");
                Err(RepoError::UserNotFound(email.to_string()))
            }
        }
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.load().into_iter().find(|user| user.email == email))
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        Ok(self.load())
    }

    fn current_user(&self) -> RepoResult<Option<User>> {
        Ok(read_record(self.store, CURRENT_USER_KEY))
    }

    fn set_current_user(&self, user: Option<&User>) -> RepoResult<()> {
        write_record(self.store, CURRENT_USER_KEY, user)?;
        match user {
            Some(user) => info!(
                "event=session_set module=repo status=ok user_id={}",
                user.id
            ),
            None => info!("event=session_clear module=repo status=ok"),
        }
        Ok(())
    }
}
