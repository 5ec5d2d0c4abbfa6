//! Explicit session handle for the active identity.
//!
//! # Responsibility
//! - Hold the logged-in user for one application instance.
//! - Replace an ambient process-wide pointer with a value that is passed by
//!   reference to whoever needs identity.
//!
//! # Invariants
//! - Only `AuthService` mutates a session.
//! - The durable pointer under `currentUser` is written by the auth service,
//!   not by the session itself.

use crate::model::user::{User, UserId};

/// Active identity of one application instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// Session with nobody logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|user| user.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub(crate) fn replace(&mut self, user: Option<User>) {
        self.user = user;
    }
}
