// src/application/session.rs
use crate::domain::{DomainError, User};

/// The signed-in user, if any. Writes are refused while empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    pub fn clear(&mut self) {
        self.user = None;
    }

    /// `action` completes the message "Please sign in to {action}."
    pub fn require_user(&self, action: &'static str) -> Result<&User, DomainError> {
        self.user
            .as_ref()
            .ok_or(DomainError::SignInRequired(action))
    }
}
