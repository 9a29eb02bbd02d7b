// src/domain/error.rs
use std::fmt;
use thiserror::Error;

/// A client-side action that can be in flight at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Load,
    Save,
    Delete,
    SignIn,
    SignUp,
    SignOut,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Load => "load",
            Action::Save => "save",
            Action::Delete => "delete",
            Action::SignIn => "sign in",
            Action::SignUp => "sign up",
            Action::SignOut => "sign out",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("Please sign in to {0}.")]
    SignInRequired(&'static str),
    #[error("{0}")]
    Authentication(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("A {0} is already in progress")]
    Busy(Action),
    #[error("{0}")]
    InvalidInput(String),
    #[error("No note is being edited")]
    NoEditorOpen,
    #[error("Config error: {0}")]
    Config(String),
}
