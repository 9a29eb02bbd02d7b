// src/domain/mod.rs
pub mod error;
pub mod note;
pub mod tag;
pub mod user;

pub use error::{Action, DomainError};
pub use note::{Note, NoteId, NotePayload};
pub use tag::{Tag, TagId, TagRef};
pub use user::{Credentials, User, UserId};
