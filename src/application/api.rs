// src/application/api.rs
use crate::domain::{Credentials, DomainError, Note, NoteId, NotePayload, Tag, User};

/// Port to the remote notes service.
///
/// Every method is one request. Implementations report server-side failures
/// as `DomainError::Api` carrying the server's message.
pub trait NotesApi {
    /// `Ok(None)` when nobody is signed in.
    fn current_user(&mut self) -> Result<Option<User>, DomainError>;

    fn sign_in(&mut self, credentials: &Credentials) -> Result<(), DomainError>;

    fn sign_up(&mut self, credentials: &Credentials) -> Result<(), DomainError>;

    fn sign_out(&mut self) -> Result<(), DomainError>;

    fn list_notes(&mut self) -> Result<Vec<Note>, DomainError>;

    fn create_note(&mut self, payload: &NotePayload) -> Result<Note, DomainError>;

    fn update_note(&mut self, id: &NoteId, payload: &NotePayload) -> Result<Note, DomainError>;

    fn delete_note(&mut self, id: &NoteId) -> Result<(), DomainError>;

    fn list_tags(&mut self) -> Result<Vec<Tag>, DomainError>;
}
